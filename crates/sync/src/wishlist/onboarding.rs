//! Merchant onboarding checklist.
//!
//! Purely render-local: the active step and completion flags live for one
//! render and are never persisted.

use serde::Serialize;

/// One onboarding step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingStep {
    pub handle: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub action_title: &'static str,
    pub action_link: &'static str,
    pub is_complete: bool,
}

/// Ordered onboarding steps with one active step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingList {
    steps: Vec<OnboardingStep>,
    active_step: usize,
}

impl Default for OnboardingList {
    fn default() -> Self {
        Self {
            steps: vec![
                OnboardingStep {
                    handle: "step-1",
                    title: "Upgrade to new customer accounts",
                    description: "You are still using legacy customer accounts. Please upgrade to the new version to use this app.",
                    action_title: "Upgrade",
                    action_link: "/step-2",
                    is_complete: false,
                },
                OnboardingStep {
                    handle: "step-2",
                    title: "Add to customer accounts",
                    description: "Add the app to your customer accounts",
                    action_title: "Add",
                    action_link: "/step-3",
                    is_complete: true,
                },
            ],
            active_step: 0,
        }
    }
}

impl OnboardingList {
    #[must_use]
    pub fn steps(&self) -> &[OnboardingStep] {
        &self.steps
    }

    #[must_use]
    pub const fn active_step(&self) -> usize {
        self.active_step
    }

    /// The active step.
    #[must_use]
    pub fn active(&self) -> Option<&OnboardingStep> {
        self.steps.get(self.active_step)
    }

    /// Make `index` the active step. Out-of-range indexes are ignored.
    pub fn set_active(&mut self, index: usize) {
        if index < self.steps.len() {
            self.active_step = index;
        }
    }

    /// Flip the completion flag of the step at `index`.
    pub fn toggle_complete(&mut self, index: usize) {
        if let Some(step) = self.steps.get_mut(index) {
            step.is_complete = !step.is_complete;
        }
    }

    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.steps.iter().filter(|step| step.is_complete).count()
    }
}
