//! Merchant onboarding checklist route.

use axum::{Json, extract::Query};
use serde::Deserialize;

use crate::wishlist::OnboardingList;

#[derive(Debug, Deserialize)]
pub struct OnboardingParams {
    /// Index of the active step.
    #[serde(default)]
    pub active: usize,
}

/// Onboarding steps with the requested step active.
pub async fn show(Query(params): Query<OnboardingParams>) -> Json<OnboardingList> {
    let mut list = OnboardingList::default();
    list.set_active(params.active);
    Json(list)
}
