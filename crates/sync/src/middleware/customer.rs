//! Customer context extractor.
//!
//! The customer account surface forwards three things with every request:
//! the customer access token (`Authorization`), the customer ID
//! (`x-customer-id`) and, when rendering inside the editor,
//! `x-editor-preview: 1`. They are passed through explicitly; nothing is
//! read from ambient state.

use axum::{extract::FromRequestParts, http::request::Parts};
use secrecy::SecretString;
use wishlist_core::CustomerRef;

use crate::error::AppError;
use crate::wishlist::RenderContext;

/// Header carrying the customer ID.
pub const CUSTOMER_ID_HEADER: &str = "x-customer-id";

/// Header marking editor preview requests.
pub const EDITOR_PREVIEW_HEADER: &str = "x-editor-preview";

/// Render context plus the access token used for Customer Account API calls.
///
/// Preview requests need neither a customer nor a token. Customer requests
/// are rejected with `401` unless both are present.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(caller: CustomerContext) -> impl IntoResponse {
///     match caller.render {
///         RenderContext::Customer(customer) => format!("Hello {customer}"),
///         RenderContext::Preview => "Editor preview".to_string(),
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CustomerContext {
    pub render: RenderContext,
    pub access_token: Option<SecretString>,
}

impl<S> FromRequestParts<S> for CustomerContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
                .filter(|value| !value.is_empty())
        };

        let access_token = header(axum::http::header::AUTHORIZATION.as_str())
            .map(|value| value.strip_prefix("Bearer ").unwrap_or(value).trim())
            .filter(|token| !token.is_empty())
            .map(|token| SecretString::from(token.to_owned()));

        if header(EDITOR_PREVIEW_HEADER) == Some("1") {
            return Ok(Self {
                render: RenderContext::Preview,
                access_token,
            });
        }

        let customer = header(CUSTOMER_ID_HEADER)
            .map(CustomerRef::new)
            .ok_or_else(|| AppError::Unauthorized("missing customer id".to_string()))?;
        let access_token = access_token
            .ok_or_else(|| AppError::Unauthorized("missing customer access token".to_string()))?;

        Ok(Self {
            render: RenderContext::Customer(customer),
            access_token: Some(access_token),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::Request;
    use secrecy::ExposeSecret;

    use super::*;

    async fn extract(request: Request<()>) -> Result<CustomerContext, AppError> {
        let (mut parts, ()) = request.into_parts();
        CustomerContext::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_customer_request() {
        let request = Request::builder()
            .header("authorization", "Bearer shcat_abc")
            .header(CUSTOMER_ID_HEADER, "7012")
            .body(())
            .unwrap();

        let context = extract(request).await.unwrap();
        assert_eq!(
            context.render,
            RenderContext::Customer(CustomerRef::new("7012"))
        );
        assert_eq!(context.access_token.unwrap().expose_secret(), "shcat_abc");
    }

    #[tokio::test]
    async fn test_preview_needs_no_customer() {
        let request = Request::builder()
            .header(EDITOR_PREVIEW_HEADER, "1")
            .body(())
            .unwrap();

        let context = extract(request).await.unwrap();
        assert_eq!(context.render, RenderContext::Preview);
        assert!(context.access_token.is_none());
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let request = Request::builder()
            .header(CUSTOMER_ID_HEADER, "7012")
            .body(())
            .unwrap();

        assert!(matches!(
            extract(request).await,
            Err(AppError::Unauthorized(_))
        ));
    }
}
