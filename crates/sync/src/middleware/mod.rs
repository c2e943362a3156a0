//! HTTP middleware stack for the wishlist host.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. CORS (customer account surfaces call in from Shopify's origin)

pub mod customer;
pub mod request_id;

pub use customer::{CUSTOMER_ID_HEADER, CustomerContext, EDITOR_PREVIEW_HEADER};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
