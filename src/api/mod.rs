//! HTTP surface (component H's external half): session lifecycle, offline
//! pipeline run/evaluate, health, all behind CORS + request logging +
//! cache suppression middleware.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod response;
pub mod routes;

pub use error::{ApiError, ApiErrorResponse, ApiResult};
pub use middleware::cors_layer;
pub use response::SuccessResponse;
pub use routes::{create_router, AppState};
