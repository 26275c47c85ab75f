//! Health check endpoint handler.

use crate::api::{models::HealthResponse, response};

/// Handler for `GET /api/health`.
pub async fn health() -> impl axum::response::IntoResponse {
    response::ok(HealthResponse::ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn health_handler_runs_without_panic() {
        let _ = health().await;
    }
}
