//! API route definitions and shared application state.

use axum::{
    routing::{get, post},
    Router,
};

use crate::api::{handlers, middleware};
use crate::config::ServerConfig;
use crate::session::SessionRegistry;

/// Shared application state: the live session directory and server-wide
/// config (defaults handed to newly created sessions and the evaluator).
#[derive(Clone)]
pub struct AppState {
    pub registry: SessionRegistry,
    pub config: ServerConfig,
}

/// Build the complete API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/session/create", post(handlers::session::create))
        .route("/api/session/list", get(handlers::session::list))
        .route("/api/session/chunk", post(handlers::session::chunk))
        .route("/api/session/flush", post(handlers::session::flush))
        .route("/api/session/snapshot", post(handlers::session::snapshot))
        .route("/api/session/close", post(handlers::session::close))
        .route("/api/pipeline/run", post(handlers::pipeline::run))
        .route("/api/pipeline/evaluate", post(handlers::pipeline::evaluate))
        .layer(axum::middleware::from_fn(middleware::no_store_layer))
        .layer(middleware::logging_layer())
        .layer(middleware::cors_layer())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn test_state() -> AppState {
        AppState {
            registry: SessionRegistry::new(),
            config: ServerConfig::default(),
        }
    }

    #[tokio::test]
    async fn health_route_responds_ok() {
        let app = create_router(test_state());
        let response = app
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let app = create_router(test_state());
        let response = app
            .oneshot(Request::builder().uri("/api/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn session_create_then_list_round_trips() {
        let app = create_router(test_state());
        let create_response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/session/create")
                    .header("content-type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(create_response.status(), StatusCode::CREATED);

        let list_response = app
            .oneshot(Request::builder().uri("/api/session/list").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(list_response.status(), StatusCode::OK);
    }
}
