//! Adds `Cache-Control: no-store` to every response — session snapshots
//! and pipeline runs are never meant to be cached by an intermediary.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};

pub async fn no_store_layer(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert("cache-control", HeaderValue::from_static("no-store"));
    response
}
