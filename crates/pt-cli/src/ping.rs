//! Liveness endpoint for hosting platforms' health checks.
//!
//! Answers every GET, on any path, with a fixed plaintext body. It holds no
//! state and never touches the directory or logs.

use std::future::Future;
use std::io;

use axum::Router;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use tokio::net::TcpListener;

/// Body returned to every health check.
pub const PING_BODY: &str = "✅ Presence tracker is running.";

async fn respond(method: Method) -> Response {
    if method == Method::GET || method == Method::HEAD {
        (StatusCode::OK, PING_BODY).into_response()
    } else {
        StatusCode::METHOD_NOT_ALLOWED.into_response()
    }
}

pub fn router() -> Router {
    Router::new().fallback(respond)
}

/// Serves the endpoint until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, shutdown: F) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router())
        .with_graceful_shutdown(shutdown)
        .await
}
