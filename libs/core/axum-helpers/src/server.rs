use axum::{Json, Router, routing::get};
use core_config::server::ServerConfig;
use serde_json::{Value, json};
use std::future::Future;
use std::io;
use tracing::info;

/// Starts an Axum server that drains once `shutdown` completes.
///
/// The caller owns the shutdown trigger, so several listeners in one process
/// can stop together off a shared [`crate::shutdown::ShutdownCoordinator`].
pub async fn serve_until<F>(
    router: Router,
    server_config: &ServerConfig,
    shutdown: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;

    info!("Server starting on {}", listener.local_addr()?);
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown)
        .await
        .inspect_err(|e| {
            tracing::error!("Server encountered an error: {:?}", e);
        })?;

    Ok(())
}

/// Liveness route, mergeable into any app router.
pub fn health_router() -> Router {
    Router::new().route("/health", get(health))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
