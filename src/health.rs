use axum::{http::StatusCode, routing::get, Router};
use log::info;
use std::net::SocketAddr;
use tokio::net::TcpListener;

pub fn router() -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .fallback(|| async { StatusCode::NOT_FOUND })
}

async fn health_handler() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

/// serves the liveness probe until the listener fails
pub async fn serve(listener: TcpListener) -> std::io::Result<()> {
    axum::serve(listener, router()).await
}

pub async fn start_health_server(port: u16) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("Health endpoint listening on http://{}/health", addr);
    serve(listener).await?;
    Ok(())
}
