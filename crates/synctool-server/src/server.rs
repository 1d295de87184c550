use axum::Router;
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Binds `addr` and serves the feed router until the task is cancelled.
pub async fn serve(addr: SocketAddr, router: Router) -> std::io::Result<()> {
    let router = router.layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "sync feed server listening");

    axum::serve(listener, router).await
}
