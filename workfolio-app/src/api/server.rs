use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::routes::{
    create_work, get_work, list_works, remove_work, update_work, upload_image, AppState,
};
use workfolio_core::Repository;

pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn router(repo: Arc<dyn Repository>) -> Router {
    let state = Arc::new(AppState { repo });

    Router::new()
        .route("/works", get(list_works).post(create_work))
        .route(
            "/works/upload",
            post(upload_image).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route(
            "/works/:id",
            get(get_work).patch(update_work).delete(remove_work),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn run(repo: Arc<dyn Repository>, addr: SocketAddr) -> anyhow::Result<()> {
    let app = router(repo);
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
