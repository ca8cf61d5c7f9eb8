use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use super::handlers;
use super::types::AppState;

pub fn app(state: AppState) -> Router {
    let limit = state.max_upload_bytes;
    Router::new()
        .route("/health", get(handlers::core::health))
        .route("/upload-grades", post(handlers::upload::upload_grades))
        .route(
            "/students/more-than-3-twos",
            get(handlers::students::more_than_3_twos),
        )
        .route(
            "/students/less-than-5-twos",
            get(handlers::students::less_than_5_twos),
        )
        .layer(DefaultBodyLimit::max(limit))
        .with_state(state)
}
