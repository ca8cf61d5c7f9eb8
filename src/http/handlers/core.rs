use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use crate::http::error::ApiError;
use crate::http::types::AppState;

pub async fn health(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let store = state.store.clone();
    let outcome = tokio::task::spawn_blocking(move || store.ping())
        .await
        .map_err(|e| ApiError::internal("store_unavailable", e))?;
    if let Err(e) = outcome {
        tracing::warn!(error = %e, "health check failed");
        return Err(ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "store_unavailable",
            format!("{e:#}"),
        ));
    }
    Ok(Json(json!({ "status": "ok" })))
}
