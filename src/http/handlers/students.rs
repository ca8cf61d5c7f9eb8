use axum::extract::State;
use axum::Json;
use rusqlite::Connection;

use crate::http::error::ApiError;
use crate::http::types::AppState;
use crate::queries::{self, StudentTwos};

async fn run_query(
    state: AppState,
    query: fn(&Connection) -> anyhow::Result<Vec<StudentTwos>>,
) -> Result<Json<Vec<StudentTwos>>, ApiError> {
    let store = state.store.clone();
    let rows = tokio::task::spawn_blocking(move || {
        let conn = store.connect()?;
        query(&conn)
    })
    .await
    .map_err(|e| ApiError::internal("query_failed", e))?
    .map_err(|e| {
        tracing::error!(error = %e, "twos query failed");
        ApiError::internal("query_failed", format!("{e:#}"))
    })?;
    Ok(Json(rows))
}

pub async fn more_than_3_twos(
    State(state): State<AppState>,
) -> Result<Json<Vec<StudentTwos>>, ApiError> {
    run_query(state, queries::students_more_than_3_twos).await
}

pub async fn less_than_5_twos(
    State(state): State<AppState>,
) -> Result<Json<Vec<StudentTwos>>, ApiError> {
    run_query(state, queries::students_less_than_5_twos).await
}
