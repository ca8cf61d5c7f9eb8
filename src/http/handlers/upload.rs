use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::http::error::ApiError;
use crate::http::types::AppState;
use crate::ingest::{self, IngestError, UploadSummary};

pub const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub status: &'static str,
    pub records_loaded: usize,
    pub students: usize,
}

impl From<UploadSummary> for UploadResponse {
    fn from(s: UploadSummary) -> Self {
        Self {
            status: "ok",
            records_loaded: s.records_loaded,
            students: s.students,
        }
    }
}

fn multipart_err(e: MultipartError) -> ApiError {
    ApiError::new(e.status(), "bad_request", e.body_text())
}

fn is_csv_name(name: &str) -> bool {
    name.to_lowercase().ends_with(".csv")
}

pub async fn upload_grades(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut multipart = multipart.map_err(|e| {
        ApiError::new(StatusCode::BAD_REQUEST, "bad_request", e.body_text())
    })?;

    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_err)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or("").to_string();
        if !is_csv_name(&filename) {
            tracing::warn!(filename = %filename, "rejected non-csv upload");
            return Err(ApiError::new(
                StatusCode::BAD_REQUEST,
                "bad_file",
                "Only .csv files are accepted",
            ));
        }
        let bytes = field.bytes().await.map_err(multipart_err)?;
        upload = Some((filename, bytes.to_vec()));
        break;
    }
    let Some((filename, bytes)) = upload else {
        return Err(ApiError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "missing_file",
            format!("missing multipart field: {UPLOAD_FIELD}"),
        ));
    };

    let store = state.store.clone();
    let labels = state.labels.clone();
    let outcome = tokio::task::spawn_blocking(move || ingest::ingest_upload(&store, &bytes, &labels))
        .await
        .map_err(|e| ApiError::internal("ingest_failed", e))?;

    match outcome {
        Ok(summary) => {
            tracing::info!(
                filename = %filename,
                records_loaded = summary.records_loaded,
                students = summary.students,
                "grades uploaded"
            );
            Ok(Json(summary.into()))
        }
        Err(e) => {
            match &e {
                IngestError::Store(err) => {
                    let detail = format!("{err:#}");
                    tracing::error!(filename = %filename, error = %detail, "grade ingestion failed");
                }
                IngestError::Rows(rows) => {
                    tracing::warn!(filename = %filename, row_errors = rows.len(), "upload rejected");
                }
                other => {
                    tracing::warn!(filename = %filename, code = other.code(), "upload rejected");
                }
            }
            Err(e.into())
        }
    }
}
