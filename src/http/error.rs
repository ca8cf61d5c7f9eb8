use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::ingest::IngestError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn internal(code: &'static str, err: impl std::fmt::Display) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, code, err.to_string())
    }
}

impl From<IngestError> for ApiError {
    fn from(e: IngestError) -> Self {
        let code = e.code();
        match e {
            IngestError::Rows(errors) => {
                ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, code, "Validation failed")
                    .with_details(json!({ "errors": errors }))
            }
            IngestError::Store(err) => ApiError::internal(code, format!("{err:#}")),
            other => ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, code, other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({
            "code": self.code,
            "message": self.message,
        });
        // Detail keys sit next to `message` so clients read `errors` directly.
        if let Some(serde_json::Value::Object(details)) = self.details {
            for (k, v) in details {
                body[k.as_str()] = v;
            }
        }
        (self.status, Json(body)).into_response()
    }
}
