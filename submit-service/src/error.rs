use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use shared::ServiceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid JSON body: {0}")]
    MalformedBody(String),

    #[error("Missing required fields: {reason}")]
    MissingFields { reason: String, received: Value },

    #[error("Failed to submit card: {0}")]
    Store(ServiceError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            ApiError::MissingFields { .. } => StatusCode::BAD_REQUEST,
            ApiError::Store(err) => err
                .status_code()
                .and_then(|code| StatusCode::from_u16(code).ok())
                .filter(|status| status.is_client_error() || status.is_server_error())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            ApiError::MalformedBody(details) => json!({
                "error": "Invalid JSON body",
                "details": details,
            }),
            ApiError::MissingFields { received, .. } => json!({
                "error": "Missing required fields",
                "receivedData": received,
            }),
            ApiError::Store(err) => {
                let debug = serde_json::to_string_pretty(&err)
                    .unwrap_or_else(|_| format!("{:?}", err));
                json!({
                    "error": "Failed to submit card",
                    "details": err.to_string(),
                    "debug": debug,
                })
            }
        };

        (status, Json(body)).into_response()
    }
}
