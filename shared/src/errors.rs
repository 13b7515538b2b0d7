use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ServiceError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Identity provider error: {0}")]
    Provider(String),

    #[error("{message}")]
    Store {
        #[serde(rename = "statusCode", skip_serializing_if = "Option::is_none")]
        status: Option<u16>,
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        explanation: Option<String>,
    },

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn store(message: impl Into<String>) -> Self {
        ServiceError::Store {
            status: None,
            message: message.into(),
            explanation: None,
        }
    }

    /// Status code reported by the upstream provider, if it sent one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ServiceError::Store { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        ServiceError::Http(err.to_string())
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::Internal(format!("JSON error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
