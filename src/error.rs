use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::models::Recovery;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Configuration(String),

    #[error("{0}")]
    Catalog(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("{0}")]
    Provider(String),

    #[error("{0}")]
    JsonParsing(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable tag the client uses to pick a recovery action
    pub fn error_type(&self) -> Option<&'static str> {
        match self {
            AppError::Configuration(_) => Some("configuration"),
            AppError::Catalog(_) => Some("database"),
            AppError::HttpClient(_) | AppError::Provider(_) => Some("openai"),
            AppError::JsonParsing(_) => Some("json_parsing_error"),
            AppError::Internal(_) => Some("unknown_post_error"),
            AppError::NotFound(_) | AppError::InvalidInput(_) => None,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::JsonParsing(format!(
            "Failed to parse response from AI. AI might have returned invalid JSON: {}",
            err
        ))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::NotFound(msg) | AppError::InvalidInput(msg) => msg.clone(),
            _ => self.to_string(),
        };

        let recovery = Recovery::for_error(&self);
        let body = match self.error_type() {
            Some(error_type) => {
                json!({ "error": message, "errorType": error_type, "recovery": recovery })
            }
            None => json!({ "error": message, "recovery": recovery }),
        };

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
