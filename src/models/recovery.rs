//! What the student is told, and offered, when a request fails
//!
//! Sent inside every error envelope so the pages render the server's choice instead of
//! keeping their own copy of the mapping.

use serde::Serialize;

use crate::error::AppError;

/// Button offered next to the failure message
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RecoveryAction {
    /// Resubmit the already collected answers
    Retry,
    ReloadPage,
    /// Clear answers and start from the first question
    RestartSurvey,
}

impl RecoveryAction {
    pub fn label(&self) -> &'static str {
        match self {
            RecoveryAction::Retry => "Try Again",
            RecoveryAction::ReloadPage => "Reload Page",
            RecoveryAction::RestartSurvey => "Restart Survey",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recovery {
    pub action: RecoveryAction,
    pub label: &'static str,
    pub message: String,
}

impl Recovery {
    fn new(action: RecoveryAction, message: impl Into<String>) -> Self {
        Self {
            action,
            label: action.label(),
            message: message.into(),
        }
    }

    pub fn for_error(err: &AppError) -> Self {
        match err {
            AppError::Configuration(_) => Self::new(
                RecoveryAction::ReloadPage,
                "Server configuration error. Please contact support.",
            ),
            AppError::Catalog(_) => Self::new(
                RecoveryAction::Retry,
                "Could not access book data. Please try again later.",
            ),
            AppError::HttpClient(_) | AppError::Provider(_) => Self::new(
                RecoveryAction::Retry,
                "Could not get recommendations from our AI. Please try again.",
            ),
            AppError::JsonParsing(msg) => Self::new(RecoveryAction::Retry, msg.clone()),
            AppError::Internal(_) => Self::new(
                RecoveryAction::Retry,
                "An unexpected error occurred. Please try again.",
            ),
            AppError::NotFound(_) => Self::new(
                RecoveryAction::RestartSurvey,
                "These recommendations could not be found. They may have expired or the link is invalid.",
            ),
            AppError::InvalidInput(msg) => Self::new(RecoveryAction::RestartSurvey, msg.clone()),
        }
    }
}
