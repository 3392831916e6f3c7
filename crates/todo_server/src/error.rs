//! Error-to-response mapping for the HTTP endpoint.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use todo_core::{RepoError, TodoValidationError};

/// `{"message": ...}` body used for every non-todo response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Failures a request handler can report.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Todo not found")]
    NotFound,

    #[error("{0}")]
    Validation(TodoValidationError),

    #[error("Internal server error")]
    Storage(RepoError),

    #[error("Internal server error")]
    Join(#[from] tokio::task::JoinError),
}

impl From<RepoError> for AppError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(_) => Self::NotFound,
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Storage(other),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Storage(_) | Self::Join(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            Self::Storage(err) => {
                error!("event=http_error module=server status=error error_code=storage error={err}");
            }
            Self::Join(err) => {
                error!("event=http_error module=server status=error error_code=task_join error={err}");
            }
            Self::NotFound | Self::Validation(_) => {}
        }

        (self.status(), Json(MessageBody::new(self.to_string()))).into_response()
    }
}

/// Failures that stop the server from starting or running.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("failed to open todo store: {0}")]
    Store(#[from] RepoError),

    #[error("server i/o failed: {0}")]
    Io(#[from] std::io::Error),
}
