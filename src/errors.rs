use std::string::FromUtf8Error;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::domain::response::{build_response, INTERNAL_SERVER_ERROR_MESSAGE};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("request body is missing")]
    MissingBody,
    #[error("request body is not valid json: {0}")]
    MalformedBody(#[from] serde_json::Error),
    #[error("request body is not valid utf-8: {0}")]
    InvalidEncoding(#[from] FromUtf8Error),
    #[error("storage {operation} failed: {message}")]
    Storage {
        operation: &'static str,
        message: String,
    },
    #[error("no expense with ExpenseID {expense_id}")]
    NotFound { expense_id: String },
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl AppError {
    pub fn storage(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Storage {
            operation,
            message: message.into(),
        }
    }

    pub fn not_found(expense_id: impl Into<String>) -> Self {
        Self::NotFound {
            expense_id: expense_id.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed before reaching the dispatcher");
        build_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_SERVER_ERROR_MESSAGE)
            .into_response()
    }
}
