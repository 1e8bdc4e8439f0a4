// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! API error taxonomy and its HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use spine_core::TransitionError;
use spine_storage::{LockError, StoreError};
use thiserror::Error;
use tracing::error;

/// Everything a request can fail with. Each variant carries a
/// machine-readable discriminator in the response body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("missing or unrecognized token")]
    Unauthorized,

    #[error("role lacks access to this job")]
    Forbidden,

    #[error("caller is not the claimant")]
    NotOwner,

    #[error("no such record")]
    NotFound,

    /// The per-job claim lock is held by another caller; retriable.
    #[error("job is locked by another caller")]
    Locked,

    #[error(transparent)]
    Conflict(#[from] TransitionError),

    #[error("invalid request: {0}")]
    BadRequest(&'static str),

    /// I/O failure; details go to the log, not the response.
    #[error("internal error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden | ApiError::NotOwner => StatusCode::FORBIDDEN,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Locked | ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized => "unauthorized",
            ApiError::Forbidden => "forbidden",
            ApiError::NotOwner => "not_owner",
            ApiError::NotFound => "not_found",
            ApiError::Locked => "locked",
            ApiError::Conflict(TransitionError::AlreadyClaimed) => "already_claimed",
            ApiError::Conflict(TransitionError::TerminalStatus) => "terminal_status",
            ApiError::Conflict(TransitionError::NotRunning) => "not_running",
            ApiError::Conflict(TransitionError::MaxAttemptsReached) => "max_attempts_reached",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Internal => "internal",
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        if e.is_not_found() {
            return ApiError::NotFound;
        }
        error!(error = %e, "storage failure");
        ApiError::Internal
    }
}

impl From<LockError> for ApiError {
    fn from(e: LockError) -> Self {
        match e {
            LockError::Contended => ApiError::Locked,
            LockError::Io(e) => {
                error!(error = %e, "claim lock failure");
                ApiError::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.code(),
            "message": self.to_string(),
        }));
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
