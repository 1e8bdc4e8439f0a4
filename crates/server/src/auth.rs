// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bearer-token authentication.
//!
//! Tokens resolve to roles through the map built at startup; the map is
//! read-only afterwards. Handlers never see tokens, only the resolved
//! [`Role`] in request extensions.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use crate::error::ApiError;
use crate::routes::AppState;

/// Middleware: reject unknown tokens with 401, otherwise stash the role.
pub async fn require_role(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let role = bearer_token(req.headers())
        .and_then(|token| state.tokens.get(token).copied())
        .ok_or(ApiError::Unauthorized)?;
    req.extensions_mut().insert(role);
    Ok(next.run(req).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
