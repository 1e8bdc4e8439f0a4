// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP surface: router assembly and request handlers.
//!
//! Handlers translate bodies and query strings into service calls; all
//! job semantics live in [`crate::service`].

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use spine_core::{time_fmt, Job, JobDraft, JobStatus, Role, Target};
use spine_storage::BlobStore;

use crate::auth;
use crate::error::ApiError;
use crate::service::{self, JobService};

/// Shared state for all handlers and the auth middleware.
pub struct AppState {
    pub jobs: JobService,
    pub blobs: BlobStore,
    /// Bearer token → role, built at startup, read-only afterwards.
    pub tokens: HashMap<String, Role>,
}

/// Assemble the full router. `/health` stays outside the auth layer.
pub fn router(state: Arc<AppState>) -> Router {
    let authed = Router::new()
        .route("/jobs", post(create_job).get(list_jobs))
        .route("/jobs/{id}", get(get_job))
        .route("/jobs/{id}/claim", post(claim_job))
        .route("/jobs/{id}/heartbeat", post(heartbeat_job))
        .route("/jobs/{id}/complete", post(complete_job))
        .route("/jobs/{id}/fail", post(fail_job))
        .route("/jobs/{id}/release", post(release_job))
        .route("/jobs/{id}/comment", post(comment_job))
        .route("/blobs", post(put_blob))
        .route("/blobs/{id}", get(get_blob))
        .route_layer(middleware::from_fn_with_state(Arc::clone(&state), auth::require_role));

    Router::new().route("/health", get(health)).merge(authed).with_state(state)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateJobBody {
    #[serde(default)]
    target: Target,
    #[serde(default)]
    spec: String,
    #[serde(default)]
    meta: Map<String, Value>,
    max_attempts: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    status: Option<JobStatus>,
    target: Option<Target>,
}

#[derive(Debug, Default, Deserialize)]
struct HeartbeatBody {
    progress: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct CompleteBody {
    result: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct FailBody {
    error: Option<String>,
    requeue: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct ReleaseBody {
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommentBody {
    text: String,
}

async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({"ok": true, "time": time_fmt::rfc3339_ms(state.jobs.now())}))
}

async fn create_job(
    State(state): State<Arc<AppState>>,
    Extension(role): Extension<Role>,
    body: Option<Json<CreateJobBody>>,
) -> Result<(StatusCode, Json<Job>), ApiError> {
    if !role.is_head() {
        return Err(ApiError::Forbidden);
    }
    let Json(body) = body.unwrap_or_default();
    let job = state.jobs.create(JobDraft {
        target: body.target,
        spec: body.spec,
        meta: body.meta,
        max_attempts: body.max_attempts,
    })?;
    Ok((StatusCode::CREATED, Json(job)))
}

async fn list_jobs(
    State(state): State<Arc<AppState>>,
    Extension(role): Extension<Role>,
    Query(filter): Query<ListQuery>,
) -> Result<Json<Value>, ApiError> {
    let jobs = state.jobs.list(role, filter.status, filter.target)?;
    Ok(Json(json!({"jobs": jobs})))
}

async fn get_job(
    State(state): State<Arc<AppState>>,
    Extension(role): Extension<Role>,
    Path(id): Path<String>,
) -> Result<Json<Job>, ApiError> {
    state.jobs.get(role, &id).map(Json)
}

async fn claim_job(
    State(state): State<Arc<AppState>>,
    Extension(role): Extension<Role>,
    Path(id): Path<String>,
) -> Result<Json<Job>, ApiError> {
    state.jobs.claim(role, &id).map(Json)
}

async fn heartbeat_job(
    State(state): State<Arc<AppState>>,
    Extension(role): Extension<Role>,
    Path(id): Path<String>,
    body: Option<Json<HeartbeatBody>>,
) -> Result<Json<Job>, ApiError> {
    let Json(body) = body.unwrap_or_default();
    state.jobs.heartbeat(role, &id, body.progress).map(Json)
}

async fn complete_job(
    State(state): State<Arc<AppState>>,
    Extension(role): Extension<Role>,
    Path(id): Path<String>,
    body: Option<Json<CompleteBody>>,
) -> Result<Json<Job>, ApiError> {
    let Json(body) = body.unwrap_or_default();
    state.jobs.complete(role, &id, body.result).map(Json)
}

async fn fail_job(
    State(state): State<Arc<AppState>>,
    Extension(role): Extension<Role>,
    Path(id): Path<String>,
    body: Option<Json<FailBody>>,
) -> Result<Json<Job>, ApiError> {
    let Json(body) = body.unwrap_or_default();
    // Requeue defaults to true; attempts may still veto it.
    state.jobs.fail(role, &id, body.error, body.requeue.unwrap_or(true)).map(Json)
}

async fn release_job(
    State(state): State<Arc<AppState>>,
    Extension(role): Extension<Role>,
    Path(id): Path<String>,
    body: Option<Json<ReleaseBody>>,
) -> Result<Json<Job>, ApiError> {
    let Json(body) = body.unwrap_or_default();
    state.jobs.release(role, &id, body.reason).map(Json)
}

async fn comment_job(
    State(state): State<Arc<AppState>>,
    Extension(role): Extension<Role>,
    Path(id): Path<String>,
    Json(body): Json<CommentBody>,
) -> Result<Json<Job>, ApiError> {
    state.jobs.comment(role, &id, body.text).map(Json)
}

async fn put_blob(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let id = state.blobs.put(&body)?;
    Ok((StatusCode::CREATED, Json(json!({"id": id.as_str(), "size": body.len()}))))
}

async fn get_blob(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Vec<u8>, ApiError> {
    let id = service::checked_id(&id)?;
    Ok(state.blobs.get(id)?)
}
