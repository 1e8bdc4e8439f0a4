// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Black-box HTTP tests: the real router on a real listener.

use std::collections::HashMap;
use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::{json, Value};
use spine_core::{Role, SystemClock};
use spine_server::{router, AppState, JobService};
use spine_storage::{BlobStore, JobStore};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
    _dir: tempfile::TempDir,
}

impl TestServer {
    /// Boot the production router on an ephemeral port with a fixed
    /// token set: two head tokens (rotation overlap) and one per claw.
    async fn spawn() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = JobStore::open(dir.path()).unwrap();
        let blobs = BlobStore::open(dir.path()).unwrap();
        let service = JobService::new(
            store,
            Arc::new(SystemClock),
            chrono::Duration::seconds(300),
            3,
        );
        let tokens = HashMap::from([
            ("head-1".to_string(), Role::Head),
            ("head-2".to_string(), Role::Head),
            ("left-1".to_string(), Role::LeftClaw),
            ("right-1".to_string(), Role::RightClaw),
        ]);
        let app = router(Arc::new(AppState { jobs: service, blobs, tokens }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self { base_url: format!("http://{addr}"), handle, _dir: dir }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn create_job(srv: &TestServer, client: &reqwest::Client, body: Value) -> Value {
    let res = client
        .post(srv.url("/jobs"))
        .bearer_auth("head-1")
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    res.json().await.unwrap()
}

#[tokio::test]
async fn health_needs_no_auth() {
    let srv = TestServer::spawn().await;
    let res = reqwest::get(srv.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["ok"], true);
    assert!(body["time"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn unknown_token_is_unauthorized() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client.get(srv.url("/jobs")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client.get(srv.url("/jobs")).bearer_auth("nope").send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn s7_rotated_head_tokens_are_both_accepted() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for token in ["head-1", "head-2"] {
        let res = client.get(srv.url("/jobs")).bearer_auth(token).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK, "token {token} should work");
    }

    let res = client.get(srv.url("/jobs")).bearer_auth("head-3").send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn job_lifecycle_over_http() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let job = create_job(
        &srv,
        &client,
        json!({"target": "left-claw", "spec": "do stuff", "maxAttempts": 2}),
    )
    .await;
    let id = job["id"].as_str().unwrap().to_string();
    assert_eq!(job["status"], "queued");
    assert_eq!(job["maxAttempts"], 2);

    // Visible in the queued listing for the eligible claw.
    let res = client
        .get(srv.url("/jobs?status=queued"))
        .bearer_auth("left-1")
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert!(body["jobs"].as_array().unwrap().iter().any(|j| j["id"] == id.as_str()));

    // Claim.
    let res = client
        .post(srv.url(&format!("/jobs/{id}/claim")))
        .bearer_auth("left-1")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let claimed: Value = res.json().await.unwrap();
    assert_eq!(claimed["status"], "running");
    assert_eq!(claimed["attempts"], 1);
    assert_eq!(claimed["claimedBy"], "left-claw");
    assert!(claimed["leaseUntil"].is_string());

    // A second claim conflicts.
    let res = client
        .post(srv.url(&format!("/jobs/{id}/claim")))
        .bearer_auth("right-1")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "already_claimed");

    // The non-owner cannot heartbeat.
    let res = client
        .post(srv.url(&format!("/jobs/{id}/heartbeat")))
        .bearer_auth("right-1")
        .json(&json!({"progress": {"pct": 10}}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "not_owner");

    // The owner heartbeats with progress; an empty body works too.
    let res = client
        .post(srv.url(&format!("/jobs/{id}/heartbeat")))
        .bearer_auth("left-1")
        .json(&json!({"progress": {"pct": 10}}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let res = client
        .post(srv.url(&format!("/jobs/{id}/heartbeat")))
        .bearer_auth("left-1")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Comment, then complete.
    let res = client
        .post(srv.url(&format!("/jobs/{id}/comment")))
        .bearer_auth("head-1")
        .json(&json!({"text": "nearly there"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .post(srv.url(&format!("/jobs/{id}/complete")))
        .bearer_auth("left-1")
        .json(&json!({"result": "ok"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let done: Value = res.json().await.unwrap();
    assert_eq!(done["status"], "done");
    assert_eq!(done["result"], "ok");
    assert!(done["leaseUntil"].is_null());
    assert_eq!(done["comments"].as_array().unwrap().len(), 1);

    // Terminal jobs stay put.
    let res = client
        .post(srv.url(&format!("/jobs/{id}/fail")))
        .bearer_auth("head-1")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "not_running");
}

#[tokio::test]
async fn claws_cannot_create_jobs() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/jobs"))
        .bearer_auth("left-1")
        .json(&json!({"spec": "sneaky"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn foreign_target_jobs_are_hidden() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let job = create_job(&srv, &client, json!({"target": "right-claw"})).await;
    let id = job["id"].as_str().unwrap();

    let res = client
        .get(srv.url(&format!("/jobs/{id}")))
        .bearer_auth("left-1")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .get(srv.url("/jobs"))
        .bearer_auth("left-1")
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert!(body["jobs"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_job_is_404() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(srv.url("/jobs/does-not-exist"))
        .bearer_auth("head-1")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn blobs_round_trip() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .post(srv.url("/blobs"))
        .bearer_auth("left-1")
        .body(&b"opaque bytes"[..])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    let id = body["id"].as_str().unwrap().to_string();
    assert_eq!(body["size"], 12);

    let res = client
        .get(srv.url(&format!("/blobs/{id}")))
        .bearer_auth("head-1")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.bytes().await.unwrap().as_ref(), b"opaque bytes");

    let res = client.get(srv.url(&format!("/blobs/{id}"))).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}
