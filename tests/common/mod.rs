#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use task_tracker_api::auth::issue_token;
use task_tracker_api::database::MemoryTaskStore;
use task_tracker_api::{app, AppState};

pub const SECRET: &str = "integration-test-secret";

/// In-process server: the real router over an in-memory store.
pub struct TestApp {
    router: Router,
    pub store: MemoryTaskStore,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestApp {
    pub fn new() -> Self {
        let store = MemoryTaskStore::new();
        let state = AppState::new(SECRET, Arc::new(store.clone()));
        Self {
            router: app(state),
            store,
        }
    }

    /// A fresh user and a valid credential for them.
    pub fn user() -> (Uuid, String) {
        let user_id = Uuid::new_v4();
        let token = issue_token(SECRET, user_id, 1).expect("sign test token");
        (user_id, token)
    }

    pub async fn send(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<TestResponse> {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json)?))?,
            None => builder.body(Body::empty())?,
        };

        self.send_request(request).await
    }

    pub async fn send_request(&self, request: Request<Body>) -> Result<TestResponse> {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .context("router failed")?;

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).context("response body is not JSON")?
        };

        Ok(TestResponse { status, body })
    }

    pub async fn get(&self, path: &str, token: &str) -> Result<TestResponse> {
        self.send(Method::GET, path, Some(token), None).await
    }

    pub async fn post(&self, path: &str, token: &str, body: Value) -> Result<TestResponse> {
        self.send(Method::POST, path, Some(token), Some(body)).await
    }

    pub async fn put(&self, path: &str, token: &str, body: Value) -> Result<TestResponse> {
        self.send(Method::PUT, path, Some(token), Some(body)).await
    }

    pub async fn delete(&self, path: &str, token: &str) -> Result<TestResponse> {
        self.send(Method::DELETE, path, Some(token), None).await
    }

    /// Create a task and return its `data` object, failing on anything but 201.
    pub async fn create_task(&self, token: &str, body: Value) -> Result<Value> {
        let res = self.post("/api/tasks", token, body).await?;
        anyhow::ensure!(
            res.status == StatusCode::CREATED,
            "expected 201 Created, got {}: {}",
            res.status,
            res.body
        );
        Ok(res.body["data"].clone())
    }

    pub async fn list_titles(&self, token: &str) -> Result<Vec<String>> {
        let res = self.get("/api/tasks", token).await?;
        anyhow::ensure!(res.status == StatusCode::OK, "list failed: {}", res.body);
        Ok(res.body["data"]
            .as_array()
            .context("data should be an array")?
            .iter()
            .filter_map(|t| t["title"].as_str().map(str::to_string))
            .collect())
    }
}

pub fn task_path(task: &Value) -> String {
    format!("/api/tasks/{}", task["id"].as_str().unwrap_or_default())
}
