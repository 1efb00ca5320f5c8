//! Drives a fully wired [`Application`] in process, one request at a time.
//!
//! ```rust,ignore
//! let app = TestApp::seeded(15).await?;
//! let response = app.get("/users?pageNumber=2&itemsPerPage=10").await?;
//! assert_eq!(response.status, StatusCode::OK);
//! ```

use anyhow::Context;
use axum::Router;
use axum::body::{Body, Bytes, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use roster::config::AppConfig;
use roster::lifecycle::Application;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tower::ServiceExt;

const MAX_BODY_BYTES: usize = 1024 * 1024;

pub struct TestApp {
    app: Application,
    router: Router,
}

impl TestApp {
    pub async fn new() -> anyhow::Result<Self> {
        Self::with_config(AppConfig::default()).await
    }

    /// An application whose store starts with `count` sample users.
    pub async fn seeded(count: usize) -> anyhow::Result<Self> {
        Self::with_config(AppConfig {
            seed_users: count,
            ..AppConfig::default()
        })
        .await
    }

    pub async fn with_config(config: AppConfig) -> anyhow::Result<Self> {
        let app = Application::builder().config(config).build().await?;
        let router = app.router();
        Ok(Self { app, router })
    }

    pub fn application(&self) -> &Application {
        &self.app
    }

    pub async fn get(&self, uri: &str) -> anyhow::Result<TestResponse> {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> anyhow::Result<TestResponse> {
        self.send(Method::POST, uri, Some(body.to_string())).await
    }

    pub async fn put_json(&self, uri: &str, body: &Value) -> anyhow::Result<TestResponse> {
        self.send(Method::PUT, uri, Some(body.to_string())).await
    }

    /// Sends `body` verbatim as JSON, for malformed payloads.
    pub async fn post_raw(&self, uri: &str, body: &str) -> anyhow::Result<TestResponse> {
        self.send(Method::POST, uri, Some(body.to_string())).await
    }

    pub async fn delete(&self, uri: &str) -> anyhow::Result<TestResponse> {
        self.send(Method::DELETE, uri, None).await
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<String>,
    ) -> anyhow::Result<TestResponse> {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json)),
            None => builder.body(Body::empty()),
        }
        .context("building request")?;

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = to_bytes(response.into_body(), MAX_BODY_BYTES)
            .await
            .context("reading response body")?;

        Ok(TestResponse {
            status,
            content_type,
            body,
        })
    }
}

#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json<T: DeserializeOwned>(&self) -> anyhow::Result<T> {
        serde_json::from_slice(&self.body).with_context(|| {
            format!(
                "decoding {} body: {}",
                self.status,
                String::from_utf8_lossy(&self.body)
            )
        })
    }

    pub fn is_problem(&self) -> bool {
        self.content_type.as_deref() == Some(roster::exception::APPLICATION_PROBLEM_JSON)
    }
}
