#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

pub const USER_ID: &str = "7";
pub const SECRET: &str = "s3cr3t";
/// base64("7:s3cr3t")
pub const EXPECTED_AUTH: &str = "Basic NzpzM2NyM3Q=";

#[derive(Default)]
struct Inner {
    reports: Vec<Value>,
    listing_failure: Option<StatusCode>,
    malformed_listing: bool,
    listing_delay: Option<Duration>,
    listing_calls: usize,
    report_calls: usize,
    tokens: Vec<String>,
    auth_headers: Vec<String>,
}

/// In-process stand-in for the alerting backend
#[derive(Clone, Default)]
pub struct MockBackend {
    inner: Arc<Mutex<Inner>>,
}

pub struct TestServer {
    pub base_url: String,
    pub backend: MockBackend,
}

impl MockBackend {
    pub fn set_reports(&self, reports: Vec<Value>) {
        self.inner.lock().unwrap().reports = reports;
    }

    pub fn fail_listing(&self, status: StatusCode) {
        self.inner.lock().unwrap().listing_failure = Some(status);
    }

    pub fn malformed_listing(&self) {
        self.inner.lock().unwrap().malformed_listing = true;
    }

    pub fn delay_listing(&self, delay: Duration) {
        self.inner.lock().unwrap().listing_delay = Some(delay);
    }

    pub fn listing_calls(&self) -> usize {
        self.inner.lock().unwrap().listing_calls
    }

    pub fn report_calls(&self) -> usize {
        self.inner.lock().unwrap().report_calls
    }

    pub fn tokens(&self) -> Vec<String> {
        self.inner.lock().unwrap().tokens.clone()
    }

    pub fn auth_headers(&self) -> Vec<String> {
        self.inner.lock().unwrap().auth_headers.clone()
    }

    fn record_auth(&self, headers: &HeaderMap) -> bool {
        let header = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let ok = header == EXPECTED_AUTH;
        self.inner.lock().unwrap().auth_headers.push(header);
        ok
    }
}

pub fn report(id: i64, alert_id: &str, status: &str, body: Option<&str>) -> Value {
    let mut value = json!({ "id": id, "alert_id": alert_id, "status": status });
    if let Some(body) = body {
        value["report"] = json!(body);
    }
    value
}

async fn create_user(State(backend): State<MockBackend>, Json(payload): Json<Value>) -> Response {
    let token = payload["logfire_read_token"].as_str().unwrap_or_default().to_string();
    backend.inner.lock().unwrap().tokens.push(token.clone());

    if token == "bad-token" {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "detail": "Invalid read token" }))).into_response();
    }
    Json(json!({ "id": USER_ID, "secret": SECRET })).into_response()
}

async fn list_reports(State(backend): State<MockBackend>, headers: HeaderMap) -> Response {
    let authorized = backend.record_auth(&headers);
    let (delay, failure, malformed, reports) = {
        let mut inner = backend.inner.lock().unwrap();
        inner.listing_calls += 1;
        (inner.listing_delay, inner.listing_failure, inner.malformed_listing, inner.reports.clone())
    };

    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    if !authorized {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "detail": "Bad credentials" }))).into_response();
    }
    if let Some(status) = failure {
        return (status, "upstream exploded").into_response();
    }
    if malformed {
        return (StatusCode::OK, "[{\"id\": \"oops\"").into_response();
    }
    Json(Value::Array(reports)).into_response()
}

async fn get_report(
    State(backend): State<MockBackend>,
    Path(alert_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let authorized = backend.record_auth(&headers);
    let found = {
        let mut inner = backend.inner.lock().unwrap();
        inner.report_calls += 1;
        inner.reports.iter().find(|r| r["alert_id"] == alert_id.as_str()).cloned()
    };

    if !authorized {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    match found {
        Some(report) => Json(report).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not found" }))).into_response(),
    }
}

pub async fn start_server() -> Result<TestServer> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let base_url = format!("http://127.0.0.1:{}", port);
    let backend = MockBackend::default();

    let app = Router::new()
        .route("/logfire/user/", post(create_user))
        .route("/logfire/reports/", get(list_reports))
        .route("/logfire/report/:alert_id/", get(get_report))
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind mock backend")?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(TestServer { base_url, backend })
}
