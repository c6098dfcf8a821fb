//! An in-process stand-in for the NerdGraph query endpoint and the chart
//! image host.

#![allow(dead_code)]

use std::{
    future::Future,
    path::Path,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
};
use serde_json::Value;
use tokio::runtime::Runtime;

pub const CHART_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDRfake-chart-bytes";
pub const API_KEY: &str = "NRAK-TESTKEY";
pub const ACCOUNT_ID: u64 = 1234567;

struct MockState {
    query_status: StatusCode,
    query_body: String,
    image_status: StatusCode,
    image_bytes: Vec<u8>,
    image_hits: AtomicUsize,
    last_query: Mutex<Option<Value>>,
    last_api_key: Mutex<Option<String>>,
}

pub struct MockProvider {
    state: Arc<MockState>,
    runtime: Runtime,
    pub base_url: String,
}

pub struct MockBuilder {
    query_status: StatusCode,
    query_body: Option<Box<dyn FnOnce(&str) -> String>>,
    image_status: StatusCode,
    image_bytes: Vec<u8>,
}

impl MockBuilder {
    pub fn new() -> Self {
        Self {
            query_status: StatusCode::OK,
            query_body: None,
            image_status: StatusCode::OK,
            image_bytes: CHART_BYTES.to_vec(),
        }
    }

    pub fn query_status(mut self, status: StatusCode) -> Self {
        self.query_status = status;
        self
    }

    /// Body of the query response, given the mock's base URL.
    pub fn query_body(mut self, body: impl FnOnce(&str) -> String + 'static) -> Self {
        self.query_body = Some(Box::new(body));
        self
    }

    pub fn image_status(mut self, status: StatusCode) -> Self {
        self.image_status = status;
        self
    }

    pub fn start(self) -> MockProvider {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .expect("Failed to build runtime");

        let listener = runtime
            .block_on(tokio::net::TcpListener::bind("127.0.0.1:0"))
            .expect("Failed to bind mock listener");
        let base_url = format!(
            "http://{}",
            listener.local_addr().expect("Listener has no address")
        );

        let query_body = match self.query_body {
            Some(body) => body(&base_url),
            None => chart_payload(&format!("{base_url}/chart.png")),
        };

        let state = Arc::new(MockState {
            query_status: self.query_status,
            query_body,
            image_status: self.image_status,
            image_bytes: self.image_bytes,
            image_hits: AtomicUsize::new(0),
            last_query: Mutex::new(None),
            last_api_key: Mutex::new(None),
        });

        let app = Router::new()
            .route("/graphql", post(graphql))
            .route("/chart.png", get(image))
            .with_state(state.clone());

        runtime.spawn(async move {
            axum::serve(listener, app).await.expect("Mock server failed");
        });

        MockProvider {
            state,
            runtime,
            base_url,
        }
    }
}

impl MockProvider {
    pub fn endpoint(&self) -> String {
        format!("{}/graphql", self.base_url)
    }

    pub fn image_hits(&self) -> usize {
        self.state.image_hits.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> Option<Value> {
        self.state.last_query.lock().unwrap().clone()
    }

    pub fn last_api_key(&self) -> Option<String> {
        self.state.last_api_key.lock().unwrap().clone()
    }

    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Write a config file pointing at this mock.
    pub fn write_config(&self, path: &Path) {
        let config = serde_json::json!({
            "api_key": API_KEY,
            "account_id": ACCOUNT_ID,
            "endpoint": self.endpoint(),
            "timeout_secs": 5,
        });
        std::fs::write(path, config.to_string()).expect("Failed to write config");
    }
}

async fn graphql(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, String) {
    *state.last_api_key.lock().unwrap() = headers
        .get("api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    *state.last_query.lock().unwrap() = Some(body);

    (state.query_status, state.query_body.clone())
}

async fn image(State(state): State<Arc<MockState>>) -> (StatusCode, Vec<u8>) {
    state.image_hits.fetch_add(1, Ordering::SeqCst);
    if state.image_status.is_success() {
        (state.image_status, state.image_bytes.clone())
    } else {
        (state.image_status, Vec::new())
    }
}

/// A successful NerdGraph response pointing at `chart_url`.
pub fn chart_payload(chart_url: &str) -> String {
    serde_json::json!({
        "data": {
            "actor": {
                "account": {
                    "id": ACCOUNT_ID,
                    "nrql": {
                        "results": [{ "count": 42 }],
                        "staticChartUrl": chart_url,
                    }
                }
            }
        }
    })
    .to_string()
}
