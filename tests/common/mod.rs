#![allow(dead_code)]

use axum_test::{TestResponse, TestServer};
use serde_json::Value;
use std::sync::Arc;
use worldsmith::core::AppState;
use worldsmith::store::DocumentStore;

/// Creates an AppState on a fresh in-memory store
pub async fn create_test_state() -> Arc<AppState> {
    let store = DocumentStore::in_memory()
        .await
        .expect("Failed to open in-memory store");
    Arc::new(AppState::new(store))
}

/// Creates a TestServer for the tests
///
/// # Arguments
/// * `state` - AppState used by the server
pub fn create_test_server(state: Arc<AppState>) -> TestServer {
    let app = worldsmith::create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}

/// Sends one message to `pattern` with `payload` as body
pub async fn send(server: &TestServer, pattern: &str, payload: Value) -> TestResponse {
    server.post(&format!("/rpc/{}", pattern)).json(&payload).await
}
