//! HTTP transport - carries dispatcher messages over axum
//!
//! `POST /rpc/{pattern}` with the JSON payload as body. Successful replies
//! are the handler's JSON; failures are an [`RpcError`] with the status of
//! the original error kind.

use crate::controllers::RpcError;
use crate::core::{AppError, AppState};
use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use std::sync::Arc;

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        (self.original_error.status(), Json(self)).into_response()
    }
}

/// Root endpoint - health check
pub async fn root(State(_state): State<Arc<AppState>>) -> impl IntoResponse {
    (StatusCode::OK, "Server is running!")
}

/// Registered message patterns
pub async fn list_patterns(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(
        state
            .dispatcher
            .patterns()
            .into_iter()
            .map(str::to_string)
            .collect(),
    )
}

/// Routes one message to the dispatcher. An empty body is a `null` payload.
pub async fn rpc(
    State(state): State<Arc<AppState>>,
    Path(pattern): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, RpcError> {
    let payload = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            let service = pattern.split('.').next().unwrap_or_default();
            RpcError::new(
                service,
                AppError::validation("Malformed payload").with_details(e.to_string()),
            )
        })?
    };

    state.dispatcher.dispatch(&pattern, payload).await.map(Json)
}
