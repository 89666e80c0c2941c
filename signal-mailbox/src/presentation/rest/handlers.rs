use axum::{Json, body::Bytes, extract::State};
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

use crate::application::SignalStore;
use crate::domain::{Clock, Signal};
use crate::presentation::rest::{ApiError, dto::*};

use super::AppState;

/// POST /send-signal
///
/// The body is parsed as JSON whatever the `Content-Type` header says.
pub async fn send_signal<C: Clock, S: SignalStore>(
    State(state): State<Arc<AppState<C, S>>>,
    body: Bytes,
) -> Result<Json<SendSignalResponse>, ApiError> {
    let payload: Value = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "Rejected unparseable signal");
        ApiError::bad_request(e.to_string())
    })?;

    state.registry.upsert(payload).await.map_err(|e| {
        warn!(error = %e, "Rejected signal");
        ApiError::from(e)
    })?;

    Ok(Json(SendSignalResponse::success()))
}

/// GET /get-signals
pub async fn get_signals<C: Clock, S: SignalStore>(
    State(state): State<Arc<AppState<C, S>>>,
) -> Json<Vec<Signal>> {
    Json(state.registry.snapshot().await)
}
