use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::application::{SignalRegistry, SignalStore};
use crate::domain::Clock;

/// Application state shared across handlers
pub struct AppState<C: Clock, S: SignalStore> {
    pub registry: Arc<SignalRegistry<C, S>>,
}

impl<C: Clock, S: SignalStore> AppState<C, S> {
    pub fn new(registry: Arc<SignalRegistry<C, S>>) -> Self {
        AppState { registry }
    }
}

/// Create the REST API router
pub fn create_router<C, S>(state: Arc<AppState<C, S>>) -> Router
where
    C: Clock + 'static,
    S: SignalStore + 'static,
{
    Router::new()
        .route("/send-signal", post(handlers::send_signal::<C, S>))
        .route("/get-signals", get(handlers::get_signals::<C, S>))
        // Request bodies are not capped
        .layer(DefaultBodyLimit::disable())
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
