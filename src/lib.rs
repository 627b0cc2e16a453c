//! # campus-league
//!
//! REST API and WebSocket feed for university sports results and league
//! standings.
//!
//! Every match result create, edit and delete is followed by a standings
//! reconciliation that moves the affected teams' points, wins, draws and
//! losses by exactly the difference the change makes, using one atomic
//! increment per team.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── ResultsService / TeamService (service/)
//!     ├── StandingsAccountant (service/standings)
//!     ├── EventBus (domain/)
//!     │
//!     └── TeamStore / ResultStore (persistence/)
//!           ├── in-memory
//!           └── PostgreSQL
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod ws;

use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;

/// Builds the full HTTP application: REST routes, OpenAPI document, the
/// `/ws` endpoint, and the tracing, CORS and timeout layers.
pub fn build_app(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws::handler::ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(timeout_layer(request_timeout))
        .with_state(state)
}

/// Fails requests that run longer than `timeout` with `408 Request Timeout`.
#[must_use]
pub fn timeout_layer(timeout: Duration) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout)
}
