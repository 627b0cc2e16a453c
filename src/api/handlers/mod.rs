//! REST endpoint handlers organized by resource.

pub mod results;
pub mod standings;
pub mod system;
pub mod teams;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(teams::routes())
        .merge(results::routes())
        .merge(standings::routes())
}
