//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::EventBus;
use crate::persistence::Stores;
use crate::service::{ResultsService, TeamService, build_services};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Team registration and standings read side.
    pub team_service: Arc<TeamService>,
    /// Match result mutations and standings reconciliation.
    pub results_service: Arc<ResultsService>,
    /// Event bus for WebSocket subscriptions.
    pub event_bus: EventBus,
}

impl AppState {
    /// Builds the services over `stores`, publishing to `event_bus`.
    #[must_use]
    pub fn new(stores: &Stores, event_bus: EventBus) -> Self {
        let (team_service, results_service) = build_services(stores, &event_bus);
        Self {
            team_service,
            results_service,
            event_bus,
        }
    }
}
