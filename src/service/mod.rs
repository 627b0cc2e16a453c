//! Service layer: business logic orchestration.
//!
//! [`ResultsService`] validates and stores match results and hands every
//! change to the [`StandingsAccountant`], which keeps team aggregates in
//! step. [`TeamService`] owns team registration and the standings read
//! side. Both emit events through the [`super::domain::EventBus`].

pub mod results_service;
pub mod standings;
pub mod team_service;

use std::sync::Arc;

pub use results_service::{NewResult, ResultPatch, ResultsService};
pub use standings::{
    Reconciliation, StandingsAccountant, TeamAdjustment, plan_adjustments, recompute_totals,
};
pub use team_service::{DriftEntry, StandingsAudit, TeamService};

use crate::domain::EventBus;
use crate::persistence::Stores;

/// Wires the team and results services over one set of stores.
#[must_use]
pub fn build_services(
    stores: &Stores,
    event_bus: &EventBus,
) -> (Arc<TeamService>, Arc<ResultsService>) {
    let accountant = StandingsAccountant::new(Arc::clone(&stores.teams), event_bus.clone());
    let teams = TeamService::new(stores.clone(), event_bus.clone());
    let results = ResultsService::new(stores.clone(), accountant, event_bus.clone());
    (Arc::new(teams), Arc::new(results))
}
