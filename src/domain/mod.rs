//! Domain layer: core types, outcome scoring, and the event system.
//!
//! This module contains the server-side domain model: identifiers, the
//! sport tag, teams with their league aggregates, match results, the pure
//! outcome/points calculator, and the event bus for broadcasting state
//! changes.

pub mod event_bus;
pub mod ids;
pub mod match_result;
pub mod outcome;
pub mod portal_event;
pub mod sport;
pub mod team;

pub use event_bus::EventBus;
pub use ids::{ResultId, TeamId};
pub use match_result::MatchResult;
pub use outcome::{MatchOutcome, Outcome, classify_outcome, counters_for, points_for};
pub use portal_event::{AdjustmentReason, PortalEvent, ScoreLine};
pub use sport::Sport;
pub use team::{StandingRow, StatDelta, Team, build_table};
