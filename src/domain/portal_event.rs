//! Domain events reflecting result and standings mutations.
//!
//! Every state change emits a [`PortalEvent`] through the
//! [`super::EventBus`]. Events are broadcast to WebSocket subscribers,
//! filtered by sport.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::outcome::MatchOutcome;
use super::team::StatDelta;
use super::{MatchResult, ResultId, Sport, TeamId};

/// Which result mutation caused a standings adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentReason {
    /// A result was created.
    ResultRecorded,
    /// A result was edited.
    ResultAmended,
    /// A result was deleted.
    ResultRemoved,
}

/// Score snapshot carried by result events.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreLine {
    /// Home side.
    pub home_team_id: TeamId,
    /// Away side.
    pub away_team_id: TeamId,
    /// Home goals.
    pub home_goals: u32,
    /// Away goals.
    pub away_goals: u32,
    /// Derived winner label.
    pub outcome: MatchOutcome,
}

impl From<&MatchResult> for ScoreLine {
    fn from(result: &MatchResult) -> Self {
        Self {
            home_team_id: result.home_team_id,
            away_team_id: result.away_team_id,
            home_goals: result.home_goals,
            away_goals: result.away_goals,
            outcome: result.outcome,
        }
    }
}

/// Domain event emitted after every state mutation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum PortalEvent {
    /// Emitted when a team is registered.
    TeamRegistered {
        /// Team identifier.
        team_id: TeamId,
        /// Sport of the team.
        sport: Sport,
        /// Team name.
        name: String,
        /// Registration timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when a team is removed.
    TeamRemoved {
        /// Team identifier.
        team_id: TeamId,
        /// Sport of the team.
        sport: Sport,
        /// Removal timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted after a match result is stored.
    ResultRecorded {
        /// Result identifier.
        result_id: ResultId,
        /// Sport of the match.
        sport: Sport,
        /// Final score.
        score: ScoreLine,
        /// Timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted after a match result is edited.
    ResultAmended {
        /// Result identifier.
        result_id: ResultId,
        /// Sport of the match after the edit.
        sport: Sport,
        /// Score before the edit.
        previous: ScoreLine,
        /// Score after the edit.
        current: ScoreLine,
        /// Timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted after a match result is deleted.
    ResultRemoved {
        /// Result identifier.
        result_id: ResultId,
        /// Sport of the match.
        sport: Sport,
        /// Timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted after a team's aggregates were incremented.
    StandingsAdjusted {
        /// Team identifier.
        team_id: TeamId,
        /// Sport of the team.
        sport: Sport,
        /// Result that caused the adjustment.
        result_id: ResultId,
        /// Amounts added to the team's aggregates.
        delta: StatDelta,
        /// Mutation that caused the adjustment.
        reason: AdjustmentReason,
        /// Timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when a team's aggregates could not be incremented. The
    /// team's standings no longer match its results until repaired.
    StandingsDrift {
        /// Team identifier.
        team_id: TeamId,
        /// Sport of the team.
        sport: Sport,
        /// Result that caused the adjustment.
        result_id: ResultId,
        /// Amounts that were not applied.
        delta: StatDelta,
        /// Mutation that caused the adjustment.
        reason: AdjustmentReason,
        /// Store error message.
        error: String,
        /// Timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl PortalEvent {
    /// Returns the sport associated with this event.
    #[must_use]
    pub fn sport(&self) -> &Sport {
        match self {
            Self::TeamRegistered { sport, .. }
            | Self::TeamRemoved { sport, .. }
            | Self::ResultRecorded { sport, .. }
            | Self::ResultAmended { sport, .. }
            | Self::ResultRemoved { sport, .. }
            | Self::StandingsAdjusted { sport, .. }
            | Self::StandingsDrift { sport, .. } => sport,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::TeamRegistered { .. } => "team_registered",
            Self::TeamRemoved { .. } => "team_removed",
            Self::ResultRecorded { .. } => "result_recorded",
            Self::ResultAmended { .. } => "result_amended",
            Self::ResultRemoved { .. } => "result_removed",
            Self::StandingsAdjusted { .. } => "standings_adjusted",
            Self::StandingsDrift { .. } => "standings_drift",
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn football() -> Sport {
        let Ok(sport) = Sport::parse("football") else {
            panic!("valid sport");
        };
        sport
    }

    #[test]
    fn result_recorded_serializes_with_tag() {
        let result = MatchResult::new(football(), TeamId::new(), TeamId::new(), 3, 1, None);
        let event = PortalEvent::ResultRecorded {
            result_id: result.id,
            sport: result.sport.clone(),
            score: ScoreLine::from(&result),
            timestamp: Utc::now(),
        };
        assert_eq!(event.event_type_str(), "result_recorded");

        let json = serde_json::to_string(&event).unwrap_or_default();
        assert!(json.contains("\"event_type\":\"result_recorded\""));
        assert!(json.contains("\"outcome\":\"home\""));
        assert!(json.contains("\"sport\":\"football\""));
    }

    #[test]
    fn sport_accessor() {
        let event = PortalEvent::ResultRemoved {
            result_id: ResultId::new(),
            sport: football(),
            timestamp: Utc::now(),
        };
        assert_eq!(event.sport().as_str(), "football");
    }
}
