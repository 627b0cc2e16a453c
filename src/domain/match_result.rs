//! Match result record.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::outcome::{MatchOutcome, Outcome, classify_outcome};
use super::team::StatDelta;
use super::{ResultId, Sport, TeamId};

/// A recorded match between two teams of the same sport.
///
/// `outcome` is derived from the goals whenever the record is built or
/// edited; it is stored for display and never trusted when computing
/// standings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    /// Result identifier.
    pub id: ResultId,
    /// Sport the match was played in.
    pub sport: Sport,
    /// Home side.
    pub home_team_id: TeamId,
    /// Away side.
    pub away_team_id: TeamId,
    /// Goals scored by the home side.
    pub home_goals: u32,
    /// Goals scored by the away side.
    pub away_goals: u32,
    /// Derived winner label.
    pub outcome: MatchOutcome,
    /// Date the match was played, if known.
    pub played_on: Option<NaiveDate>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last edit timestamp.
    pub updated_at: DateTime<Utc>,
}

impl MatchResult {
    /// Builds a new result with a fresh identifier.
    #[must_use]
    pub fn new(
        sport: Sport,
        home_team_id: TeamId,
        away_team_id: TeamId,
        home_goals: u32,
        away_goals: u32,
        played_on: Option<NaiveDate>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ResultId::new(),
            sport,
            home_team_id,
            away_team_id,
            home_goals,
            away_goals,
            outcome: MatchOutcome::from_goals(home_goals, away_goals),
            played_on,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the score and re-derives the stored outcome label.
    pub fn set_score(&mut self, home_goals: u32, away_goals: u32) {
        self.home_goals = home_goals;
        self.away_goals = away_goals;
        self.outcome = MatchOutcome::from_goals(home_goals, away_goals);
    }

    /// Recomputes `(home, away)` outcomes from the goals.
    #[must_use]
    pub const fn outcomes(&self) -> (Outcome, Outcome) {
        classify_outcome(self.home_goals, self.away_goals)
    }

    /// Returns each side's standings contribution as
    /// `[(home, delta), (away, delta)]`.
    #[must_use]
    pub const fn contributions(&self) -> [(TeamId, StatDelta); 2] {
        let (home, away) = self.outcomes();
        [
            (self.home_team_id, StatDelta::for_outcome(home)),
            (self.away_team_id, StatDelta::for_outcome(away)),
        ]
    }

    /// Returns `true` if `team_id` played in this match.
    #[must_use]
    pub fn involves(&self, team_id: TeamId) -> bool {
        self.home_team_id == team_id || self.away_team_id == team_id
    }
}
