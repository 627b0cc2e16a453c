//! Database row models for teams and match results.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::{MatchResult, ResultId, Sport, Team, TeamId};
use crate::error::PortalError;

/// A row from the `teams` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TeamRow {
    /// Primary key.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Normalized sport tag.
    pub sport: String,
    /// Cumulative points.
    pub points: i64,
    /// Matches won.
    pub wins: i64,
    /// Matches drawn.
    pub draws: i64,
    /// Matches lost.
    pub losses: i64,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}

impl TryFrom<TeamRow> for Team {
    type Error = PortalError;

    fn try_from(row: TeamRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: TeamId::from_uuid(row.id),
            name: row.name,
            sport: Sport::parse(&row.sport)?,
            points: row.points,
            wins: row.wins,
            draws: row.draws,
            losses: row.losses,
            created_at: row.created_at,
        })
    }
}

/// A row from the `match_results` table.
///
/// `outcome` is stored for reporting queries only; it is re-derived from
/// the goals when the row is loaded.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MatchResultRow {
    /// Primary key.
    pub id: Uuid,
    /// Normalized sport tag.
    pub sport: String,
    /// Home team foreign key.
    pub home_team_id: Uuid,
    /// Away team foreign key.
    pub away_team_id: Uuid,
    /// Home goals (non-negative, enforced by a check constraint).
    pub home_goals: i32,
    /// Away goals (non-negative, enforced by a check constraint).
    pub away_goals: i32,
    /// Stored winner label (`home`, `away`, `draw`).
    pub outcome: String,
    /// Match date.
    pub played_on: Option<NaiveDate>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last edit timestamp.
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<MatchResultRow> for MatchResult {
    type Error = PortalError;

    fn try_from(row: MatchResultRow) -> Result<Self, Self::Error> {
        let home_goals = goals_from_db(row.home_goals)?;
        let away_goals = goals_from_db(row.away_goals)?;
        let mut result = Self::new(
            Sport::parse(&row.sport)?,
            TeamId::from_uuid(row.home_team_id),
            TeamId::from_uuid(row.away_team_id),
            home_goals,
            away_goals,
            row.played_on,
        );
        if result.outcome.as_str() != row.outcome {
            tracing::warn!(
                result_id = %row.id,
                stored = %row.outcome,
                derived = result.outcome.as_str(),
                "stored outcome label disagrees with goals"
            );
        }
        result.id = ResultId::from_uuid(row.id);
        result.created_at = row.created_at;
        result.updated_at = row.updated_at;
        Ok(result)
    }
}

/// Converts a goal count for an `INTEGER` column.
///
/// # Errors
///
/// Returns [`PortalError::InvalidRequest`] if the value exceeds `i32::MAX`.
pub fn goals_to_db(goals: u32) -> Result<i32, PortalError> {
    i32::try_from(goals)
        .map_err(|_| PortalError::InvalidRequest(format!("goal count {goals} is too large")))
}

fn goals_from_db(goals: i32) -> Result<u32, PortalError> {
    u32::try_from(goals)
        .map_err(|_| PortalError::PersistenceError(format!("negative goal count {goals} in row")))
}
