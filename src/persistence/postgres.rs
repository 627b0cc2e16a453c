//! PostgreSQL implementation of the persistence layer.
//!
//! Team increments are a single `UPDATE … SET points = points + $2, …`
//! statement, which PostgreSQL applies atomically under the row lock, so
//! concurrent reconciliations touching the same team commute.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::models::{MatchResultRow, TeamRow, goals_to_db};
use super::{ResultStore, TeamStore};
use crate::config::PortalConfig;
use crate::domain::{MatchResult, ResultId, Sport, StatDelta, Team, TeamId};
use crate::error::PortalError;

const TEAM_COLUMNS: &str = "id, name, sport, points, wins, draws, losses, created_at";

const RESULT_COLUMNS: &str = "id, sport, home_team_id, away_team_id, home_goals, away_goals, \
                              outcome, played_on, created_at, updated_at";

/// Opens the connection pool described by `config` and, if enabled, runs
/// the embedded migrations.
///
/// # Errors
///
/// Returns [`PortalError::PersistenceError`] if the database is
/// unreachable or a migration fails.
pub async fn connect(config: &PortalConfig) -> Result<PgPool, PortalError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .min_connections(config.database_min_connections)
        .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
        .connect(&config.database_url)
        .await?;

    if config.database_run_migrations {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| PortalError::PersistenceError(e.to_string()))?;
        tracing::info!("database migrations applied");
    }

    Ok(pool)
}

/// Maps a failed `INSERT` to a [`PortalError`]. A primary key collision is
/// the caller's mistake, so it becomes [`PortalError::InvalidRequest`].
fn insert_error(err: sqlx::Error, duplicate: impl FnOnce() -> String) -> PortalError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            PortalError::InvalidRequest(duplicate())
        }
        _ => err.into(),
    }
}

/// PostgreSQL-backed team store.
#[derive(Debug, Clone)]
pub struct PostgresTeamStore {
    pool: PgPool,
}

impl PostgresTeamStore {
    /// Creates a store over the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeamStore for PostgresTeamStore {
    async fn insert(&self, team: Team) -> Result<Team, PortalError> {
        sqlx::query(
            "INSERT INTO teams (id, name, sport, points, wins, draws, losses, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(team.id.as_uuid())
        .bind(&team.name)
        .bind(team.sport.as_str())
        .bind(team.points)
        .bind(team.wins)
        .bind(team.draws)
        .bind(team.losses)
        .bind(team.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| insert_error(e, || format!("team {} already exists", team.id)))?;

        Ok(team)
    }

    async fn find_by_id(&self, team_id: TeamId) -> Result<Option<Team>, PortalError> {
        let row = sqlx::query_as::<_, TeamRow>(&format!(
            "SELECT {TEAM_COLUMNS} FROM teams WHERE id = $1"
        ))
        .bind(team_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Team::try_from).transpose()
    }

    async fn list(&self, sport: Option<&Sport>) -> Result<Vec<Team>, PortalError> {
        let rows = if let Some(sport) = sport {
            sqlx::query_as::<_, TeamRow>(&format!(
                "SELECT {TEAM_COLUMNS} FROM teams WHERE sport = $1 ORDER BY created_at, id"
            ))
            .bind(sport.as_str())
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_as::<_, TeamRow>(&format!(
                "SELECT {TEAM_COLUMNS} FROM teams ORDER BY created_at, id"
            ))
            .fetch_all(&self.pool)
            .await
        }?;

        rows.into_iter().map(Team::try_from).collect()
    }

    async fn increment_fields(
        &self,
        team_id: TeamId,
        delta: StatDelta,
    ) -> Result<(), PortalError> {
        let outcome = sqlx::query(
            "UPDATE teams SET \
                 points = points + $2, \
                 wins = wins + $3, \
                 draws = draws + $4, \
                 losses = losses + $5 \
             WHERE id = $1",
        )
        .bind(team_id.as_uuid())
        .bind(delta.points)
        .bind(delta.wins)
        .bind(delta.draws)
        .bind(delta.losses)
        .execute(&self.pool)
        .await?;

        if outcome.rows_affected() == 0 {
            return Err(PortalError::TeamNotFound(team_id));
        }
        Ok(())
    }

    async fn delete(&self, team_id: TeamId) -> Result<bool, PortalError> {
        let outcome = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(team_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(outcome.rows_affected() > 0)
    }
}

/// PostgreSQL-backed match result store.
#[derive(Debug, Clone)]
pub struct PostgresResultStore {
    pool: PgPool,
}

impl PostgresResultStore {
    /// Creates a store over the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResultStore for PostgresResultStore {
    async fn find_by_id(&self, result_id: ResultId) -> Result<Option<MatchResult>, PortalError> {
        let row = sqlx::query_as::<_, MatchResultRow>(&format!(
            "SELECT {RESULT_COLUMNS} FROM match_results WHERE id = $1"
        ))
        .bind(result_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(MatchResult::try_from).transpose()
    }

    async fn create(&self, result: MatchResult) -> Result<MatchResult, PortalError> {
        sqlx::query(
            "INSERT INTO match_results (id, sport, home_team_id, away_team_id, home_goals, \
             away_goals, outcome, played_on, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(result.id.as_uuid())
        .bind(result.sport.as_str())
        .bind(result.home_team_id.as_uuid())
        .bind(result.away_team_id.as_uuid())
        .bind(goals_to_db(result.home_goals)?)
        .bind(goals_to_db(result.away_goals)?)
        .bind(result.outcome.as_str())
        .bind(result.played_on)
        .bind(result.created_at)
        .bind(result.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| insert_error(e, || format!("match result {} already exists", result.id)))?;

        Ok(result)
    }

    async fn update_in_place(&self, result: MatchResult) -> Result<MatchResult, PortalError> {
        let outcome = sqlx::query(
            "UPDATE match_results SET sport = $2, home_team_id = $3, away_team_id = $4, \
             home_goals = $5, away_goals = $6, outcome = $7, played_on = $8, updated_at = $9 \
             WHERE id = $1",
        )
        .bind(result.id.as_uuid())
        .bind(result.sport.as_str())
        .bind(result.home_team_id.as_uuid())
        .bind(result.away_team_id.as_uuid())
        .bind(goals_to_db(result.home_goals)?)
        .bind(goals_to_db(result.away_goals)?)
        .bind(result.outcome.as_str())
        .bind(result.played_on)
        .bind(result.updated_at)
        .execute(&self.pool)
        .await?;

        if outcome.rows_affected() == 0 {
            return Err(PortalError::ResultNotFound(result.id));
        }
        Ok(result)
    }

    async fn delete_by_id(&self, result_id: ResultId) -> Result<bool, PortalError> {
        let outcome = sqlx::query("DELETE FROM match_results WHERE id = $1")
            .bind(result_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(outcome.rows_affected() > 0)
    }

    async fn list(&self, sport: Option<&Sport>) -> Result<Vec<MatchResult>, PortalError> {
        let rows = if let Some(sport) = sport {
            sqlx::query_as::<_, MatchResultRow>(&format!(
                "SELECT {RESULT_COLUMNS} FROM match_results WHERE sport = $1 \
                 ORDER BY created_at, id"
            ))
            .bind(sport.as_str())
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_as::<_, MatchResultRow>(&format!(
                "SELECT {RESULT_COLUMNS} FROM match_results ORDER BY created_at, id"
            ))
            .fetch_all(&self.pool)
            .await
        }?;

        rows.into_iter().map(MatchResult::try_from).collect()
    }

    async fn count_for_team(&self, team_id: TeamId) -> Result<u64, PortalError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM match_results WHERE home_team_id = $1 OR away_team_id = $1",
        )
        .bind(team_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(u64::try_from(count).unwrap_or(0))
    }
}
