//! Match result service: validates result mutations, writes the record,
//! and hands the change to the [`StandingsAccountant`].
//!
//! Call order per mutation:
//!
//! - create: validate teams → write result → reconcile(new, none)
//! - update: load previous (404) → validate → write result → reconcile(new, previous)
//! - delete: load previous (404) → reconcile(none, previous) → delete result
//!
//! The result write and the standings reconciliation are separate
//! operations with no atomicity between them. The outcome of a request is
//! decided by the result write alone.

use chrono::{NaiveDate, Utc};

use super::standings::StandingsAccountant;
use crate::domain::{EventBus, MatchResult, PortalEvent, ResultId, ScoreLine, Sport, TeamId};
use crate::error::PortalError;
use crate::persistence::Stores;

/// Input for recording a new match result.
#[derive(Debug, Clone)]
pub struct NewResult {
    /// Sport tag (normalized on parse).
    pub sport: String,
    /// Home side.
    pub home_team_id: TeamId,
    /// Away side.
    pub away_team_id: TeamId,
    /// Home goals.
    pub home_goals: u32,
    /// Away goals.
    pub away_goals: u32,
    /// Match date.
    pub played_on: Option<NaiveDate>,
}

/// Partial edit of an existing match result. `None` keeps the stored value.
/// `played_on: Some(None)` clears the stored date.
#[derive(Debug, Clone, Default)]
pub struct ResultPatch {
    /// New sport tag.
    pub sport: Option<String>,
    /// New home side.
    pub home_team_id: Option<TeamId>,
    /// New away side.
    pub away_team_id: Option<TeamId>,
    /// New home goals.
    pub home_goals: Option<u32>,
    /// New away goals.
    pub away_goals: Option<u32>,
    /// New match date, or `Some(None)` to clear it.
    pub played_on: Option<Option<NaiveDate>>,
}

/// Orchestrates match result create, edit and delete.
#[derive(Debug, Clone)]
pub struct ResultsService {
    stores: Stores,
    accountant: StandingsAccountant,
    event_bus: EventBus,
}

impl ResultsService {
    /// Creates a service over `stores`, reconciling standings through
    /// `accountant`.
    #[must_use]
    pub fn new(stores: Stores, accountant: StandingsAccountant, event_bus: EventBus) -> Self {
        Self {
            stores,
            accountant,
            event_bus,
        }
    }

    /// Records a new result and credits both teams.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::UnknownTeam`] if either team does not exist,
    /// [`PortalError::SportMismatch`] if a team plays another sport,
    /// [`PortalError::InvalidRequest`] on invalid input, or
    /// [`PortalError::PersistenceError`] if the result cannot be stored.
    /// Standings failures are never returned.
    pub async fn record_result(&self, input: NewResult) -> Result<MatchResult, PortalError> {
        let sport = Sport::parse(&input.sport)?;
        ensure_distinct(input.home_team_id, input.away_team_id)?;

        let roster = self.stores.roster_read().await;
        self.ensure_team(input.home_team_id, &sport).await?;
        self.ensure_team(input.away_team_id, &sport).await?;

        let result = MatchResult::new(
            sport,
            input.home_team_id,
            input.away_team_id,
            input.home_goals,
            input.away_goals,
            input.played_on,
        );
        let stored = self.stores.results.create(result).await?;
        drop(roster);

        let report = self.accountant.reconcile(Some(&stored), None).await;

        let _ = self.event_bus.publish(PortalEvent::ResultRecorded {
            result_id: stored.id,
            sport: stored.sport.clone(),
            score: ScoreLine::from(&stored),
            timestamp: Utc::now(),
        });

        tracing::info!(
            result_id = %stored.id,
            sport = %stored.sport,
            home_goals = stored.home_goals,
            away_goals = stored.away_goals,
            standings_complete = report.is_complete(),
            "match result recorded"
        );
        Ok(stored)
    }

    /// Applies `patch` to an existing result and moves standings by the
    /// net difference.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::ResultNotFound`] if the result does not
    /// exist, the same validation errors as
    /// [`ResultsService::record_result`] for the edited record, or
    /// [`PortalError::PersistenceError`] if the edit cannot be stored.
    pub async fn amend_result(
        &self,
        result_id: ResultId,
        patch: ResultPatch,
    ) -> Result<MatchResult, PortalError> {
        let previous = self.find(result_id).await?;

        let mut edited = previous.clone();
        if let Some(sport) = patch.sport.as_deref() {
            edited.sport = Sport::parse(sport)?;
        }
        if let Some(home) = patch.home_team_id {
            edited.home_team_id = home;
        }
        if let Some(away) = patch.away_team_id {
            edited.away_team_id = away;
        }
        edited.set_score(
            patch.home_goals.unwrap_or(previous.home_goals),
            patch.away_goals.unwrap_or(previous.away_goals),
        );
        if let Some(played_on) = patch.played_on {
            edited.played_on = played_on;
        }
        edited.updated_at = Utc::now();

        ensure_distinct(edited.home_team_id, edited.away_team_id)?;

        let roster = self.stores.roster_read().await;
        self.ensure_team(edited.home_team_id, &edited.sport).await?;
        self.ensure_team(edited.away_team_id, &edited.sport).await?;
        let stored = self.stores.results.update_in_place(edited).await?;
        drop(roster);

        let report = self
            .accountant
            .reconcile(Some(&stored), Some(&previous))
            .await;

        let _ = self.event_bus.publish(PortalEvent::ResultAmended {
            result_id: stored.id,
            sport: stored.sport.clone(),
            previous: ScoreLine::from(&previous),
            current: ScoreLine::from(&stored),
            timestamp: Utc::now(),
        });

        tracing::info!(
            %result_id,
            teams_adjusted = report.applied.len(),
            standings_complete = report.is_complete(),
            "match result amended"
        );
        Ok(stored)
    }

    /// Withdraws a result's contribution from both teams, then deletes it.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::ResultNotFound`] if the result does not
    /// exist, or [`PortalError::PersistenceError`] if it cannot be deleted.
    pub async fn remove_result(&self, result_id: ResultId) -> Result<(), PortalError> {
        let previous = self.find(result_id).await?;

        let report = self.accountant.reconcile(None, Some(&previous)).await;

        if !self.stores.results.delete_by_id(result_id).await? {
            tracing::warn!(%result_id, "match result vanished before delete");
        }

        let _ = self.event_bus.publish(PortalEvent::ResultRemoved {
            result_id,
            sport: previous.sport.clone(),
            timestamp: Utc::now(),
        });

        tracing::info!(
            %result_id,
            standings_complete = report.is_complete(),
            "match result removed"
        );
        Ok(())
    }

    /// Returns one result.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::ResultNotFound`] if the result does not exist.
    pub async fn get_result(&self, result_id: ResultId) -> Result<MatchResult, PortalError> {
        self.find(result_id).await
    }

    /// Lists results, optionally for one sport, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::InvalidRequest`] on a blank sport filter or
    /// [`PortalError::PersistenceError`] on backend failure.
    pub async fn list_results(&self, sport: Option<&str>) -> Result<Vec<MatchResult>, PortalError> {
        let sport = sport.map(Sport::parse).transpose()?;
        self.stores.results.list(sport.as_ref()).await
    }

    async fn find(&self, result_id: ResultId) -> Result<MatchResult, PortalError> {
        self.stores
            .results
            .find_by_id(result_id)
            .await?
            .ok_or(PortalError::ResultNotFound(result_id))
    }

    async fn ensure_team(&self, team_id: TeamId, sport: &Sport) -> Result<(), PortalError> {
        let team = self
            .stores
            .teams
            .find_by_id(team_id)
            .await?
            .ok_or(PortalError::UnknownTeam(team_id))?;
        if team.sport != *sport {
            return Err(PortalError::SportMismatch {
                team_id,
                team_sport: team.sport.to_string(),
                result_sport: sport.to_string(),
            });
        }
        Ok(())
    }
}

fn ensure_distinct(home: TeamId, away: TeamId) -> Result<(), PortalError> {
    if home == away {
        return Err(PortalError::InvalidRequest(
            "home and away team must differ".to_string(),
        ));
    }
    Ok(())
}
