//! In-memory stores with per-team fine-grained locking.
//!
//! [`InMemoryTeamStore`] keeps every team in a `HashMap` where each entry
//! is individually protected by a [`tokio::sync::RwLock`]. Increments on
//! the same team are serialized by that lock; increments on different
//! teams proceed concurrently.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ResultStore, TeamStore};
use crate::domain::{MatchResult, ResultId, Sport, StatDelta, Team, TeamId};
use crate::error::PortalError;

/// Team store backed by process memory.
///
/// # Concurrency
///
/// - Multiple tasks may read the same team concurrently.
/// - Increments on different teams are concurrent.
/// - Increments on the same team are serialized, so none is lost.
#[derive(Debug, Default)]
pub struct InMemoryTeamStore {
    teams: RwLock<HashMap<TeamId, Arc<RwLock<Team>>>>,
}

impl InMemoryTeamStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored teams.
    pub async fn len(&self) -> usize {
        self.teams.read().await.len()
    }

    /// Returns `true` if no team is stored.
    pub async fn is_empty(&self) -> bool {
        self.teams.read().await.is_empty()
    }

    async fn entry(&self, team_id: TeamId) -> Option<Arc<RwLock<Team>>> {
        self.teams.read().await.get(&team_id).cloned()
    }
}

#[async_trait]
impl TeamStore for InMemoryTeamStore {
    async fn insert(&self, team: Team) -> Result<Team, PortalError> {
        let mut map = self.teams.write().await;
        if map.contains_key(&team.id) {
            return Err(PortalError::InvalidRequest(format!(
                "team {} already exists",
                team.id
            )));
        }
        map.insert(team.id, Arc::new(RwLock::new(team.clone())));
        Ok(team)
    }

    async fn find_by_id(&self, team_id: TeamId) -> Result<Option<Team>, PortalError> {
        let Some(entry) = self.entry(team_id).await else {
            return Ok(None);
        };
        let team = entry.read().await.clone();
        Ok(Some(team))
    }

    async fn list(&self, sport: Option<&Sport>) -> Result<Vec<Team>, PortalError> {
        let map = self.teams.read().await;
        let mut teams = Vec::with_capacity(map.len());
        for entry in map.values() {
            let team = entry.read().await;
            if let Some(filter) = sport
                && team.sport != *filter
            {
                continue;
            }
            teams.push(team.clone());
        }
        teams.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(teams)
    }

    async fn increment_fields(
        &self,
        team_id: TeamId,
        delta: StatDelta,
    ) -> Result<(), PortalError> {
        let entry = self
            .entry(team_id)
            .await
            .ok_or(PortalError::TeamNotFound(team_id))?;
        entry.write().await.apply(delta);
        Ok(())
    }

    async fn delete(&self, team_id: TeamId) -> Result<bool, PortalError> {
        Ok(self.teams.write().await.remove(&team_id).is_some())
    }
}

/// Match result store backed by process memory.
#[derive(Debug, Default)]
pub struct InMemoryResultStore {
    results: RwLock<HashMap<ResultId, MatchResult>>,
}

impl InMemoryResultStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResultStore for InMemoryResultStore {
    async fn find_by_id(&self, result_id: ResultId) -> Result<Option<MatchResult>, PortalError> {
        Ok(self.results.read().await.get(&result_id).cloned())
    }

    async fn create(&self, result: MatchResult) -> Result<MatchResult, PortalError> {
        let mut map = self.results.write().await;
        if map.contains_key(&result.id) {
            return Err(PortalError::InvalidRequest(format!(
                "match result {} already exists",
                result.id
            )));
        }
        map.insert(result.id, result.clone());
        Ok(result)
    }

    async fn update_in_place(&self, result: MatchResult) -> Result<MatchResult, PortalError> {
        let mut map = self.results.write().await;
        let slot = map
            .get_mut(&result.id)
            .ok_or(PortalError::ResultNotFound(result.id))?;
        *slot = result.clone();
        Ok(result)
    }

    async fn delete_by_id(&self, result_id: ResultId) -> Result<bool, PortalError> {
        Ok(self.results.write().await.remove(&result_id).is_some())
    }

    async fn list(&self, sport: Option<&Sport>) -> Result<Vec<MatchResult>, PortalError> {
        let map = self.results.read().await;
        let mut results: Vec<MatchResult> = map
            .values()
            .filter(|r| sport.is_none_or(|s| r.sport == *s))
            .cloned()
            .collect();
        results.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(results)
    }

    async fn count_for_team(&self, team_id: TeamId) -> Result<u64, PortalError> {
        let map = self.results.read().await;
        Ok(map.values().filter(|r| r.involves(team_id)).count() as u64)
    }
}
