//! Fault-injecting team store decorator.
//!
//! [`FaultyTeamStore`] wraps any [`TeamStore`] and fails
//! [`TeamStore::increment_fields`] for teams marked as broken, while
//! counting every increment attempt. It exists to exercise the
//! partial-write path of the standings logic against a real backend.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::TeamStore;
use crate::domain::{Sport, StatDelta, Team, TeamId};
use crate::error::PortalError;

/// Team store that can be told to fail increments for specific teams.
#[derive(Debug)]
pub struct FaultyTeamStore {
    inner: Arc<dyn TeamStore>,
    broken: RwLock<HashSet<TeamId>>,
    increment_attempts: AtomicUsize,
}

impl FaultyTeamStore {
    /// Wraps `inner`; no team is broken initially.
    #[must_use]
    pub fn new(inner: Arc<dyn TeamStore>) -> Self {
        Self {
            inner,
            broken: RwLock::new(HashSet::new()),
            increment_attempts: AtomicUsize::new(0),
        }
    }

    /// Makes every following increment for `team_id` fail.
    pub async fn break_team(&self, team_id: TeamId) {
        self.broken.write().await.insert(team_id);
    }

    /// Restores normal increments for `team_id`.
    pub async fn heal_team(&self, team_id: TeamId) {
        self.broken.write().await.remove(&team_id);
    }

    /// Number of increment calls seen so far, failed ones included.
    #[must_use]
    pub fn increment_attempts(&self) -> usize {
        self.increment_attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TeamStore for FaultyTeamStore {
    async fn insert(&self, team: Team) -> Result<Team, PortalError> {
        self.inner.insert(team).await
    }

    async fn find_by_id(&self, team_id: TeamId) -> Result<Option<Team>, PortalError> {
        self.inner.find_by_id(team_id).await
    }

    async fn list(&self, sport: Option<&Sport>) -> Result<Vec<Team>, PortalError> {
        self.inner.list(sport).await
    }

    async fn increment_fields(
        &self,
        team_id: TeamId,
        delta: StatDelta,
    ) -> Result<(), PortalError> {
        self.increment_attempts.fetch_add(1, Ordering::SeqCst);
        if self.broken.read().await.contains(&team_id) {
            return Err(PortalError::PersistenceError(format!(
                "injected failure for team {team_id}"
            )));
        }
        self.inner.increment_fields(team_id, delta).await
    }

    async fn delete(&self, team_id: TeamId) -> Result<bool, PortalError> {
        self.inner.delete(team_id).await
    }
}
