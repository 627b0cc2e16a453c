//! Persistence layer: team and match result stores.
//!
//! Provides the [`TeamStore`] and [`ResultStore`] traits consumed by the
//! service layer, an in-memory backend, and a PostgreSQL backend built on
//! `sqlx::PgPool`.
//!
//! The only write the standings logic performs against a team is
//! [`TeamStore::increment_fields`]. Implementations must apply it as a
//! single atomic operation so that concurrent increments on the same team
//! never lose updates.

pub mod fault;
pub mod memory;
pub mod models;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::{MatchResult, ResultId, Sport, StatDelta, Team, TeamId};
use crate::error::PortalError;

pub use fault::FaultyTeamStore;
pub use memory::{InMemoryResultStore, InMemoryTeamStore};
pub use postgres::{PostgresResultStore, PostgresTeamStore};

/// Storage for team records and their league aggregates.
#[async_trait]
pub trait TeamStore: Send + Sync + std::fmt::Debug {
    /// Stores a newly registered team.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::InvalidRequest`] if a team with the same ID
    /// already exists, or [`PortalError::PersistenceError`] on backend
    /// failure.
    async fn insert(&self, team: Team) -> Result<Team, PortalError>;

    /// Looks up a team by ID.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::PersistenceError`] on backend failure.
    async fn find_by_id(&self, team_id: TeamId) -> Result<Option<Team>, PortalError>;

    /// Lists teams, optionally restricted to one sport.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::PersistenceError`] on backend failure.
    async fn list(&self, sport: Option<&Sport>) -> Result<Vec<Team>, PortalError>;

    /// Atomically adds each component of `delta` to the team's
    /// `points`, `wins`, `draws` and `losses`.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::TeamNotFound`] if the team does not exist,
    /// or [`PortalError::PersistenceError`] on backend failure.
    async fn increment_fields(&self, team_id: TeamId, delta: StatDelta)
    -> Result<(), PortalError>;

    /// Removes a team. Returns `true` if it existed.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::PersistenceError`] on backend failure.
    async fn delete(&self, team_id: TeamId) -> Result<bool, PortalError>;
}

/// Storage for match result records.
#[async_trait]
pub trait ResultStore: Send + Sync + std::fmt::Debug {
    /// Looks up a result by ID.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::PersistenceError`] on backend failure.
    async fn find_by_id(&self, result_id: ResultId) -> Result<Option<MatchResult>, PortalError>;

    /// Stores a new result.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::InvalidRequest`] if a result with the same ID
    /// already exists, or [`PortalError::PersistenceError`] on backend
    /// failure.
    async fn create(&self, result: MatchResult) -> Result<MatchResult, PortalError>;

    /// Overwrites an existing result with the given record.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::ResultNotFound`] if no result with the
    /// record's ID exists, or [`PortalError::PersistenceError`] on backend
    /// failure.
    async fn update_in_place(&self, result: MatchResult) -> Result<MatchResult, PortalError>;

    /// Deletes a result. Returns `true` if it existed.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::PersistenceError`] on backend failure.
    async fn delete_by_id(&self, result_id: ResultId) -> Result<bool, PortalError>;

    /// Lists results, optionally restricted to one sport, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::PersistenceError`] on backend failure.
    async fn list(&self, sport: Option<&Sport>) -> Result<Vec<MatchResult>, PortalError>;

    /// Counts results in which the team played on either side.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::PersistenceError`] on backend failure.
    async fn count_for_team(&self, team_id: TeamId) -> Result<u64, PortalError>;
}

/// Pair of stores the services run against.
///
/// The stores share a roster lock. Writes that make a result reference a
/// team hold it shared; team removal holds it exclusively, so a team can't
/// disappear between the reference check and the result write.
#[derive(Debug, Clone)]
pub struct Stores {
    /// Team records.
    pub teams: Arc<dyn TeamStore>,
    /// Match result records.
    pub results: Arc<dyn ResultStore>,
    roster: Arc<RwLock<()>>,
}

impl Stores {
    /// Bundles a team store and a result store.
    #[must_use]
    pub fn new(teams: Arc<dyn TeamStore>, results: Arc<dyn ResultStore>) -> Self {
        Self {
            teams,
            results,
            roster: Arc::new(RwLock::new(())),
        }
    }

    /// In-memory stores, used for local runs and tests.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryTeamStore::new()),
            Arc::new(InMemoryResultStore::new()),
        )
    }

    /// PostgreSQL stores sharing one connection pool.
    #[must_use]
    pub fn postgres(pool: sqlx::PgPool) -> Self {
        Self::new(
            Arc::new(PostgresTeamStore::new(pool.clone())),
            Arc::new(PostgresResultStore::new(pool)),
        )
    }

    /// Shared roster guard, held while a result write references teams.
    pub async fn roster_read(&self) -> RwLockReadGuard<'_, ()> {
        self.roster.read().await
    }

    /// Exclusive roster guard, held while a team is checked and removed.
    pub async fn roster_write(&self) -> RwLockWriteGuard<'_, ()> {
        self.roster.write().await
    }
}
