//! Team service: registration, lookup, removal, league tables and the
//! standings audit.

use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use super::standings::recompute_totals;
use crate::domain::{
    EventBus, PortalEvent, Sport, StandingRow, StatDelta, Team, TeamId, build_table,
};
use crate::error::PortalError;
use crate::persistence::Stores;

/// Maximum length of a team name, in characters.
pub const MAX_TEAM_NAME_LEN: usize = 100;

/// One team whose stored aggregates differ from its results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DriftEntry {
    /// Team identifier.
    #[schema(value_type = String, format = Uuid)]
    pub team_id: TeamId,
    /// Team name.
    pub team_name: String,
    /// Aggregates currently stored on the team.
    pub stored: StatDelta,
    /// Aggregates recomputed from the team's results.
    pub expected: StatDelta,
}

/// Outcome of comparing stored standings against recorded results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct StandingsAudit {
    /// Audited sport.
    #[schema(value_type = String)]
    pub sport: Sport,
    /// Number of teams compared.
    pub teams_checked: usize,
    /// Number of results summed.
    pub results_counted: usize,
    /// Teams whose aggregates disagree with their results.
    pub drift: Vec<DriftEntry>,
}

impl StandingsAudit {
    /// Returns `true` if no team drifted.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.drift.is_empty()
    }
}

/// Team registry and standings read side.
#[derive(Debug, Clone)]
pub struct TeamService {
    stores: Stores,
    event_bus: EventBus,
}

impl TeamService {
    /// Creates a new `TeamService`.
    #[must_use]
    pub fn new(stores: Stores, event_bus: EventBus) -> Self {
        Self { stores, event_bus }
    }

    /// Registers a team with zeroed aggregates.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::InvalidRequest`] on a blank or overlong name
    /// or an invalid sport, or [`PortalError::PersistenceError`] on backend
    /// failure.
    pub async fn register_team(&self, name: &str, sport: &str) -> Result<Team, PortalError> {
        let sport = Sport::parse(sport)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(PortalError::InvalidRequest(
                "team name must not be empty".to_string(),
            ));
        }
        if name.chars().count() > MAX_TEAM_NAME_LEN {
            return Err(PortalError::InvalidRequest(format!(
                "team name exceeds {MAX_TEAM_NAME_LEN} characters"
            )));
        }

        let team = self
            .stores
            .teams
            .insert(Team::new(name.to_string(), sport))
            .await?;

        let _ = self.event_bus.publish(PortalEvent::TeamRegistered {
            team_id: team.id,
            sport: team.sport.clone(),
            name: team.name.clone(),
            timestamp: Utc::now(),
        });
        tracing::info!(team_id = %team.id, sport = %team.sport, name = %team.name, "team registered");
        Ok(team)
    }

    /// Returns one team.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::TeamNotFound`] if the team does not exist.
    pub async fn get_team(&self, team_id: TeamId) -> Result<Team, PortalError> {
        self.stores
            .teams
            .find_by_id(team_id)
            .await?
            .ok_or(PortalError::TeamNotFound(team_id))
    }

    /// Lists teams, optionally for one sport.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::InvalidRequest`] on a blank sport filter or
    /// [`PortalError::PersistenceError`] on backend failure.
    pub async fn list_teams(&self, sport: Option<&str>) -> Result<Vec<Team>, PortalError> {
        let sport = sport.map(Sport::parse).transpose()?;
        self.stores.teams.list(sport.as_ref()).await
    }

    /// Removes a team that no result references. Result writes that
    /// reference teams wait until the removal is done.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::TeamNotFound`] if the team does not exist,
    /// or [`PortalError::TeamInUse`] if results still reference it.
    pub async fn remove_team(&self, team_id: TeamId) -> Result<(), PortalError> {
        let roster = self.stores.roster_write().await;
        let team = self.get_team(team_id).await?;
        let results = self.stores.results.count_for_team(team_id).await?;
        if results > 0 {
            return Err(PortalError::TeamInUse { team_id, results });
        }
        if !self.stores.teams.delete(team_id).await? {
            return Err(PortalError::TeamNotFound(team_id));
        }
        drop(roster);

        let _ = self.event_bus.publish(PortalEvent::TeamRemoved {
            team_id,
            sport: team.sport,
            timestamp: Utc::now(),
        });
        tracing::info!(%team_id, "team removed");
        Ok(())
    }

    /// Returns the league table for `sport`.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::InvalidRequest`] on an invalid sport or
    /// [`PortalError::PersistenceError`] on backend failure.
    pub async fn standings(&self, sport: &str) -> Result<Vec<StandingRow>, PortalError> {
        let sport = Sport::parse(sport)?;
        let teams = self.stores.teams.list(Some(&sport)).await?;
        Ok(build_table(teams))
    }

    /// Recomputes every team's aggregates from the recorded results and
    /// reports the teams whose stored values differ. Nothing is written.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::InvalidRequest`] on an invalid sport or
    /// [`PortalError::PersistenceError`] on backend failure.
    pub async fn audit_standings(&self, sport: &str) -> Result<StandingsAudit, PortalError> {
        let sport = Sport::parse(sport)?;
        let teams = self.stores.teams.list(Some(&sport)).await?;
        let results = self.stores.results.list(Some(&sport)).await?;
        let expected = recompute_totals(&results);

        let drift: Vec<DriftEntry> = teams
            .iter()
            .filter_map(|team| {
                let stored = team.totals();
                let wanted = expected.get(&team.id).copied().unwrap_or_default();
                (stored != wanted).then(|| DriftEntry {
                    team_id: team.id,
                    team_name: team.name.clone(),
                    stored,
                    expected: wanted,
                })
            })
            .collect();

        if !drift.is_empty() {
            tracing::warn!(sport = %sport, drifted = drift.len(), "standings drift detected");
        }

        Ok(StandingsAudit {
            sport,
            teams_checked: teams.len(),
            results_counted: results.len(),
            drift,
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::indexing_slicing)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use super::*;
    use crate::persistence::{InMemoryResultStore, InMemoryTeamStore, TeamStore};
    use crate::service::{NewResult, ResultsService, build_services};

    /// Team store whose deletes announce themselves and then stall.
    #[derive(Debug)]
    struct SlowDeleteStore {
        inner: InMemoryTeamStore,
        delete_started: Notify,
    }

    #[async_trait]
    impl TeamStore for SlowDeleteStore {
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
            self.inner.increment_fields(team_id, delta).await
        }

        async fn delete(&self, team_id: TeamId) -> Result<bool, PortalError> {
            self.delete_started.notify_one();
            tokio::time::sleep(Duration::from_millis(50)).await;
            self.inner.delete(team_id).await
        }
    }

    fn setup() -> (Stores, Arc<TeamService>, Arc<ResultsService>) {
        let stores = Stores::in_memory();
        let bus = EventBus::new(64);
        let (teams, results) = build_services(&stores, &bus);
        (stores, teams, results)
    }

    #[tokio::test]
    async fn register_normalizes_and_validates() {
        let (_, teams, _) = setup();
        let Ok(team) = teams.register_team("  Owls  ", " Football").await else {
            panic!("register failed");
        };
        assert_eq!(team.name, "Owls");
        assert_eq!(team.sport.as_str(), "football");
        assert_eq!(team.totals(), StatDelta::ZERO);

        assert!(teams.register_team("   ", "football").await.is_err());
        assert!(teams.register_team("Owls", "").await.is_err());
        let long = "x".repeat(MAX_TEAM_NAME_LEN + 1);
        assert!(teams.register_team(&long, "football").await.is_err());
    }

    #[tokio::test]
    async fn list_filters_by_sport() {
        let (_, teams, _) = setup();
        let _ = teams.register_team("Owls", "football").await;
        let _ = teams.register_team("Hawks", "basketball").await;

        let Ok(football) = teams.list_teams(Some("FOOTBALL")).await else {
            panic!("list failed");
        };
        assert_eq!(football.len(), 1);
        let Ok(all) = teams.list_teams(None).await else {
            panic!("list failed");
        };
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn team_with_results_cannot_be_removed() {
        let (_, teams, results) = setup();
        let (Ok(a), Ok(b)) = (
            teams.register_team("Owls", "football").await,
            teams.register_team("Foxes", "football").await,
        ) else {
            panic!("register failed");
        };
        let Ok(result) = results
            .record_result(NewResult {
                sport: "football".to_string(),
                home_team_id: a.id,
                away_team_id: b.id,
                home_goals: 1,
                away_goals: 0,
                played_on: None,
            })
            .await
        else {
            panic!("record failed");
        };

        assert!(matches!(
            teams.remove_team(a.id).await,
            Err(PortalError::TeamInUse { results: 1, .. })
        ));

        tokio_test::assert_ok!(results.remove_result(result.id).await);
        tokio_test::assert_ok!(teams.remove_team(a.id).await);
        assert!(matches!(
            teams.get_team(a.id).await,
            Err(PortalError::TeamNotFound(_))
        ));
    }

    #[tokio::test]
    async fn table_and_audit_follow_results() {
        let (stores, teams, results) = setup();
        let (Ok(a), Ok(b), Ok(c)) = (
            teams.register_team("Owls", "football").await,
            teams.register_team("Foxes", "football").await,
            teams.register_team("Bears", "football").await,
        ) else {
            panic!("register failed");
        };
        for (home, away, hg, ag) in [(a.id, b.id, 2, 0), (b.id, c.id, 1, 1), (c.id, a.id, 0, 3)] {
            let recorded = results
                .record_result(NewResult {
                    sport: "football".to_string(),
                    home_team_id: home,
                    away_team_id: away,
                    home_goals: hg,
                    away_goals: ag,
                    played_on: None,
                })
                .await;
            assert!(recorded.is_ok());
        }

        let Ok(table) = teams.standings("football").await else {
            panic!("standings failed");
        };
        assert_eq!(table[0].team_id, a.id);
        assert_eq!(table[0].points, 6);
        assert_eq!(table[0].played, 2);
        assert_eq!(table[1].team_name, "Bears");
        assert_eq!(table[2].team_name, "Foxes");

        let Ok(audit) = teams.audit_standings("football").await else {
            panic!("audit failed");
        };
        assert!(audit.is_consistent());
        assert_eq!(audit.teams_checked, 3);
        assert_eq!(audit.results_counted, 3);

        let skew = StatDelta {
            points: 3,
            wins: 1,
            draws: 0,
            losses: 0,
        };
        tokio_test::assert_ok!(stores.teams.increment_fields(b.id, skew).await);
        let Ok(audit) = teams.audit_standings("football").await else {
            panic!("audit failed");
        };
        assert_eq!(audit.drift.len(), 1);
        assert_eq!(audit.drift[0].team_id, b.id);
        assert_eq!(audit.drift[0].stored - audit.drift[0].expected, skew);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn result_recorded_during_team_removal_is_rejected() {
        let store = Arc::new(SlowDeleteStore {
            inner: InMemoryTeamStore::new(),
            delete_started: Notify::new(),
        });
        let stores = Stores::new(
            Arc::clone(&store) as Arc<dyn TeamStore>,
            Arc::new(InMemoryResultStore::new()),
        );
        let (teams, results) = build_services(&stores, &EventBus::new(64));
        let (Ok(a), Ok(b)) = (
            teams.register_team("Owls", "football").await,
            teams.register_team("Foxes", "football").await,
        ) else {
            panic!("register failed");
        };

        let remover = Arc::clone(&teams);
        let removal = tokio::spawn(async move { remover.remove_team(a.id).await });
        store.delete_started.notified().await;

        let recorded = results
            .record_result(NewResult {
                sport: "football".to_string(),
                home_team_id: a.id,
                away_team_id: b.id,
                home_goals: 1,
                away_goals: 0,
                played_on: None,
            })
            .await;
        assert!(matches!(recorded, Err(PortalError::UnknownTeam(id)) if id == a.id));

        let Ok(removed) = removal.await else {
            panic!("removal task panicked");
        };
        tokio_test::assert_ok!(removed);
        assert_eq!(stores.results.count_for_team(a.id).await.ok(), Some(0));
        assert_eq!(stores.results.count_for_team(b.id).await.ok(), Some(0));
    }
}
