//! Standings accountant: keeps team aggregates equal to the sum of their
//! match outcomes across result create, edit and delete.
//!
//! The accountant never reads a team before writing it. For each affected
//! team it computes a signed [`StatDelta`] and applies it with one atomic
//! [`TeamStore::increment_fields`] call, so concurrent reconciliations that
//! touch the same team commute.
//!
//! There is no transaction spanning the per-team writes. A write that fails
//! after another succeeded is logged, published as
//! [`PortalEvent::StandingsDrift`] and reported in the returned
//! [`Reconciliation`]; the successful write is not rolled back and the
//! failure never reaches the caller as an error.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use crate::domain::{
    AdjustmentReason, EventBus, MatchResult, PortalEvent, ResultId, Sport, StatDelta, TeamId,
};
use crate::persistence::TeamStore;

/// One increment planned for one team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamAdjustment {
    /// Team to increment.
    pub team_id: TeamId,
    /// Sport the team plays.
    pub sport: Sport,
    /// Signed amounts to add.
    pub delta: StatDelta,
}

/// Report of one [`StandingsAccountant::reconcile`] call.
///
/// Informational only: callers log or inspect it but never turn it into an
/// error response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    /// Result whose change was reconciled, if any.
    pub result_id: Option<ResultId>,
    /// Increments that were applied.
    pub applied: Vec<TeamAdjustment>,
    /// Increments that failed and were not applied.
    pub failed: Vec<TeamAdjustment>,
}

impl Reconciliation {
    /// Returns `true` if every planned increment was applied.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Number of team store writes attempted.
    #[must_use]
    pub fn writes_attempted(&self) -> usize {
        self.applied.len() + self.failed.len()
    }
}

/// Computes the ordered per-team increments that move standings from the
/// `previous` state of a result to its `new` state.
///
/// - create (`new` only): each side's full contribution, home then away.
/// - delete (`previous` only): each side's contribution negated.
/// - update (both): `contribution(new) - contribution(previous)` per team.
///   When the same teams played and the recomputed outcome is unchanged
///   the plan is empty.
///
/// Teams whose net delta is zero are dropped, so an edit that swaps in
/// different teams still produces the correct increments for every team
/// involved.
#[must_use]
pub fn plan_adjustments(
    new: Option<&MatchResult>,
    previous: Option<&MatchResult>,
) -> Vec<TeamAdjustment> {
    if let (Some(new), Some(previous)) = (new, previous)
        && new.home_team_id == previous.home_team_id
        && new.away_team_id == previous.away_team_id
        && new.outcomes() == previous.outcomes()
    {
        return Vec::new();
    }

    let mut plan: Vec<TeamAdjustment> = Vec::with_capacity(4);
    let mut add = |result: &MatchResult, sign: i64| {
        for (team_id, contribution) in result.contributions() {
            let delta = if sign < 0 { -contribution } else { contribution };
            if let Some(existing) = plan.iter_mut().find(|a| a.team_id == team_id) {
                existing.delta += delta;
            } else {
                plan.push(TeamAdjustment {
                    team_id,
                    sport: result.sport.clone(),
                    delta,
                });
            }
        }
    };

    if let Some(new) = new {
        add(new, 1);
    }
    if let Some(previous) = previous {
        add(previous, -1);
    }

    plan.retain(|a| !a.delta.is_zero());
    plan
}

/// Recomputes every team's aggregates from scratch out of `results`.
///
/// Teams that appear in no result are absent from the map; their expected
/// aggregates are zero.
#[must_use]
pub fn recompute_totals<'a, I>(results: I) -> HashMap<TeamId, StatDelta>
where
    I: IntoIterator<Item = &'a MatchResult>,
{
    let mut totals: HashMap<TeamId, StatDelta> = HashMap::new();
    for result in results {
        for (team_id, contribution) in result.contributions() {
            *totals.entry(team_id).or_default() += contribution;
        }
    }
    totals
}

/// Applies standings deltas for match result mutations.
#[derive(Debug, Clone)]
pub struct StandingsAccountant {
    teams: Arc<dyn TeamStore>,
    event_bus: EventBus,
}

impl StandingsAccountant {
    /// Creates an accountant writing to `teams` and publishing to
    /// `event_bus`.
    #[must_use]
    pub fn new(teams: Arc<dyn TeamStore>, event_bus: EventBus) -> Self {
        Self { teams, event_bus }
    }

    /// Reconciles team aggregates after a result changed.
    ///
    /// | Intent | `new` | `previous` |
    /// |--------|-------|------------|
    /// | create | the new result | `None` |
    /// | update | the edited result | the pre-edit result |
    /// | delete | `None` | the removed result |
    ///
    /// Increments are issued sequentially, each awaited before the next.
    /// Failures are logged and reported, never returned as errors.
    pub async fn reconcile(
        &self,
        new: Option<&MatchResult>,
        previous: Option<&MatchResult>,
    ) -> Reconciliation {
        let Some(subject) = new.or(previous) else {
            return Reconciliation::default();
        };
        let result_id = subject.id;
        let reason = match (new, previous) {
            (Some(_), None) => AdjustmentReason::ResultRecorded,
            (Some(_), Some(_)) => AdjustmentReason::ResultAmended,
            _ => AdjustmentReason::ResultRemoved,
        };

        let mut report = Reconciliation {
            result_id: Some(result_id),
            ..Reconciliation::default()
        };

        let plan = plan_adjustments(new, previous);
        if plan.is_empty() {
            tracing::debug!(%result_id, "outcome unchanged; standings untouched");
            return report;
        }

        for adjustment in plan {
            match self
                .teams
                .increment_fields(adjustment.team_id, adjustment.delta)
                .await
            {
                Ok(()) => {
                    tracing::debug!(
                        %result_id,
                        team_id = %adjustment.team_id,
                        points = adjustment.delta.points,
                        "standings adjusted"
                    );
                    let _ = self.event_bus.publish(PortalEvent::StandingsAdjusted {
                        team_id: adjustment.team_id,
                        sport: adjustment.sport.clone(),
                        result_id,
                        delta: adjustment.delta,
                        reason,
                        timestamp: Utc::now(),
                    });
                    report.applied.push(adjustment);
                }
                Err(err) => {
                    tracing::error!(
                        %result_id,
                        team_id = %adjustment.team_id,
                        error = %err,
                        delta = ?adjustment.delta,
                        "standings increment failed"
                    );
                    let _ = self.event_bus.publish(PortalEvent::StandingsDrift {
                        team_id: adjustment.team_id,
                        sport: adjustment.sport.clone(),
                        result_id,
                        delta: adjustment.delta,
                        reason,
                        error: err.to_string(),
                        timestamp: Utc::now(),
                    });
                    report.failed.push(adjustment);
                }
            }
        }

        if !report.is_complete() {
            tracing::warn!(
                %result_id,
                applied = report.applied.len(),
                failed = report.failed.len(),
                "standings left inconsistent; applied increments were not rolled back"
            );
        }

        report
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::Team;
    use crate::persistence::{FaultyTeamStore, InMemoryTeamStore};

    struct Fixture {
        store: Arc<FaultyTeamStore>,
        accountant: StandingsAccountant,
        bus: EventBus,
        a: TeamId,
        b: TeamId,
    }

    fn football() -> Sport {
        let Ok(sport) = Sport::parse("football") else {
            panic!("valid sport");
        };
        sport
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(FaultyTeamStore::new(Arc::new(InMemoryTeamStore::new())));
        let team_a = Team::new("A".to_string(), football());
        let team_b = Team::new("B".to_string(), football());
        let (a, b) = (team_a.id, team_b.id);
        let _ = store.insert(team_a).await;
        let _ = store.insert(team_b).await;
        let bus = EventBus::new(64);
        let teams: Arc<dyn TeamStore> = Arc::clone(&store) as Arc<dyn TeamStore>;
        let accountant = StandingsAccountant::new(teams, bus.clone());
        Fixture {
            store,
            accountant,
            bus,
            a,
            b,
        }
    }

    async fn team(store: &FaultyTeamStore, id: TeamId) -> Team {
        let Ok(Some(team)) = store.find_by_id(id).await else {
            panic!("team {id} missing");
        };
        team
    }

    fn stats(team: &Team) -> (i64, i64, i64, i64) {
        (team.points, team.wins, team.draws, team.losses)
    }

    fn result(f: &Fixture, home_goals: u32, away_goals: u32) -> MatchResult {
        MatchResult::new(football(), f.a, f.b, home_goals, away_goals, None)
    }

    #[tokio::test]
    async fn create_home_win() {
        let f = fixture().await;
        let report = f.accountant.reconcile(Some(&result(&f, 2, 0)), None).await;

        assert!(report.is_complete());
        assert_eq!(report.writes_attempted(), 2);
        assert_eq!(stats(&team(&f.store, f.a).await), (3, 1, 0, 0));
        assert_eq!(stats(&team(&f.store, f.b).await), (0, 0, 0, 1));
    }

    #[tokio::test]
    async fn create_draw() {
        let f = fixture().await;
        let _ = f.accountant.reconcile(Some(&result(&f, 1, 1)), None).await;

        assert_eq!(stats(&team(&f.store, f.a).await), (1, 0, 1, 0));
        assert_eq!(stats(&team(&f.store, f.b).await), (1, 0, 1, 0));
    }

    #[tokio::test]
    async fn delete_after_create_is_zero_sum() {
        let f = fixture().await;
        let r = result(&f, 2, 0);
        let _ = f.accountant.reconcile(Some(&r), None).await;
        let report = f.accountant.reconcile(None, Some(&r)).await;

        assert_eq!(report.writes_attempted(), 2);
        assert_eq!(stats(&team(&f.store, f.a).await), (0, 0, 0, 0));
        assert_eq!(stats(&team(&f.store, f.b).await), (0, 0, 0, 0));
    }

    #[tokio::test]
    async fn update_with_same_outcome_issues_no_writes() {
        let f = fixture().await;
        let before = result(&f, 3, 0);
        let _ = f.accountant.reconcile(Some(&before), None).await;
        let attempts = f.store.increment_attempts();

        let mut after = before.clone();
        after.set_score(5, 0);
        let Ok(basketball) = Sport::parse("basketball") else {
            panic!("valid sport");
        };
        after.sport = basketball;
        let report = f.accountant.reconcile(Some(&after), Some(&before)).await;

        assert_eq!(report.writes_attempted(), 0);
        assert_eq!(f.store.increment_attempts(), attempts);
        assert_eq!(stats(&team(&f.store, f.a).await), (3, 1, 0, 0));
    }

    #[tokio::test]
    async fn update_win_to_draw_applies_net_delta() {
        let f = fixture().await;
        let before = result(&f, 2, 1);
        let _ = f.accountant.reconcile(Some(&before), None).await;

        let mut after = before.clone();
        after.set_score(1, 1);
        let report = f.accountant.reconcile(Some(&after), Some(&before)).await;

        assert_eq!(report.writes_attempted(), 2);
        let Some(home) = report.applied.first() else {
            panic!("home adjustment missing");
        };
        assert_eq!(home.team_id, f.a);
        assert_eq!(
            home.delta,
            StatDelta {
                points: -2,
                wins: -1,
                draws: 1,
                losses: 0
            }
        );
        assert_eq!(stats(&team(&f.store, f.a).await), (1, 0, 1, 0));
        assert_eq!(stats(&team(&f.store, f.b).await), (1, 0, 1, 0));
    }

    #[tokio::test]
    async fn update_that_swaps_a_team_moves_contribution() {
        let f = fixture().await;
        let team_c = Team::new("C".to_string(), football());
        let c = team_c.id;
        let _ = f.store.insert(team_c).await;

        let before = result(&f, 2, 0);
        let _ = f.accountant.reconcile(Some(&before), None).await;

        let mut after = before.clone();
        after.away_team_id = c;
        let report = f.accountant.reconcile(Some(&after), Some(&before)).await;

        // A keeps its win, so only C gains a loss and B loses one.
        assert_eq!(report.writes_attempted(), 2);
        assert_eq!(stats(&team(&f.store, f.a).await), (3, 1, 0, 0));
        assert_eq!(stats(&team(&f.store, f.b).await), (0, 0, 0, 0));
        assert_eq!(stats(&team(&f.store, c).await), (0, 0, 0, 1));
    }

    #[tokio::test]
    async fn away_failure_keeps_home_write() {
        let f = fixture().await;
        let mut rx = f.bus.subscribe();
        f.store.break_team(f.b).await;

        let report = f.accountant.reconcile(Some(&result(&f, 2, 0)), None).await;

        assert!(!report.is_complete());
        assert_eq!(report.applied.len(), 1);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(stats(&team(&f.store, f.a).await), (3, 1, 0, 0));
        assert_eq!(stats(&team(&f.store, f.b).await), (0, 0, 0, 0));

        let Ok(first) = rx.recv().await else {
            panic!("expected adjustment event");
        };
        assert_eq!(first.event_type_str(), "standings_adjusted");
        let Ok(second) = rx.recv().await else {
            panic!("expected drift event");
        };
        assert_eq!(second.event_type_str(), "standings_drift");
    }

    #[tokio::test]
    async fn home_failure_still_attempts_away() {
        let f = fixture().await;
        f.store.break_team(f.a).await;

        let report = f.accountant.reconcile(Some(&result(&f, 0, 1)), None).await;

        assert_eq!(report.writes_attempted(), 2);
        assert_eq!(f.store.increment_attempts(), 2);
        assert_eq!(stats(&team(&f.store, f.b).await), (3, 1, 0, 0));
    }

    #[tokio::test]
    async fn nothing_to_reconcile() {
        let f = fixture().await;
        let report = f.accountant.reconcile(None, None).await;
        assert_eq!(report, Reconciliation::default());
        assert_eq!(f.store.increment_attempts(), 0);
    }

    #[test]
    fn recompute_matches_incremental_totals() {
        let a = TeamId::new();
        let b = TeamId::new();
        let c = TeamId::new();
        let results = [
            MatchResult::new(football(), a, b, 2, 1, None),
            MatchResult::new(football(), b, c, 0, 0, None),
            MatchResult::new(football(), c, a, 3, 1, None),
        ];
        let totals = recompute_totals(&results);

        let expect = |id: TeamId| totals.get(&id).copied().unwrap_or_default();
        assert_eq!(
            expect(a),
            StatDelta {
                points: 3,
                wins: 1,
                draws: 0,
                losses: 1
            }
        );
        assert_eq!((expect(b).points, expect(b).draws, expect(b).losses), (1, 1, 1));
        assert_eq!((expect(c).points, expect(c).wins, expect(c).draws), (4, 1, 1));
    }

    #[test]
    fn plan_orders_home_before_away() {
        let a = TeamId::new();
        let b = TeamId::new();
        let r = MatchResult::new(football(), a, b, 0, 3, None);
        let plan = plan_adjustments(Some(&r), None);
        let ids: Vec<TeamId> = plan.iter().map(|p| p.team_id).collect();
        assert_eq!(ids, [a, b]);

        let removal = plan_adjustments(None, Some(&r));
        let Some(away) = removal.get(1) else {
            panic!("away adjustment missing");
        };
        assert_eq!(away.delta.points, -3);
        assert_eq!(away.delta.wins, -1);
    }

    #[test]
    fn plan_for_home_away_swap_with_same_score() {
        // Same teams, sides swapped, 2-0 becomes 0-2: the same team still
        // wins, so nothing changes.
        let a = TeamId::new();
        let b = TeamId::new();
        let before = MatchResult::new(football(), a, b, 2, 0, None);
        let mut after = before.clone();
        after.home_team_id = b;
        after.away_team_id = a;
        after.set_score(0, 2);
        assert!(plan_adjustments(Some(&after), Some(&before)).is_empty());
    }
}
