//! Team record and the signed stat deltas applied to it.

use std::ops::{Add, AddAssign, Neg, Sub};

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::outcome::{Outcome, counters_for, points_for};
use super::{Sport, TeamId};

/// A team and its league-table aggregates.
///
/// `points`, `wins`, `draws` and `losses` are a materialized view over the
/// match results referencing this team. They are only ever changed through
/// atomic increments (see [`crate::persistence::TeamStore::increment_fields`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Team {
    /// Team identifier.
    pub id: TeamId,
    /// Display name.
    pub name: String,
    /// Sport this team competes in.
    pub sport: Sport,
    /// Cumulative league points.
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

impl Team {
    /// Creates a freshly registered team with zeroed aggregates.
    #[must_use]
    pub fn new(name: String, sport: Sport) -> Self {
        Self {
            id: TeamId::new(),
            name,
            sport,
            points: 0,
            wins: 0,
            draws: 0,
            losses: 0,
            created_at: Utc::now(),
        }
    }

    /// Number of matches counted in the aggregates.
    #[must_use]
    pub const fn played(&self) -> i64 {
        self.wins + self.draws + self.losses
    }

    /// Returns the aggregates as a [`StatDelta`] measured from zero.
    #[must_use]
    pub const fn totals(&self) -> StatDelta {
        StatDelta {
            points: self.points,
            wins: self.wins,
            draws: self.draws,
            losses: self.losses,
        }
    }

    /// Adds `delta` to every aggregate field.
    pub fn apply(&mut self, delta: StatDelta) {
        self.points += delta.points;
        self.wins += delta.wins;
        self.draws += delta.draws;
        self.losses += delta.losses;
    }
}

/// Signed amounts added to a team's aggregate fields in one atomic write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, ToSchema)]
pub struct StatDelta {
    /// Points change.
    pub points: i64,
    /// Wins change.
    pub wins: i64,
    /// Draws change.
    pub draws: i64,
    /// Losses change.
    pub losses: i64,
}

impl StatDelta {
    /// The delta that changes nothing.
    pub const ZERO: Self = Self {
        points: 0,
        wins: 0,
        draws: 0,
        losses: 0,
    };

    /// Full contribution of one match outcome: its points plus the single
    /// incremented counter.
    #[must_use]
    pub const fn for_outcome(outcome: Outcome) -> Self {
        let (wins, draws, losses) = counters_for(outcome);
        Self {
            points: points_for(outcome),
            wins,
            draws,
            losses,
        }
    }

    /// Returns `true` if applying this delta would change nothing.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.points == 0 && self.wins == 0 && self.draws == 0 && self.losses == 0
    }
}

impl Add for StatDelta {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            points: self.points + rhs.points,
            wins: self.wins + rhs.wins,
            draws: self.draws + rhs.draws,
            losses: self.losses + rhs.losses,
        }
    }
}

impl AddAssign for StatDelta {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Neg for StatDelta {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            points: -self.points,
            wins: -self.wins,
            draws: -self.draws,
            losses: -self.losses,
        }
    }
}

impl Sub for StatDelta {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self + -rhs
    }
}

/// One row of a league table.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StandingRow {
    /// 1-based table position.
    pub position: u32,
    /// Team identifier.
    #[schema(value_type = String, format = Uuid)]
    pub team_id: TeamId,
    /// Team name.
    pub team_name: String,
    /// Matches played.
    pub played: i64,
    /// Matches won.
    pub wins: i64,
    /// Matches drawn.
    pub draws: i64,
    /// Matches lost.
    pub losses: i64,
    /// League points.
    pub points: i64,
}

/// Orders teams into a league table: points, then wins, then draws, then
/// name.
#[must_use]
pub fn build_table(mut teams: Vec<Team>) -> Vec<StandingRow> {
    teams.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(b.wins.cmp(&a.wins))
            .then(b.draws.cmp(&a.draws))
            .then_with(|| a.name.cmp(&b.name))
    });
    teams
        .into_iter()
        .zip(1u32..)
        .map(|(team, position)| StandingRow {
            position,
            team_id: team.id,
            played: team.played(),
            team_name: team.name,
            wins: team.wins,
            draws: team.draws,
            losses: team.losses,
            points: team.points,
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn sport() -> Sport {
        let Ok(sport) = Sport::parse("football") else {
            panic!("valid sport");
        };
        sport
    }

    #[test]
    fn new_team_starts_at_zero() {
        let team = Team::new("Engineering".to_string(), sport());
        assert_eq!(team.totals(), StatDelta::ZERO);
        assert_eq!(team.played(), 0);
    }

    #[test]
    fn outcome_contributions() {
        let win = StatDelta::for_outcome(Outcome::Win);
        assert_eq!(
            win,
            StatDelta {
                points: 3,
                wins: 1,
                draws: 0,
                losses: 0
            }
        );
        let draw = StatDelta::for_outcome(Outcome::Draw);
        assert_eq!((draw.points, draw.draws), (1, 1));
        let loss = StatDelta::for_outcome(Outcome::Loss);
        assert_eq!((loss.points, loss.losses), (0, 1));
    }

    #[test]
    fn net_delta_from_win_to_draw() {
        let net = StatDelta::for_outcome(Outcome::Draw) - StatDelta::for_outcome(Outcome::Win);
        assert_eq!(
            net,
            StatDelta {
                points: -2,
                wins: -1,
                draws: 1,
                losses: 0
            }
        );
    }

    #[test]
    fn negation_cancels() {
        let win = StatDelta::for_outcome(Outcome::Win);
        assert!((win + -win).is_zero());
        assert!(!win.is_zero());
    }

    #[test]
    fn apply_accumulates() {
        let mut team = Team::new("Law".to_string(), sport());
        team.apply(StatDelta::for_outcome(Outcome::Win));
        team.apply(StatDelta::for_outcome(Outcome::Draw));
        assert_eq!(team.points, 4);
        assert_eq!(team.played(), 2);
    }

    #[test]
    fn table_orders_by_points_then_wins_then_name() {
        let mut a = Team::new("Alpha".to_string(), sport());
        a.apply(StatDelta::for_outcome(Outcome::Draw));
        a.apply(StatDelta::for_outcome(Outcome::Draw));
        a.apply(StatDelta::for_outcome(Outcome::Draw));
        let mut b = Team::new("Beta".to_string(), sport());
        b.apply(StatDelta::for_outcome(Outcome::Win));
        let mut c = Team::new("Gamma".to_string(), sport());
        c.apply(StatDelta::for_outcome(Outcome::Win));
        let d = Team::new("Delta".to_string(), sport());

        let table = build_table(vec![d, a, c, b]);
        let names: Vec<&str> = table.iter().map(|r| r.team_name.as_str()).collect();
        // Beta and Gamma tie on points and wins; Alpha has 3 points from draws.
        assert_eq!(names, ["Beta", "Gamma", "Alpha", "Delta"]);
        let positions: Vec<u32> = table.iter().map(|r| r.position).collect();
        assert_eq!(positions, [1, 2, 3, 4]);
    }
}
