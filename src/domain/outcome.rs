//! Match outcome classification and 3-1-0 points scoring.
//!
//! Everything in this module is pure. The same functions serve both sides
//! of a fixture: classifying `(away_goals, home_goals)` yields the away
//! team's view without a separate code path.

use serde::Serialize;
use utoipa::ToSchema;

/// Points awarded for a win.
pub const POINTS_FOR_WIN: i64 = 3;
/// Points awarded for a draw.
pub const POINTS_FOR_DRAW: i64 = 1;
/// Points awarded for a loss.
pub const POINTS_FOR_LOSS: i64 = 0;

/// Result of a match from one team's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The team scored more goals than its opponent.
    Win,
    /// Both teams scored the same number of goals.
    Draw,
    /// The team scored fewer goals than its opponent.
    Loss,
}

impl Outcome {
    /// Returns the outcome seen by the opponent.
    #[must_use]
    pub const fn mirror(self) -> Self {
        match self {
            Self::Win => Self::Loss,
            Self::Draw => Self::Draw,
            Self::Loss => Self::Win,
        }
    }
}

/// Stored label of a match result: which side won, or a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    /// Home team won.
    Home,
    /// Away team won.
    Away,
    /// Draw.
    Draw,
}

impl MatchOutcome {
    /// Derives the label from the final score.
    #[must_use]
    pub const fn from_goals(home_goals: u32, away_goals: u32) -> Self {
        match classify_outcome(home_goals, away_goals) {
            (Outcome::Win, _) => Self::Home,
            (Outcome::Loss, _) => Self::Away,
            (Outcome::Draw, _) => Self::Draw,
        }
    }

    /// Returns the label as the string stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Away => "away",
            Self::Draw => "draw",
        }
    }
}

/// Classifies a final score into `(home outcome, away outcome)`.
#[must_use]
pub const fn classify_outcome(home_goals: u32, away_goals: u32) -> (Outcome, Outcome) {
    if home_goals > away_goals {
        (Outcome::Win, Outcome::Loss)
    } else if home_goals < away_goals {
        (Outcome::Loss, Outcome::Win)
    } else {
        (Outcome::Draw, Outcome::Draw)
    }
}

/// Returns the league points earned for an outcome.
#[must_use]
pub const fn points_for(outcome: Outcome) -> i64 {
    match outcome {
        Outcome::Win => POINTS_FOR_WIN,
        Outcome::Draw => POINTS_FOR_DRAW,
        Outcome::Loss => POINTS_FOR_LOSS,
    }
}

/// Returns `(wins, draws, losses)` increments for an outcome.
///
/// Exactly one component is `1`.
#[must_use]
pub const fn counters_for(outcome: Outcome) -> (i64, i64, i64) {
    match outcome {
        Outcome::Win => (1, 0, 0),
        Outcome::Draw => (0, 1, 0),
        Outcome::Loss => (0, 0, 1),
    }
}
