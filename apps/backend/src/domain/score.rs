use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::stage::Stage;
use crate::errors::domain::{DomainError, ValidationKind};

/// Highest goal count accepted for a prediction or a result.
pub const MAX_GOALS: u8 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Side::Home => "HOME",
            Side::Away => "AWAY",
        }
    }

    pub const fn other(&self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HOME" => Ok(Side::Home),
            "AWAY" => Ok(Side::Away),
            _ => Err(DomainError::validation(
                ValidationKind::InvalidAdvances,
                format!("Unknown side '{s}' (expected HOME or AWAY)"),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    HomeWin,
    Draw,
    AwayWin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchScore {
    pub home: u8,
    pub away: u8,
}

impl MatchScore {
    /// Range-checked constructor for values coming off the wire or the DB.
    pub fn new(home: i32, away: i32) -> Result<Self, DomainError> {
        let check = |goals: i32| -> Result<u8, DomainError> {
            u8::try_from(goals)
                .ok()
                .filter(|g| *g <= MAX_GOALS)
                .ok_or_else(|| {
                    DomainError::validation(
                        ValidationKind::InvalidScore,
                        format!("Goals must be between 0 and {MAX_GOALS}, got {goals}"),
                    )
                })
        };
        Ok(Self {
            home: check(home)?,
            away: check(away)?,
        })
    }

    pub fn outcome(&self) -> Outcome {
        match self.home.cmp(&self.away) {
            std::cmp::Ordering::Greater => Outcome::HomeWin,
            std::cmp::Ordering::Equal => Outcome::Draw,
            std::cmp::Ordering::Less => Outcome::AwayWin,
        }
    }

    pub fn is_draw(&self) -> bool {
        self.home == self.away
    }

    pub fn goals(&self, side: Side) -> u8 {
        match side {
            Side::Home => self.home,
            Side::Away => self.away,
        }
    }

    /// Side that won in regular/extra time, if any.
    pub fn leader(&self) -> Option<Side> {
        match self.outcome() {
            Outcome::HomeWin => Some(Side::Home),
            Outcome::AwayWin => Some(Side::Away),
            Outcome::Draw => None,
        }
    }
}

/// Final score of a played match. Knockout draws are settled on penalties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchResult {
    pub score: MatchScore,
    pub penalty_winner: Option<Side>,
}

impl MatchResult {
    /// Validates the penalty winner against the stage and the score.
    pub fn new(
        score: MatchScore,
        penalty_winner: Option<Side>,
        stage: Stage,
    ) -> Result<Self, DomainError> {
        match (stage.is_knockout(), score.is_draw(), penalty_winner) {
            (true, true, None) => Err(DomainError::validation(
                ValidationKind::InvalidPenaltyWinner,
                "A knockout draw needs a penalty winner",
            )),
            (false, _, Some(_)) => Err(DomainError::validation(
                ValidationKind::InvalidPenaltyWinner,
                "Group matches have no penalty shoot-out",
            )),
            (true, false, Some(_)) => Err(DomainError::validation(
                ValidationKind::InvalidPenaltyWinner,
                "Penalty winner only applies to a draw",
            )),
            _ => Ok(Self {
                score,
                penalty_winner,
            }),
        }
    }

    /// Side that advances. `None` for a group-stage draw.
    pub fn winner_side(&self) -> Option<Side> {
        self.score.leader().or(self.penalty_winner)
    }

    pub fn loser_side(&self) -> Option<Side> {
        self.winner_side().map(|s| s.other())
    }
}
