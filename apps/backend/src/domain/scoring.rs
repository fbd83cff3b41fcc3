//! Per-match prediction rubric and bracket pick points.
//!
//! Everything here is pure: the result pipeline calls these functions for each
//! stored prediction and writes the numbers back.

use serde::Serialize;

use super::score::{MatchResult, MatchScore, Side};
use super::stage::Stage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoringRules {
    pub exact_score: i32,
    pub correct_outcome: i32,
    /// Per side whose goals were guessed, on non-exact predictions.
    pub team_goals_bonus: i32,
    /// Knockout only: predicted qualifier went through.
    pub qualifier_bonus: i32,
    pub joker_multiplier: i32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            exact_score: 5,
            correct_outcome: 3,
            team_goals_bonus: 1,
            qualifier_bonus: 2,
            joker_multiplier: 2,
        }
    }
}

/// What a member predicted for one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredictedScore {
    pub score: MatchScore,
    /// Who goes through when a knockout draw is predicted.
    pub advances: Option<Side>,
    pub joker: bool,
}

impl PredictedScore {
    /// Side the member expects to advance.
    pub fn qualifier(&self) -> Option<Side> {
        self.score.leader().or(self.advances)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PredictionPoints {
    pub base: i32,
    pub qualifier_bonus: i32,
    pub multiplier: i32,
    pub total: i32,
    pub exact: bool,
    pub outcome_hit: bool,
}

pub fn score_prediction(
    rules: &ScoringRules,
    stage: Stage,
    prediction: &PredictedScore,
    result: &MatchResult,
) -> PredictionPoints {
    let predicted = prediction.score;
    let actual = result.score;

    let exact = predicted == actual;
    let outcome_hit = predicted.outcome() == actual.outcome();
    let sides_hit = [Side::Home, Side::Away]
        .into_iter()
        .filter(|side| predicted.goals(*side) == actual.goals(*side))
        .count() as i32;

    let base = if exact {
        rules.exact_score
    } else if outcome_hit {
        rules.correct_outcome + sides_hit * rules.team_goals_bonus
    } else {
        sides_hit * rules.team_goals_bonus
    };

    let qualifier_bonus = match (stage.is_knockout(), prediction.qualifier(), result.winner_side())
    {
        (true, Some(predicted), Some(actual)) if predicted == actual => rules.qualifier_bonus,
        _ => 0,
    };

    let multiplier = if prediction.joker {
        rules.joker_multiplier
    } else {
        1
    };

    PredictionPoints {
        base,
        qualifier_bonus,
        multiplier,
        total: (base + qualifier_bonus) * multiplier,
        exact,
        outcome_hit,
    }
}

/// Points for a bracket pick whose team won the match at `stage`.
pub const fn bracket_pick_points(stage: Stage) -> i32 {
    match stage {
        Stage::Group => 0,
        Stage::RoundOf32 => 2,
        Stage::RoundOf16 => 4,
        Stage::QuarterFinal => 6,
        Stage::SemiFinal => 8,
        Stage::ThirdPlace => 4,
        Stage::Final => 10,
    }
}
