// Proptest generators for domain types.

use proptest::prelude::*;

use crate::domain::score::{MatchResult, MatchScore, Side, MAX_GOALS};
use crate::domain::scoring::PredictedScore;
use crate::domain::stage::Stage;

pub fn side() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::Home), Just(Side::Away)]
}

pub fn stage() -> impl Strategy<Value = Stage> {
    proptest::sample::select(Stage::ALL.to_vec())
}

/// Mostly low-scoring games, as in real football.
pub fn score() -> impl Strategy<Value = MatchScore> {
    let goals = prop_oneof![8 => 0u8..=4, 1 => 0u8..=MAX_GOALS];
    (goals.clone(), goals).prop_map(|(home, away)| MatchScore { home, away })
}

/// A result valid for `stage`: knockout draws get a penalty winner.
pub fn result_for(stage: Stage) -> impl Strategy<Value = MatchResult> {
    (score(), side()).prop_map(move |(score, pens)| {
        let penalty_winner = (stage.is_knockout() && score.is_draw()).then_some(pens);
        MatchResult {
            score,
            penalty_winner,
        }
    })
}

pub fn prediction_for(stage: Stage) -> impl Strategy<Value = PredictedScore> {
    (score(), side(), any::<bool>()).prop_map(move |(score, adv, joker)| PredictedScore {
        score,
        advances: (stage.is_knockout() && score.is_draw()).then_some(adv),
        joker,
    })
}

/// Group letter and match-number based slot code strings.
pub fn slot_code_string() -> impl Strategy<Value = String> {
    prop_oneof![
        ("[12]", "[A-L]").prop_map(|(p, g)| format!("{p}{g}")),
        proptest::sample::subsequence(
            vec!['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L'],
            1..=6
        )
        .prop_map(|gs| format!("3{}", gs.into_iter().collect::<String>())),
        ("[WL]", 1i32..=200).prop_map(|(p, n)| format!("{p}{n}")),
    ]
}
