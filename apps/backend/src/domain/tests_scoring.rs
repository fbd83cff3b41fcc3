use crate::domain::score::{MatchResult, MatchScore, Side};
use crate::domain::scoring::{
    bracket_pick_points, score_prediction, PredictedScore, PredictionPoints, ScoringRules,
};
use crate::domain::stage::Stage;

fn s(h: i32, a: i32) -> MatchScore {
    MatchScore::new(h, a).unwrap()
}

fn pred(h: i32, a: i32) -> PredictedScore {
    PredictedScore {
        score: s(h, a),
        advances: None,
        joker: false,
    }
}

fn result(h: i32, a: i32, pens: Option<Side>, stage: Stage) -> MatchResult {
    MatchResult::new(s(h, a), pens, stage).unwrap()
}

#[test]
fn exact_score_in_group() {
    let pts = score_prediction(
        &ScoringRules::default(),
        Stage::Group,
        &pred(2, 1),
        &result(2, 1, None, Stage::Group),
    );
    assert_eq!(
        pts,
        PredictionPoints {
            base: 5,
            qualifier_bonus: 0,
            multiplier: 1,
            total: 5,
            exact: true,
            outcome_hit: true,
        }
    );
}

#[test]
fn outcome_with_one_side_right() {
    // 2-0 predicted, 2-1 played: outcome (3) + home goals (1)
    let pts = score_prediction(
        &ScoringRules::default(),
        Stage::Group,
        &pred(2, 0),
        &result(2, 1, None, Stage::Group),
    );
    assert_eq!(pts.base, 4);
    assert_eq!(pts.total, 4);
    assert!(pts.outcome_hit);
    assert!(!pts.exact);
}

#[test]
fn wrong_outcome_still_earns_goal_bonus() {
    // 1-2 predicted, 1-0 played: only home goals match
    let pts = score_prediction(
        &ScoringRules::default(),
        Stage::Group,
        &pred(1, 2),
        &result(1, 0, None, Stage::Group),
    );
    assert_eq!(pts.base, 1);
    assert!(!pts.outcome_hit);
}

#[test]
fn predicted_draw_other_draw() {
    // 1-1 vs 0-0: correct outcome, no goals match
    let pts = score_prediction(
        &ScoringRules::default(),
        Stage::Group,
        &pred(1, 1),
        &result(0, 0, None, Stage::Group),
    );
    assert_eq!(pts.total, 3);
}

#[test]
fn knockout_qualifier_bonus_from_score() {
    // 3-1 predicted, 1-0 played in R16: outcome 3 + away goals? no (1 vs 0) -> 3, qualifier +2
    let pts = score_prediction(
        &ScoringRules::default(),
        Stage::RoundOf16,
        &pred(3, 1),
        &result(1, 0, None, Stage::RoundOf16),
    );
    assert_eq!(pts.base, 3);
    assert_eq!(pts.qualifier_bonus, 2);
    assert_eq!(pts.total, 5);
}

#[test]
fn knockout_qualifier_bonus_from_predicted_penalties() {
    let prediction = PredictedScore {
        score: s(1, 1),
        advances: Some(Side::Away),
        joker: false,
    };
    // Away wins 2-1 in regular time: outcome wrong, home goals? 1 vs 2 no, away 1 vs 1 yes
    let pts = score_prediction(
        &ScoringRules::default(),
        Stage::QuarterFinal,
        &prediction,
        &result(1, 2, None, Stage::QuarterFinal),
    );
    assert_eq!(pts.base, 1);
    assert_eq!(pts.qualifier_bonus, 2);
    assert_eq!(pts.total, 3);
}

#[test]
fn exact_draw_with_wrong_shootout_winner() {
    let prediction = PredictedScore {
        score: s(0, 0),
        advances: Some(Side::Home),
        joker: false,
    };
    let pts = score_prediction(
        &ScoringRules::default(),
        Stage::Final,
        &prediction,
        &result(0, 0, Some(Side::Away), Stage::Final),
    );
    assert!(pts.exact);
    assert_eq!(pts.qualifier_bonus, 0);
    assert_eq!(pts.total, 5);
}

#[test]
fn joker_doubles_everything_including_qualifier() {
    let prediction = PredictedScore {
        score: s(2, 0),
        advances: None,
        joker: true,
    };
    let pts = score_prediction(
        &ScoringRules::default(),
        Stage::SemiFinal,
        &prediction,
        &result(2, 0, None, Stage::SemiFinal),
    );
    assert_eq!(pts.multiplier, 2);
    assert_eq!(pts.total, (5 + 2) * 2);
}

#[test]
fn no_qualifier_bonus_in_group_stage() {
    let pts = score_prediction(
        &ScoringRules::default(),
        Stage::Group,
        &pred(1, 0),
        &result(3, 0, None, Stage::Group),
    );
    assert_eq!(pts.qualifier_bonus, 0);
    assert_eq!(pts.total, 4);
}

#[test]
fn custom_rules_are_respected() {
    let rules = ScoringRules {
        exact_score: 10,
        correct_outcome: 4,
        team_goals_bonus: 0,
        qualifier_bonus: 5,
        joker_multiplier: 3,
    };
    let prediction = PredictedScore {
        score: s(1, 0),
        advances: None,
        joker: true,
    };
    let pts = score_prediction(&rules, Stage::RoundOf32, &prediction, &result(2, 0, None, Stage::RoundOf32));
    assert_eq!(pts.total, (4 + 5) * 3);
}

#[test]
fn bracket_points_per_stage() {
    assert_eq!(bracket_pick_points(Stage::RoundOf32), 2);
    assert_eq!(bracket_pick_points(Stage::RoundOf16), 4);
    assert_eq!(bracket_pick_points(Stage::QuarterFinal), 6);
    assert_eq!(bracket_pick_points(Stage::SemiFinal), 8);
    assert_eq!(bracket_pick_points(Stage::ThirdPlace), 4);
    assert_eq!(bracket_pick_points(Stage::Final), 10);
    assert_eq!(bracket_pick_points(Stage::Group), 0);
}
