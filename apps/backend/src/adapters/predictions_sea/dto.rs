//! DTOs for predictions_sea adapter.

/// Values a member submits for one match.
#[derive(Debug, Clone)]
pub struct PredictionWrite {
    pub member_id: i64,
    pub match_id: i64,
    pub home_goals: i16,
    pub away_goals: i16,
    pub advances: Option<String>,
    pub joker: bool,
}

/// Scoring outcome written back after a result.
#[derive(Debug, Clone, Copy)]
pub struct PredictionScore {
    pub id: i64,
    pub points: Option<i32>,
    pub exact_hit: bool,
    pub outcome_hit: bool,
}
