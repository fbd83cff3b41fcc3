//! DTOs for matches_sea adapter.

use time::OffsetDateTime;

#[derive(Debug, Clone)]
pub struct MatchCreate {
    pub tournament_id: i64,
    pub match_no: i32,
    pub stage: String,
    pub group_code: Option<String>,
    pub home_slot: Option<String>,
    pub away_slot: Option<String>,
    pub home_team_id: Option<i64>,
    pub away_team_id: Option<i64>,
    pub kickoff_at: OffsetDateTime,
}

/// Result write guarded by the match's lock version.
#[derive(Debug, Clone)]
pub struct MatchResultUpdate {
    pub id: i64,
    pub home_goals: i16,
    pub away_goals: i16,
    pub penalty_winner: Option<String>,
    pub current_lock_version: i32,
}
