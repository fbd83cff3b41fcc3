//! DTOs for tournaments_sea adapter.

#[derive(Debug, Clone)]
pub struct TournamentCreate {
    pub slug: String,
    pub name: String,
    pub prediction_lock_minutes: i32,
}

#[derive(Debug, Clone)]
pub struct TeamCreate {
    pub tournament_id: i64,
    pub code: String,
    pub name: String,
    pub group_code: Option<String>,
}
