//! DTOs for leagues_sea adapter.

#[derive(Debug, Clone)]
pub struct LeagueCreate {
    pub tournament_id: i64,
    pub owner_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub kind: String,
    pub social_plan: Option<String>,
    pub enterprise_tier: Option<String>,
    pub join_code: String,
}

/// Column changes applied through [`super::update_league`]. `None` leaves a
/// column untouched; `Some(None)` clears a nullable one.
#[derive(Debug, Clone, Default)]
pub struct LeagueUpdate {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub social_plan: Option<Option<String>>,
    pub enterprise_tier: Option<Option<String>>,
    pub join_code: Option<String>,
    pub brand_logo_url: Option<Option<String>>,
    pub brand_primary_color: Option<Option<String>>,
    pub brand_secondary_color: Option<Option<String>>,
    pub social_links: Option<Option<String>>,
}
