//! Adapters for external dependencies.

pub mod ads_sea;
pub mod bracket_picks_sea;
pub mod departments_sea;
pub mod leagues_sea;
pub mod matches_sea;
pub mod members_sea;
pub mod predictions_sea;
pub mod tournaments_sea;
pub mod users_sea;
