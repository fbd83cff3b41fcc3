pub mod bracket;
pub mod enterprise;
pub mod leaderboard;
pub mod leaderboard_cache;
pub mod leagues;
pub mod predictions;
pub mod results;
pub mod tournaments;
pub mod users;
