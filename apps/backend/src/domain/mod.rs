//! Domain layer: pure prediction-pool logic with no HTTP or database types.

pub mod bracket;
pub mod branding;
pub mod fixtures;
pub mod joker;
pub mod leaderboard;
pub mod lock;
pub mod plans;
pub mod roles;
pub mod score;
pub mod scoring;
pub mod slots;
pub mod stage;
pub mod standings;

#[cfg(test)]
mod test_gens;
#[cfg(test)]
mod tests_bracket;
#[cfg(test)]
mod tests_props;
#[cfg(test)]
mod tests_scoring;
#[cfg(test)]
mod tests_standings;

pub use score::{MatchResult, MatchScore, Outcome, Side};
pub use stage::{JokerPhase, Stage};
