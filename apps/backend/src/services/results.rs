//! Result pipeline: store a match result and bring every derived number up to
//! date inside the caller's transaction.
//!
//! 1. validate and store the result (optimistic lock on the match)
//! 2. re-score every prediction on the match
//! 3. re-resolve the knockout bracket and write changed slot teams
//! 4. re-score bracket picks on every knockout match
//!
//! The caller bumps the leaderboard cache epoch after commit.

use std::collections::HashMap;

use sea_orm::ConnectionTrait;
use serde::Serialize;
use tracing::{debug, info};

use super::tournaments::TournamentFixtures;
use crate::domain::bracket::resolve;
use crate::domain::scoring::{bracket_pick_points, score_prediction, ScoringRules};
use crate::domain::{MatchResult, MatchScore, Side};
use crate::errors::domain::{DomainError, ValidationKind};
use crate::repos::bracket_picks;
use crate::repos::fixtures::{self, Fixture};
use crate::repos::predictions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultInput {
    pub home_goals: i32,
    pub away_goals: i32,
    pub penalty_winner: Option<Side>,
    /// Version the caller last saw; `None` takes whatever is stored.
    pub expected_lock_version: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResultSummary {
    pub match_id: i64,
    pub lock_version: i32,
    pub predictions_scored: usize,
    pub slots_updated: usize,
    pub bracket_picks_scored: usize,
}

/// Result pipeline service.
pub struct ResultService {
    rules: ScoringRules,
}

impl ResultService {
    pub fn new() -> Self {
        Self {
            rules: ScoringRules::default(),
        }
    }

    pub fn with_rules(rules: ScoringRules) -> Self {
        Self { rules }
    }

    pub async fn record_result<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        match_id: i64,
        input: ResultInput,
    ) -> Result<ResultSummary, DomainError> {
        let fixture = fixtures::require_fixture(conn, match_id).await?;
        if !fixture.teams_known() {
            return Err(DomainError::validation(
                ValidationKind::TeamsUndecided,
                format!("Match {} has no teams yet", fixture.match_no),
            ));
        }

        let score = MatchScore::new(input.home_goals, input.away_goals)?;
        let result = MatchResult::new(score, input.penalty_winner, fixture.stage)?;
        let expected = input
            .expected_lock_version
            .unwrap_or(fixture.lock_version);
        let stored = fixtures::record_result(conn, match_id, result, expected).await?;

        let predictions_scored = self.rescore_predictions(conn, &stored, &result).await?;
        let bracket = TournamentFixtures::load(conn, stored.tournament_id).await?;
        let (bracket, slots_updated) = propagate_bracket(conn, bracket).await?;
        let bracket_picks_scored = score_bracket_picks(conn, &bracket).await?;

        let summary = ResultSummary {
            match_id,
            lock_version: stored.lock_version,
            predictions_scored,
            slots_updated,
            bracket_picks_scored,
        };
        info!(
            match_id,
            match_no = stored.match_no,
            home = score.home,
            away = score.away,
            predictions = summary.predictions_scored,
            slots = summary.slots_updated,
            picks = summary.bracket_picks_scored,
            "Match result recorded"
        );
        Ok(summary)
    }

    async fn rescore_predictions<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        fixture: &Fixture,
        result: &MatchResult,
    ) -> Result<usize, DomainError> {
        let stored = predictions::list_for_match(conn, fixture.id).await?;
        for prediction in &stored {
            let points = score_prediction(&self.rules, fixture.stage, &prediction.predicted, result);
            predictions::set_score(conn, prediction.id, Some(points)).await?;
        }
        Ok(stored.len())
    }
}

impl Default for ResultService {
    fn default() -> Self {
        Self::new()
    }
}

/// Re-resolve every knockout slot and write the ones that changed. Returns the
/// fixtures with the new teams applied.
async fn propagate_bracket<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    mut bracket: TournamentFixtures,
) -> Result<(TournamentFixtures, usize), DomainError> {
    let input = bracket.bracket_input()?;
    if input.knockouts.is_empty() {
        return Ok((bracket, 0));
    }

    let mut resolved: HashMap<i32, (Option<i64>, Option<i64>)> = HashMap::new();
    for slot in resolve(&input) {
        let entry = resolved.entry(slot.match_no).or_default();
        match slot.side {
            Side::Home => entry.0 = slot.team_id,
            Side::Away => entry.1 = slot.team_id,
        }
    }

    let mut updated = 0;
    for fixture in bracket.fixtures.iter_mut().filter(|f| f.stage.is_knockout()) {
        let Some(&(home, away)) = resolved.get(&fixture.match_no) else {
            continue;
        };
        if (fixture.home_team_id, fixture.away_team_id) != (home, away) {
            debug!(
                match_no = fixture.match_no,
                ?home,
                ?away,
                "Knockout slot teams changed"
            );
            fixtures::set_slot_teams(conn, fixture.id, home, away).await?;
            fixture.home_team_id = home;
            fixture.away_team_id = away;
            updated += 1;
        }
    }
    Ok((bracket, updated))
}

/// Points for every pick on a knockout match: stage points when the picked
/// team won it, zero when it didn't, `None` while undecided.
async fn score_bracket_picks<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    bracket: &TournamentFixtures,
) -> Result<usize, DomainError> {
    let knockouts: HashMap<i64, &Fixture> = bracket.knockouts().map(|f| (f.id, f)).collect();
    if knockouts.is_empty() {
        return Ok(0);
    }

    let picks = bracket_picks::list_for_matches(conn, knockouts.keys().copied().collect()).await?;
    let mut changed = 0;
    for pick in picks {
        let Some(fixture) = knockouts.get(&pick.match_id) else {
            continue;
        };
        let points = fixture.winner_team().map(|winner| {
            if winner == pick.team_id {
                bracket_pick_points(fixture.stage)
            } else {
                0
            }
        });
        if points != pick.points {
            bracket_picks::set_points(conn, pick.id, points).await?;
            changed += 1;
        }
    }
    Ok(changed)
}
