//! Match predictions of a league member, including joker placement.

use std::collections::HashMap;

use sea_orm::ConnectionTrait;
use serde::Serialize;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::domain::joker::{plan_joker, JokerHolder, JokerPlan};
use crate::domain::lock::{is_locked, lock_at};
use crate::domain::scoring::PredictedScore;
use crate::domain::{MatchScore, Side};
use crate::errors::domain::{DomainError, NotFoundKind, ValidationKind};
use crate::repos::fixtures::{self, Fixture};
use crate::repos::leagues;
use crate::repos::members::{self, Membership};
use crate::repos::predictions::{self, Prediction};
use crate::repos::tournaments;
use crate::repos::users;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredictionInput {
    pub home_goals: i32,
    pub away_goals: i32,
    pub advances: Option<Side>,
    pub joker: bool,
}

/// Someone's prediction as shown once a match has locked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevealedPrediction {
    pub user_id: i64,
    pub display_name: String,
    pub home_goals: u8,
    pub away_goals: u8,
    pub advances: Option<Side>,
    pub joker: bool,
    pub points: Option<i32>,
}

/// `advances` only makes sense for a predicted knockout draw.
pub fn validate_prediction(
    fixture: &Fixture,
    input: PredictionInput,
) -> Result<PredictedScore, DomainError> {
    let score = MatchScore::new(input.home_goals, input.away_goals)?;
    let needs_advances = fixture.stage.is_knockout() && score.is_draw();
    match (needs_advances, input.advances) {
        (true, None) => Err(DomainError::validation(
            ValidationKind::InvalidAdvances,
            "A knockout draw needs the side that advances",
        )),
        (false, Some(_)) => Err(DomainError::validation(
            ValidationKind::InvalidAdvances,
            "advances is only accepted for a knockout draw",
        )),
        _ => Ok(PredictedScore {
            score,
            advances: input.advances,
            joker: input.joker,
        }),
    }
}

/// Match of the member's league, rejected when it belongs to another tournament.
async fn league_fixture<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    member: &Membership,
    match_id: i64,
) -> Result<(Fixture, i32), DomainError> {
    let league = leagues::require_league(conn, member.league_id).await?;
    let fixture = fixtures::require_fixture(conn, match_id).await?;
    if fixture.tournament_id != league.tournament_id {
        return Err(DomainError::not_found(
            NotFoundKind::Match,
            format!("Match {match_id} is not part of this league's tournament"),
        ));
    }
    let tournament = tournaments::require_tournament(conn, league.tournament_id).await?;
    Ok((fixture, tournament.prediction_lock_minutes))
}

pub struct PredictionService;

impl PredictionService {
    pub fn new() -> Self {
        Self
    }

    /// Create or replace the member's prediction on a match.
    pub async fn upsert<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        member: &Membership,
        match_id: i64,
        input: PredictionInput,
        now: OffsetDateTime,
    ) -> Result<Prediction, DomainError> {
        let (fixture, lock_minutes) = league_fixture(conn, member, match_id).await?;
        if !fixture.teams_known() {
            return Err(DomainError::validation(
                ValidationKind::TeamsUndecided,
                format!("Match {} has no teams yet", fixture.match_no),
            ));
        }
        if fixture.is_finished() || is_locked(fixture.kickoff_at, lock_minutes, now) {
            return Err(DomainError::validation(
                ValidationKind::PredictionLocked,
                format!("Predictions for match {} are closed", fixture.match_no),
            ));
        }
        let predicted = validate_prediction(&fixture, input)?;

        if predicted.joker {
            members::lock_membership(conn, member.id).await?;
            let phase = fixture.stage.joker_phase();
            let holder = predictions::jokers_in_phase(conn, member.id, phase)
                .await?
                .into_iter()
                .map(|(p, f)| JokerHolder {
                    prediction_id: p.id,
                    match_id: f.id,
                    locks_at: lock_at(f.kickoff_at, lock_minutes),
                })
                .min_by_key(|h| h.locks_at);

            match plan_joker(match_id, holder.as_ref(), now)? {
                JokerPlan::Keep | JokerPlan::Place => {}
                JokerPlan::Move { from_prediction } => {
                    predictions::clear_joker(conn, from_prediction).await?;
                    debug!(member_id = member.id, from_prediction, match_id, "Joker moved");
                }
            }
        }

        let saved = predictions::upsert(conn, member.id, match_id, predicted).await?;
        info!(
            member_id = member.id,
            match_id,
            joker = predicted.joker,
            "Prediction saved"
        );
        Ok(saved)
    }

    pub async fn list_mine<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        member: &Membership,
    ) -> Result<Vec<Prediction>, DomainError> {
        predictions::list_for_member(conn, member.id).await
    }

    /// Every member's prediction on a match, once it has locked.
    pub async fn list_for_match<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        member: &Membership,
        match_id: i64,
        now: OffsetDateTime,
    ) -> Result<Vec<RevealedPrediction>, DomainError> {
        let (fixture, lock_minutes) = league_fixture(conn, member, match_id).await?;
        if !is_locked(fixture.kickoff_at, lock_minutes, now) {
            return Err(DomainError::validation_other(
                "Predictions are revealed once the match locks",
            ));
        }

        let rows = predictions::list_for_league_match(conn, member.league_id, match_id).await?;
        let roster: HashMap<i64, i64> = members::list_members(conn, member.league_id)
            .await?
            .into_iter()
            .map(|m| (m.id, m.user_id))
            .collect();
        let user_ids = rows
            .iter()
            .filter_map(|p| roster.get(&p.member_id).copied())
            .collect();
        let names: HashMap<i64, String> = users::find_users_by_ids(conn, user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u.display_name()))
            .collect();

        let mut revealed: Vec<RevealedPrediction> = rows
            .into_iter()
            .filter_map(|p| {
                let user_id = *roster.get(&p.member_id)?;
                Some(RevealedPrediction {
                    user_id,
                    display_name: names
                        .get(&user_id)
                        .cloned()
                        .unwrap_or_else(|| format!("user-{user_id}")),
                    home_goals: p.predicted.score.home,
                    away_goals: p.predicted.score.away,
                    advances: p.predicted.advances,
                    joker: p.predicted.joker,
                    points: p.points,
                })
            })
            .collect();
        revealed.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        Ok(revealed)
    }
}

impl Default for PredictionService {
    fn default() -> Self {
        Self::new()
    }
}
