//! Pre-tournament bracket picks: who a member expects to win each knockout match.

use std::collections::{HashMap, HashSet};

use sea_orm::ConnectionTrait;
use serde::Serialize;
use time::OffsetDateTime;
use tracing::info;

use super::tournaments::TournamentFixtures;
use crate::domain::lock::{bracket_deadline, is_bracket_locked};
use crate::domain::Stage;
use crate::errors::domain::{DomainError, ValidationKind};
use crate::repos::bracket_picks::{self, BracketPick};
use crate::repos::leagues;
use crate::repos::members::Membership;
use crate::repos::tournaments;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickInput {
    pub match_no: i32,
    pub team_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PickView {
    pub match_id: i64,
    pub match_no: i32,
    pub stage: Stage,
    pub team_id: i64,
    pub points: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MyBracket {
    #[serde(with = "time::serde::rfc3339::option")]
    pub deadline: Option<OffsetDateTime>,
    pub locked: bool,
    pub picks: Vec<PickView>,
}

/// Map picks by match number onto (match id, team id) pairs.
pub fn resolve_picks(
    loaded: &TournamentFixtures,
    picks: &[PickInput],
) -> Result<Vec<(i64, i64)>, DomainError> {
    let knockouts: HashMap<i32, i64> = loaded.knockouts().map(|f| (f.match_no, f.id)).collect();
    let teams: HashSet<i64> = loaded.teams.iter().map(|t| t.id).collect();
    let mut seen = HashSet::new();

    picks
        .iter()
        .map(|pick| {
            let match_id = *knockouts.get(&pick.match_no).ok_or_else(|| {
                DomainError::validation(
                    ValidationKind::InvalidBracketPick,
                    format!("Match {} is not a knockout match", pick.match_no),
                )
            })?;
            if !teams.contains(&pick.team_id) {
                return Err(DomainError::validation(
                    ValidationKind::InvalidBracketPick,
                    format!("Team {} is not in this tournament", pick.team_id),
                ));
            }
            if !seen.insert(pick.match_no) {
                return Err(DomainError::validation(
                    ValidationKind::InvalidBracketPick,
                    format!("Match {} is picked twice", pick.match_no),
                ));
            }
            Ok((match_id, pick.team_id))
        })
        .collect()
}

async fn load_for_member<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    member: &Membership,
) -> Result<(TournamentFixtures, Option<OffsetDateTime>), DomainError> {
    let league = leagues::require_league(conn, member.league_id).await?;
    let tournament = tournaments::require_tournament(conn, league.tournament_id).await?;
    let loaded = TournamentFixtures::load(conn, tournament.id).await?;
    let deadline = bracket_deadline(
        loaded.knockouts().map(|f| f.kickoff_at),
        tournament.prediction_lock_minutes,
    );
    Ok((loaded, deadline))
}

fn views(loaded: &TournamentFixtures, picks: Vec<BracketPick>) -> Vec<PickView> {
    let by_id: HashMap<i64, (i32, Stage)> = loaded
        .knockouts()
        .map(|f| (f.id, (f.match_no, f.stage)))
        .collect();
    let mut out: Vec<PickView> = picks
        .into_iter()
        .filter_map(|p| {
            let (match_no, stage) = *by_id.get(&p.match_id)?;
            Some(PickView {
                match_id: p.match_id,
                match_no,
                stage,
                team_id: p.team_id,
                points: p.points,
            })
        })
        .collect();
    out.sort_by_key(|p| p.match_no);
    out
}

pub struct BracketService;

impl BracketService {
    pub fn new() -> Self {
        Self
    }

    /// Replace the member's whole bracket.
    pub async fn replace<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        member: &Membership,
        picks: &[PickInput],
        now: OffsetDateTime,
    ) -> Result<MyBracket, DomainError> {
        let (loaded, deadline) = load_for_member(conn, member).await?;
        if is_bracket_locked(deadline, now) {
            return Err(DomainError::validation(
                ValidationKind::BracketLocked,
                "Bracket picks closed before the first knockout match",
            ));
        }
        let resolved = resolve_picks(&loaded, picks)?;
        let count = resolved.len();
        bracket_picks::replace_for_member(conn, member.id, resolved).await?;
        info!(member_id = member.id, picks = count, "Bracket saved");

        let stored = bracket_picks::list_for_member(conn, member.id).await?;
        Ok(MyBracket {
            deadline,
            locked: false,
            picks: views(&loaded, stored),
        })
    }

    pub async fn mine<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        member: &Membership,
        now: OffsetDateTime,
    ) -> Result<MyBracket, DomainError> {
        let (loaded, deadline) = load_for_member(conn, member).await?;
        let stored = bracket_picks::list_for_member(conn, member.id).await?;
        Ok(MyBracket {
            deadline,
            locked: is_bracket_locked(deadline, now),
            picks: views(&loaded, stored),
        })
    }
}

impl Default for BracketService {
    fn default() -> Self {
        Self::new()
    }
}
