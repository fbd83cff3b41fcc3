//! Match (fixture) repository functions.

use sea_orm::ConnectionTrait;

use super::corrupt_row;
use crate::adapters::matches_sea as matches_adapter;
use crate::domain::{MatchResult, MatchScore, Side, Stage};
use crate::entities::matches::{self, MatchStatus};
use crate::errors::domain::{DomainError, NotFoundKind};

/// A tournament match with its parsed stage and result.
#[derive(Debug, Clone, PartialEq)]
pub struct Fixture {
    pub id: i64,
    pub tournament_id: i64,
    pub match_no: i32,
    pub stage: Stage,
    pub group: Option<char>,
    pub home_slot: Option<String>,
    pub away_slot: Option<String>,
    pub home_team_id: Option<i64>,
    pub away_team_id: Option<i64>,
    pub kickoff_at: time::OffsetDateTime,
    pub result: Option<MatchResult>,
    pub lock_version: i32,
}

impl Fixture {
    pub fn is_finished(&self) -> bool {
        self.result.is_some()
    }

    pub fn teams_known(&self) -> bool {
        self.home_team_id.is_some() && self.away_team_id.is_some()
    }

    pub fn team(&self, side: Side) -> Option<i64> {
        match side {
            Side::Home => self.home_team_id,
            Side::Away => self.away_team_id,
        }
    }

    /// Team that advanced, once a result is in.
    pub fn winner_team(&self) -> Option<i64> {
        self.result
            .and_then(|r| r.winner_side())
            .and_then(|side| self.team(side))
    }
}

#[derive(Debug, Clone)]
pub struct NewFixture {
    pub tournament_id: i64,
    pub match_no: i32,
    pub stage: Stage,
    pub group: Option<char>,
    pub home_slot: Option<String>,
    pub away_slot: Option<String>,
    pub home_team_id: Option<i64>,
    pub away_team_id: Option<i64>,
    pub kickoff_at: time::OffsetDateTime,
}

pub async fn create_fixture<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    fixture: NewFixture,
) -> Result<Fixture, DomainError> {
    let dto = matches_adapter::MatchCreate {
        tournament_id: fixture.tournament_id,
        match_no: fixture.match_no,
        stage: fixture.stage.as_str().to_string(),
        group_code: fixture.group.map(String::from),
        home_slot: fixture.home_slot,
        away_slot: fixture.away_slot,
        home_team_id: fixture.home_team_id,
        away_team_id: fixture.away_team_id,
        kickoff_at: fixture.kickoff_at,
    };
    let model = matches_adapter::create_match(conn, dto).await?;
    Fixture::try_from(model)
}

pub async fn find_fixture<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
) -> Result<Option<Fixture>, DomainError> {
    matches_adapter::find_by_id(conn, match_id)
        .await?
        .map(Fixture::try_from)
        .transpose()
}

pub async fn require_fixture<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
) -> Result<Fixture, DomainError> {
    find_fixture(conn, match_id).await?.ok_or_else(|| {
        DomainError::not_found(NotFoundKind::Match, format!("Match {match_id} not found"))
    })
}

pub async fn list_fixtures<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    tournament_id: i64,
    stage: Option<Stage>,
) -> Result<Vec<Fixture>, DomainError> {
    let models =
        matches_adapter::list_for_tournament(conn, tournament_id, stage.map(|s| s.as_str()))
            .await?;
    models.into_iter().map(Fixture::try_from).collect()
}

pub async fn list_fixtures_by_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_ids: Vec<i64>,
) -> Result<Vec<Fixture>, DomainError> {
    let models = matches_adapter::list_by_ids(conn, match_ids).await?;
    models.into_iter().map(Fixture::try_from).collect()
}

/// Persist `result` if the match is still at `expected_lock_version`.
pub async fn record_result<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
    result: MatchResult,
    expected_lock_version: i32,
) -> Result<Fixture, DomainError> {
    let dto = matches_adapter::MatchResultUpdate {
        id: match_id,
        home_goals: i16::from(result.score.home),
        away_goals: i16::from(result.score.away),
        penalty_winner: result.penalty_winner.map(|s| s.as_str().to_string()),
        current_lock_version: expected_lock_version,
    };
    let model = matches_adapter::record_result(conn, dto).await?;
    Fixture::try_from(model)
}

pub async fn set_slot_teams<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
    home_team_id: Option<i64>,
    away_team_id: Option<i64>,
) -> Result<(), DomainError> {
    matches_adapter::set_slot_teams(conn, match_id, home_team_id, away_team_id).await?;
    Ok(())
}

fn parse_result(model: &matches::Model, stage: Stage) -> Result<Option<MatchResult>, DomainError> {
    if model.status != MatchStatus::Finished {
        return Ok(None);
    }
    let (Some(home), Some(away)) = (model.home_goals, model.away_goals) else {
        return Ok(None);
    };
    let score = MatchScore::new(i32::from(home), i32::from(away))?;
    let penalty_winner = model
        .penalty_winner
        .as_deref()
        .map(str::parse::<Side>)
        .transpose()?;
    MatchResult::new(score, penalty_winner, stage).map(Some)
}

impl TryFrom<matches::Model> for Fixture {
    type Error = DomainError;

    fn try_from(model: matches::Model) -> Result<Self, Self::Error> {
        let stage: Stage = model
            .stage
            .parse()
            .map_err(|e| corrupt_row("matches", model.id, e))?;
        let result = parse_result(&model, stage).map_err(|e| corrupt_row("matches", model.id, e))?;

        Ok(Self {
            id: model.id,
            tournament_id: model.tournament_id,
            match_no: model.match_no,
            stage,
            group: model.group_code.and_then(|g| g.chars().next()),
            home_slot: model.home_slot,
            away_slot: model.away_slot,
            home_team_id: model.home_team_id,
            away_team_id: model.away_team_id,
            kickoff_at: model.kickoff_at,
            result,
            lock_version: model.lock_version,
        })
    }
}
