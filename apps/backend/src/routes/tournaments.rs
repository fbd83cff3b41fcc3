use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::db::txn::with_txn;
use crate::domain::{MatchResult, Side, Stage};
use crate::error::AppError;
use crate::extractors::{parse_path_id, CurrentUser};
use crate::repos::fixtures::{self, Fixture};
use crate::repos::tournaments::{self, Team, Tournament};
use crate::services::tournaments::{GroupStanding, TournamentService};
use crate::state::app_state::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct ResultResponse {
    pub home_goals: u8,
    pub away_goals: u8,
    pub penalty_winner: Option<Side>,
    pub winner: Option<Side>,
}

impl From<MatchResult> for ResultResponse {
    fn from(r: MatchResult) -> Self {
        Self {
            home_goals: r.score.home,
            away_goals: r.score.away,
            penalty_winner: r.penalty_winner,
            winner: r.winner_side(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FixtureResponse {
    pub id: i64,
    pub tournament_id: i64,
    pub match_no: i32,
    pub stage: Stage,
    pub group: Option<char>,
    pub home_slot: Option<String>,
    pub away_slot: Option<String>,
    pub home_team_id: Option<i64>,
    pub away_team_id: Option<i64>,
    #[serde(with = "time::serde::rfc3339")]
    pub kickoff_at: OffsetDateTime,
    pub result: Option<ResultResponse>,
    pub lock_version: i32,
}

impl From<Fixture> for FixtureResponse {
    fn from(f: Fixture) -> Self {
        Self {
            id: f.id,
            tournament_id: f.tournament_id,
            match_no: f.match_no,
            stage: f.stage,
            group: f.group,
            home_slot: f.home_slot,
            away_slot: f.away_slot,
            home_team_id: f.home_team_id,
            away_team_id: f.away_team_id,
            kickoff_at: f.kickoff_at,
            result: f.result.map(ResultResponse::from),
            lock_version: f.lock_version,
        }
    }
}

#[derive(Debug, Serialize)]
struct TournamentDetail {
    #[serde(flatten)]
    tournament: Tournament,
    teams: Vec<Team>,
}

#[derive(Debug, Serialize)]
struct BracketResponse {
    tournament_id: i64,
    teams: Vec<Team>,
    matches: Vec<FixtureResponse>,
}

#[derive(Debug, Deserialize)]
struct MatchesQuery {
    stage: Option<String>,
}

async fn list_tournaments(
    req: HttpRequest,
    _user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let list = with_txn(Some(&req), &app_state, |txn| {
        Box::pin(async move { Ok(tournaments::list_tournaments(txn).await?) })
    })
    .await?;
    Ok(HttpResponse::Ok().json(list))
}

async fn get_tournament(
    req: HttpRequest,
    _user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = parse_path_id(&req, "tournament_id")?;
    let detail = with_txn(Some(&req), &app_state, |txn| {
        Box::pin(async move {
            let tournament = tournaments::require_tournament(txn, id).await?;
            let teams = tournaments::list_teams(txn, id).await?;
            Ok(TournamentDetail { tournament, teams })
        })
    })
    .await?;
    Ok(HttpResponse::Ok().json(detail))
}

async fn list_matches(
    req: HttpRequest,
    _user: CurrentUser,
    query: web::Query<MatchesQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = parse_path_id(&req, "tournament_id")?;
    let stage = query
        .into_inner()
        .stage
        .map(|raw| raw.parse::<Stage>())
        .transpose()?;

    let matches = with_txn(Some(&req), &app_state, |txn| {
        Box::pin(async move {
            tournaments::require_tournament(txn, id).await?;
            Ok(fixtures::list_fixtures(txn, id, stage).await?)
        })
    })
    .await?;
    let body: Vec<FixtureResponse> = matches.into_iter().map(FixtureResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

async fn standings(
    req: HttpRequest,
    _user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = parse_path_id(&req, "tournament_id")?;
    let tables: Vec<GroupStanding> = with_txn(Some(&req), &app_state, |txn| {
        Box::pin(async move { Ok(TournamentService::new().standings(txn, id).await?) })
    })
    .await?;
    Ok(HttpResponse::Ok().json(tables))
}

async fn bracket(
    req: HttpRequest,
    _user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = parse_path_id(&req, "tournament_id")?;
    let loaded = with_txn(Some(&req), &app_state, |txn| {
        Box::pin(async move { Ok(TournamentService::new().bracket(txn, id).await?) })
    })
    .await?;
    Ok(HttpResponse::Ok().json(BracketResponse {
        tournament_id: id,
        teams: loaded.teams,
        matches: loaded.fixtures.into_iter().map(FixtureResponse::from).collect(),
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/tournaments")
            .route("", web::get().to(list_tournaments))
            .route("/{tournament_id}", web::get().to(get_tournament))
            .route("/{tournament_id}/matches", web::get().to(list_matches))
            .route("/{tournament_id}/standings", web::get().to(standings))
            .route("/{tournament_id}/bracket", web::get().to(bracket)),
    );
}
