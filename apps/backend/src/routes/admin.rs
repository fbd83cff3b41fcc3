//! Site-admin surface: tournament setup and the result pipeline.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use tracing::info;

use crate::db::txn::with_txn;
use crate::domain::fixtures::{MatchSpec, TeamSpec};
use crate::domain::Side;
use crate::error::AppError;
use crate::extractors::{parse_path_id, SiteAdmin, ValidatedJson};
use crate::services::results::{ResultInput, ResultService};
use crate::services::tournaments::TournamentService;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateTournamentRequest {
    pub slug: String,
    pub name: String,
    pub prediction_lock_minutes: i32,
}

#[derive(Debug, Deserialize)]
pub struct ImportFixturesRequest {
    #[serde(default)]
    pub teams: Vec<TeamSpec>,
    #[serde(default)]
    pub matches: Vec<MatchSpec>,
}

#[derive(Debug, Deserialize)]
pub struct RecordResultRequest {
    pub home_goals: i32,
    pub away_goals: i32,
    #[serde(default)]
    pub penalty_winner: Option<Side>,
    /// Match version the admin last saw; omitted means last write wins.
    #[serde(default)]
    pub lock_version: Option<i32>,
}

async fn create_tournament(
    req: HttpRequest,
    admin: SiteAdmin,
    body: ValidatedJson<CreateTournamentRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let CreateTournamentRequest {
        slug,
        name,
        prediction_lock_minutes,
    } = body.into_inner();

    let tournament = with_txn(Some(&req), &app_state, |txn| {
        Box::pin(async move {
            Ok(TournamentService::new()
                .create(txn, &slug, &name, prediction_lock_minutes)
                .await?)
        })
    })
    .await?;

    info!(admin_id = admin.0.id, tournament_id = tournament.id, "Tournament created by admin");
    Ok(HttpResponse::Created().json(tournament))
}

async fn import_fixtures(
    req: HttpRequest,
    _admin: SiteAdmin,
    body: ValidatedJson<ImportFixturesRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let tournament_id = parse_path_id(&req, "tournament_id")?;
    let ImportFixturesRequest { teams, matches } = body.into_inner();

    let summary = with_txn(Some(&req), &app_state, |txn| {
        Box::pin(async move {
            Ok(TournamentService::new()
                .import_fixtures(txn, tournament_id, &teams, &matches)
                .await?)
        })
    })
    .await?;
    Ok(HttpResponse::Created().json(summary))
}

async fn record_result(
    req: HttpRequest,
    admin: SiteAdmin,
    body: ValidatedJson<RecordResultRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let match_id = parse_path_id(&req, "match_id")?;
    let body = body.into_inner();
    let input = ResultInput {
        home_goals: body.home_goals,
        away_goals: body.away_goals,
        penalty_winner: body.penalty_winner,
        expected_lock_version: body.lock_version,
    };

    let summary = with_txn(Some(&req), &app_state, |txn| {
        Box::pin(async move { Ok(ResultService::new().record_result(txn, match_id, input).await?) })
    })
    .await?;

    // After commit: readers must never cache totals from an uncommitted result.
    let epoch = app_state.leaderboards.bump_epoch();
    info!(
        admin_id = admin.0.id,
        match_id,
        epoch,
        predictions = summary.predictions_scored,
        slots = summary.slots_updated,
        "Result recorded"
    );
    Ok(HttpResponse::Ok().json(summary))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/tournaments", web::post().to(create_tournament))
            .route(
                "/tournaments/{tournament_id}/fixtures",
                web::post().to(import_fixtures),
            )
            .route("/matches/{match_id}/result", web::put().to(record_result)),
    );
}
