use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::db::txn::with_txn;
use crate::domain::Side;
use crate::error::AppError;
use crate::extractors::{parse_path_id, LeagueMember, ValidatedJson};
use crate::repos::predictions::Prediction;
use crate::services::predictions::{PredictionInput, PredictionService};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct PredictionRequest {
    pub home_goals: i32,
    pub away_goals: i32,
    #[serde(default)]
    pub advances: Option<Side>,
    #[serde(default)]
    pub joker: bool,
}

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub id: i64,
    pub match_id: i64,
    pub home_goals: u8,
    pub away_goals: u8,
    pub advances: Option<Side>,
    pub joker: bool,
    pub points: Option<i32>,
    pub exact_hit: bool,
    pub outcome_hit: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Prediction> for PredictionResponse {
    fn from(p: Prediction) -> Self {
        Self {
            id: p.id,
            match_id: p.match_id,
            home_goals: p.predicted.score.home,
            away_goals: p.predicted.score.away,
            advances: p.predicted.advances,
            joker: p.predicted.joker,
            points: p.points,
            exact_hit: p.exact_hit,
            outcome_hit: p.outcome_hit,
            updated_at: p.updated_at,
        }
    }
}

async fn upsert_prediction(
    req: HttpRequest,
    member: LeagueMember,
    body: ValidatedJson<PredictionRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let match_id = parse_path_id(&req, "match_id")?;
    let body = body.into_inner();
    let input = PredictionInput {
        home_goals: body.home_goals,
        away_goals: body.away_goals,
        advances: body.advances,
        joker: body.joker,
    };
    let actor = member.membership;
    let now = OffsetDateTime::now_utc();

    let saved = with_txn(Some(&req), &app_state, |txn| {
        Box::pin(async move {
            Ok(PredictionService::new()
                .upsert(txn, &actor, match_id, input, now)
                .await?)
        })
    })
    .await?;
    Ok(HttpResponse::Ok().json(PredictionResponse::from(saved)))
}

async fn my_predictions(
    req: HttpRequest,
    member: LeagueMember,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let actor = member.membership;
    let mine = with_txn(Some(&req), &app_state, |txn| {
        Box::pin(async move { Ok(PredictionService::new().list_mine(txn, &actor).await?) })
    })
    .await?;
    let body: Vec<PredictionResponse> = mine.into_iter().map(PredictionResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

async fn match_predictions(
    req: HttpRequest,
    member: LeagueMember,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let match_id = parse_path_id(&req, "match_id")?;
    let actor = member.membership;
    let now = OffsetDateTime::now_utc();

    let revealed = with_txn(Some(&req), &app_state, |txn| {
        Box::pin(async move {
            Ok(PredictionService::new()
                .list_for_match(txn, &actor, match_id, now)
                .await?)
        })
    })
    .await?;
    Ok(HttpResponse::Ok().json(revealed))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/leagues/{league_id}/predictions",
        web::get().to(my_predictions),
    )
    .route(
        "/leagues/{league_id}/predictions/{match_id}",
        web::put().to(upsert_prediction),
    )
    .route(
        "/leagues/{league_id}/matches/{match_id}/predictions",
        web::get().to(match_predictions),
    );
}
