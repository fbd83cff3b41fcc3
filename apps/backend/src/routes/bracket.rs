use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::extractors::{LeagueMember, ValidatedJson};
use crate::services::bracket::{BracketService, PickInput};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct PickRequest {
    pub match_no: i32,
    pub team_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct BracketRequest {
    pub picks: Vec<PickRequest>,
}

async fn replace_bracket(
    req: HttpRequest,
    member: LeagueMember,
    body: ValidatedJson<BracketRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let picks: Vec<PickInput> = body
        .into_inner()
        .picks
        .into_iter()
        .map(|p| PickInput {
            match_no: p.match_no,
            team_id: p.team_id,
        })
        .collect();
    let actor = member.membership;
    let now = OffsetDateTime::now_utc();

    let bracket = with_txn(Some(&req), &app_state, |txn| {
        Box::pin(async move { Ok(BracketService::new().replace(txn, &actor, &picks, now).await?) })
    })
    .await?;
    Ok(HttpResponse::Ok().json(bracket))
}

async fn my_bracket(
    req: HttpRequest,
    member: LeagueMember,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let actor = member.membership;
    let now = OffsetDateTime::now_utc();
    let bracket = with_txn(Some(&req), &app_state, |txn| {
        Box::pin(async move { Ok(BracketService::new().mine(txn, &actor, now).await?) })
    })
    .await?;
    Ok(HttpResponse::Ok().json(bracket))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/leagues/{league_id}/bracket", web::put().to(replace_bracket))
        .route("/leagues/{league_id}/bracket", web::get().to(my_bracket));
}
