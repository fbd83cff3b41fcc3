use actix_web::{web, HttpRequest, HttpResponse};
use serde::Serialize;

use crate::db::txn::with_txn;
use crate::domain::leaderboard::LeaderboardEntry;
use crate::error::AppError;
use crate::extractors::LeagueMember;
use crate::services::leaderboard::LeaderboardService;
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
struct LeaderboardResponse {
    league_id: i64,
    /// Cache epoch the numbers were computed under.
    epoch: u64,
    entries: Vec<LeaderboardEntry>,
}

async fn leaderboard(
    req: HttpRequest,
    member: LeagueMember,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let actor = member.membership;
    let league_id = actor.league_id;
    let cache = app_state.leaderboards.clone();

    let board = with_txn(Some(&req), &app_state, |txn| {
        Box::pin(async move {
            Ok(LeaderboardService::new()
                .members(txn, &cache, &actor)
                .await?)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(LeaderboardResponse {
        league_id,
        epoch: board.epoch,
        entries: board.entries.clone(),
    }))
}

async fn departments(
    req: HttpRequest,
    member: LeagueMember,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let actor = member.membership;
    let cache = app_state.leaderboards.clone();

    let ranked = with_txn(Some(&req), &app_state, |txn| {
        Box::pin(async move {
            Ok(LeaderboardService::new()
                .departments(txn, &cache, &actor)
                .await?)
        })
    })
    .await?;
    Ok(HttpResponse::Ok().json(ranked))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/leagues/{league_id}/leaderboard", web::get().to(leaderboard))
        .route(
            "/leagues/{league_id}/leaderboard/departments",
            web::get().to(departments),
        );
}
