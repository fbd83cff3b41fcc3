use std::collections::BTreeMap;

use actix_web::http::header::ETAG;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;

use crate::db::txn::with_txn;
use crate::domain::branding::SocialNetwork;
use crate::domain::plans::{EnterpriseTier, LeagueKind, LeaguePlan, PlanFeatures, SocialPlan};
use crate::domain::roles::LeagueRole;
use crate::error::AppError;
use crate::extractors::{parse_path_id, CurrentUser, LeagueMember, ValidatedJson};
use crate::http::etag::{league_etag, require_if_match};
use crate::repos::leagues::{self, Branding, League};
use crate::repos::members::Membership;
use crate::services::leagues::{CreateLeague, LeagueService};
use crate::state::app_state::AppState;

/// League as returned to members. Only ADMIN+ see the join code.
#[derive(Debug, Clone, Serialize)]
pub struct LeagueResponse {
    pub id: i64,
    pub tournament_id: i64,
    pub owner_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub kind: LeagueKind,
    pub social_plan: Option<SocialPlan>,
    pub enterprise_tier: Option<EnterpriseTier>,
    pub features: PlanFeatures,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub join_code: Option<String>,
    pub branding: Branding,
    pub social_links: BTreeMap<SocialNetwork, String>,
    pub lock_version: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub my_role: LeagueRole,
}

impl LeagueResponse {
    pub fn new(league: League, role: LeagueRole) -> Self {
        let join_code = role.at_least(LeagueRole::Admin).then_some(league.join_code);
        Self {
            id: league.id,
            tournament_id: league.tournament_id,
            owner_id: league.owner_id,
            name: league.name,
            description: league.description,
            kind: league.plan.kind(),
            social_plan: league.plan.social_plan(),
            enterprise_tier: league.plan.enterprise_tier(),
            features: league.plan.features(),
            join_code,
            branding: league.branding,
            social_links: league.social_links,
            lock_version: league.lock_version,
            created_at: league.created_at,
            my_role: role,
        }
    }
}

/// 200 with the league body and its current ETag.
pub fn league_ok(league: League, role: LeagueRole) -> HttpResponse {
    let etag = league_etag(league.id, league.lock_version);
    HttpResponse::Ok()
        .insert_header((ETAG, etag))
        .json(LeagueResponse::new(league, role))
}

#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    pub kind: String,
    #[serde(default)]
    pub social_plan: Option<String>,
    #[serde(default)]
    pub enterprise_tier: Option<String>,
}

impl PlanRequest {
    fn into_plan(self) -> Result<LeaguePlan, AppError> {
        let kind: LeagueKind = self.kind.parse()?;
        Ok(LeaguePlan::from_parts(
            kind,
            self.social_plan.as_deref(),
            self.enterprise_tier.as_deref(),
        )?)
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateLeagueRequest {
    pub tournament_id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub plan: PlanRequest,
}

/// Absent field stays `None`; explicit `null` becomes `Some(None)`.
fn double_option<'de, D, T>(d: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(d).map(Some)
}

#[derive(Debug, Deserialize)]
pub struct UpdateLeagueRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
}

#[derive(Debug, Deserialize)]
pub struct JoinRequest {
    pub join_code: String,
}

#[derive(Debug, Deserialize)]
pub struct RoleRequest {
    pub role: String,
}

#[derive(Debug, Serialize)]
struct MembershipResponse {
    membership: Membership,
}

async fn create_league(
    req: HttpRequest,
    user: CurrentUser,
    body: ValidatedJson<CreateLeagueRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let create = CreateLeague {
        tournament_id: body.tournament_id,
        name: body.name,
        description: body.description,
        plan: body.plan.into_plan()?,
    };
    let owner_id = user.id;

    let (league, membership) = with_txn(Some(&req), &app_state, |txn| {
        Box::pin(async move { Ok(LeagueService::new().create(txn, owner_id, create).await?) })
    })
    .await?;

    let etag = league_etag(league.id, league.lock_version);
    Ok(HttpResponse::Created()
        .insert_header((ETAG, etag))
        .json(LeagueResponse::new(league, membership.role)))
}

async fn list_leagues(
    req: HttpRequest,
    user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user_id = user.id;
    let mine = with_txn(Some(&req), &app_state, |txn| {
        Box::pin(async move { Ok(LeagueService::new().list_mine(txn, user_id).await?) })
    })
    .await?;

    let body: Vec<LeagueResponse> = mine
        .into_iter()
        .map(|(league, m)| LeagueResponse::new(league, m.role))
        .collect();
    Ok(HttpResponse::Ok().json(body))
}

async fn get_league(
    req: HttpRequest,
    member: LeagueMember,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let league_id = member.membership.league_id;
    let league = with_txn(Some(&req), &app_state, |txn| {
        Box::pin(async move { Ok(leagues::require_league(txn, league_id).await?) })
    })
    .await?;
    Ok(league_ok(league, member.membership.role))
}

async fn update_league(
    req: HttpRequest,
    member: LeagueMember,
    body: ValidatedJson<UpdateLeagueRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let expected = require_if_match(&req, member.membership.league_id)?;
    let UpdateLeagueRequest { name, description } = body.into_inner();
    let actor = member.membership.clone();

    let league = with_txn(Some(&req), &app_state, |txn| {
        Box::pin(async move {
            Ok(LeagueService::new()
                .update_details(txn, &actor, expected, name, description)
                .await?)
        })
    })
    .await?;
    Ok(league_ok(league, member.membership.role))
}

async fn join_league(
    req: HttpRequest,
    user: CurrentUser,
    body: ValidatedJson<JoinRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let code = body.into_inner().join_code;
    let user_id = user.id;

    let joined = with_txn(Some(&req), &app_state, |txn| {
        Box::pin(async move { Ok(LeagueService::new().join(txn, user_id, &code).await?) })
    })
    .await?;

    if joined.created {
        app_state.leaderboards.invalidate_league(joined.league.id);
    }
    let role = joined.membership.role;
    let mut resp = if joined.created {
        HttpResponse::Created()
    } else {
        HttpResponse::Ok()
    };
    Ok(resp.json(LeagueResponse::new(joined.league, role)))
}

async fn leave_league(
    req: HttpRequest,
    member: LeagueMember,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let actor = member.membership.clone();
    with_txn(Some(&req), &app_state, |txn| {
        Box::pin(async move { Ok(LeagueService::new().leave(txn, &actor).await?) })
    })
    .await?;

    app_state
        .leaderboards
        .invalidate_league(member.membership.league_id);
    Ok(HttpResponse::NoContent().finish())
}

async fn remove_member(
    req: HttpRequest,
    member: LeagueMember,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let target = parse_path_id(&req, "user_id")?;
    let actor = member.membership.clone();
    with_txn(Some(&req), &app_state, |txn| {
        Box::pin(async move { Ok(LeagueService::new().remove_member(txn, &actor, target).await?) })
    })
    .await?;

    app_state
        .leaderboards
        .invalidate_league(member.membership.league_id);
    Ok(HttpResponse::NoContent().finish())
}

async fn set_role(
    req: HttpRequest,
    member: LeagueMember,
    body: ValidatedJson<RoleRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let target = parse_path_id(&req, "user_id")?;
    let role: LeagueRole = body.into_inner().role.parse()?;
    let actor = member.membership;

    let membership = with_txn(Some(&req), &app_state, |txn| {
        Box::pin(async move { Ok(LeagueService::new().set_role(txn, &actor, target, role).await?) })
    })
    .await?;
    Ok(HttpResponse::Ok().json(MembershipResponse { membership }))
}

async fn regenerate_join_code(
    req: HttpRequest,
    member: LeagueMember,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let actor = member.membership.clone();
    let league = with_txn(Some(&req), &app_state, |txn| {
        Box::pin(async move { Ok(LeagueService::new().regenerate_join_code(txn, &actor).await?) })
    })
    .await?;
    Ok(league_ok(league, member.membership.role))
}

async fn change_plan(
    req: HttpRequest,
    member: LeagueMember,
    body: ValidatedJson<PlanRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let plan = body.into_inner().into_plan()?;
    let actor = member.membership.clone();
    let league = with_txn(Some(&req), &app_state, |txn| {
        Box::pin(async move { Ok(LeagueService::new().change_plan(txn, &actor, plan).await?) })
    })
    .await?;
    Ok(league_ok(league, member.membership.role))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // Flat routes: other modules also register paths under /leagues/{league_id}.
    cfg.route("/leagues", web::post().to(create_league))
        .route("/leagues", web::get().to(list_leagues))
        .route("/leagues/join", web::post().to(join_league))
        .route("/leagues/{league_id}", web::get().to(get_league))
        .route("/leagues/{league_id}", web::patch().to(update_league))
        .route("/leagues/{league_id}/leave", web::post().to(leave_league))
        .route(
            "/leagues/{league_id}/members/{user_id}",
            web::delete().to(remove_member),
        )
        .route(
            "/leagues/{league_id}/members/{user_id}/role",
            web::put().to(set_role),
        )
        .route(
            "/leagues/{league_id}/join-code/regenerate",
            web::post().to(regenerate_join_code),
        )
        .route("/leagues/{league_id}/plan", web::put().to(change_plan));
}
