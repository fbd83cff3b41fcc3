//! Plan-gated league extras: branding, social links, departments and ads.

use std::collections::BTreeMap;

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;

use super::leagues::league_ok;
use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::extractors::{parse_path_id, LeagueMember, ValidatedJson};
use crate::services::enterprise::{AdInput, BrandingInput, EnterpriseService};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct BrandingRequest {
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub primary_color: Option<String>,
    #[serde(default)]
    pub secondary_color: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SocialLinksRequest {
    pub links: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct DepartmentRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AssignDepartmentRequest {
    pub department_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct AdRequest {
    pub title: String,
    pub image_url: String,
    pub target_url: String,
    #[serde(default)]
    pub placement: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

async fn set_branding(
    req: HttpRequest,
    member: LeagueMember,
    body: ValidatedJson<BrandingRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let input = BrandingInput {
        logo_url: body.logo_url,
        primary_color: body.primary_color,
        secondary_color: body.secondary_color,
    };
    let actor = member.membership.clone();

    let league = with_txn(Some(&req), &app_state, |txn| {
        Box::pin(async move { Ok(EnterpriseService::new().set_branding(txn, &actor, input).await?) })
    })
    .await?;
    Ok(league_ok(league, member.membership.role))
}

async fn set_social_links(
    req: HttpRequest,
    member: LeagueMember,
    body: ValidatedJson<SocialLinksRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let links = body.into_inner().links;
    let actor = member.membership.clone();

    let league = with_txn(Some(&req), &app_state, |txn| {
        Box::pin(async move {
            Ok(EnterpriseService::new()
                .set_social_links(txn, &actor, &links)
                .await?)
        })
    })
    .await?;
    Ok(league_ok(league, member.membership.role))
}

async fn create_department(
    req: HttpRequest,
    member: LeagueMember,
    body: ValidatedJson<DepartmentRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let name = body.into_inner().name;
    let actor = member.membership;

    let department = with_txn(Some(&req), &app_state, |txn| {
        Box::pin(async move {
            Ok(EnterpriseService::new()
                .create_department(txn, &actor, &name)
                .await?)
        })
    })
    .await?;
    Ok(HttpResponse::Created().json(department))
}

async fn list_departments(
    req: HttpRequest,
    member: LeagueMember,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let actor = member.membership;
    let list = with_txn(Some(&req), &app_state, |txn| {
        Box::pin(async move { Ok(EnterpriseService::new().list_departments(txn, &actor).await?) })
    })
    .await?;
    Ok(HttpResponse::Ok().json(list))
}

async fn assign_department(
    req: HttpRequest,
    member: LeagueMember,
    body: ValidatedJson<AssignDepartmentRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let target = parse_path_id(&req, "user_id")?;
    let department_id = body.into_inner().department_id;
    let actor = member.membership;
    let league_id = actor.league_id;

    let membership = with_txn(Some(&req), &app_state, |txn| {
        Box::pin(async move {
            Ok(EnterpriseService::new()
                .assign_department(txn, &actor, target, department_id)
                .await?)
        })
    })
    .await?;

    app_state.leaderboards.invalidate_league(league_id);
    Ok(HttpResponse::Ok().json(membership))
}

async fn create_ad(
    req: HttpRequest,
    member: LeagueMember,
    body: ValidatedJson<AdRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let input = AdInput {
        title: body.title,
        image_url: body.image_url,
        target_url: body.target_url,
        placement: body.placement,
        active: body.active,
    };
    let actor = member.membership;

    let ad = with_txn(Some(&req), &app_state, |txn| {
        Box::pin(async move { Ok(EnterpriseService::new().create_ad(txn, &actor, input).await?) })
    })
    .await?;
    Ok(HttpResponse::Created().json(ad))
}

async fn list_ads(
    req: HttpRequest,
    member: LeagueMember,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let actor = member.membership;
    let ads = with_txn(Some(&req), &app_state, |txn| {
        Box::pin(async move { Ok(EnterpriseService::new().list_ads(txn, &actor).await?) })
    })
    .await?;
    Ok(HttpResponse::Ok().json(ads))
}

async fn delete_ad(
    req: HttpRequest,
    member: LeagueMember,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let ad_id = parse_path_id(&req, "ad_id")?;
    let actor = member.membership;
    with_txn(Some(&req), &app_state, |txn| {
        Box::pin(async move { Ok(EnterpriseService::new().delete_ad(txn, &actor, ad_id).await?) })
    })
    .await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/leagues/{league_id}/branding", web::put().to(set_branding))
        .route(
            "/leagues/{league_id}/social-links",
            web::put().to(set_social_links),
        )
        .route(
            "/leagues/{league_id}/departments",
            web::post().to(create_department),
        )
        .route(
            "/leagues/{league_id}/departments",
            web::get().to(list_departments),
        )
        .route(
            "/leagues/{league_id}/members/{user_id}/department",
            web::put().to(assign_department),
        )
        .route("/leagues/{league_id}/ads", web::post().to(create_ad))
        .route("/leagues/{league_id}/ads", web::get().to(list_ads))
        .route("/leagues/{league_id}/ads/{ad_id}", web::delete().to(delete_ad));
}
