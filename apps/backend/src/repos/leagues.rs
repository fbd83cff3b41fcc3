//! League repository functions for domain layer.

use std::collections::BTreeMap;

use sea_orm::ConnectionTrait;
use serde::Serialize;

use super::corrupt_row;
use crate::adapters::leagues_sea as leagues_adapter;
use crate::domain::branding::SocialNetwork;
use crate::domain::plans::{LeagueKind, LeaguePlan};
use crate::entities::leagues;
use crate::errors::domain::{DomainError, InfraErrorKind, NotFoundKind};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Branding {
    pub logo_url: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
}

/// League domain model
#[derive(Debug, Clone, PartialEq)]
pub struct League {
    pub id: i64,
    pub tournament_id: i64,
    pub owner_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub plan: LeaguePlan,
    pub join_code: String,
    pub branding: Branding,
    pub social_links: BTreeMap<SocialNetwork, String>,
    pub lock_version: i32,
    pub created_at: time::OffsetDateTime,
    pub updated_at: time::OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewLeague {
    pub tournament_id: i64,
    pub owner_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub plan: LeaguePlan,
    pub join_code: String,
}

fn plan_columns(plan: LeaguePlan) -> (String, Option<String>, Option<String>) {
    (
        plan.kind().as_str().to_string(),
        plan.social_plan().map(|p| p.as_str().to_string()),
        plan.enterprise_tier().map(|t| t.as_str().to_string()),
    )
}

pub async fn create_league<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    league: NewLeague,
) -> Result<League, DomainError> {
    let (kind, social_plan, enterprise_tier) = plan_columns(league.plan);
    let dto = leagues_adapter::LeagueCreate {
        tournament_id: league.tournament_id,
        owner_id: league.owner_id,
        name: league.name,
        description: league.description,
        kind,
        social_plan,
        enterprise_tier,
        join_code: league.join_code,
    };
    let model = leagues_adapter::create_league(conn, dto).await?;
    League::try_from(model)
}

pub async fn find_league<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    league_id: i64,
) -> Result<Option<League>, DomainError> {
    leagues_adapter::find_by_id(conn, league_id)
        .await?
        .map(League::try_from)
        .transpose()
}

pub async fn require_league<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    league_id: i64,
) -> Result<League, DomainError> {
    find_league(conn, league_id).await?.ok_or_else(|| {
        DomainError::not_found(NotFoundKind::League, format!("League {league_id} not found"))
    })
}

/// Load the league holding its row lock for the rest of the transaction.
pub async fn lock_league<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    league_id: i64,
) -> Result<League, DomainError> {
    leagues_adapter::lock_by_id(conn, league_id)
        .await?
        .map(League::try_from)
        .transpose()?
        .ok_or_else(|| {
            DomainError::not_found(NotFoundKind::League, format!("League {league_id} not found"))
        })
}

pub async fn find_by_join_code<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    join_code: &str,
) -> Result<Option<League>, DomainError> {
    leagues_adapter::find_by_join_code(conn, join_code)
        .await?
        .map(League::try_from)
        .transpose()
}

pub async fn list_for_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Vec<League>, DomainError> {
    let models = leagues_adapter::list_for_user(conn, user_id).await?;
    models.into_iter().map(League::try_from).collect()
}

/// Rename / re-describe, guarded by the caller's `If-Match` version.
pub async fn update_details<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    league_id: i64,
    expected_lock_version: i32,
    name: Option<String>,
    description: Option<Option<String>>,
) -> Result<League, DomainError> {
    let changes = leagues_adapter::LeagueUpdate {
        name,
        description,
        ..Default::default()
    };
    let model =
        leagues_adapter::update_league(conn, league_id, Some(expected_lock_version), changes)
            .await?;
    League::try_from(model)
}

pub async fn set_join_code<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    league_id: i64,
    join_code: String,
) -> Result<League, DomainError> {
    let changes = leagues_adapter::LeagueUpdate {
        join_code: Some(join_code),
        ..Default::default()
    };
    let model = leagues_adapter::update_league(conn, league_id, None, changes).await?;
    League::try_from(model)
}

/// Switch tier within the league's kind.
pub async fn set_plan<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    league_id: i64,
    plan: LeaguePlan,
) -> Result<League, DomainError> {
    let (_, social_plan, enterprise_tier) = plan_columns(plan);
    let changes = leagues_adapter::LeagueUpdate {
        social_plan: Some(social_plan),
        enterprise_tier: Some(enterprise_tier),
        ..Default::default()
    };
    let model = leagues_adapter::update_league(conn, league_id, None, changes).await?;
    League::try_from(model)
}

pub async fn set_branding<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    league_id: i64,
    branding: Branding,
) -> Result<League, DomainError> {
    let changes = leagues_adapter::LeagueUpdate {
        brand_logo_url: Some(branding.logo_url),
        brand_primary_color: Some(branding.primary_color),
        brand_secondary_color: Some(branding.secondary_color),
        ..Default::default()
    };
    let model = leagues_adapter::update_league(conn, league_id, None, changes).await?;
    League::try_from(model)
}

pub async fn set_social_links<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    league_id: i64,
    links: &BTreeMap<SocialNetwork, String>,
) -> Result<League, DomainError> {
    let encoded = if links.is_empty() {
        None
    } else {
        Some(serde_json::to_string(links).map_err(|e| {
            DomainError::infra(
                InfraErrorKind::Other("SERIALIZE".into()),
                format!("Failed to encode social links: {e}"),
            )
        })?)
    };
    let changes = leagues_adapter::LeagueUpdate {
        social_links: Some(encoded),
        ..Default::default()
    };
    let model = leagues_adapter::update_league(conn, league_id, None, changes).await?;
    League::try_from(model)
}

impl TryFrom<leagues::Model> for League {
    type Error = DomainError;

    fn try_from(model: leagues::Model) -> Result<Self, Self::Error> {
        let id = model.id;
        let kind: LeagueKind = model
            .kind
            .parse()
            .map_err(|e| corrupt_row("leagues", id, e))?;
        let plan = LeaguePlan::from_parts(
            kind,
            model.social_plan.as_deref(),
            model.enterprise_tier.as_deref(),
        )
        .map_err(|e| corrupt_row("leagues", id, e))?;
        let social_links = match model.social_links.as_deref() {
            None | Some("") => BTreeMap::new(),
            Some(raw) => serde_json::from_str(raw).map_err(|e| {
                corrupt_row(
                    "leagues",
                    id,
                    DomainError::validation_other(format!("social_links: {e}")),
                )
            })?,
        };

        Ok(Self {
            id,
            tournament_id: model.tournament_id,
            owner_id: model.owner_id,
            name: model.name,
            description: model.description,
            plan,
            join_code: model.join_code,
            branding: Branding {
                logo_url: model.brand_logo_url,
                primary_color: model.brand_primary_color,
                secondary_color: model.brand_secondary_color,
            },
            social_links,
            lock_version: model.lock_version,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
