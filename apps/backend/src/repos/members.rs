//! League membership repository functions for domain layer.

use sea_orm::ConnectionTrait;
use serde::Serialize;

use crate::adapters::members_sea as members_adapter;
use crate::domain::roles::LeagueRole;
use crate::entities::league_members::{self, MemberRole};
use crate::errors::domain::{DomainError, NotFoundKind};

/// League membership domain model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Membership {
    pub id: i64,
    pub league_id: i64,
    pub user_id: i64,
    pub role: LeagueRole,
    pub department_id: Option<i64>,
    #[serde(with = "time::serde::rfc3339")]
    pub joined_at: time::OffsetDateTime,
}

pub async fn find_membership<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    league_id: i64,
    user_id: i64,
) -> Result<Option<Membership>, DomainError> {
    let membership = members_adapter::find_membership(conn, league_id, user_id).await?;
    Ok(membership.map(Membership::from))
}

pub async fn require_membership<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    league_id: i64,
    user_id: i64,
) -> Result<Membership, DomainError> {
    find_membership(conn, league_id, user_id)
        .await?
        .ok_or_else(|| {
            DomainError::not_found(
                NotFoundKind::Member,
                format!("User {user_id} is not a member of league {league_id}"),
            )
        })
}

pub async fn lock_membership<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    member_id: i64,
) -> Result<Membership, DomainError> {
    members_adapter::lock_membership(conn, member_id)
        .await?
        .map(Membership::from)
        .ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Member, format!("Membership {member_id} not found"))
        })
}

pub async fn create_membership<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    league_id: i64,
    user_id: i64,
    role: LeagueRole,
) -> Result<Membership, DomainError> {
    let model =
        members_adapter::create_membership(conn, league_id, user_id, MemberRole::from(role))
            .await?;
    Ok(Membership::from(model))
}

pub async fn count_members<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    league_id: i64,
) -> Result<u64, DomainError> {
    Ok(members_adapter::count_members(conn, league_id).await?)
}

pub async fn list_members<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    league_id: i64,
) -> Result<Vec<Membership>, DomainError> {
    let models = members_adapter::list_members(conn, league_id).await?;
    Ok(models.into_iter().map(Membership::from).collect())
}

pub async fn delete_membership<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    membership_id: i64,
) -> Result<(), DomainError> {
    members_adapter::delete_membership(conn, membership_id).await?;
    Ok(())
}

pub async fn update_role<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    membership_id: i64,
    role: LeagueRole,
) -> Result<(), DomainError> {
    members_adapter::update_role(conn, membership_id, MemberRole::from(role)).await?;
    Ok(())
}

pub async fn set_department<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    membership_id: i64,
    department_id: Option<i64>,
) -> Result<(), DomainError> {
    members_adapter::set_department(conn, membership_id, department_id).await?;
    Ok(())
}

impl From<LeagueRole> for MemberRole {
    fn from(role: LeagueRole) -> Self {
        match role {
            LeagueRole::Owner => MemberRole::Owner,
            LeagueRole::Admin => MemberRole::Admin,
            LeagueRole::Member => MemberRole::Member,
        }
    }
}

impl From<MemberRole> for LeagueRole {
    fn from(role: MemberRole) -> Self {
        match role {
            MemberRole::Owner => LeagueRole::Owner,
            MemberRole::Admin => LeagueRole::Admin,
            MemberRole::Member => LeagueRole::Member,
        }
    }
}

impl From<league_members::Model> for Membership {
    fn from(model: league_members::Model) -> Self {
        Self {
            id: model.id,
            league_id: model.league_id,
            user_id: model.user_id,
            role: LeagueRole::from(model.role),
            department_id: model.department_id,
            joined_at: model.joined_at,
        }
    }
}
