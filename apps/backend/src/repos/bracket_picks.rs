//! Bracket pick repository functions.

use sea_orm::ConnectionTrait;

use crate::adapters::bracket_picks_sea as picks_adapter;
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BracketPick {
    pub id: i64,
    pub member_id: i64,
    pub match_id: i64,
    pub team_id: i64,
    pub points: Option<i32>,
}

pub async fn list_for_member<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    member_id: i64,
) -> Result<Vec<BracketPick>, DomainError> {
    let models = picks_adapter::list_for_member(conn, member_id).await?;
    Ok(models.into_iter().map(BracketPick::from).collect())
}

pub async fn list_for_members<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    member_ids: Vec<i64>,
) -> Result<Vec<BracketPick>, DomainError> {
    let models = picks_adapter::list_for_members(conn, member_ids).await?;
    Ok(models.into_iter().map(BracketPick::from).collect())
}

pub async fn list_for_matches<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_ids: Vec<i64>,
) -> Result<Vec<BracketPick>, DomainError> {
    let models = picks_adapter::list_for_matches(conn, match_ids).await?;
    Ok(models.into_iter().map(BracketPick::from).collect())
}

/// Replace every pick of the member with `picks` as (match id, team id).
pub async fn replace_for_member<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    member_id: i64,
    picks: Vec<(i64, i64)>,
) -> Result<(), DomainError> {
    picks_adapter::replace_for_member(conn, member_id, picks).await?;
    Ok(())
}

pub async fn set_points<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    pick_id: i64,
    points: Option<i32>,
) -> Result<(), DomainError> {
    picks_adapter::set_points(conn, pick_id, points).await?;
    Ok(())
}

impl From<crate::entities::bracket_picks::Model> for BracketPick {
    fn from(model: crate::entities::bracket_picks::Model) -> Self {
        Self {
            id: model.id,
            member_id: model.member_id,
            match_id: model.match_id,
            team_id: model.team_id,
            points: model.points,
        }
    }
}
