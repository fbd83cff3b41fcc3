//! SeaORM adapter for league advertising slots.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::league_ads;

#[derive(Debug, Clone)]
pub struct AdCreate {
    pub league_id: i64,
    pub title: String,
    pub image_url: String,
    pub target_url: String,
    pub placement: String,
    pub active: bool,
}

pub async fn create_ad<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: AdCreate,
) -> Result<league_ads::Model, sea_orm::DbErr> {
    let active = league_ads::ActiveModel {
        id: NotSet,
        league_id: Set(dto.league_id),
        title: Set(dto.title),
        image_url: Set(dto.image_url),
        target_url: Set(dto.target_url),
        placement: Set(dto.placement),
        active: Set(dto.active),
        created_at: Set(time::OffsetDateTime::now_utc()),
    };
    active.insert(conn).await
}

pub async fn list_for_league<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    league_id: i64,
    active_only: bool,
) -> Result<Vec<league_ads::Model>, sea_orm::DbErr> {
    let mut query = league_ads::Entity::find().filter(league_ads::Column::LeagueId.eq(league_id));
    if active_only {
        query = query.filter(league_ads::Column::Active.eq(true));
    }
    query.order_by_asc(league_ads::Column::Id).all(conn).await
}

/// Delete an ad of `league_id`; returns whether a row went away.
pub async fn delete_ad<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    league_id: i64,
    ad_id: i64,
) -> Result<bool, sea_orm::DbErr> {
    let result = league_ads::Entity::delete_many()
        .filter(league_ads::Column::Id.eq(ad_id))
        .filter(league_ads::Column::LeagueId.eq(league_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected > 0)
}
