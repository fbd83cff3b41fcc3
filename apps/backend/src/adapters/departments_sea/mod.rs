//! SeaORM adapter for enterprise departments.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::departments;

pub async fn create_department<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    league_id: i64,
    name: String,
) -> Result<departments::Model, sea_orm::DbErr> {
    let active = departments::ActiveModel {
        id: NotSet,
        league_id: Set(league_id),
        name: Set(name),
        created_at: Set(time::OffsetDateTime::now_utc()),
    };
    active.insert(conn).await
}

pub async fn list_for_league<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    league_id: i64,
) -> Result<Vec<departments::Model>, sea_orm::DbErr> {
    departments::Entity::find()
        .filter(departments::Column::LeagueId.eq(league_id))
        .order_by_asc(departments::Column::Name)
        .all(conn)
        .await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    department_id: i64,
) -> Result<Option<departments::Model>, sea_orm::DbErr> {
    departments::Entity::find_by_id(department_id).one(conn).await
}
