//! SeaORM adapter for tournaments and their teams.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::{teams, tournaments};

pub mod dto;

pub use dto::{TeamCreate, TournamentCreate};

pub async fn create_tournament<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: TournamentCreate,
) -> Result<tournaments::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let active = tournaments::ActiveModel {
        id: NotSet,
        slug: Set(dto.slug),
        name: Set(dto.name),
        prediction_lock_minutes: Set(dto.prediction_lock_minutes),
        created_at: Set(now),
        updated_at: Set(now),
    };
    active.insert(conn).await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    tournament_id: i64,
) -> Result<Option<tournaments::Model>, sea_orm::DbErr> {
    tournaments::Entity::find_by_id(tournament_id).one(conn).await
}

pub async fn list_all<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<tournaments::Model>, sea_orm::DbErr> {
    tournaments::Entity::find()
        .order_by_asc(tournaments::Column::Id)
        .all(conn)
        .await
}

pub async fn create_team<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: TeamCreate,
) -> Result<teams::Model, sea_orm::DbErr> {
    let active = teams::ActiveModel {
        id: NotSet,
        tournament_id: Set(dto.tournament_id),
        code: Set(dto.code),
        name: Set(dto.name),
        group_code: Set(dto.group_code),
    };
    active.insert(conn).await
}

pub async fn list_teams<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    tournament_id: i64,
) -> Result<Vec<teams::Model>, sea_orm::DbErr> {
    teams::Entity::find()
        .filter(teams::Column::TournamentId.eq(tournament_id))
        .order_by_asc(teams::Column::Code)
        .all(conn)
        .await
}

pub async fn find_team<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    team_id: i64,
) -> Result<Option<teams::Model>, sea_orm::DbErr> {
    teams::Entity::find_by_id(team_id).one(conn).await
}
