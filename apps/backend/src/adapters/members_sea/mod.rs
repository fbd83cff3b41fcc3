//! SeaORM adapter for league memberships.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set,
};

use crate::entities::league_members::{self, MemberRole};

pub async fn find_membership<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    league_id: i64,
    user_id: i64,
) -> Result<Option<league_members::Model>, sea_orm::DbErr> {
    league_members::Entity::find()
        .filter(league_members::Column::LeagueId.eq(league_id))
        .filter(league_members::Column::UserId.eq(user_id))
        .one(conn)
        .await
}

pub fn lock_membership_query(member_id: i64) -> Select<league_members::Entity> {
    league_members::Entity::find_by_id(member_id).lock_exclusive()
}

/// Row-locks the membership; serialises joker bookkeeping for one member.
pub async fn lock_membership<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    member_id: i64,
) -> Result<Option<league_members::Model>, sea_orm::DbErr> {
    lock_membership_query(member_id).one(conn).await
}

pub async fn create_membership<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    league_id: i64,
    user_id: i64,
    role: MemberRole,
) -> Result<league_members::Model, sea_orm::DbErr> {
    let active = league_members::ActiveModel {
        id: NotSet,
        league_id: Set(league_id),
        user_id: Set(user_id),
        role: Set(role),
        department_id: Set(None),
        joined_at: Set(time::OffsetDateTime::now_utc()),
    };
    active.insert(conn).await
}

pub async fn count_members<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    league_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    league_members::Entity::find()
        .filter(league_members::Column::LeagueId.eq(league_id))
        .count(conn)
        .await
}

/// Members of a league in join order.
pub async fn list_members<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    league_id: i64,
) -> Result<Vec<league_members::Model>, sea_orm::DbErr> {
    league_members::Entity::find()
        .filter(league_members::Column::LeagueId.eq(league_id))
        .order_by_asc(league_members::Column::JoinedAt)
        .order_by_asc(league_members::Column::Id)
        .all(conn)
        .await
}

pub async fn delete_membership<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    membership_id: i64,
) -> Result<(), sea_orm::DbErr> {
    league_members::Entity::delete_by_id(membership_id)
        .exec(conn)
        .await?;
    Ok(())
}

pub async fn update_role<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    membership_id: i64,
    role: MemberRole,
) -> Result<(), sea_orm::DbErr> {
    league_members::Entity::update_many()
        .col_expr(league_members::Column::Role, Expr::val(role).into())
        .filter(league_members::Column::Id.eq(membership_id))
        .exec(conn)
        .await?;
    Ok(())
}

pub async fn set_department<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    membership_id: i64,
    department_id: Option<i64>,
) -> Result<(), sea_orm::DbErr> {
    league_members::Entity::update_many()
        .col_expr(
            league_members::Column::DepartmentId,
            Expr::val(department_id).into(),
        )
        .filter(league_members::Column::Id.eq(membership_id))
        .exec(conn)
        .await?;
    Ok(())
}
