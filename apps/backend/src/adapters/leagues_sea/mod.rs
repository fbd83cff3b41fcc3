//! SeaORM adapter for leagues - generic over ConnectionTrait.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, JoinType, NotSet, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Select, Set,
};

use crate::entities::{league_members, leagues};
use crate::infra::db_errors::OPTIMISTIC_LOCK_PREFIX;

pub mod dto;

pub use dto::{LeagueCreate, LeagueUpdate};

// Adapter functions return DbErr; repos layer maps to DomainError via From<DbErr>.

pub async fn create_league<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: LeagueCreate,
) -> Result<leagues::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let active = leagues::ActiveModel {
        id: NotSet,
        tournament_id: Set(dto.tournament_id),
        owner_id: Set(dto.owner_id),
        name: Set(dto.name),
        description: Set(dto.description),
        kind: Set(dto.kind),
        social_plan: Set(dto.social_plan),
        enterprise_tier: Set(dto.enterprise_tier),
        join_code: Set(dto.join_code),
        brand_logo_url: Set(None),
        brand_primary_color: Set(None),
        brand_secondary_color: Set(None),
        social_links: Set(None),
        lock_version: Set(1),
        created_at: Set(now),
        updated_at: Set(now),
    };
    active.insert(conn).await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    league_id: i64,
) -> Result<Option<leagues::Model>, sea_orm::DbErr> {
    leagues::Entity::find_by_id(league_id).one(conn).await
}

/// `SELECT ... FOR UPDATE` on one league. SQLite ignores the lock clause.
pub fn lock_by_id_query(league_id: i64) -> Select<leagues::Entity> {
    leagues::Entity::find_by_id(league_id).lock_exclusive()
}

/// Row-locks the league until the surrounding transaction ends.
pub async fn lock_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    league_id: i64,
) -> Result<Option<leagues::Model>, sea_orm::DbErr> {
    lock_by_id_query(league_id).one(conn).await
}

pub async fn find_by_join_code<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    join_code: &str,
) -> Result<Option<leagues::Model>, sea_orm::DbErr> {
    leagues::Entity::find()
        .filter(leagues::Column::JoinCode.eq(join_code))
        .one(conn)
        .await
}

/// Leagues the user belongs to, newest first.
pub async fn list_for_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Vec<leagues::Model>, sea_orm::DbErr> {
    leagues::Entity::find()
        .join(JoinType::InnerJoin, leagues::Relation::LeagueMembers.def())
        .filter(league_members::Column::UserId.eq(user_id))
        .order_by_desc(leagues::Column::CreatedAt)
        .order_by_desc(leagues::Column::Id)
        .all(conn)
        .await
}

/// Apply `changes`, bump `lock_version` and refetch.
///
/// With `expected_lock_version` the write only lands on that version; a
/// mismatch raises the optimistic-lock payload.
pub async fn update_league<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    league_id: i64,
    expected_lock_version: Option<i32>,
    changes: LeagueUpdate,
) -> Result<leagues::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();

    let mut update = leagues::Entity::update_many()
        .col_expr(leagues::Column::UpdatedAt, Expr::val(now).into())
        .col_expr(
            leagues::Column::LockVersion,
            Expr::col(leagues::Column::LockVersion).add(1),
        )
        .filter(leagues::Column::Id.eq(league_id));

    if let Some(name) = changes.name {
        update = update.col_expr(leagues::Column::Name, Expr::val(name).into());
    }
    if let Some(description) = changes.description {
        update = update.col_expr(leagues::Column::Description, Expr::val(description).into());
    }
    if let Some(plan) = changes.social_plan {
        update = update.col_expr(leagues::Column::SocialPlan, Expr::val(plan).into());
    }
    if let Some(tier) = changes.enterprise_tier {
        update = update.col_expr(leagues::Column::EnterpriseTier, Expr::val(tier).into());
    }
    if let Some(code) = changes.join_code {
        update = update.col_expr(leagues::Column::JoinCode, Expr::val(code).into());
    }
    if let Some(url) = changes.brand_logo_url {
        update = update.col_expr(leagues::Column::BrandLogoUrl, Expr::val(url).into());
    }
    if let Some(color) = changes.brand_primary_color {
        update = update.col_expr(leagues::Column::BrandPrimaryColor, Expr::val(color).into());
    }
    if let Some(color) = changes.brand_secondary_color {
        update = update.col_expr(leagues::Column::BrandSecondaryColor, Expr::val(color).into());
    }
    if let Some(links) = changes.social_links {
        update = update.col_expr(leagues::Column::SocialLinks, Expr::val(links).into());
    }
    if let Some(expected) = expected_lock_version {
        update = update.filter(leagues::Column::LockVersion.eq(expected));
    }

    let result = update.exec(conn).await?;

    if result.rows_affected == 0 {
        return match (find_by_id(conn, league_id).await?, expected_lock_version) {
            (Some(found), Some(expected)) => Err(sea_orm::DbErr::Custom(format!(
                "{OPTIMISTIC_LOCK_PREFIX}{{\"expected\":{},\"actual\":{}}}",
                expected, found.lock_version
            ))),
            _ => Err(sea_orm::DbErr::RecordNotFound("League not found".to_string())),
        };
    }

    find_by_id(conn, league_id)
        .await?
        .ok_or_else(|| sea_orm::DbErr::RecordNotFound("League not found".to_string()))
}

#[cfg(test)]
mod tests {
    use sea_orm::{DbBackend, QueryTrait};

    use super::*;

    #[test]
    fn lock_query_is_for_update_on_postgres_only() {
        let pg = lock_by_id_query(7).build(DbBackend::Postgres).to_string();
        assert!(pg.contains("FOR UPDATE"), "{pg}");
        let sqlite = lock_by_id_query(7).build(DbBackend::Sqlite).to_string();
        assert!(!sqlite.contains("FOR UPDATE"), "{sqlite}");
    }
}
