//! SeaORM adapter for knockout bracket picks.

use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder, Set};

use crate::entities::bracket_picks;

pub async fn list_for_member<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    member_id: i64,
) -> Result<Vec<bracket_picks::Model>, sea_orm::DbErr> {
    bracket_picks::Entity::find()
        .filter(bracket_picks::Column::MemberId.eq(member_id))
        .order_by_asc(bracket_picks::Column::MatchId)
        .all(conn)
        .await
}

pub async fn list_for_members<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    member_ids: Vec<i64>,
) -> Result<Vec<bracket_picks::Model>, sea_orm::DbErr> {
    if member_ids.is_empty() {
        return Ok(Vec::new());
    }
    bracket_picks::Entity::find()
        .filter(bracket_picks::Column::MemberId.is_in(member_ids))
        .all(conn)
        .await
}

pub async fn list_for_matches<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_ids: Vec<i64>,
) -> Result<Vec<bracket_picks::Model>, sea_orm::DbErr> {
    if match_ids.is_empty() {
        return Ok(Vec::new());
    }
    bracket_picks::Entity::find()
        .filter(bracket_picks::Column::MatchId.is_in(match_ids))
        .all(conn)
        .await
}

/// Swap the member's picks for `picks` (match id, team id).
pub async fn replace_for_member<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    member_id: i64,
    picks: Vec<(i64, i64)>,
) -> Result<(), sea_orm::DbErr> {
    bracket_picks::Entity::delete_many()
        .filter(bracket_picks::Column::MemberId.eq(member_id))
        .exec(conn)
        .await?;

    if picks.is_empty() {
        return Ok(());
    }

    let now = time::OffsetDateTime::now_utc();
    let rows = picks
        .into_iter()
        .map(|(match_id, team_id)| bracket_picks::ActiveModel {
            id: NotSet,
            member_id: Set(member_id),
            match_id: Set(match_id),
            team_id: Set(team_id),
            points: Set(None),
            created_at: Set(now),
        });
    bracket_picks::Entity::insert_many(rows)
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

pub async fn set_points<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    pick_id: i64,
    points: Option<i32>,
) -> Result<(), sea_orm::DbErr> {
    bracket_picks::Entity::update_many()
        .col_expr(bracket_picks::Column::Points, Expr::val(points).into())
        .filter(bracket_picks::Column::Id.eq(pick_id))
        .exec(conn)
        .await?;
    Ok(())
}
