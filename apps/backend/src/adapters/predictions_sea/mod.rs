//! SeaORM adapter for match predictions - generic over ConnectionTrait.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, JoinType, NotSet, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};

use crate::entities::{league_members, matches, predictions};

pub mod dto;

pub use dto::{PredictionScore, PredictionWrite};

// Adapter functions return DbErr; repos layer maps to DomainError via From<DbErr>.

pub async fn find_for_member_match<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    member_id: i64,
    match_id: i64,
) -> Result<Option<predictions::Model>, sea_orm::DbErr> {
    predictions::Entity::find()
        .filter(predictions::Column::MemberId.eq(member_id))
        .filter(predictions::Column::MatchId.eq(match_id))
        .one(conn)
        .await
}

/// Insert or overwrite the member's prediction for the match.
pub async fn upsert<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: PredictionWrite,
) -> Result<predictions::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();

    match find_for_member_match(conn, dto.member_id, dto.match_id).await? {
        Some(existing) => {
            let mut active: predictions::ActiveModel = existing.into();
            active.home_goals = Set(dto.home_goals);
            active.away_goals = Set(dto.away_goals);
            active.advances = Set(dto.advances);
            active.joker = Set(dto.joker);
            active.updated_at = Set(now);
            active.update(conn).await
        }
        None => {
            let active = predictions::ActiveModel {
                id: NotSet,
                member_id: Set(dto.member_id),
                match_id: Set(dto.match_id),
                home_goals: Set(dto.home_goals),
                away_goals: Set(dto.away_goals),
                advances: Set(dto.advances),
                joker: Set(dto.joker),
                points: Set(None),
                exact_hit: Set(false),
                outcome_hit: Set(false),
                created_at: Set(now),
                updated_at: Set(now),
            };
            active.insert(conn).await
        }
    }
}

pub async fn clear_joker<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    prediction_id: i64,
) -> Result<(), sea_orm::DbErr> {
    predictions::Entity::update_many()
        .col_expr(predictions::Column::Joker, Expr::val(false).into())
        .col_expr(
            predictions::Column::UpdatedAt,
            Expr::val(time::OffsetDateTime::now_utc()).into(),
        )
        .filter(predictions::Column::Id.eq(prediction_id))
        .exec(conn)
        .await?;
    Ok(())
}

/// Joker-carrying predictions of a member on matches in `stages`, with their match.
pub async fn jokers_in_stages<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    member_id: i64,
    stages: Vec<String>,
) -> Result<Vec<(predictions::Model, Option<matches::Model>)>, sea_orm::DbErr> {
    predictions::Entity::find()
        .find_also_related(matches::Entity)
        .filter(predictions::Column::MemberId.eq(member_id))
        .filter(predictions::Column::Joker.eq(true))
        .filter(matches::Column::Stage.is_in(stages))
        .all(conn)
        .await
}

pub async fn list_for_member<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    member_id: i64,
) -> Result<Vec<predictions::Model>, sea_orm::DbErr> {
    predictions::Entity::find()
        .filter(predictions::Column::MemberId.eq(member_id))
        .order_by_asc(predictions::Column::MatchId)
        .all(conn)
        .await
}

pub async fn list_for_members<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    member_ids: Vec<i64>,
) -> Result<Vec<predictions::Model>, sea_orm::DbErr> {
    if member_ids.is_empty() {
        return Ok(Vec::new());
    }
    predictions::Entity::find()
        .filter(predictions::Column::MemberId.is_in(member_ids))
        .all(conn)
        .await
}

/// Predictions on a match across every league.
pub async fn list_for_match<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
) -> Result<Vec<predictions::Model>, sea_orm::DbErr> {
    predictions::Entity::find()
        .filter(predictions::Column::MatchId.eq(match_id))
        .order_by_asc(predictions::Column::Id)
        .all(conn)
        .await
}

/// Predictions on a match made by members of one league.
pub async fn list_for_league_match<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    league_id: i64,
    match_id: i64,
) -> Result<Vec<predictions::Model>, sea_orm::DbErr> {
    predictions::Entity::find()
        .join(JoinType::InnerJoin, predictions::Relation::Member.def())
        .filter(league_members::Column::LeagueId.eq(league_id))
        .filter(predictions::Column::MatchId.eq(match_id))
        .order_by_asc(predictions::Column::MemberId)
        .all(conn)
        .await
}

pub async fn set_score<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    score: PredictionScore,
) -> Result<(), sea_orm::DbErr> {
    predictions::Entity::update_many()
        .col_expr(predictions::Column::Points, Expr::val(score.points).into())
        .col_expr(predictions::Column::ExactHit, Expr::val(score.exact_hit).into())
        .col_expr(predictions::Column::OutcomeHit, Expr::val(score.outcome_hit).into())
        .filter(predictions::Column::Id.eq(score.id))
        .exec(conn)
        .await?;
    Ok(())
}
