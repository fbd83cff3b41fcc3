//! SeaORM adapter for fixtures - generic over ConnectionTrait.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::matches::{self, MatchStatus};
use crate::infra::db_errors::OPTIMISTIC_LOCK_PREFIX;

pub mod dto;

pub use dto::{MatchCreate, MatchResultUpdate};

// Adapter functions return DbErr; repos layer maps to DomainError via From<DbErr>.

pub async fn create_match<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: MatchCreate,
) -> Result<matches::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let active = matches::ActiveModel {
        id: NotSet,
        tournament_id: Set(dto.tournament_id),
        match_no: Set(dto.match_no),
        stage: Set(dto.stage),
        group_code: Set(dto.group_code),
        home_slot: Set(dto.home_slot),
        away_slot: Set(dto.away_slot),
        home_team_id: Set(dto.home_team_id),
        away_team_id: Set(dto.away_team_id),
        kickoff_at: Set(dto.kickoff_at),
        home_goals: Set(None),
        away_goals: Set(None),
        penalty_winner: Set(None),
        status: Set(MatchStatus::Scheduled),
        lock_version: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
    };
    active.insert(conn).await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
) -> Result<Option<matches::Model>, sea_orm::DbErr> {
    matches::Entity::find_by_id(match_id).one(conn).await
}

/// Matches of a tournament in match-number order, optionally for one stage.
pub async fn list_for_tournament<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    tournament_id: i64,
    stage: Option<&str>,
) -> Result<Vec<matches::Model>, sea_orm::DbErr> {
    let mut query = matches::Entity::find().filter(matches::Column::TournamentId.eq(tournament_id));
    if let Some(stage) = stage {
        query = query.filter(matches::Column::Stage.eq(stage));
    }
    query
        .order_by_asc(matches::Column::MatchNo)
        .all(conn)
        .await
}

pub async fn list_by_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_ids: Vec<i64>,
) -> Result<Vec<matches::Model>, sea_orm::DbErr> {
    if match_ids.is_empty() {
        return Ok(Vec::new());
    }
    matches::Entity::find()
        .filter(matches::Column::Id.is_in(match_ids))
        .all(conn)
        .await
}

/// Store a result, bumping `lock_version`. A stale version raises the
/// optimistic-lock payload, a missing row `RecordNotFound`.
pub async fn record_result<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: MatchResultUpdate,
) -> Result<matches::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();

    let result = matches::Entity::update_many()
        .col_expr(matches::Column::HomeGoals, Expr::val(Some(dto.home_goals)).into())
        .col_expr(matches::Column::AwayGoals, Expr::val(Some(dto.away_goals)).into())
        .col_expr(matches::Column::PenaltyWinner, Expr::val(dto.penalty_winner).into())
        .col_expr(matches::Column::Status, Expr::val(MatchStatus::Finished).into())
        .col_expr(matches::Column::UpdatedAt, Expr::val(now).into())
        .col_expr(
            matches::Column::LockVersion,
            Expr::col(matches::Column::LockVersion).add(1),
        )
        .filter(matches::Column::Id.eq(dto.id))
        .filter(matches::Column::LockVersion.eq(dto.current_lock_version))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return match find_by_id(conn, dto.id).await? {
            Some(found) => Err(sea_orm::DbErr::Custom(format!(
                "{OPTIMISTIC_LOCK_PREFIX}{{\"expected\":{},\"actual\":{}}}",
                dto.current_lock_version, found.lock_version
            ))),
            None => Err(sea_orm::DbErr::RecordNotFound("Match not found".to_string())),
        };
    }

    find_by_id(conn, dto.id)
        .await?
        .ok_or_else(|| sea_orm::DbErr::RecordNotFound("Match not found".to_string()))
}

/// Overwrite the teams occupying a knockout fixture's slots.
pub async fn set_slot_teams<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    match_id: i64,
    home_team_id: Option<i64>,
    away_team_id: Option<i64>,
) -> Result<(), sea_orm::DbErr> {
    matches::Entity::update_many()
        .col_expr(matches::Column::HomeTeamId, Expr::val(home_team_id).into())
        .col_expr(matches::Column::AwayTeamId, Expr::val(away_team_id).into())
        .col_expr(
            matches::Column::UpdatedAt,
            Expr::val(time::OffsetDateTime::now_utc()).into(),
        )
        .filter(matches::Column::Id.eq(match_id))
        .exec(conn)
        .await?;
    Ok(())
}
