use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "predictions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "member_id")]
    pub member_id: i64,
    #[sea_orm(column_name = "match_id")]
    pub match_id: i64,
    #[sea_orm(column_name = "home_goals", column_type = "SmallInteger")]
    pub home_goals: i16,
    #[sea_orm(column_name = "away_goals", column_type = "SmallInteger")]
    pub away_goals: i16,
    /// `HOME` / `AWAY`; only set for predicted knockout draws.
    pub advances: Option<String>,
    pub joker: bool,
    /// `None` until the match has a result.
    pub points: Option<i32>,
    #[sea_orm(column_name = "exact_hit")]
    pub exact_hit: bool,
    #[sea_orm(column_name = "outcome_hit")]
    pub outcome_hit: bool,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::league_members::Entity",
        from = "Column::MemberId",
        to = "super::league_members::Column::Id"
    )]
    Member,
    #[sea_orm(
        belongs_to = "super::matches::Entity",
        from = "Column::MatchId",
        to = "super::matches::Column::Id"
    )]
    Match,
}

impl Related<super::league_members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Member.def()
    }
}

impl Related<super::matches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Match.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
