use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum MatchStatus {
    #[sea_orm(string_value = "SCHEDULED")]
    Scheduled,
    #[sea_orm(string_value = "FINISHED")]
    Finished,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "matches")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "tournament_id")]
    pub tournament_id: i64,
    #[sea_orm(column_name = "match_no")]
    pub match_no: i32,
    pub stage: String,
    #[sea_orm(column_name = "group_code")]
    pub group_code: Option<String>,
    #[sea_orm(column_name = "home_slot")]
    pub home_slot: Option<String>,
    #[sea_orm(column_name = "away_slot")]
    pub away_slot: Option<String>,
    #[sea_orm(column_name = "home_team_id")]
    pub home_team_id: Option<i64>,
    #[sea_orm(column_name = "away_team_id")]
    pub away_team_id: Option<i64>,
    #[sea_orm(column_name = "kickoff_at")]
    pub kickoff_at: OffsetDateTime,
    #[sea_orm(column_name = "home_goals", column_type = "SmallInteger")]
    pub home_goals: Option<i16>,
    #[sea_orm(column_name = "away_goals", column_type = "SmallInteger")]
    pub away_goals: Option<i16>,
    #[sea_orm(column_name = "penalty_winner")]
    pub penalty_winner: Option<String>,
    pub status: MatchStatus,
    #[sea_orm(column_name = "lock_version")]
    pub lock_version: i32,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tournaments::Entity",
        from = "Column::TournamentId",
        to = "super::tournaments::Column::Id"
    )]
    Tournament,
    #[sea_orm(has_many = "super::predictions::Entity")]
    Predictions,
}

impl Related<super::tournaments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tournament.def()
    }
}

impl Related<super::predictions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Predictions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
