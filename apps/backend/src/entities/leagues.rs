use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "leagues")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "tournament_id")]
    pub tournament_id: i64,
    #[sea_orm(column_name = "owner_id")]
    pub owner_id: i64,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: Option<String>,
    pub kind: String,
    #[sea_orm(column_name = "social_plan")]
    pub social_plan: Option<String>,
    #[sea_orm(column_name = "enterprise_tier")]
    pub enterprise_tier: Option<String>,
    #[sea_orm(column_name = "join_code", unique)]
    pub join_code: String,
    #[sea_orm(column_name = "brand_logo_url", column_type = "Text")]
    pub brand_logo_url: Option<String>,
    #[sea_orm(column_name = "brand_primary_color")]
    pub brand_primary_color: Option<String>,
    #[sea_orm(column_name = "brand_secondary_color")]
    pub brand_secondary_color: Option<String>,
    /// JSON object of network -> url.
    #[sea_orm(column_name = "social_links", column_type = "Text")]
    pub social_links: Option<String>,
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
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OwnerId",
        to = "super::users::Column::Id"
    )]
    Owner,
    #[sea_orm(has_many = "super::league_members::Entity")]
    LeagueMembers,
    #[sea_orm(has_many = "super::departments::Entity")]
    Departments,
    #[sea_orm(has_many = "super::league_ads::Entity")]
    LeagueAds,
}

impl Related<super::tournaments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tournament.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::league_members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LeagueMembers.def()
    }
}

impl Related<super::departments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Departments.def()
    }
}

impl Related<super::league_ads::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LeagueAds.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
