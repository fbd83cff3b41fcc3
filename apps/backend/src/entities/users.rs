use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A person who can log in. `sub` is the stable subject put in access tokens.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub sub: String,
    /// Derived from the Google display name or the email local part.
    pub username: Option<String>,
    /// Site admin, re-evaluated against `ADMIN_EMAILS` on every login.
    pub is_admin: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::user_credentials::Entity")]
    Credentials,
    #[sea_orm(has_many = "super::league_members::Entity")]
    Memberships,
    #[sea_orm(has_many = "super::leagues::Entity")]
    OwnedLeagues,
}

impl Related<super::user_credentials::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Credentials.def()
    }
}

impl Related<super::league_members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Memberships.def()
    }
}

impl Related<super::leagues::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OwnedLeagues.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
