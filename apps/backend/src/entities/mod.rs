pub mod bracket_picks;
pub mod departments;
pub mod league_ads;
pub mod league_members;
pub mod leagues;
pub mod matches;
pub mod predictions;
pub mod teams;
pub mod tournaments;
pub mod user_credentials;
pub mod users;

pub use bracket_picks::Entity as BracketPicks;
pub use bracket_picks::Model as BracketPick;
pub use departments::Entity as Departments;
pub use departments::Model as Department;
pub use league_ads::Entity as LeagueAds;
pub use league_ads::Model as LeagueAd;
pub use league_members::Entity as LeagueMembers;
pub use league_members::Model as LeagueMember;
pub use leagues::Entity as Leagues;
pub use leagues::Model as League;
pub use matches::Entity as Matches;
pub use matches::Model as Match;
pub use predictions::Entity as Predictions;
pub use predictions::Model as Prediction;
pub use teams::Entity as Teams;
pub use teams::Model as Team;
pub use tournaments::Entity as Tournaments;
pub use tournaments::Model as Tournament;
pub use user_credentials::Entity as UserCredentials;
pub use user_credentials::Model as UserCredential;
pub use users::Entity as Users;
pub use users::Model as User;

#[cfg(test)]
mod tests {
    use sea_orm::{DbBackend, EntityTrait, QueryTrait};

    use super::*;

    #[test]
    fn league_owner_relation_joins_both_ways() {
        let owners = Leagues::find()
            .find_also_related(Users)
            .build(DbBackend::Sqlite)
            .to_string();
        assert!(owners.contains(r#""leagues"."owner_id" = "users"."id""#), "{owners}");

        let owned = Users::find()
            .find_with_related(Leagues)
            .build(DbBackend::Sqlite)
            .to_string();
        assert!(owned.contains(r#""users"."id" = "leagues"."owner_id""#), "{owned}");
    }
}
