use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Users {
    Table,
    Id,
    Sub,
    Username,
    IsAdmin,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum UserCredentials {
    Table,
    Id,
    UserId,
    Email,
    GoogleSub,
    LastLogin,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Tournaments {
    Table,
    Id,
    Slug,
    Name,
    PredictionLockMinutes,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Teams {
    Table,
    Id,
    TournamentId,
    Code,
    Name,
    GroupCode,
}

#[derive(Iden)]
enum Matches {
    Table,
    Id,
    TournamentId,
    MatchNo,
    Stage,
    GroupCode,
    HomeSlot,
    AwaySlot,
    HomeTeamId,
    AwayTeamId,
    KickoffAt,
    HomeGoals,
    AwayGoals,
    PenaltyWinner,
    Status,
    LockVersion,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Leagues {
    Table,
    Id,
    TournamentId,
    OwnerId,
    Name,
    Description,
    Kind,
    SocialPlan,
    EnterpriseTier,
    JoinCode,
    BrandLogoUrl,
    BrandPrimaryColor,
    BrandSecondaryColor,
    SocialLinks,
    LockVersion,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Departments {
    Table,
    Id,
    LeagueId,
    Name,
    CreatedAt,
}

#[derive(Iden)]
enum LeagueMembers {
    Table,
    Id,
    LeagueId,
    UserId,
    Role,
    DepartmentId,
    JoinedAt,
}

#[derive(Iden)]
enum LeagueAds {
    Table,
    Id,
    LeagueId,
    Title,
    ImageUrl,
    TargetUrl,
    Placement,
    Active,
    CreatedAt,
}

#[derive(Iden)]
enum Predictions {
    Table,
    Id,
    MemberId,
    MatchId,
    HomeGoals,
    AwayGoals,
    Advances,
    Joker,
    Points,
    ExactHit,
    OutcomeHit,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum BracketPicks {
    Table,
    Id,
    MemberId,
    MatchId,
    TeamId,
    Points,
    CreatedAt,
}

fn id_col<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .big_integer()
        .not_null()
        .primary_key()
        .auto_increment()
        .to_owned()
}

fn ts_col<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // users
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(id_col(Users::Id))
                    .col(ColumnDef::new(Users::Sub).string().not_null())
                    .col(ColumnDef::new(Users::Username).string().null())
                    .col(
                        ColumnDef::new(Users::IsAdmin)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ts_col(Users::CreatedAt))
                    .col(ts_col(Users::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_sub_unique")
                    .table(Users::Table)
                    .col(Users::Sub)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // user_credentials
        manager
            .create_table(
                Table::create()
                    .table(UserCredentials::Table)
                    .if_not_exists()
                    .col(id_col(UserCredentials::Id))
                    .col(
                        ColumnDef::new(UserCredentials::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserCredentials::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(UserCredentials::GoogleSub)
                            .string()
                            .null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(UserCredentials::LastLogin)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ts_col(UserCredentials::CreatedAt))
                    .col(ts_col(UserCredentials::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_credentials_user_id")
                            .from(UserCredentials::Table, UserCredentials::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_user_credentials_user_id")
                    .table(UserCredentials::Table)
                    .col(UserCredentials::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // tournaments
        manager
            .create_table(
                Table::create()
                    .table(Tournaments::Table)
                    .if_not_exists()
                    .col(id_col(Tournaments::Id))
                    .col(
                        ColumnDef::new(Tournaments::Slug)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Tournaments::Name).string().not_null())
                    .col(
                        ColumnDef::new(Tournaments::PredictionLockMinutes)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ts_col(Tournaments::CreatedAt))
                    .col(ts_col(Tournaments::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // teams
        manager
            .create_table(
                Table::create()
                    .table(Teams::Table)
                    .if_not_exists()
                    .col(id_col(Teams::Id))
                    .col(ColumnDef::new(Teams::TournamentId).big_integer().not_null())
                    .col(ColumnDef::new(Teams::Code).string_len(8).not_null())
                    .col(ColumnDef::new(Teams::Name).string().not_null())
                    .col(ColumnDef::new(Teams::GroupCode).string_len(2).null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_teams_tournament_id")
                            .from(Teams::Table, Teams::TournamentId)
                            .to(Tournaments::Table, Tournaments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_teams_tournament_code")
                    .table(Teams::Table)
                    .col(Teams::TournamentId)
                    .col(Teams::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // matches
        manager
            .create_table(
                Table::create()
                    .table(Matches::Table)
                    .if_not_exists()
                    .col(id_col(Matches::Id))
                    .col(
                        ColumnDef::new(Matches::TournamentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Matches::MatchNo).integer().not_null())
                    .col(ColumnDef::new(Matches::Stage).string_len(16).not_null())
                    .col(ColumnDef::new(Matches::GroupCode).string_len(2).null())
                    .col(ColumnDef::new(Matches::HomeSlot).string_len(16).null())
                    .col(ColumnDef::new(Matches::AwaySlot).string_len(16).null())
                    .col(ColumnDef::new(Matches::HomeTeamId).big_integer().null())
                    .col(ColumnDef::new(Matches::AwayTeamId).big_integer().null())
                    .col(ts_col(Matches::KickoffAt))
                    .col(ColumnDef::new(Matches::HomeGoals).small_integer().null())
                    .col(ColumnDef::new(Matches::AwayGoals).small_integer().null())
                    .col(ColumnDef::new(Matches::PenaltyWinner).string_len(8).null())
                    .col(
                        ColumnDef::new(Matches::Status)
                            .string_len(16)
                            .not_null()
                            .default("SCHEDULED"),
                    )
                    .col(
                        ColumnDef::new(Matches::LockVersion)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ts_col(Matches::CreatedAt))
                    .col(ts_col(Matches::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_matches_tournament_id")
                            .from(Matches::Table, Matches::TournamentId)
                            .to(Tournaments::Table, Tournaments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_matches_home_team_id")
                            .from(Matches::Table, Matches::HomeTeamId)
                            .to(Teams::Table, Teams::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_matches_away_team_id")
                            .from(Matches::Table, Matches::AwayTeamId)
                            .to(Teams::Table, Teams::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_matches_tournament_match_no")
                    .table(Matches::Table)
                    .col(Matches::TournamentId)
                    .col(Matches::MatchNo)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_matches_tournament_stage")
                    .table(Matches::Table)
                    .col(Matches::TournamentId)
                    .col(Matches::Stage)
                    .to_owned(),
            )
            .await?;

        // leagues
        manager
            .create_table(
                Table::create()
                    .table(Leagues::Table)
                    .if_not_exists()
                    .col(id_col(Leagues::Id))
                    .col(
                        ColumnDef::new(Leagues::TournamentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Leagues::OwnerId).big_integer().not_null())
                    .col(ColumnDef::new(Leagues::Name).string().not_null())
                    .col(ColumnDef::new(Leagues::Description).text().null())
                    .col(ColumnDef::new(Leagues::Kind).string_len(16).not_null())
                    .col(ColumnDef::new(Leagues::SocialPlan).string_len(16).null())
                    .col(
                        ColumnDef::new(Leagues::EnterpriseTier)
                            .string_len(16)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Leagues::JoinCode)
                            .string_len(10)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Leagues::BrandLogoUrl).text().null())
                    .col(
                        ColumnDef::new(Leagues::BrandPrimaryColor)
                            .string_len(7)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Leagues::BrandSecondaryColor)
                            .string_len(7)
                            .null(),
                    )
                    .col(ColumnDef::new(Leagues::SocialLinks).text().null())
                    .col(
                        ColumnDef::new(Leagues::LockVersion)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ts_col(Leagues::CreatedAt))
                    .col(ts_col(Leagues::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_leagues_tournament_id")
                            .from(Leagues::Table, Leagues::TournamentId)
                            .to(Tournaments::Table, Tournaments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_leagues_owner_id")
                            .from(Leagues::Table, Leagues::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_leagues_tournament_id")
                    .table(Leagues::Table)
                    .col(Leagues::TournamentId)
                    .to_owned(),
            )
            .await?;

        // departments
        manager
            .create_table(
                Table::create()
                    .table(Departments::Table)
                    .if_not_exists()
                    .col(id_col(Departments::Id))
                    .col(ColumnDef::new(Departments::LeagueId).big_integer().not_null())
                    .col(ColumnDef::new(Departments::Name).string().not_null())
                    .col(ts_col(Departments::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_departments_league_id")
                            .from(Departments::Table, Departments::LeagueId)
                            .to(Leagues::Table, Leagues::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_departments_league_name")
                    .table(Departments::Table)
                    .col(Departments::LeagueId)
                    .col(Departments::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // league_members
        manager
            .create_table(
                Table::create()
                    .table(LeagueMembers::Table)
                    .if_not_exists()
                    .col(id_col(LeagueMembers::Id))
                    .col(
                        ColumnDef::new(LeagueMembers::LeagueId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(LeagueMembers::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(LeagueMembers::Role)
                            .string_len(16)
                            .not_null()
                            .default("MEMBER"),
                    )
                    .col(
                        ColumnDef::new(LeagueMembers::DepartmentId)
                            .big_integer()
                            .null(),
                    )
                    .col(ts_col(LeagueMembers::JoinedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_league_members_league_id")
                            .from(LeagueMembers::Table, LeagueMembers::LeagueId)
                            .to(Leagues::Table, Leagues::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_league_members_user_id")
                            .from(LeagueMembers::Table, LeagueMembers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_league_members_department_id")
                            .from(LeagueMembers::Table, LeagueMembers::DepartmentId)
                            .to(Departments::Table, Departments::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_league_members_league_user")
                    .table(LeagueMembers::Table)
                    .col(LeagueMembers::LeagueId)
                    .col(LeagueMembers::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_league_members_user_id")
                    .table(LeagueMembers::Table)
                    .col(LeagueMembers::UserId)
                    .to_owned(),
            )
            .await?;

        // league_ads
        manager
            .create_table(
                Table::create()
                    .table(LeagueAds::Table)
                    .if_not_exists()
                    .col(id_col(LeagueAds::Id))
                    .col(ColumnDef::new(LeagueAds::LeagueId).big_integer().not_null())
                    .col(ColumnDef::new(LeagueAds::Title).string().not_null())
                    .col(ColumnDef::new(LeagueAds::ImageUrl).text().not_null())
                    .col(ColumnDef::new(LeagueAds::TargetUrl).text().not_null())
                    .col(
                        ColumnDef::new(LeagueAds::Placement)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LeagueAds::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ts_col(LeagueAds::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_league_ads_league_id")
                            .from(LeagueAds::Table, LeagueAds::LeagueId)
                            .to(Leagues::Table, Leagues::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // predictions
        manager
            .create_table(
                Table::create()
                    .table(Predictions::Table)
                    .if_not_exists()
                    .col(id_col(Predictions::Id))
                    .col(ColumnDef::new(Predictions::MemberId).big_integer().not_null())
                    .col(ColumnDef::new(Predictions::MatchId).big_integer().not_null())
                    .col(ColumnDef::new(Predictions::HomeGoals).small_integer().not_null())
                    .col(ColumnDef::new(Predictions::AwayGoals).small_integer().not_null())
                    .col(ColumnDef::new(Predictions::Advances).string_len(8).null())
                    .col(
                        ColumnDef::new(Predictions::Joker)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Predictions::Points).integer().null())
                    .col(
                        ColumnDef::new(Predictions::ExactHit)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Predictions::OutcomeHit)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ts_col(Predictions::CreatedAt))
                    .col(ts_col(Predictions::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_predictions_member_id")
                            .from(Predictions::Table, Predictions::MemberId)
                            .to(LeagueMembers::Table, LeagueMembers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_predictions_match_id")
                            .from(Predictions::Table, Predictions::MatchId)
                            .to(Matches::Table, Matches::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_predictions_member_match")
                    .table(Predictions::Table)
                    .col(Predictions::MemberId)
                    .col(Predictions::MatchId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_predictions_match_id")
                    .table(Predictions::Table)
                    .col(Predictions::MatchId)
                    .to_owned(),
            )
            .await?;

        // bracket_picks
        manager
            .create_table(
                Table::create()
                    .table(BracketPicks::Table)
                    .if_not_exists()
                    .col(id_col(BracketPicks::Id))
                    .col(ColumnDef::new(BracketPicks::MemberId).big_integer().not_null())
                    .col(ColumnDef::new(BracketPicks::MatchId).big_integer().not_null())
                    .col(ColumnDef::new(BracketPicks::TeamId).big_integer().not_null())
                    .col(ColumnDef::new(BracketPicks::Points).integer().null())
                    .col(ts_col(BracketPicks::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bracket_picks_member_id")
                            .from(BracketPicks::Table, BracketPicks::MemberId)
                            .to(LeagueMembers::Table, LeagueMembers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bracket_picks_match_id")
                            .from(BracketPicks::Table, BracketPicks::MatchId)
                            .to(Matches::Table, Matches::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bracket_picks_team_id")
                            .from(BracketPicks::Table, BracketPicks::TeamId)
                            .to(Teams::Table, Teams::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_bracket_picks_member_match")
                    .table(BracketPicks::Table)
                    .col(BracketPicks::MemberId)
                    .col(BracketPicks::MatchId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // reverse dependency order; indexes go with their tables
        manager
            .drop_table(Table::drop().table(BracketPicks::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Predictions::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LeagueAds::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LeagueMembers::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Departments::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Leagues::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Matches::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Teams::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tournaments::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UserCredentials::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}
