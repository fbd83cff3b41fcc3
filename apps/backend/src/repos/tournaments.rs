//! Tournament and team repository functions.

use sea_orm::ConnectionTrait;
use serde::Serialize;

use crate::adapters::tournaments_sea as tournaments_adapter;
use crate::errors::domain::{DomainError, NotFoundKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tournament {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub prediction_lock_minutes: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: time::OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Team {
    pub id: i64,
    pub tournament_id: i64,
    pub code: String,
    pub name: String,
    /// Group letter; `None` for teams not drawn into a group.
    pub group: Option<char>,
}

pub async fn create_tournament<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    slug: String,
    name: String,
    prediction_lock_minutes: i32,
) -> Result<Tournament, DomainError> {
    let dto = tournaments_adapter::TournamentCreate {
        slug,
        name,
        prediction_lock_minutes,
    };
    let model = tournaments_adapter::create_tournament(conn, dto).await?;
    Ok(Tournament::from(model))
}

pub async fn find_tournament<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    tournament_id: i64,
) -> Result<Option<Tournament>, DomainError> {
    let model = tournaments_adapter::find_by_id(conn, tournament_id).await?;
    Ok(model.map(Tournament::from))
}

pub async fn require_tournament<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    tournament_id: i64,
) -> Result<Tournament, DomainError> {
    find_tournament(conn, tournament_id).await?.ok_or_else(|| {
        DomainError::not_found(
            NotFoundKind::Tournament,
            format!("Tournament {tournament_id} not found"),
        )
    })
}

pub async fn list_tournaments<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<Tournament>, DomainError> {
    let models = tournaments_adapter::list_all(conn).await?;
    Ok(models.into_iter().map(Tournament::from).collect())
}

pub async fn create_team<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    tournament_id: i64,
    code: String,
    name: String,
    group: Option<char>,
) -> Result<Team, DomainError> {
    let dto = tournaments_adapter::TeamCreate {
        tournament_id,
        code,
        name,
        group_code: group.map(String::from),
    };
    let model = tournaments_adapter::create_team(conn, dto).await?;
    Ok(Team::from(model))
}

pub async fn list_teams<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    tournament_id: i64,
) -> Result<Vec<Team>, DomainError> {
    let models = tournaments_adapter::list_teams(conn, tournament_id).await?;
    Ok(models.into_iter().map(Team::from).collect())
}

pub async fn find_team<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    team_id: i64,
) -> Result<Option<Team>, DomainError> {
    let model = tournaments_adapter::find_team(conn, team_id).await?;
    Ok(model.map(Team::from))
}

impl From<crate::entities::tournaments::Model> for Tournament {
    fn from(model: crate::entities::tournaments::Model) -> Self {
        Self {
            id: model.id,
            slug: model.slug,
            name: model.name,
            prediction_lock_minutes: model.prediction_lock_minutes,
            created_at: model.created_at,
        }
    }
}

impl From<crate::entities::teams::Model> for Team {
    fn from(model: crate::entities::teams::Model) -> Self {
        Self {
            id: model.id,
            tournament_id: model.tournament_id,
            code: model.code,
            name: model.name,
            group: model.group_code.and_then(|g| g.chars().next()),
        }
    }
}
