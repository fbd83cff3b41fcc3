//! Department repository functions.

use sea_orm::ConnectionTrait;
use serde::Serialize;

use crate::adapters::departments_sea as departments_adapter;
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Department {
    pub id: i64,
    pub league_id: i64,
    pub name: String,
}

pub async fn create_department<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    league_id: i64,
    name: String,
) -> Result<Department, DomainError> {
    let model = departments_adapter::create_department(conn, league_id, name).await?;
    Ok(Department::from(model))
}

pub async fn list_departments<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    league_id: i64,
) -> Result<Vec<Department>, DomainError> {
    let models = departments_adapter::list_for_league(conn, league_id).await?;
    Ok(models.into_iter().map(Department::from).collect())
}

pub async fn find_department<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    department_id: i64,
) -> Result<Option<Department>, DomainError> {
    let model = departments_adapter::find_by_id(conn, department_id).await?;
    Ok(model.map(Department::from))
}

impl From<crate::entities::departments::Model> for Department {
    fn from(model: crate::entities::departments::Model) -> Self {
        Self {
            id: model.id,
            league_id: model.league_id,
            name: model.name,
        }
    }
}
