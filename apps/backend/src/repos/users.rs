//! User repository functions for domain layer (generic over ConnectionTrait).

use sea_orm::ConnectionTrait;

use crate::adapters::users_sea as users_adapter;
use crate::errors::domain::{DomainError, NotFoundKind};

/// User domain model
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub sub: String,
    pub username: Option<String>,
    pub is_admin: bool,
    pub created_at: time::OffsetDateTime,
    pub updated_at: time::OffsetDateTime,
}

/// User credentials domain model
#[derive(Debug, Clone, PartialEq)]
pub struct UserCredentials {
    pub id: i64,
    pub user_id: i64,
    pub email: String,
    pub google_sub: Option<String>,
    pub last_login: Option<time::OffsetDateTime>,
}

pub async fn find_credentials_by_email<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
) -> Result<Option<UserCredentials>, DomainError> {
    let credential = users_adapter::find_credentials_by_email(conn, email).await?;
    Ok(credential.map(UserCredentials::from))
}

pub async fn find_credentials_by_user_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Option<UserCredentials>, DomainError> {
    let credential = users_adapter::find_credentials_by_user_id(conn, user_id).await?;
    Ok(credential.map(UserCredentials::from))
}

pub async fn create_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    sub: &str,
    username: Option<String>,
    is_admin: bool,
) -> Result<User, DomainError> {
    let dto = users_adapter::UserCreate::new(sub, username).with_admin(is_admin);
    let user = users_adapter::create_user(conn, dto).await?;
    Ok(User::from(user))
}

pub async fn create_credentials<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    email: &str,
    google_sub: Option<&str>,
) -> Result<UserCredentials, DomainError> {
    let mut dto = users_adapter::CredentialsCreate::new(user_id, email);
    if let Some(sub) = google_sub {
        dto = dto.with_google_sub(sub);
    }
    let credential = users_adapter::create_credentials(conn, dto).await?;
    Ok(UserCredentials::from(credential))
}

/// Stamp the login time, linking `google_sub` if the credentials had none.
pub async fn record_login<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
    google_sub: &str,
) -> Result<UserCredentials, DomainError> {
    let credential = users_adapter::find_credentials_by_email(conn, email)
        .await?
        .ok_or_else(|| DomainError::not_found(NotFoundKind::User, "No credentials for email"))?;
    let updated =
        users_adapter::record_login(conn, credential, Some(google_sub.to_string())).await?;
    Ok(UserCredentials::from(updated))
}

pub async fn set_admin<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    is_admin: bool,
) -> Result<User, DomainError> {
    let user = users_adapter::find_user_by_id(conn, user_id)
        .await?
        .ok_or_else(|| DomainError::not_found(NotFoundKind::User, "User not found"))?;
    let user = users_adapter::set_admin(conn, user, is_admin).await?;
    Ok(User::from(user))
}

pub async fn find_user_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Option<User>, DomainError> {
    let user = users_adapter::find_user_by_id(conn, user_id).await?;
    Ok(user.map(User::from))
}

pub async fn find_user_by_sub<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    sub: &str,
) -> Result<Option<User>, DomainError> {
    let user = users_adapter::find_user_by_sub(conn, sub).await?;
    Ok(user.map(User::from))
}

pub async fn find_users_by_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_ids: Vec<i64>,
) -> Result<Vec<User>, DomainError> {
    let users = users_adapter::find_users_by_ids(conn, user_ids).await?;
    Ok(users.into_iter().map(User::from).collect())
}

impl User {
    /// Username, or a stable fallback for users who never set one.
    pub fn display_name(&self) -> String {
        self.username
            .clone()
            .unwrap_or_else(|| format!("user-{}", self.id))
    }
}

// Conversions between SeaORM models and domain models

impl From<crate::entities::users::Model> for User {
    fn from(model: crate::entities::users::Model) -> Self {
        Self {
            id: model.id,
            sub: model.sub,
            username: model.username,
            is_admin: model.is_admin,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<crate::entities::user_credentials::Model> for UserCredentials {
    fn from(model: crate::entities::user_credentials::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            email: model.email,
            google_sub: model.google_sub,
            last_login: model.last_login,
        }
    }
}
