use db_infra::config::db::{DbKind, DbOwner, PoolPurpose, RuntimeEnv};
use migration::MigrationCommand;
use sea_orm::DatabaseConnection;
use tracing::info;

use crate::config::admin_emails::AdminEmails;
use crate::error::AppError;
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;

/// Assembles `AppState` for `main` and for tests.
pub struct StateBuilder {
    security_config: SecurityConfig,
    admin_emails: AdminEmails,
    db: Option<(RuntimeEnv, DbKind)>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            security_config: SecurityConfig::default(),
            admin_emails: AdminEmails::default(),
            db: None,
        }
    }

    pub fn with_db(mut self, env: RuntimeEnv, kind: DbKind) -> Self {
        self.db = Some((env, kind));
        self
    }

    pub fn with_security(mut self, security_config: SecurityConfig) -> Self {
        self.security_config = security_config;
        self
    }

    pub fn with_admin_emails(mut self, admin_emails: AdminEmails) -> Self {
        self.admin_emails = admin_emails;
        self
    }

    /// Connects and brings the schema up to date before returning.
    pub async fn build(self) -> Result<AppState, AppError> {
        let state = match self.db {
            Some((env, kind)) => {
                let conn = connect_and_migrate(env, kind).await?;
                AppState::new(conn, self.security_config)
            }
            None => AppState::new_without_db(self.security_config),
        };
        Ok(state.with_admin_emails(self.admin_emails))
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}

async fn connect_and_migrate(env: RuntimeEnv, kind: DbKind) -> Result<DatabaseConnection, AppError> {
    let to_app_err = |e: db_infra::DbInfraError| AppError::config(e.to_string());

    // An in-memory database only exists on its own connection, so it is
    // migrated through the runtime pool instead of a separate admin pool.
    if kind == DbKind::SqliteMemory {
        let conn = db_infra::connect_pool(env, kind, DbOwner::App, PoolPurpose::Runtime)
            .await
            .map_err(to_app_err)?;
        db_infra::orchestrate_migration_internal(&conn, env, kind, MigrationCommand::Up)
            .await
            .map_err(to_app_err)?;
        return Ok(conn);
    }

    db_infra::orchestrate_migration(env, kind, MigrationCommand::Up)
        .await
        .map_err(to_app_err)?;
    let conn = db_infra::connect_pool(env, kind, DbOwner::App, PoolPurpose::Runtime)
        .await
        .map_err(to_app_err)?;
    info!(?env, ?kind, "database ready");
    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builds_without_db() {
        let state = build_state()
            .with_admin_emails(AdminEmails::parse("boss@polla.app"))
            .build()
            .await
            .expect("state");
        assert!(state.db().is_none());
        assert!(state.admin_emails.is_admin("boss@polla.app"));
    }

    #[tokio::test]
    async fn builds_migrated_memory_db() {
        let state = build_state()
            .with_db(RuntimeEnv::Test, DbKind::SqliteMemory)
            .build()
            .await
            .expect("state");
        let conn = state.db().expect("db");
        let latest = migration::get_latest_migration_version(conn)
            .await
            .expect("query");
        assert!(latest.is_some());
    }
}
