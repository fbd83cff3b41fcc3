use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::security_config::SecurityConfig;
use crate::config::admin_emails::AdminEmails;
use crate::services::leaderboard_cache::LeaderboardCache;

/// Shared resources handed to every handler through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    /// `None` only in tests that never touch the database.
    pub db: Option<DatabaseConnection>,
    pub security: SecurityConfig,
    pub admin_emails: AdminEmails,
    pub leaderboards: Arc<LeaderboardCache>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, security: SecurityConfig) -> Self {
        Self {
            db: Some(db),
            security,
            admin_emails: AdminEmails::default(),
            leaderboards: Arc::new(LeaderboardCache::new()),
        }
    }

    pub fn new_without_db(security: SecurityConfig) -> Self {
        Self {
            db: None,
            security,
            admin_emails: AdminEmails::default(),
            leaderboards: Arc::new(LeaderboardCache::new()),
        }
    }

    pub fn with_admin_emails(mut self, admin_emails: AdminEmails) -> Self {
        self.admin_emails = admin_emails;
        self
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("db", &self.db.is_some())
            .field("security", &self.security)
            .field("admin_emails", &self.admin_emails)
            .finish_non_exhaustive()
    }
}
