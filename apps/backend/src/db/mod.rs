pub mod txn;
pub mod txn_policy;

use sea_orm::DatabaseConnection;

use crate::error::AppError;
use crate::state::app_state::AppState;

/// Database connection from state, or 503 when the app runs without one.
pub fn require_db(state: &AppState) -> Result<&DatabaseConnection, AppError> {
    state
        .db()
        .ok_or_else(|| AppError::db_unavailable("Database not configured"))
}

#[cfg(test)]
mod tests {
    use actix_web::ResponseError;

    use super::*;
    use crate::state::security_config::SecurityConfig;

    #[test]
    fn missing_db_is_service_unavailable() {
        let state = AppState::new_without_db(SecurityConfig::default());

        let err = require_db(&state).expect_err("no db configured");
        assert!(matches!(err, AppError::DbUnavailable { .. }));
        assert_eq!(
            err.error_response().status(),
            actix_web::http::StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
