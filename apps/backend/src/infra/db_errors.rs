//! SeaORM -> DomainError translation.
//!
//! Adapters return `sea_orm::DbErr`; repos call [`map_db_err`] so services only
//! ever see `DomainError`.

use tracing::{error, warn};

use crate::errors::domain::{
    ConflictKind, DomainError, InfraErrorKind, NotFoundKind, ValidationKind,
};
use crate::logging::pii::Redacted;
use crate::trace_ctx;

/// Prefix of the `DbErr::Custom` payload raised by optimistic updates.
pub const OPTIMISTIC_LOCK_PREFIX: &str = "OPTIMISTIC_LOCK:";

fn mentions_sqlstate(msg: &str, code: &str) -> bool {
    msg.contains(&format!("SQLSTATE({code})")) || msg.contains(&format!("code: {code}"))
}

/// Columns named by SQLite's "UNIQUE constraint failed: t.a, t.b" message.
fn sqlite_unique_columns(msg: &str) -> Option<Vec<&str>> {
    let marker = "UNIQUE constraint failed: ";
    let start = msg.find(marker)? + marker.len();
    let rest = &msg[start..];
    let end = rest
        .find(|c: char| c == '"' || c == '\n' || c == ')')
        .unwrap_or(rest.len());
    Some(
        rest[..end]
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect(),
    )
}

fn sqlite_conflict(columns: &[&str]) -> Option<(ConflictKind, &'static str)> {
    match columns {
        ["user_credentials.email"] => Some((ConflictKind::UniqueEmail, "Email already registered")),
        ["user_credentials.google_sub"] => Some((
            ConflictKind::GoogleSubMismatch,
            "Google account already linked to another user",
        )),
        ["leagues.join_code"] => Some((ConflictKind::JoinCodeConflict, "Join code already exists")),
        ["tournaments.slug"] => Some((ConflictKind::SlugTaken, "Tournament slug already taken")),
        ["teams.tournament_id", "teams.code"] => Some((
            ConflictKind::DuplicateFixture,
            "Team code already exists in this tournament",
        )),
        ["matches.tournament_id", "matches.match_no"] => Some((
            ConflictKind::DuplicateFixture,
            "Match number already exists in this tournament",
        )),
        ["predictions.member_id", "predictions.match_id"] => Some((
            ConflictKind::Other("PREDICTION_EXISTS".into()),
            "Prediction already exists for this match",
        )),
        ["departments.league_id", "departments.name"] => Some((
            ConflictKind::DepartmentExists,
            "Department already exists in this league",
        )),
        _ => None,
    }
}

fn postgres_conflict(msg: &str) -> Option<(ConflictKind, &'static str)> {
    if msg.contains("user_credentials_email_key") {
        return Some((ConflictKind::UniqueEmail, "Email already registered"));
    }
    if msg.contains("user_credentials_google_sub_key") {
        return Some((
            ConflictKind::GoogleSubMismatch,
            "Google account already linked to another user",
        ));
    }
    if msg.contains("leagues_join_code_key") {
        return Some((ConflictKind::JoinCodeConflict, "Join code already exists"));
    }
    if msg.contains("tournaments_slug_key") {
        return Some((ConflictKind::SlugTaken, "Tournament slug already taken"));
    }
    if msg.contains("ux_teams_tournament_code") {
        return Some((
            ConflictKind::DuplicateFixture,
            "Team code already exists in this tournament",
        ));
    }
    if msg.contains("ux_matches_tournament_match_no") {
        return Some((
            ConflictKind::DuplicateFixture,
            "Match number already exists in this tournament",
        ));
    }
    if msg.contains("ux_predictions_member_match") {
        return Some((
            ConflictKind::Other("PREDICTION_EXISTS".into()),
            "Prediction already exists for this match",
        ));
    }
    if msg.contains("ux_departments_league_name") {
        return Some((
            ConflictKind::DepartmentExists,
            "Department already exists in this league",
        ));
    }
    None
}

fn optimistic_lock(payload: &str, trace_id: &str) -> DomainError {
    #[derive(serde::Deserialize)]
    struct LockInfo {
        expected: i32,
        actual: i32,
    }

    match serde_json::from_str::<LockInfo>(payload) {
        Ok(info) => {
            warn!(
                trace_id = %trace_id,
                expected = info.expected,
                actual = info.actual,
                "Optimistic lock conflict"
            );
            DomainError::conflict(
                ConflictKind::OptimisticLock,
                format!(
                    "Resource was modified concurrently (expected version {}, actual version {}). Refresh and retry.",
                    info.expected, info.actual
                ),
            )
        }
        Err(_) => {
            warn!(trace_id = %trace_id, "Optimistic lock conflict without version info");
            DomainError::conflict(
                ConflictKind::OptimisticLock,
                "Resource was modified by another transaction; retry",
            )
        }
    }
}

/// Translate a `DbErr` into a `DomainError` with a PII-safe detail.
pub fn map_db_err(e: sea_orm::DbErr) -> DomainError {
    let msg = e.to_string();
    let trace_id = trace_ctx::trace_id();

    match &e {
        sea_orm::DbErr::RecordNotFound(what) => {
            return DomainError::not_found(NotFoundKind::Other(what.clone()), "Record not found");
        }
        sea_orm::DbErr::Custom(custom) => {
            if let Some(payload) = custom.strip_prefix(OPTIMISTIC_LOCK_PREFIX) {
                return optimistic_lock(payload, &trace_id);
            }
        }
        sea_orm::DbErr::ConnectionAcquire(_) | sea_orm::DbErr::Conn(_) => {
            warn!(trace_id = %trace_id, raw_error = %Redacted(&msg), "Database unavailable");
            return DomainError::infra(InfraErrorKind::DbUnavailable, "Database unavailable");
        }
        _ => {}
    }

    if mentions_sqlstate(&msg, "23505")
        || msg.contains("duplicate key value violates unique constraint")
        || msg.contains("UNIQUE constraint failed")
    {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&msg), "Unique constraint violation");

        let known = sqlite_unique_columns(&msg)
            .and_then(|cols| sqlite_conflict(&cols))
            .or_else(|| postgres_conflict(&msg));
        if let Some((kind, detail)) = known {
            return DomainError::conflict(kind, detail);
        }
        return DomainError::conflict(
            ConflictKind::Other("Unique".into()),
            "Unique constraint violation",
        );
    }

    if mentions_sqlstate(&msg, "23503") || msg.contains("FOREIGN KEY constraint failed") {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&msg), "Foreign key violation");
        return DomainError::validation(
            ValidationKind::Other("FK_VIOLATION".into()),
            "Referenced record does not exist",
        );
    }

    if mentions_sqlstate(&msg, "23514") || msg.contains("CHECK constraint failed") {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&msg), "Check constraint violation");
        return DomainError::validation(
            ValidationKind::Other("CHECK_VIOLATION".into()),
            "Check constraint violation",
        );
    }

    if msg.contains("timed out") || msg.contains("timeout") || msg.contains("database is locked")
    {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&msg), "Database timeout");
        return DomainError::infra(InfraErrorKind::Timeout, "Database timeout");
    }

    error!(trace_id = %trace_id, raw_error = %Redacted(&msg), "Unhandled database error");
    DomainError::infra(
        InfraErrorKind::Other("DbErr".into()),
        "Database operation failed",
    )
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        map_db_err(e)
    }
}
