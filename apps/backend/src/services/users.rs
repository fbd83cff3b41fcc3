//! Login-time user provisioning.

use sea_orm::ConnectionTrait;
use tracing::{debug, info, warn};

use crate::config::admin_emails::normalize_email;
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};
use crate::logging::pii::Redacted;
use crate::repos::users::{self, User};

/// Shows only the first 4 characters of a google_sub.
fn redact_google_sub(google_sub: &str) -> String {
    match google_sub.char_indices().nth(4) {
        Some((idx, _)) => format!("{}***", &google_sub[..idx]),
        None => "*".repeat(google_sub.chars().count()),
    }
}

/// Username from the provided name, else the email local-part.
fn derive_username(name: Option<&str>, email: &str) -> Option<String> {
    if let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) {
        return Some(name.to_string());
    }
    email
        .split_once('@')
        .map(|(local, _)| local)
        .filter(|local| !local.is_empty())
        .map(str::to_string)
}

fn validate_login(email: &str, google_sub: &str) -> Result<(), DomainError> {
    let valid_email = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid_email {
        return Err(DomainError::validation(
            ValidationKind::InvalidEmail,
            "A valid email address is required",
        ));
    }
    if google_sub.trim().is_empty() {
        return Err(DomainError::validation(
            ValidationKind::InvalidGoogleSub,
            "google_sub must not be empty",
        ));
    }
    Ok(())
}

/// Find or create the user behind a Google login.
///
/// Idempotent by (normalized) email. A different `google_sub` on an email that
/// already has one is a conflict. `is_admin` is re-applied on every login so
/// allowlist changes take effect at the next sign-in.
pub async fn ensure_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
    name: Option<&str>,
    google_sub: &str,
    is_admin: bool,
) -> Result<(User, String), DomainError> {
    let email = normalize_email(email);
    validate_login(&email, google_sub)?;

    match users::find_credentials_by_email(conn, &email).await? {
        Some(credential) => {
            if let Some(existing) = credential.google_sub.as_deref() {
                if existing != google_sub {
                    warn!(
                        user_id = credential.user_id,
                        email = %Redacted(&email),
                        incoming_google_sub = %redact_google_sub(google_sub),
                        existing_google_sub = %redact_google_sub(existing),
                        "Google sub mismatch detected"
                    );
                    return Err(DomainError::conflict(
                        ConflictKind::GoogleSubMismatch,
                        "This email is already linked to a different Google account",
                    ));
                }
            } else {
                info!(
                    user_id = credential.user_id,
                    email = %Redacted(&email),
                    "Linking google_sub to existing credentials"
                );
            }

            users::record_login(conn, &email, google_sub).await?;
            let user = users::set_admin(conn, credential.user_id, is_admin).await?;
            debug!(user_id = user.id, "Repeat login for existing user");
            Ok((user, email))
        }
        None => {
            let username = derive_username(name, &email);
            let user = users::create_user(conn, google_sub, username, is_admin).await?;
            users::create_credentials(conn, user.id, &email, Some(google_sub)).await?;
            info!(
                user_id = user.id,
                email = %Redacted(&email),
                google_sub = %redact_google_sub(google_sub),
                is_admin,
                "First user creation"
            );
            Ok((user, email))
        }
    }
}

/// User plus login email, for `/api/me`.
pub async fn profile<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<(User, Option<String>), DomainError> {
    let user = users::find_user_by_id(conn, user_id)
        .await?
        .ok_or_else(|| DomainError::not_found(NotFoundKind::User, "User not found"))?;
    let email = users::find_credentials_by_user_id(conn, user_id)
        .await?
        .map(|c| c.email);
    Ok((user, email))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_prefers_trimmed_name() {
        assert_eq!(
            derive_username(Some("  Ana  "), "ana@x.io").as_deref(),
            Some("Ana")
        );
        assert_eq!(derive_username(Some("   "), "bob@x.io").as_deref(), Some("bob"));
        assert_eq!(derive_username(None, "@x.io"), None);
    }

    #[test]
    fn login_validation() {
        assert!(validate_login("ana@polla.app", "sub-1").is_ok());
        assert!(matches!(
            validate_login("ana", "sub-1"),
            Err(DomainError::Validation(ValidationKind::InvalidEmail, _))
        ));
        assert!(matches!(
            validate_login("ana@polla.app", "  "),
            Err(DomainError::Validation(ValidationKind::InvalidGoogleSub, _))
        ));
    }

    #[test]
    fn google_sub_redaction() {
        assert_eq!(redact_google_sub("1234567890"), "1234***");
        assert_eq!(redact_google_sub("abc"), "***");
    }
}
