// Pure error mapping tests: no HTTP server, no database.
use crate::errors::domain::{
    ConflictKind, DomainError, ForbiddenKind, InfraErrorKind, NotFoundKind, ValidationKind,
};
use crate::{AppError, ErrorCode};

#[test]
fn maps_validation_to_422() {
    let de = DomainError::validation(
        ValidationKind::Other("VALIDATION_ERROR".into()),
        "bad field",
    );
    let app: AppError = de.into();
    assert_eq!(app.code(), ErrorCode::ValidationError);
    assert_eq!(app.status().as_u16(), 422);
}

#[test]
fn maps_business_rules_to_specific_codes() {
    let cases = [
        (ValidationKind::PredictionLocked, "PREDICTION_LOCKED"),
        (ValidationKind::BracketLocked, "BRACKET_LOCKED"),
        (ValidationKind::JokerAlreadyUsed, "JOKER_ALREADY_USED"),
        (ValidationKind::MemberCapReached, "MEMBER_CAP_REACHED"),
        (ValidationKind::OwnerCannotLeave, "OWNER_CANNOT_LEAVE"),
        (ValidationKind::TeamsUndecided, "TEAMS_UNDECIDED"),
    ];
    for (kind, expected) in cases {
        let app: AppError = DomainError::validation(kind, "rule").into();
        assert_eq!(app.code().as_str(), expected);
        assert_eq!(app.status().as_u16(), 422);
    }
}

#[test]
fn maps_forbidden_to_403() {
    let app: AppError = DomainError::forbidden(ForbiddenKind::NotAMember, "no").into();
    assert_eq!(app.code(), ErrorCode::NotAMember);
    assert_eq!(app.status().as_u16(), 403);

    let app: AppError = DomainError::forbidden(ForbiddenKind::InsufficientRole, "no").into();
    assert_eq!(app.code(), ErrorCode::InsufficientRole);

    let app: AppError = DomainError::forbidden(ForbiddenKind::FeatureNotAvailable, "no").into();
    assert_eq!(app.code(), ErrorCode::FeatureNotAvailable);
    assert_eq!(app.status().as_u16(), 403);
}

#[test]
fn maps_conflicts() {
    let unique = DomainError::conflict(ConflictKind::UniqueEmail, "email exists");
    let app: AppError = unique.into();
    assert_eq!(app.code().as_str(), "UNIQUE_EMAIL");
    assert_eq!(app.status().as_u16(), 409);

    let lock = DomainError::conflict(ConflictKind::OptimisticLock, "stale");
    let app: AppError = lock.into();
    assert_eq!(app.code().as_str(), "OPTIMISTIC_LOCK");
    assert_eq!(app.status().as_u16(), 409);

    let other = DomainError::conflict(
        ConflictKind::Other("some conflict".to_string()),
        "generic conflict",
    );
    let app: AppError = other.into();
    assert_eq!(app.code().as_str(), "CONFLICT");
    assert_eq!(app.status().as_u16(), 409);
}

#[test]
fn maps_not_found() {
    let nf = DomainError::not_found(NotFoundKind::League, "no league");
    let app: AppError = nf.into();
    assert_eq!(app.code().as_str(), "LEAGUE_NOT_FOUND");
    assert_eq!(app.status().as_u16(), 404);

    let nf = DomainError::not_found(NotFoundKind::Match, "no match");
    let app: AppError = nf.into();
    assert_eq!(app.code().as_str(), "MATCH_NOT_FOUND");
}

#[test]
fn maps_infra() {
    let t = DomainError::infra(InfraErrorKind::Timeout, "timeout");
    let app: AppError = t.into();
    assert_eq!(app.code().as_str(), "DB_TIMEOUT");
    assert_eq!(app.status().as_u16(), 504);
    assert!(matches!(app, AppError::Timeout { .. }));

    let down = DomainError::infra(InfraErrorKind::DbUnavailable, "down");
    let app: AppError = down.into();
    assert_eq!(app.code().as_str(), "DB_UNAVAILABLE");
    assert_eq!(app.status().as_u16(), 503);

    let corr = DomainError::infra(InfraErrorKind::DataCorruption, "bad");
    let app: AppError = corr.into();
    assert_eq!(app.code().as_str(), "DATA_CORRUPTION");
    assert_eq!(app.status().as_u16(), 500);

    let other = DomainError::infra(InfraErrorKind::Other("unknown".to_string()), "other");
    let app: AppError = other.into();
    assert_eq!(app.code().as_str(), "INTERNAL_ERROR");
    assert_eq!(app.status().as_u16(), 500);
}

#[test]
fn constructor_helpers() {
    let validation = DomainError::validation(ValidationKind::InvalidScore, "21 goals");
    assert!(matches!(
        validation,
        DomainError::Validation(ValidationKind::InvalidScore, _)
    ));

    let forbidden = DomainError::forbidden(ForbiddenKind::AdminRequired, "admins only");
    assert!(matches!(
        forbidden,
        DomainError::Forbidden(ForbiddenKind::AdminRequired, _)
    ));

    let not_found = DomainError::not_found(NotFoundKind::User, "user missing");
    assert!(matches!(
        not_found,
        DomainError::NotFound(NotFoundKind::User, _)
    ));

    let other = DomainError::validation_other("free text");
    assert!(matches!(other, DomainError::Validation(ValidationKind::Other(_), _)));
    assert_eq!(format!("{other}"), "validation Other(\"VALIDATION_ERROR\"): free text");
}
