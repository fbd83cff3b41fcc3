//! Error codes for the Polla backend API.
//!
//! Every machine-readable code the API can return lives here. Add new codes to
//! this enum; never pass ad-hoc strings as error codes.

use core::fmt;

/// Centralized error codes. Each variant maps to the SCREAMING_SNAKE_CASE
/// string that appears in Problem Details responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication & Authorization
    Unauthorized,
    UnauthorizedMissingBearer,
    UnauthorizedInvalidJwt,
    UnauthorizedExpiredJwt,
    Forbidden,
    ForbiddenUserNotFound,
    /// Caller is not a member of the league
    NotAMember,
    /// Caller's league role is too low for the operation
    InsufficientRole,
    /// Site-admin endpoint called by a regular user
    AdminRequired,
    /// League plan doesn't include the requested feature
    FeatureNotAvailable,

    // Request Validation
    InvalidEmail,
    InvalidGoogleSub,
    InvalidPathParam,
    InvalidScore,
    InvalidAdvances,
    InvalidPenaltyWinner,
    InvalidStage,
    InvalidSlotCode,
    InvalidFixture,
    InvalidPlan,
    InvalidColor,
    InvalidUrl,
    InvalidSocialNetwork,
    InvalidJoinCode,
    InvalidBracketPick,
    InvalidRole,
    InvalidName,
    ValidationError,
    BadRequest,
    InvalidHeader,
    PreconditionRequired,

    // Business rules
    PredictionLocked,
    BracketLocked,
    TeamsUndecided,
    JokerAlreadyUsed,
    MemberCapReached,
    OwnerCannotLeave,
    PlanDowngradeBlocked,

    // Resource Not Found
    UserNotFound,
    TournamentNotFound,
    MatchNotFound,
    TeamNotFound,
    LeagueNotFound,
    MemberNotFound,
    DepartmentNotFound,
    AdNotFound,
    NotFound,

    // Conflicts
    GoogleSubMismatch,
    JoinCodeConflict,
    UniqueEmail,
    SlugTaken,
    DuplicateFixture,
    DepartmentExists,
    OptimisticLock,
    Conflict,

    // System Errors
    DbError,
    DbUnavailable,
    DbPoolExhausted,
    DbTimeout,
    UniqueViolation,
    FkViolation,
    CheckViolation,
    RecordNotFound,
    Internal,
    InternalError,
    ConfigError,
    DataCorruption,
}

impl ErrorCode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::UnauthorizedMissingBearer => "UNAUTHORIZED_MISSING_BEARER",
            Self::UnauthorizedInvalidJwt => "UNAUTHORIZED_INVALID_JWT",
            Self::UnauthorizedExpiredJwt => "UNAUTHORIZED_EXPIRED_JWT",
            Self::Forbidden => "FORBIDDEN",
            Self::ForbiddenUserNotFound => "FORBIDDEN_USER_NOT_FOUND",
            Self::NotAMember => "NOT_A_MEMBER",
            Self::InsufficientRole => "INSUFFICIENT_ROLE",
            Self::AdminRequired => "ADMIN_REQUIRED",
            Self::FeatureNotAvailable => "FEATURE_NOT_AVAILABLE",

            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidGoogleSub => "INVALID_GOOGLE_SUB",
            Self::InvalidPathParam => "INVALID_PATH_PARAM",
            Self::InvalidScore => "INVALID_SCORE",
            Self::InvalidAdvances => "INVALID_ADVANCES",
            Self::InvalidPenaltyWinner => "INVALID_PENALTY_WINNER",
            Self::InvalidStage => "INVALID_STAGE",
            Self::InvalidSlotCode => "INVALID_SLOT_CODE",
            Self::InvalidFixture => "INVALID_FIXTURE",
            Self::InvalidPlan => "INVALID_PLAN",
            Self::InvalidColor => "INVALID_COLOR",
            Self::InvalidUrl => "INVALID_URL",
            Self::InvalidSocialNetwork => "INVALID_SOCIAL_NETWORK",
            Self::InvalidJoinCode => "INVALID_JOIN_CODE",
            Self::InvalidBracketPick => "INVALID_BRACKET_PICK",
            Self::InvalidRole => "INVALID_ROLE",
            Self::InvalidName => "INVALID_NAME",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::InvalidHeader => "INVALID_HEADER",
            Self::PreconditionRequired => "PRECONDITION_REQUIRED",

            Self::PredictionLocked => "PREDICTION_LOCKED",
            Self::BracketLocked => "BRACKET_LOCKED",
            Self::TeamsUndecided => "TEAMS_UNDECIDED",
            Self::JokerAlreadyUsed => "JOKER_ALREADY_USED",
            Self::MemberCapReached => "MEMBER_CAP_REACHED",
            Self::OwnerCannotLeave => "OWNER_CANNOT_LEAVE",
            Self::PlanDowngradeBlocked => "PLAN_DOWNGRADE_BLOCKED",

            Self::UserNotFound => "USER_NOT_FOUND",
            Self::TournamentNotFound => "TOURNAMENT_NOT_FOUND",
            Self::MatchNotFound => "MATCH_NOT_FOUND",
            Self::TeamNotFound => "TEAM_NOT_FOUND",
            Self::LeagueNotFound => "LEAGUE_NOT_FOUND",
            Self::MemberNotFound => "MEMBER_NOT_FOUND",
            Self::DepartmentNotFound => "DEPARTMENT_NOT_FOUND",
            Self::AdNotFound => "AD_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::GoogleSubMismatch => "GOOGLE_SUB_MISMATCH",
            Self::JoinCodeConflict => "JOIN_CODE_CONFLICT",
            Self::UniqueEmail => "UNIQUE_EMAIL",
            Self::SlugTaken => "SLUG_TAKEN",
            Self::DuplicateFixture => "DUPLICATE_FIXTURE",
            Self::DepartmentExists => "DEPARTMENT_EXISTS",
            Self::OptimisticLock => "OPTIMISTIC_LOCK",
            Self::Conflict => "CONFLICT",

            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbPoolExhausted => "DB_POOL_EXHAUSTED",
            Self::DbTimeout => "DB_TIMEOUT",
            Self::UniqueViolation => "UNIQUE_VIOLATION",
            Self::FkViolation => "FK_VIOLATION",
            Self::CheckViolation => "CHECK_VIOLATION",
            Self::RecordNotFound => "RECORD_NOT_FOUND",
            Self::Internal => "INTERNAL",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
            Self::DataCorruption => "DATA_CORRUPTION",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
