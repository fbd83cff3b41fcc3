use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::domain::{DomainError, ForbiddenKind, ValidationKind};

/// Role of a member inside one league.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LeagueRole {
    Owner,
    Admin,
    Member,
}

impl LeagueRole {
    pub const fn as_str(&self) -> &'static str {
        match self {
            LeagueRole::Owner => "OWNER",
            LeagueRole::Admin => "ADMIN",
            LeagueRole::Member => "MEMBER",
        }
    }

    const fn level(&self) -> u8 {
        match self {
            LeagueRole::Owner => 3,
            LeagueRole::Admin => 2,
            LeagueRole::Member => 1,
        }
    }

    pub fn at_least(&self, min: LeagueRole) -> bool {
        self.level() >= min.level()
    }

    /// Forbidden unless this role reaches `min`.
    pub fn require(&self, min: LeagueRole) -> Result<(), DomainError> {
        if self.at_least(min) {
            Ok(())
        } else {
            Err(DomainError::forbidden(
                ForbiddenKind::InsufficientRole,
                format!("Requires league role {min} or higher"),
            ))
        }
    }
}

impl fmt::Display for LeagueRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeagueRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OWNER" => Ok(LeagueRole::Owner),
            "ADMIN" => Ok(LeagueRole::Admin),
            "MEMBER" => Ok(LeagueRole::Member),
            _ => Err(DomainError::validation(
                ValidationKind::InvalidRole,
                format!("Unknown role '{s}'"),
            )),
        }
    }
}
