//! Repository functions for the domain layer.
//!
//! Free functions generic over `ConnectionTrait`; each returns domain structs
//! and `DomainError`.

use crate::errors::domain::{DomainError, InfraErrorKind};

pub mod ads;
pub mod bracket_picks;
pub mod departments;
pub mod fixtures;
pub mod leagues;
pub mod members;
pub mod predictions;
pub mod tournaments;
pub mod users;

/// A stored row that no longer parses into its domain type.
pub(crate) fn corrupt_row(table: &str, id: i64, err: DomainError) -> DomainError {
    tracing::error!(table, id, error = %err, "stored row failed domain validation");
    DomainError::infra(
        InfraErrorKind::DataCorruption,
        format!("Stored {table} row {id} is invalid"),
    )
}
