//! Infrastructure: DB error translation and state assembly.

pub mod db_errors;
pub mod state;
