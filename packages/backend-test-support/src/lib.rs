//! Shared helpers for the backend's test binaries: logging setup, Problem
//! Details assertions and unique test data.

pub mod logging;
pub mod problem_details;
pub mod unique_helpers;
