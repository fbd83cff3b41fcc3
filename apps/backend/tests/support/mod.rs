#![allow(dead_code)]

pub mod app;
pub mod auth;
pub mod seed;

pub use app::{call, create_test_app, read_json, test_state, TestResponse};
pub use auth::{bearer, login};
