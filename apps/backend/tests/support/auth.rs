//! Login helpers for tests.

use std::time::SystemTime;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::Method;
use actix_web::Error;
use backend_test_support::unique_helpers::unique_str;
use polla_backend::auth::jwt::mint_access_token;
use polla_backend::state::security_config::SecurityConfig;
use serde_json::json;

use super::app::{call, TEST_SECRET};

/// Log in through the API and return the access token.
pub async fn login<S>(app: &S, email: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let name = email.split('@').next().unwrap_or("player");
    let resp = call(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({
            "email": email,
            "name": name,
            "google_sub": unique_str("google"),
        })),
    )
    .await;
    resp.assert_status(200);
    resp.body["token"]
        .as_str()
        .expect("login returns a token")
        .to_string()
}

/// Token minted directly, for users that may not exist.
pub fn bearer(sub: &str, email: &str, issued_at: SystemTime) -> String {
    mint_access_token(sub, email, issued_at, &SecurityConfig::new(TEST_SECRET))
        .expect("should mint token")
}
