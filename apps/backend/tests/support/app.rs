use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::header::HeaderMap;
use actix_web::http::{Method, StatusCode};
use actix_web::{test, web, App, Error};
use db_infra::config::db::{DbKind, RuntimeEnv};
use polla_backend::config::admin_emails::AdminEmails;
use polla_backend::infra::state::build_state;
use polla_backend::middleware::{RequestTrace, SecurityHeaders, StructuredLogger, TraceSpan};
use polla_backend::routes;
use polla_backend::state::app_state::AppState;
use polla_backend::state::security_config::SecurityConfig;
use serde_json::Value;

pub const ADMIN_EMAIL: &str = "admin@polla.test";
pub const TEST_SECRET: &[u8] = b"test_secret_key_for_testing_purposes_only";

/// Database kind for integration tests: `POLLA_TEST_DB_KIND`, default
/// `sqlite-memory` so every test gets a fresh, migrated database.
fn test_db_kind() -> DbKind {
    std::env::var("POLLA_TEST_DB_KIND")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(DbKind::SqliteMemory)
}

pub async fn test_state() -> AppState {
    build_state()
        .with_db(RuntimeEnv::Test, test_db_kind())
        .with_security(SecurityConfig::new(TEST_SECRET))
        .with_admin_emails(AdminEmails::parse(ADMIN_EMAIL))
        .build()
        .await
        .expect("test state should build")
}

/// The production route table behind the same middleware as `main`, minus
/// CORS and the login rate limiter.
pub async fn create_test_app(
    state: AppState,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = Error> {
    test::init_service(
        App::new()
            .wrap(SecurityHeaders)
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    pub fn code(&self) -> &str {
        self.body["code"].as_str().unwrap_or_default()
    }

    #[track_caller]
    pub fn assert_status(&self, expected: u16) -> &Self {
        assert_eq!(
            self.status.as_u16(),
            expected,
            "unexpected status, body: {}",
            self.body
        );
        self
    }

    #[track_caller]
    pub fn assert_problem(&self, status: u16, code: &str) {
        self.assert_status(status);
        assert_eq!(self.code(), code, "body: {}", self.body);
        assert_eq!(
            self.header("content-type").as_deref(),
            Some("application/problem+json")
        );
    }
}

pub async fn read_json(resp: ServiceResponse<BoxBody>) -> TestResponse {
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = test::read_body(resp).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body should be JSON")
    };
    TestResponse {
        status,
        headers,
        body,
    }
}

/// Send a request with an optional bearer token and JSON body.
pub async fn call<S>(
    app: &S,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> TestResponse
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let mut req = test::TestRequest::default().method(method).uri(uri);
    if let Some(token) = token {
        req = req.insert_header(("Authorization", format!("Bearer {token}")));
    }
    if let Some(body) = body {
        req = req.set_json(body);
    }
    read_json(test::call_service(app, req.to_request()).await).await
}
