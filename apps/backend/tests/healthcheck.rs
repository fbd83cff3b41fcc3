mod common;
mod support;

use actix_web::http::Method;
use support::{call, create_test_app, test_state};

#[actix_web::test]
async fn health_reports_db_and_migration() {
    let app = create_test_app(test_state().await).await;

    let resp = call(&app, Method::GET, "/health", None, None).await;
    resp.assert_status(200);
    assert_eq!(resp.body["status"], "ok");
    assert_eq!(resp.body["db"], "ok");
    assert!(resp.body["migration"].is_string(), "body: {}", resp.body);
    assert!(resp.body.get("db_error").is_none());
    assert!(resp.header("x-trace-id").is_some());
    assert_eq!(resp.header("x-content-type-options").as_deref(), Some("nosniff"));
}

#[actix_web::test]
async fn health_without_database_still_answers() {
    let state = polla_backend::build_state()
        .build()
        .await
        .expect("state without db");
    let app = create_test_app(state).await;

    let resp = call(&app, Method::GET, "/health", None, None).await;
    resp.assert_status(200);
    assert_eq!(resp.body["db"], "unavailable");
}
