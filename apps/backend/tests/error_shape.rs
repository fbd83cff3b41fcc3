// Every failure leaves as RFC 7807 Problem Details carrying the request's trace id.

mod common;
mod support;

use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::problem_details::assert_problem_details_from_service_response;
use backend_test_support::unique_helpers::unique_email;
use support::{create_test_app, login, test_state};

#[actix_web::test]
async fn malformed_json_is_a_bad_request() {
    let app = create_test_app(test_state().await).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .insert_header(("content-type", "application/json"))
        .set_payload("{ not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(resp, "BAD_REQUEST", StatusCode::BAD_REQUEST, None)
        .await;
}

#[actix_web::test]
async fn wrong_content_type_is_rejected() {
    let app = create_test_app(test_state().await).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .insert_header(("content-type", "text/plain"))
        .set_payload("email=x")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(resp, "INVALID_HEADER", StatusCode::BAD_REQUEST, None)
        .await;
}

#[actix_web::test]
async fn domain_errors_carry_type_and_trace_id() {
    let app = create_test_app(test_state().await).await;
    let token = login(&app, &unique_email("shape")).await;

    let req = test::TestRequest::get()
        .uri("/api/tournaments/424242")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "TOURNAMENT_NOT_FOUND",
        StatusCode::NOT_FOUND,
        None,
    )
    .await;
}

#[actix_web::test]
async fn path_params_are_named_in_the_detail() {
    let app = create_test_app(test_state().await).await;
    let token = login(&app, &unique_email("paths")).await;

    let req = test::TestRequest::get()
        .uri("/api/tournaments/not-a-number/matches")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "INVALID_PATH_PARAM",
        StatusCode::BAD_REQUEST,
        Some("tournament_id"),
    )
    .await;
}
