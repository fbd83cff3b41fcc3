mod common;
mod support;

use actix_web::http::Method;
use actix_web::test;
use backend_test_support::unique_helpers::unique_email;
use serde_json::json;
use support::app::{read_json, ADMIN_EMAIL};
use support::seed::{create_league, join, mini_world_cup, seed_tournament};
use support::{call, create_test_app, login, test_state};

async fn user_id<S>(app: &S, token: &str) -> i64
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<actix_web::body::BoxBody>,
        Error = actix_web::Error,
    >,
{
    call(app, Method::GET, "/api/me", Some(token), None).await.body["id"]
        .as_i64()
        .expect("user id")
}

#[actix_web::test]
async fn create_join_and_list_leagues() {
    let app = create_test_app(test_state().await).await;
    let admin = login(&app, ADMIN_EMAIL).await;
    let wc = seed_tournament(&app, &admin, mini_world_cup()).await;

    let owner = login(&app, &unique_email("owner")).await;
    let created = call(
        &app,
        Method::POST,
        "/api/leagues",
        Some(&owner),
        Some(json!({ "tournament_id": wc.id, "name": "Los Compas", "kind": "SOCIAL", "social_plan": "PLUS" })),
    )
    .await;
    created.assert_status(201);
    assert_eq!(created.body["my_role"], "OWNER");
    assert_eq!(created.body["social_plan"], "PLUS");
    assert_eq!(created.body["features"]["max_members"], 50);
    let league_id = created.body["id"].as_i64().expect("id");
    assert_eq!(
        created.header("etag").as_deref(),
        Some(format!("\"league-{league_id}-v1\"").as_str())
    );
    let code = created.body["join_code"].as_str().expect("join code").to_string();
    assert_eq!(code.len(), 8);

    // Codes are forgiving about case and separators.
    let friend = login(&app, &unique_email("friend")).await;
    let sloppy = format!("{}-{}", &code[..4], &code[4..]).to_lowercase();
    let joined = join(&app, &friend, &sloppy).await;
    joined.assert_status(201);
    assert_eq!(joined.body["my_role"], "MEMBER");
    assert!(joined.body.get("join_code").is_none(), "members never see the code");

    // Joining twice is idempotent.
    join(&app, &friend, &code).await.assert_status(200);

    let listed = call(&app, Method::GET, "/api/leagues", Some(&friend), None).await;
    listed.assert_status(200);
    let ids: Vec<i64> = listed
        .body
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|l| l["id"].as_i64())
        .collect();
    assert_eq!(ids, vec![league_id]);

    let stranger = login(&app, &unique_email("stranger")).await;
    call(&app, Method::GET, &format!("/api/leagues/{league_id}"), Some(&stranger), None)
        .await
        .assert_problem(403, "NOT_A_MEMBER");
}

#[actix_web::test]
async fn join_code_validation() {
    let app = create_test_app(test_state().await).await;
    let user = login(&app, &unique_email("joiner")).await;

    join(&app, &user, "short").await.assert_problem(422, "INVALID_JOIN_CODE");
    join(&app, &user, "ZZZZ-ZZZZ").await.assert_problem(404, "LEAGUE_NOT_FOUND");
}

#[actix_web::test]
async fn free_league_caps_at_ten_members() {
    let app = create_test_app(test_state().await).await;
    let admin = login(&app, ADMIN_EMAIL).await;
    let wc = seed_tournament(&app, &admin, mini_world_cup()).await;
    let owner = login(&app, &unique_email("owner")).await;
    let (league_id, code) = create_league(&app, &owner, wc.id, json!({ "kind": "SOCIAL" })).await;

    for i in 0..9 {
        let member = login(&app, &unique_email(&format!("m{i}"))).await;
        join(&app, &member, &code).await.assert_status(201);
    }
    let late = login(&app, &unique_email("late")).await;
    join(&app, &late, &code).await.assert_problem(422, "MEMBER_CAP_REACHED");

    // Downgrades that would strand members are refused; upgrades free a seat.
    call(
        &app,
        Method::PUT,
        &format!("/api/leagues/{league_id}/plan"),
        Some(&owner),
        Some(json!({ "kind": "ENTERPRISE", "enterprise_tier": "ORO" })),
    )
    .await
    .assert_problem(422, "INVALID_PLAN");
    let upgraded = call(
        &app,
        Method::PUT,
        &format!("/api/leagues/{league_id}/plan"),
        Some(&owner),
        Some(json!({ "kind": "SOCIAL", "social_plan": "PLUS" })),
    )
    .await;
    upgraded.assert_status(200);
    join(&app, &late, &code).await.assert_status(201);

    call(
        &app,
        Method::PUT,
        &format!("/api/leagues/{league_id}/plan"),
        Some(&owner),
        Some(json!({ "kind": "SOCIAL", "social_plan": "FREE" })),
    )
    .await
    .assert_problem(422, "PLAN_DOWNGRADE_BLOCKED");
}

#[actix_web::test]
async fn patch_requires_matching_if_match() {
    let app = create_test_app(test_state().await).await;
    let admin = login(&app, ADMIN_EMAIL).await;
    let wc = seed_tournament(&app, &admin, mini_world_cup()).await;
    let owner = login(&app, &unique_email("owner")).await;
    let (league_id, _) = create_league(&app, &owner, wc.id, json!({ "kind": "SOCIAL" })).await;
    let uri = format!("/api/leagues/{league_id}");

    call(&app, Method::PATCH, &uri, Some(&owner), Some(json!({ "name": "Renamed" })))
        .await
        .assert_problem(428, "PRECONDITION_REQUIRED");

    let stale = test::TestRequest::patch()
        .uri(&uri)
        .insert_header(("Authorization", format!("Bearer {owner}")))
        .insert_header(("If-Match", format!("\"league-{league_id}-v7\"")))
        .set_json(json!({ "name": "Renamed" }))
        .to_request();
    read_json(test::call_service(&app, stale).await)
        .await
        .assert_problem(409, "OPTIMISTIC_LOCK");

    let current = call(&app, Method::GET, &uri, Some(&owner), None).await;
    let etag = current.header("etag").expect("etag");
    let fresh = test::TestRequest::patch()
        .uri(&uri)
        .insert_header(("Authorization", format!("Bearer {owner}")))
        .insert_header(("If-Match", etag.clone()))
        .set_json(json!({ "name": "Renamed", "description": null }))
        .to_request();
    let updated = read_json(test::call_service(&app, fresh).await).await;
    updated.assert_status(200);
    assert_eq!(updated.body["name"], "Renamed");
    assert!(updated.body["description"].is_null());
    assert_ne!(updated.header("etag"), Some(etag));
}

#[actix_web::test]
async fn roles_govern_member_management() {
    let app = create_test_app(test_state().await).await;
    let admin = login(&app, ADMIN_EMAIL).await;
    let wc = seed_tournament(&app, &admin, mini_world_cup()).await;
    let owner = login(&app, &unique_email("owner")).await;
    let (league_id, code) = create_league(&app, &owner, wc.id, json!({ "kind": "SOCIAL" })).await;

    let deputy = login(&app, &unique_email("deputy")).await;
    let pawn = login(&app, &unique_email("pawn")).await;
    join(&app, &deputy, &code).await.assert_status(201);
    join(&app, &pawn, &code).await.assert_status(201);
    let deputy_id = user_id(&app, &deputy).await;
    let pawn_id = user_id(&app, &pawn).await;
    let owner_id = user_id(&app, &owner).await;

    // Plain members can't manage anyone.
    call(
        &app,
        Method::DELETE,
        &format!("/api/leagues/{league_id}/members/{deputy_id}"),
        Some(&pawn),
        None,
    )
    .await
    .assert_problem(403, "INSUFFICIENT_ROLE");

    let promoted = call(
        &app,
        Method::PUT,
        &format!("/api/leagues/{league_id}/members/{deputy_id}/role"),
        Some(&owner),
        Some(json!({ "role": "ADMIN" })),
    )
    .await;
    promoted.assert_status(200);
    assert_eq!(promoted.body["membership"]["role"], "ADMIN");

    call(
        &app,
        Method::PUT,
        &format!("/api/leagues/{league_id}/members/{pawn_id}/role"),
        Some(&owner),
        Some(json!({ "role": "OWNER" })),
    )
    .await
    .assert_problem(422, "INVALID_ROLE");

    // Admins see the join code and may rotate it.
    let seen = call(&app, Method::GET, &format!("/api/leagues/{league_id}"), Some(&deputy), None).await;
    assert_eq!(seen.body["join_code"], code.as_str());
    let rotated = call(
        &app,
        Method::POST,
        &format!("/api/leagues/{league_id}/join-code/regenerate"),
        Some(&deputy),
        None,
    )
    .await;
    rotated.assert_status(200);
    assert_ne!(rotated.body["join_code"], code.as_str());

    call(
        &app,
        Method::DELETE,
        &format!("/api/leagues/{league_id}/members/{owner_id}"),
        Some(&deputy),
        None,
    )
    .await
    .assert_problem(422, "OWNER_CANNOT_LEAVE");

    call(
        &app,
        Method::DELETE,
        &format!("/api/leagues/{league_id}/members/{pawn_id}"),
        Some(&deputy),
        None,
    )
    .await
    .assert_status(204);
    call(&app, Method::GET, &format!("/api/leagues/{league_id}"), Some(&pawn), None)
        .await
        .assert_problem(403, "NOT_A_MEMBER");

    call(&app, Method::POST, &format!("/api/leagues/{league_id}/leave"), Some(&owner), None)
        .await
        .assert_problem(422, "OWNER_CANNOT_LEAVE");
    call(&app, Method::POST, &format!("/api/leagues/{league_id}/leave"), Some(&deputy), None)
        .await
        .assert_status(204);
}

#[actix_web::test]
async fn bad_path_ids_are_rejected() {
    let app = create_test_app(test_state().await).await;
    let user = login(&app, &unique_email("paths")).await;

    call(&app, Method::GET, "/api/leagues/abc", Some(&user), None)
        .await
        .assert_problem(400, "INVALID_PATH_PARAM");
    call(&app, Method::GET, "/api/leagues/999999", Some(&user), None)
        .await
        .assert_problem(404, "LEAGUE_NOT_FOUND");
}
