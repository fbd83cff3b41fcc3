mod common;
mod support;

use actix_web::http::Method;
use backend_test_support::unique_helpers::unique_email;
use serde_json::json;
use support::app::ADMIN_EMAIL;
use support::seed::{create_league, join, mini_world_cup, seed_tournament};
use support::{call, create_test_app, login, test_state};

#[actix_web::test]
async fn extras_follow_the_plan() {
    let app = create_test_app(test_state().await).await;
    let admin = login(&app, ADMIN_EMAIL).await;
    let wc = seed_tournament(&app, &admin, mini_world_cup()).await;
    let owner = login(&app, &unique_email("owner")).await;

    let (free_id, _) = create_league(&app, &owner, wc.id, json!({ "kind": "SOCIAL" })).await;
    call(
        &app,
        Method::PUT,
        &format!("/api/leagues/{free_id}/branding"),
        Some(&owner),
        Some(json!({ "primary_color": "#006847" })),
    )
    .await
    .assert_problem(403, "FEATURE_NOT_AVAILABLE");

    let (plata_id, _) = create_league(
        &app,
        &owner,
        wc.id,
        json!({ "kind": "ENTERPRISE", "enterprise_tier": "PLATA" }),
    )
    .await;
    let branded = call(
        &app,
        Method::PUT,
        &format!("/api/leagues/{plata_id}/branding"),
        Some(&owner),
        Some(json!({ "primary_color": "#00aa55", "logo_url": "https://cdn.example.com/logo.png" })),
    )
    .await;
    branded.assert_status(200);
    assert_eq!(branded.body["branding"]["primary_color"], "#00AA55");

    call(
        &app,
        Method::PUT,
        &format!("/api/leagues/{plata_id}/branding"),
        Some(&owner),
        Some(json!({ "primary_color": "green" })),
    )
    .await
    .assert_problem(422, "INVALID_COLOR");
    call(
        &app,
        Method::PUT,
        &format!("/api/leagues/{plata_id}/branding"),
        Some(&owner),
        Some(json!({ "logo_url": "http://insecure.example.com/logo.png" })),
    )
    .await
    .assert_problem(422, "INVALID_URL");

    call(
        &app,
        Method::PUT,
        &format!("/api/leagues/{plata_id}/social-links"),
        Some(&owner),
        Some(json!({ "links": { "instagram": "https://instagram.com/oficina" } })),
    )
    .await
    .assert_problem(403, "FEATURE_NOT_AVAILABLE");
}

#[actix_web::test]
async fn role_is_checked_before_the_feature() {
    let app = create_test_app(test_state().await).await;
    let admin = login(&app, ADMIN_EMAIL).await;
    let wc = seed_tournament(&app, &admin, mini_world_cup()).await;
    let owner = login(&app, &unique_email("owner")).await;
    let (league_id, code) = create_league(&app, &owner, wc.id, json!({ "kind": "SOCIAL" })).await;
    let member = login(&app, &unique_email("member")).await;
    join(&app, &member, &code).await.assert_status(201);

    call(
        &app,
        Method::PUT,
        &format!("/api/leagues/{league_id}/branding"),
        Some(&member),
        Some(json!({ "primary_color": "#006847" })),
    )
    .await
    .assert_problem(403, "INSUFFICIENT_ROLE");
}

#[actix_web::test]
async fn diamante_league_runs_departments_and_ads() {
    let app = create_test_app(test_state().await).await;
    let admin = login(&app, ADMIN_EMAIL).await;
    let wc = seed_tournament(&app, &admin, mini_world_cup()).await;
    let owner = login(&app, &unique_email("owner")).await;
    let (league_id, code) = create_league(
        &app,
        &owner,
        wc.id,
        json!({ "kind": "ENTERPRISE", "enterprise_tier": "DIAMANTE" }),
    )
    .await;
    let member = login(&app, &unique_email("member")).await;
    join(&app, &member, &code).await.assert_status(201);
    let member_id = call(&app, Method::GET, "/api/me", Some(&member), None).await.body["id"]
        .as_i64()
        .expect("member id");

    let links = call(
        &app,
        Method::PUT,
        &format!("/api/leagues/{league_id}/social-links"),
        Some(&owner),
        Some(json!({ "links": { "Instagram": "https://instagram.com/oficina", "twitter": "https://x.com/oficina" } })),
    )
    .await;
    links.assert_status(200);
    assert_eq!(links.body["social_links"]["instagram"], "https://instagram.com/oficina");
    assert_eq!(links.body["social_links"]["x"], "https://x.com/oficina");
    call(
        &app,
        Method::PUT,
        &format!("/api/leagues/{league_id}/social-links"),
        Some(&owner),
        Some(json!({ "links": { "myspace": "https://myspace.com/oficina" } })),
    )
    .await
    .assert_problem(422, "INVALID_SOCIAL_NETWORK");

    let dept = call(
        &app,
        Method::POST,
        &format!("/api/leagues/{league_id}/departments"),
        Some(&owner),
        Some(json!({ "name": "Finanzas" })),
    )
    .await;
    dept.assert_status(201);
    let dept_id = dept.body["id"].as_i64().expect("department id");
    call(
        &app,
        Method::POST,
        &format!("/api/leagues/{league_id}/departments"),
        Some(&owner),
        Some(json!({ "name": "Finanzas" })),
    )
    .await
    .assert_problem(409, "DEPARTMENT_EXISTS");

    // Members may place themselves.
    let assigned = call(
        &app,
        Method::PUT,
        &format!("/api/leagues/{league_id}/members/{member_id}/department"),
        Some(&member),
        Some(json!({ "department_id": dept_id })),
    )
    .await;
    assigned.assert_status(200);
    assert_eq!(assigned.body["department_id"], dept_id);

    let listed = call(&app, Method::GET, &format!("/api/leagues/{league_id}/departments"), Some(&member), None).await;
    listed.assert_status(200);
    assert_eq!(listed.body[0]["name"], "Finanzas");

    let ranked = call(
        &app,
        Method::GET,
        &format!("/api/leagues/{league_id}/leaderboard/departments"),
        Some(&member),
        None,
    )
    .await;
    ranked.assert_status(200);
    assert_eq!(ranked.body[0]["department_id"], dept_id);
    assert_eq!(ranked.body[0]["members"], 1);

    let ad = call(
        &app,
        Method::POST,
        &format!("/api/leagues/{league_id}/ads"),
        Some(&owner),
        Some(json!({
            "title": "Promo",
            "image_url": "https://cdn.example.com/promo.png",
            "target_url": "https://shop.example.com",
        })),
    )
    .await;
    ad.assert_status(201);
    assert_eq!(ad.body["placement"], "BANNER");
    let ad_id = ad.body["id"].as_i64().expect("ad id");
    call(
        &app,
        Method::POST,
        &format!("/api/leagues/{league_id}/ads"),
        Some(&owner),
        Some(json!({
            "title": "Paused",
            "image_url": "https://cdn.example.com/paused.png",
            "target_url": "https://shop.example.com",
            "active": false,
        })),
    )
    .await
    .assert_status(201);

    let seen_by_admin = call(&app, Method::GET, &format!("/api/leagues/{league_id}/ads"), Some(&owner), None).await;
    assert_eq!(seen_by_admin.body.as_array().map(Vec::len), Some(2));
    let seen_by_member = call(&app, Method::GET, &format!("/api/leagues/{league_id}/ads"), Some(&member), None).await;
    assert_eq!(seen_by_member.body.as_array().map(Vec::len), Some(1));

    let ad_uri = format!("/api/leagues/{league_id}/ads/{ad_id}");
    call(&app, Method::DELETE, &ad_uri, Some(&member), None)
        .await
        .assert_problem(403, "INSUFFICIENT_ROLE");
    call(&app, Method::DELETE, &ad_uri, Some(&owner), None).await.assert_status(204);
    call(&app, Method::DELETE, &ad_uri, Some(&owner), None)
        .await
        .assert_problem(404, "AD_NOT_FOUND");
}
