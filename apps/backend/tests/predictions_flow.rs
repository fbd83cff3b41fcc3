mod common;
mod support;

use actix_web::http::Method;
use backend_test_support::unique_helpers::unique_email;
use polla_backend::errors::domain::{DomainError, ValidationKind};
use polla_backend::repos::members;
use polla_backend::services::predictions::{PredictionInput, PredictionService};
use serde_json::{json, Value};
use support::app::ADMIN_EMAIL;
use support::seed::{create_league, join, kickoff, mini_world_cup, record_result, seed_tournament};
use support::{call, create_test_app, login, test_state};
use time::{Duration, OffsetDateTime};

fn by_match(list: &Value, match_id: i64) -> Value {
    list.as_array()
        .expect("array")
        .iter()
        .find(|p| p["match_id"].as_i64() == Some(match_id))
        .cloned()
        .unwrap_or(Value::Null)
}

#[actix_web::test]
async fn predictions_respect_locks_and_validation() {
    let app = create_test_app(test_state().await).await;
    let admin = login(&app, ADMIN_EMAIL).await;
    let wc = seed_tournament(&app, &admin, mini_world_cup()).await;
    let owner = login(&app, &unique_email("owner")).await;
    let (league_id, _) = create_league(&app, &owner, wc.id, json!({ "kind": "SOCIAL" })).await;
    let put = |match_no: i32| format!("/api/leagues/{league_id}/predictions/{}", wc.match_id(match_no));

    let saved = call(
        &app,
        Method::PUT,
        &put(1),
        Some(&owner),
        Some(json!({ "home_goals": 2, "away_goals": 1 })),
    )
    .await;
    saved.assert_status(200);
    assert_eq!(saved.body["home_goals"], 2);
    assert_eq!(saved.body["joker"], false);
    assert!(saved.body["points"].is_null());

    // Overwrite keeps a single row.
    call(&app, Method::PUT, &put(1), Some(&owner), Some(json!({ "home_goals": 3, "away_goals": 0 })))
        .await
        .assert_status(200);
    let mine = call(&app, Method::GET, &format!("/api/leagues/{league_id}/predictions"), Some(&owner), None).await;
    mine.assert_status(200);
    assert_eq!(mine.body.as_array().map(Vec::len), Some(1));
    assert_eq!(by_match(&mine.body, wc.match_id(1))["home_goals"], 3);

    call(&app, Method::PUT, &put(2), Some(&owner), Some(json!({ "home_goals": 0, "away_goals": 0 })))
        .await
        .assert_problem(422, "PREDICTION_LOCKED");
    call(&app, Method::PUT, &put(4), Some(&owner), Some(json!({ "home_goals": 1, "away_goals": 0 })))
        .await
        .assert_problem(422, "TEAMS_UNDECIDED");
    call(&app, Method::PUT, &put(1), Some(&owner), Some(json!({ "home_goals": 21, "away_goals": 0 })))
        .await
        .assert_problem(422, "INVALID_SCORE");
    call(
        &app,
        Method::PUT,
        &put(1),
        Some(&owner),
        Some(json!({ "home_goals": 1, "away_goals": 1, "advances": "HOME" })),
    )
    .await
    .assert_problem(422, "INVALID_ADVANCES");
    call(
        &app,
        Method::PUT,
        &format!("/api/leagues/{league_id}/predictions/987654"),
        Some(&owner),
        Some(json!({ "home_goals": 1, "away_goals": 0 })),
    )
    .await
    .assert_problem(404, "MATCH_NOT_FOUND");
}

#[actix_web::test]
async fn joker_moves_between_open_matches_of_a_phase() {
    let app = create_test_app(test_state().await).await;
    let admin = login(&app, ADMIN_EMAIL).await;
    let wc = seed_tournament(&app, &admin, mini_world_cup()).await;
    let owner = login(&app, &unique_email("owner")).await;
    let (league_id, _) = create_league(&app, &owner, wc.id, json!({ "kind": "SOCIAL" })).await;
    let put = |match_no: i32| format!("/api/leagues/{league_id}/predictions/{}", wc.match_id(match_no));

    call(
        &app,
        Method::PUT,
        &put(1),
        Some(&owner),
        Some(json!({ "home_goals": 1, "away_goals": 0, "joker": true })),
    )
    .await
    .assert_status(200);
    let moved = call(
        &app,
        Method::PUT,
        &put(3),
        Some(&owner),
        Some(json!({ "home_goals": 2, "away_goals": 2, "joker": true })),
    )
    .await;
    moved.assert_status(200);
    assert_eq!(moved.body["joker"], true);

    let mine = call(&app, Method::GET, &format!("/api/leagues/{league_id}/predictions"), Some(&owner), None).await;
    assert_eq!(by_match(&mine.body, wc.match_id(1))["joker"], false);
    assert_eq!(by_match(&mine.body, wc.match_id(3))["joker"], true);
}

#[actix_web::test]
async fn predictions_are_revealed_only_after_lock() {
    let app = create_test_app(test_state().await).await;
    let admin = login(&app, ADMIN_EMAIL).await;
    let wc = seed_tournament(&app, &admin, mini_world_cup()).await;
    let owner = login(&app, &unique_email("owner")).await;
    let (league_id, code) = create_league(&app, &owner, wc.id, json!({ "kind": "SOCIAL" })).await;
    let friend = login(&app, &unique_email("friend")).await;
    join(&app, &friend, &code).await.assert_status(201);

    let reveal = |match_no: i32| {
        format!("/api/leagues/{league_id}/matches/{}/predictions", wc.match_id(match_no))
    };

    call(&app, Method::GET, &reveal(1), Some(&friend), None)
        .await
        .assert_problem(422, "VALIDATION_ERROR");

    let locked = call(&app, Method::GET, &reveal(2), Some(&friend), None).await;
    locked.assert_status(200);
    assert!(locked.body.as_array().is_some());

    let stranger = login(&app, &unique_email("stranger")).await;
    call(&app, Method::GET, &reveal(2), Some(&stranger), None)
        .await
        .assert_problem(403, "NOT_A_MEMBER");
}

#[actix_web::test]
async fn predictions_close_once_a_result_is_recorded() {
    let app = create_test_app(test_state().await).await;
    let admin = login(&app, ADMIN_EMAIL).await;
    let wc = seed_tournament(&app, &admin, mini_world_cup()).await;
    let owner = login(&app, &unique_email("owner")).await;
    let owner_id = call(&app, Method::GET, "/api/me", Some(&owner), None).await.body["id"]
        .as_i64()
        .expect("owner id");
    let (league_id, _) = create_league(&app, &owner, wc.id, json!({ "kind": "SOCIAL" })).await;
    let put = format!("/api/leagues/{league_id}/predictions/{}", wc.match_id(1));

    call(&app, Method::PUT, &put, Some(&owner), Some(json!({ "home_goals": 0, "away_goals": 0 })))
        .await
        .assert_status(200);
    // Kickoff is still two days away.
    record_result(&app, &admin, wc.match_id(1), json!({ "home_goals": 2, "away_goals": 1 }))
        .await
        .assert_status(200);

    call(&app, Method::PUT, &put, Some(&owner), Some(json!({ "home_goals": 2, "away_goals": 1 })))
        .await
        .assert_problem(422, "PREDICTION_LOCKED");

    let mine = call(&app, Method::GET, &format!("/api/leagues/{league_id}/predictions"), Some(&owner), None).await;
    let stored = by_match(&mine.body, wc.match_id(1));
    assert_eq!(stored["home_goals"], 0);
    assert_eq!(stored["points"], 0);

    let board = call(&app, Method::GET, &format!("/api/leagues/{league_id}/leaderboard"), Some(&owner), None).await;
    let entry = board.body["entries"]
        .as_array()
        .expect("entries")
        .iter()
        .find(|e| e["user_id"].as_i64() == Some(owner_id))
        .cloned()
        .unwrap_or(Value::Null);
    assert_eq!(entry["exact_hits"], 0);
    assert_eq!(entry["match_points"], 0);
}

#[actix_web::test]
async fn joker_stays_on_a_match_that_has_locked() {
    let state = test_state().await;
    let app = create_test_app(state.clone()).await;
    let admin = login(&app, ADMIN_EMAIL).await;
    let wc = seed_tournament(&app, &admin, mini_world_cup()).await;
    let owner = login(&app, &unique_email("owner")).await;
    let owner_id = call(&app, Method::GET, "/api/me", Some(&owner), None).await.body["id"]
        .as_i64()
        .expect("owner id");
    let (league_id, _) = create_league(&app, &owner, wc.id, json!({ "kind": "SOCIAL" })).await;

    let conn = state.db().expect("test state has a database");
    let member = members::require_membership(conn, league_id, owner_id)
        .await
        .expect("owner membership");
    let service = PredictionService::new();
    let joker = |home_goals| PredictionInput {
        home_goals,
        away_goals: 0,
        advances: None,
        joker: true,
    };

    let now = OffsetDateTime::now_utc();
    service
        .upsert(conn, &member, wc.match_id(1), joker(1), now)
        .await
        .expect("joker placed on match 1");

    // Match 1 kicks off in two days, match 3 in three.
    let later = now + Duration::days(2) + Duration::hours(1);
    let err = service
        .upsert(conn, &member, wc.match_id(3), joker(2), later)
        .await
        .expect_err("joker is pinned to the locked match");
    assert!(
        matches!(err, DomainError::Validation(ValidationKind::JokerAlreadyUsed, _)),
        "{err}"
    );

    let mine = service.list_mine(conn, &member).await.expect("predictions");
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].match_id, wc.match_id(1));
    assert!(mine[0].predicted.joker);
}

#[actix_web::test]
async fn bracket_closes_at_the_first_knockout_kickoff() {
    let app = create_test_app(test_state().await).await;
    let admin = login(&app, ADMIN_EMAIL).await;
    let mut fixtures = mini_world_cup();
    fixtures["matches"][3]["kickoff_at"] = json!(kickoff(Duration::minutes(-5)));
    let wc = seed_tournament(&app, &admin, fixtures).await;
    let owner = login(&app, &unique_email("owner")).await;
    let (league_id, _) = create_league(&app, &owner, wc.id, json!({ "kind": "SOCIAL" })).await;
    let uri = format!("/api/leagues/{league_id}/bracket");

    call(
        &app,
        Method::PUT,
        &uri,
        Some(&owner),
        Some(json!({ "picks": [{ "match_no": 4, "team_id": wc.team_id("MEX") }] })),
    )
    .await
    .assert_problem(422, "BRACKET_LOCKED");

    let mine = call(&app, Method::GET, &uri, Some(&owner), None).await;
    mine.assert_status(200);
    assert_eq!(mine.body["locked"], true);
    assert_eq!(mine.body["picks"].as_array().map(Vec::len), Some(0));
}
