//! Tournament and league fixtures built through the public API.

use std::collections::HashMap;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::Method;
use actix_web::Error;
use backend_test_support::unique_helpers::unique_slug;
use serde_json::{json, Value};
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};

use super::app::call;

/// Ids handed out for a seeded tournament, keyed by match number and team code.
pub struct SeededTournament {
    pub id: i64,
    pub matches: HashMap<i32, i64>,
    pub teams: HashMap<String, i64>,
}

impl SeededTournament {
    pub fn match_id(&self, match_no: i32) -> i64 {
        self.matches[&match_no]
    }

    pub fn team_id(&self, code: &str) -> i64 {
        self.teams[code]
    }
}

pub fn kickoff(offset: Duration) -> String {
    (OffsetDateTime::now_utc() + offset)
        .format(&Rfc3339)
        .expect("kickoff formats as RFC 3339")
}

/// Two groups of two and a final between the group winners.
///
/// | no | stage | sides       | kickoff |
/// |----|-------|-------------|---------|
/// | 1  | A     | MEX v RSA   | +2 days |
/// | 2  | A     | RSA v MEX   | -1 hour |
/// | 3  | B     | KOR v CZE   | +3 days |
/// | 4  | FINAL | 1A v 1B     | +10 days|
pub fn mini_world_cup() -> Value {
    json!({
        "teams": [
            { "code": "MEX", "name": "Mexico", "group": "A" },
            { "code": "RSA", "name": "South Africa", "group": "A" },
            { "code": "KOR", "name": "Korea Republic", "group": "B" },
            { "code": "CZE", "name": "Czechia", "group": "B" },
        ],
        "matches": [
            { "match_no": 1, "stage": "GROUP", "group": "A", "home_team": "MEX", "away_team": "RSA", "kickoff_at": kickoff(Duration::days(2)) },
            { "match_no": 2, "stage": "GROUP", "group": "A", "home_team": "RSA", "away_team": "MEX", "kickoff_at": kickoff(Duration::hours(-1)) },
            { "match_no": 3, "stage": "GROUP", "group": "B", "home_team": "KOR", "away_team": "CZE", "kickoff_at": kickoff(Duration::days(3)) },
            { "match_no": 4, "stage": "FINAL", "home_slot": "1A", "away_slot": "1B", "kickoff_at": kickoff(Duration::days(10)) },
        ],
    })
}

/// Create a tournament with `fixtures` as a site admin and collect its ids.
pub async fn seed_tournament<S>(app: &S, admin_token: &str, fixtures: Value) -> SeededTournament
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let created = call(
        app,
        Method::POST,
        "/api/admin/tournaments",
        Some(admin_token),
        Some(json!({
            "slug": unique_slug("wc"),
            "name": "Mini World Cup",
            "prediction_lock_minutes": 0,
        })),
    )
    .await;
    created.assert_status(201);
    let id = created.body["id"].as_i64().expect("tournament id");

    call(
        app,
        Method::POST,
        &format!("/api/admin/tournaments/{id}/fixtures"),
        Some(admin_token),
        Some(fixtures),
    )
    .await
    .assert_status(201);

    let detail = call(app, Method::GET, &format!("/api/tournaments/{id}"), Some(admin_token), None).await;
    detail.assert_status(200);
    let teams = detail.body["teams"]
        .as_array()
        .expect("teams array")
        .iter()
        .map(|t| (t["code"].as_str().unwrap_or_default().to_string(), t["id"].as_i64().unwrap_or_default()))
        .collect();

    let listed = call(
        app,
        Method::GET,
        &format!("/api/tournaments/{id}/matches"),
        Some(admin_token),
        None,
    )
    .await;
    listed.assert_status(200);
    let matches = listed
        .body
        .as_array()
        .expect("matches array")
        .iter()
        .map(|m| (m["match_no"].as_i64().unwrap_or_default() as i32, m["id"].as_i64().unwrap_or_default()))
        .collect();

    SeededTournament { id, matches, teams }
}

/// Create a league and return `(league_id, join_code)`.
pub async fn create_league<S>(app: &S, token: &str, tournament_id: i64, plan: Value) -> (i64, String)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let mut body = json!({ "tournament_id": tournament_id, "name": "Oficina" });
    if let (Some(body), Some(plan)) = (body.as_object_mut(), plan.as_object()) {
        body.extend(plan.clone());
    }
    let resp = call(app, Method::POST, "/api/leagues", Some(token), Some(body)).await;
    resp.assert_status(201);
    (
        resp.body["id"].as_i64().expect("league id"),
        resp.body["join_code"].as_str().expect("owner sees join code").to_string(),
    )
}

pub async fn join<S>(app: &S, token: &str, join_code: &str) -> super::app::TestResponse
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    call(
        app,
        Method::POST,
        "/api/leagues/join",
        Some(token),
        Some(json!({ "join_code": join_code })),
    )
    .await
}

pub async fn record_result<S>(app: &S, admin_token: &str, match_id: i64, result: Value) -> super::app::TestResponse
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    call(
        app,
        Method::PUT,
        &format!("/api/admin/matches/{match_id}/result"),
        Some(admin_token),
        Some(result),
    )
    .await
}
