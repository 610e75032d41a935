//! Leaderboard integration tests.

mod common;

use common::TestHarness;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use callboard_core::{ProfileFlag, UserId};
use callboard_store::{CallStatStore, LedgerStore};

fn record_calls(harness: &TestHarness, user: i64, times: u64) {
    for _ in 0..times {
        harness
            .store
            .increment_call_count(UserId::new(user))
            .unwrap();
    }
}

#[tokio::test]
async fn empty_leaderboard() {
    let harness = TestHarness::new().await;

    let response = harness.server.get("/api/top-users").await;

    response.assert_status_ok();
    response.assert_json(&json!({"topUsers": []}));
}

#[tokio::test]
async fn top_users_are_ranked_and_named() {
    let harness = TestHarness::new().await;
    record_calls(&harness, 1, 5);
    record_calls(&harness, 2, 2);
    record_calls(&harness, 3, 2);

    Mock::given(method("GET"))
        .and(path("/method/users.get"))
        .and(query_param("user_ids", "1,2,3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": [
                {"id": 1, "first_name": "Ann", "last_name": "Lee", "photo_100": "https://img/1.jpg"},
                {"id": 2, "first_name": "Bo", "last_name": "Kim"}
            ]
        })))
        .expect(1)
        .mount(&harness.identity)
        .await;

    let body: serde_json::Value = harness.server.get("/api/top-users").await.json();
    let top = body["topUsers"].as_array().unwrap();

    assert_eq!(top.len(), 3);
    assert_eq!(top[0]["userId"], 1);
    assert_eq!(top[0]["rank"], 0);
    assert_eq!(top[0]["callCount"], 5);
    assert_eq!(top[0]["name"], "Ann Lee");
    assert_eq!(top[0]["avatar"], "https://img/1.jpg");

    // Ties keep ascending user id
    assert_eq!(top[1]["userId"], 2);
    assert_eq!(top[1]["name"], "Bo Kim");
    assert_eq!(top[2]["userId"], 3);
    assert_eq!(top[2]["name"], "Unknown user");
}

#[tokio::test]
async fn hidden_users_are_anonymous_and_not_looked_up() {
    let harness = TestHarness::new().await;
    record_calls(&harness, 10, 3);
    record_calls(&harness, 11, 1);
    harness
        .store
        .set_flag(UserId::new(10), ProfileFlag::HideMe, true)
        .unwrap();

    Mock::given(method("GET"))
        .and(path("/method/users.get"))
        .and(query_param("user_ids", "11"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": [{"id": 11, "first_name": "Cy", "last_name": ""}]
        })))
        .expect(1)
        .mount(&harness.identity)
        .await;

    let body: serde_json::Value = harness.server.get("/api/top-users").await.json();
    let top = body["topUsers"].as_array().unwrap();

    assert_eq!(top[0]["name"], "Anonymous");
    assert_eq!(top[0]["hideMe"], true);
    assert_eq!(top[0]["avatar"], "");
    assert_eq!(top[1]["name"], "Cy");
}

#[tokio::test]
async fn identity_failure_degrades_to_placeholders() {
    let harness = TestHarness::new().await;
    record_calls(&harness, 20, 1);

    Mock::given(method("GET"))
        .and(path("/method/users.get"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&harness.identity)
        .await;

    let response = harness.server.get("/api/top-users").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["topUsers"][0]["name"], "Unknown user");
}

#[tokio::test]
async fn limit_caps_the_board() {
    let harness = TestHarness::without_providers().await;
    for user in 1..=5 {
        record_calls(&harness, user, 1);
    }

    let body: serde_json::Value = harness
        .server
        .get("/api/top-users")
        .add_query_param("limit", 2)
        .await
        .json();

    assert_eq!(body["topUsers"].as_array().unwrap().len(), 2);
}
