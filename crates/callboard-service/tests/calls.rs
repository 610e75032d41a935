//! Call placement, cancellation and lookup integration tests.

mod common;

use common::{call_body, TestHarness};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use callboard_core::{Achievement, UserId};
use callboard_store::{AchievementStore, CallStatStore, LedgerStore};

// ============================================================================
// Place Call
// ============================================================================

#[tokio::test]
async fn place_call_debits_and_records() {
    let harness = TestHarness::new().await;
    harness.set_balance(10, 3);
    harness.accept_calls(777).await;

    let response = harness
        .server
        .post("/proxy-call")
        .json(&call_body(10, "girls"))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["call_id"], 777);

    let user = UserId::new(10);
    assert_eq!(harness.store.get_balance(user).unwrap(), 2);
    assert_eq!(harness.store.get_call_count(user).unwrap(), 1);
    assert!(harness.store.has_unlocked(user, Achievement::FirstCall).unwrap());
    assert!(harness.store.has_unlocked(user, Achievement::CallToGirl).unwrap());
}

#[tokio::test]
async fn place_call_without_coins_is_rejected() {
    let harness = TestHarness::new().await;
    harness.set_balance(11, 0);
    harness.accept_calls(1).await;

    let response = harness
        .server
        .post("/proxy-call")
        .json(&call_body(11, "guys"))
        .await;

    response.assert_status(axum::http::StatusCode::PAYMENT_REQUIRED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "insufficient_coins");

    // Provider was never contacted
    assert!(harness.calls.received_requests().await.unwrap().is_empty());
    assert_eq!(harness.store.get_balance(UserId::new(11)).unwrap(), 0);
    assert_eq!(harness.store.get_call_count(UserId::new(11)).unwrap(), 0);
}

#[tokio::test]
async fn place_call_lists_missing_fields() {
    let harness = TestHarness::new().await;
    harness.set_balance(12, 1);

    let response = harness
        .server
        .post("/proxy-call")
        .json(&json!({"phone": "7999", "userId": 12}))
        .await;

    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(
        body["error"]["details"]["missing"],
        json!(["campaign_id", "audioclip_text", "category"])
    );
    assert_eq!(harness.store.get_balance(UserId::new(12)).unwrap(), 1);
}

#[tokio::test]
async fn provider_failure_keeps_the_debit() {
    let harness = TestHarness::new().await;
    harness.set_balance(13, 2);

    Mock::given(method("POST"))
        .and(path("/phones/call/"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({"detail": "bad phone"})))
        .mount(&harness.calls)
        .await;

    let response = harness
        .server
        .post("/proxy-call")
        .json(&call_body(13, "girls"))
        .await;

    response.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["details"]["detail"], "bad phone");

    let user = UserId::new(13);
    assert_eq!(harness.store.get_balance(user).unwrap(), 1);
    assert_eq!(harness.store.get_call_count(user).unwrap(), 0);
    assert!(harness.store.list_for(user).unwrap().is_empty());
}

#[tokio::test]
async fn placement_without_call_id_keeps_the_debit() {
    let harness = TestHarness::new().await;
    harness.set_balance(15, 2);

    Mock::given(method("POST"))
        .and(path("/phones/call/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "queued"})))
        .expect(1)
        .mount(&harness.calls)
        .await;

    let response = harness
        .server
        .post("/proxy-call")
        .json(&call_body(15, "guys"))
        .await;

    response.assert_status(axum::http::StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "provider_error");
    assert_eq!(body["error"]["details"]["status"], "queued");

    let user = UserId::new(15);
    assert_eq!(harness.store.get_balance(user).unwrap(), 1);
    assert_eq!(harness.store.get_call_count(user).unwrap(), 0);
    assert!(harness.store.list_for(user).unwrap().is_empty());
}

#[tokio::test]
async fn unreachable_provider_keeps_the_debit() {
    let harness = TestHarness::with_unreachable_call_provider().await;
    harness.set_balance(16, 2);

    let response = harness
        .server
        .post("/proxy-call")
        .json(&call_body(16, "girls"))
        .await;

    response.assert_status(axum::http::StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "provider_error");

    let user = UserId::new(16);
    assert_eq!(harness.store.get_balance(user).unwrap(), 1);
    assert_eq!(harness.store.get_call_count(user).unwrap(), 0);
    assert!(harness.store.list_for(user).unwrap().is_empty());
}

#[tokio::test]
async fn calls_without_provider_return_bad_gateway() {
    let harness = TestHarness::without_providers().await;
    harness.set_balance(14, 1);

    harness
        .server
        .post("/proxy-call")
        .json(&call_body(14, "girls"))
        .await
        .assert_status(axum::http::StatusCode::BAD_GATEWAY);

    assert_eq!(harness.store.get_balance(UserId::new(14)).unwrap(), 1);
}

// ============================================================================
// Remove Call
// ============================================================================

#[tokio::test]
async fn remove_call_forwards_to_provider() {
    let harness = TestHarness::new().await;

    Mock::given(method("POST"))
        .and(path("/phones/remove_call/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "removed"})))
        .expect(1)
        .mount(&harness.calls)
        .await;

    let response = harness
        .server
        .post("/proxy-remove-call")
        .json(&json!({"call_id": 99, "phone": "7999", "campaign_id": "555"}))
        .await;

    response.assert_status_ok();
    response.assert_json(&json!({"status": "removed"}));
}

#[tokio::test]
async fn remove_call_requires_all_fields() {
    let harness = TestHarness::new().await;

    let response = harness
        .server
        .post("/proxy-remove-call")
        .json(&json!({"call_id": 99}))
        .await;

    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["details"]["missing"], json!(["phone", "campaign_id"]));
}

// ============================================================================
// Call Info
// ============================================================================

#[tokio::test]
async fn call_info_returns_record_url() {
    let harness = TestHarness::new().await;

    Mock::given(method("GET"))
        .and(path("/phones/call_by_id/"))
        .and(query_param("call_id", "321"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"call_id": 321, "status": "answered", "recorded_audio": "https://rec.example/321.mp3"}
        ])))
        .mount(&harness.calls)
        .await;

    let response = harness.server.get("/get-call-info/321").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Call info retrieved");
    assert_eq!(body["call_info"]["status"], "answered");
    assert_eq!(body["record_url"], "https://rec.example/321.mp3");
}

#[tokio::test]
async fn call_info_for_unknown_call_is_provider_error() {
    let harness = TestHarness::new().await;

    Mock::given(method("GET"))
        .and(path("/phones/call_by_id/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&harness.calls)
        .await;

    harness
        .server
        .get("/get-call-info/404")
        .await
        .assert_status(axum::http::StatusCode::BAD_GATEWAY);
}
