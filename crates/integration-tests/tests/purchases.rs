//! Purchase tests: session scoping, forced status, validation.

use axum::http::StatusCode;
use serde_json::json;

use barrel_verse_integration_tests::{TestApp, TestClient};

async fn login_user(app: &TestApp, email: &str) -> TestClient {
    let mut client = app.client();
    let (status, _) = client
        .post(
            "/api/auth/register",
            json!({
                "email": email,
                "password": "password123",
                "name": "Buyer",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    client
}

#[tokio::test]
async fn purchases_require_authentication() {
    let app = TestApp::new();

    let (status, _) = app.client().get("/api/purchases").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .client()
        .post(
            "/api/purchases",
            json!({
                "itemType": "course",
                "itemId": "00000000-0000-4000-8000-000000000000",
                "amount": "19.99",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn buyer_is_taken_from_session_not_body() {
    let app = TestApp::new();
    let mut client = login_user(&app, "buyer@example.com").await;

    let (_, me) = client.get("/api/auth/me").await;
    let my_id = me["id"].as_str().expect("user id");

    let (status, purchase) = client
        .post(
            "/api/purchases",
            json!({
                "itemType": "course",
                "itemId": "11111111-2222-4333-8444-555555555555",
                "amount": "19.99",
                "userId": "99999999-9999-4999-8999-999999999999",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(purchase["userId"], my_id);
}

#[tokio::test]
async fn status_is_forced_to_completed() {
    let app = TestApp::new();
    let mut client = login_user(&app, "buyer@example.com").await;

    let (status, purchase) = client
        .post(
            "/api/purchases",
            json!({
                "itemType": "experience",
                "itemId": "11111111-2222-4333-8444-555555555555",
                "amount": "75.00",
                "status": "pending",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(purchase["status"], "completed");
    assert_eq!(purchase["amount"], "75.00");
}

#[tokio::test]
async fn listing_is_scoped_to_the_caller() {
    let app = TestApp::new();
    let mut alice = login_user(&app, "alice@example.com").await;
    let mut bob = login_user(&app, "bob@example.com").await;

    alice
        .post(
            "/api/purchases",
            json!({
                "itemType": "course",
                "itemId": "11111111-2222-4333-8444-555555555555",
                "amount": "19.99",
            }),
        )
        .await;
    alice
        .post(
            "/api/purchases",
            json!({
                "itemType": "experience",
                "itemId": "22222222-3333-4444-8555-666666666666",
                "amount": "75.00",
            }),
        )
        .await;

    let (_, alice_list) = alice.get("/api/purchases").await;
    assert_eq!(alice_list.as_array().expect("purchase list").len(), 2);

    let (_, bob_list) = bob.get("/api/purchases").await;
    assert_eq!(bob_list.as_array().expect("purchase list").len(), 0);
}

#[tokio::test]
async fn purchase_detail_is_invisible_to_other_users() {
    let app = TestApp::new();
    let mut alice = login_user(&app, "alice@example.com").await;
    let mut bob = login_user(&app, "bob@example.com").await;

    let (_, purchase) = alice
        .post(
            "/api/purchases",
            json!({
                "itemType": "course",
                "itemId": "11111111-2222-4333-8444-555555555555",
                "amount": "19.99",
            }),
        )
        .await;
    let id = purchase["id"].as_str().expect("purchase id");

    let (status, _) = alice.get(&format!("/api/purchases/{id}")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = bob.get(&format!("/api/purchases/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Purchase not found");
}

#[tokio::test]
async fn create_validates_fields() {
    let app = TestApp::new();
    let mut client = login_user(&app, "buyer@example.com").await;

    let (status, body) = client
        .post(
            "/api/purchases",
            json!({
                "itemType": "subscription",
                "itemId": "not-a-uuid",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = body["error"].as_array().expect("field error list");
    let fields: Vec<&str> = errors
        .iter()
        .map(|e| e["field"].as_str().expect("field name"))
        .collect();
    assert!(fields.contains(&"itemType"));
    assert!(fields.contains(&"itemId"));
    assert!(fields.contains(&"amount"));
}
