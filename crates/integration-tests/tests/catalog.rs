//! Catalogue tests: publish visibility, admin gating, CRUD semantics.

use axum::http::StatusCode;
use serde_json::json;

use barrel_verse_integration_tests::{TestApp, TestClient};

async fn login_non_admin(app: &TestApp) -> TestClient {
    let mut client = app.client();
    let (status, _) = client
        .post(
            "/api/auth/register",
            json!({
                "email": "customer@example.com",
                "password": "password123",
                "name": "Customer",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    client
}

#[tokio::test]
async fn admin_routes_reject_unauthenticated_with_401() {
    let app = TestApp::new();
    let mut client = app.client();

    let (status, _) = client.get("/api/admin/courses").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = client
        .post("/api/admin/courses", json!({ "title": "x" }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_routes_reject_non_admin_with_403() {
    let app = TestApp::new();
    let mut client = login_non_admin(&app).await;

    let (status, body) = client.get("/api/admin/courses").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Forbidden - admin access required");

    let (status, _) = client.get("/api/admin/experiences").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn course_defaults_to_published() {
    let app = TestApp::new();
    let mut admin = app.register_admin("admin@example.com", "password123").await;

    let (status, created) = admin
        .post(
            "/api/admin/courses",
            json!({
                "title": "Barrel Aging Masterclass",
                "description": "Hands-on barrel finishing",
                "price": "149.00",
                "category": "masterclass",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["isPublished"], true);

    let (status, list) = app.client().get("/api/courses").await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = list
        .as_array()
        .expect("course list")
        .iter()
        .map(|c| c["title"].as_str().expect("title"))
        .collect();
    assert!(titles.contains(&"Barrel Aging Masterclass"));
}

#[tokio::test]
async fn unpublished_course_hidden_from_public_but_visible_to_admin() {
    let app = TestApp::new();
    let mut admin = app.register_admin("admin@example.com", "password123").await;

    let (_, created) = admin
        .post(
            "/api/admin/courses",
            json!({
                "title": "Unreleased Video Series",
                "description": "Coming soon",
                "price": "59.00",
                "category": "video",
                "isPublished": false,
            }),
        )
        .await;
    let id = created["id"].as_str().expect("course id");

    let (status, list) = app.client().get("/api/courses").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().expect("course list").len(), 0);

    // Public detail 404s exactly like a missing id
    let (status, body) = app.client().get(&format!("/api/courses/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Course not found");

    // Admin sees it in both list and detail
    let (_, admin_list) = admin.get("/api/admin/courses").await;
    assert_eq!(admin_list.as_array().expect("course list").len(), 1);
    let (status, _) = admin.get(&format!("/api/admin/courses/{id}")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn price_round_trips_exactly() {
    let app = TestApp::new();
    let mut admin = app.register_admin("admin@example.com", "password123").await;

    let (_, created) = admin
        .post(
            "/api/admin/courses",
            json!({
                "title": "Tasting Fundamentals",
                "description": "Palate training",
                "price": "19.99",
                "category": "video",
            }),
        )
        .await;
    let id = created["id"].as_str().expect("course id");
    assert_eq!(created["price"], "19.99");

    let (_, fetched) = app.client().get(&format!("/api/courses/{id}")).await;
    assert_eq!(fetched["price"], "19.99");
}

#[tokio::test]
async fn price_is_normalized_to_two_decimal_places() {
    let app = TestApp::new();
    let mut admin = app.register_admin("admin@example.com", "password123").await;

    // A sub-2-scale input serializes the way NUMERIC(10, 2) would hand it back
    let (_, created) = admin
        .post(
            "/api/admin/courses",
            json!({
                "title": "Cellar Tour",
                "description": "Behind the barrels",
                "price": "7.5",
                "category": "masterclass",
            }),
        )
        .await;
    let id = created["id"].as_str().expect("course id");
    assert_eq!(created["price"], "7.50");

    let (_, fetched) = app.client().get(&format!("/api/courses/{id}")).await;
    assert_eq!(fetched["price"], "7.50");
}

#[tokio::test]
async fn create_course_collects_field_errors() {
    let app = TestApp::new();
    let mut admin = app.register_admin("admin@example.com", "password123").await;

    let (status, body) = admin
        .post(
            "/api/admin/courses",
            json!({
                "description": "No title",
                "price": "12.345",
                "category": "webinar",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = body["error"].as_array().expect("field error list");
    let fields: Vec<&str> = errors
        .iter()
        .map(|e| e["field"].as_str().expect("field name"))
        .collect();
    assert!(fields.contains(&"title"));
    assert!(fields.contains(&"price"));
    assert!(fields.contains(&"category"));
}

#[tokio::test]
async fn update_merges_supplied_fields_only() {
    let app = TestApp::new();
    let mut admin = app.register_admin("admin@example.com", "password123").await;

    let (_, created) = admin
        .post(
            "/api/admin/courses",
            json!({
                "title": "Blending Workshop",
                "description": "Blend your own bottle",
                "price": "99.00",
                "category": "masterclass",
                "level": "beginner",
            }),
        )
        .await;
    let id = created["id"].as_str().expect("course id");

    let (status, updated) = admin
        .put(
            &format!("/api/admin/courses/{id}"),
            json!({ "price": "129.00", "level": "intermediate" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["price"], "129.00");
    assert_eq!(updated["level"], "intermediate");
    assert_eq!(updated["title"], "Blending Workshop");
    assert_eq!(updated["createdAt"], created["createdAt"]);
    assert_ne!(updated["updatedAt"], created["updatedAt"]);
}

#[tokio::test]
async fn update_missing_course_is_404_and_mutates_nothing() {
    let app = TestApp::new();
    let mut admin = app.register_admin("admin@example.com", "password123").await;

    admin
        .post(
            "/api/admin/courses",
            json!({
                "title": "Only Course",
                "description": "The one",
                "price": "10.00",
                "category": "video",
            }),
        )
        .await;

    let missing = "00000000-0000-4000-8000-000000000000";
    let (status, body) = admin
        .put(
            &format!("/api/admin/courses/{missing}"),
            json!({ "title": "Hijacked" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Course not found");

    let (_, list) = admin.get("/api/admin/courses").await;
    let courses = list.as_array().expect("course list");
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0]["title"], "Only Course");
}

#[tokio::test]
async fn delete_twice_reports_not_found_second_time() {
    let app = TestApp::new();
    let mut admin = app.register_admin("admin@example.com", "password123").await;

    let (_, created) = admin
        .post(
            "/api/admin/courses",
            json!({
                "title": "Ephemeral",
                "description": "Gone soon",
                "price": "5.00",
                "category": "video",
            }),
        )
        .await;
    let id = created["id"].as_str().expect("course id");

    let (status, body) = admin.delete(&format!("/api/admin/courses/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _) = admin.delete(&format!("/api/admin/courses/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn experience_attendee_count_is_server_authoritative() {
    let app = TestApp::new();
    let mut admin = app.register_admin("admin@example.com", "password123").await;

    let (status, created) = admin
        .post(
            "/api/admin/experiences",
            json!({
                "title": "Distillery Tour",
                "description": "Walk the rickhouse",
                "price": "75.00",
                "location": "Louisville, KY",
                "maxAttendees": 24,
                "currentAttendees": 500,
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["currentAttendees"], 0);
    assert_eq!(created["maxAttendees"], 24);
}

#[tokio::test]
async fn experience_date_round_trips() {
    let app = TestApp::new();
    let mut admin = app.register_admin("admin@example.com", "password123").await;

    let (status, created) = admin
        .post(
            "/api/admin/experiences",
            json!({
                "title": "Harvest Dinner",
                "description": "Five courses in the barrel room",
                "price": "150.00",
                "date": "2026-09-12T18:00:00Z",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let id = created["id"].as_str().expect("experience id");
    let (_, fetched) = app.client().get(&format!("/api/experiences/{id}")).await;
    assert_eq!(fetched["date"], "2026-09-12T18:00:00Z");
}
