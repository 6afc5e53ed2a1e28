use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use chrono::Duration;
use http_body_util::BodyExt;
use migration::MigratorTrait;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::Engine;
use server::{SESSION_COOKIE, ServerState, router};

// "alice:secret"
const BASIC: &str = "Basic YWxpY2U6c2VjcmV0";

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    engine.create_user("alice", "secret").await.unwrap();
    router(ServerState::new(engine, Duration::hours(1)))
}

fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, BASIC);
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn requests_without_credentials_are_rejected() {
    let app = app().await;
    let response = send(
        &app,
        Request::builder()
            .uri("/api/sponsors")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_sets_a_session_cookie() {
    let app = app().await;

    let bad = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/api/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({"username": "alice", "password": "nope"}).to_string(),
            ))
            .unwrap(),
    )
    .await;
    assert_eq!(bad.status(), StatusCode::UNAUTHORIZED);

    let response = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/api/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({"username": "alice", "password": "secret"}).to_string(),
            ))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with(&format!("{SESSION_COOKIE}=")));
    assert!(set_cookie.contains("HttpOnly"));
    let cookie = set_cookie.split(';').next().unwrap().to_string();

    let me = send(
        &app,
        Request::builder()
            .uri("/api/auth/me")
            .header(header::COOKIE, &cookie)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(me.status(), StatusCode::OK);
    assert_eq!(json_body(me).await["username"], "alice");

    let logout = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/api/auth/logout")
            .header(header::COOKIE, &cookie)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(logout.status(), StatusCode::NO_CONTENT);

    let after = send(
        &app,
        Request::builder()
            .uri("/api/auth/me")
            .header(header::COOKIE, &cookie)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(after.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn receipt_flow_over_http() {
    let app = app().await;

    for (name, percentage_bp) in [("Main", 6000), ("Reserve", 4000)] {
        let response = send(
            &app,
            request(
                "POST",
                "/api/funds",
                Some(json!({"name": name, "percentage_bp": percentage_bp})),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = send(
        &app,
        request(
            "POST",
            "/api/receipts",
            Some(json!({"amount_minor": 1000, "date": "2025-03-01"})),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let receipt = json_body(response).await;
    let mut amounts: Vec<i64> = receipt["distributions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["amount_minor"].as_i64().unwrap())
        .collect();
    amounts.sort_unstable();
    assert_eq!(amounts, [400, 600]);
    assert_eq!(receipt["undistributed_minor"], 0);

    let unallocated = json_body(send(&app, request("GET", "/api/funds/unallocated", None)).await).await;
    assert_eq!(unallocated["unallocated_minor"], 0);
    assert_eq!(unallocated["can_distribute"], false);

    let id = receipt["id"].as_str().unwrap();
    let response = send(&app, request("DELETE", &format!("/api/receipts/{id}"), None)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, request("GET", &format!("/api/receipts/{id}"), None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(json_body(response).await["error"].is_string());
}

#[tokio::test]
async fn error_statuses_follow_engine_errors() {
    let app = app().await;

    let response = send(
        &app,
        request("POST", "/api/sponsors", Some(json!({"name": "Acme"}))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let sponsor = json_body(response).await;

    let duplicate = send(
        &app,
        request("POST", "/api/sponsors", Some(json!({"name": "ACME"}))),
    )
    .await;
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    let invalid = send(
        &app,
        request(
            "POST",
            "/api/receipts",
            Some(json!({"amount_minor": 0, "date": "2025-03-01"})),
        ),
    )
    .await;
    assert_eq!(invalid.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let id = sponsor["id"].as_str().unwrap();
    let empty_patch = send(
        &app,
        request("PATCH", &format!("/api/sponsors/{id}"), Some(json!({}))),
    )
    .await;
    assert_eq!(empty_patch.status(), StatusCode::BAD_REQUEST);

    let inverted = send(
        &app,
        request("GET", "/api/reports/expenses?from=2025-03-01&to=2025-01-01", None),
    )
    .await;
    assert_eq!(inverted.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn manual_distribution_over_unallocated_is_rejected() {
    let app = app().await;

    let fund = json_body(
        send(
            &app,
            request(
                "POST",
                "/api/funds",
                Some(json!({"name": "Main", "percentage_bp": 5000})),
            ),
        )
        .await,
    )
    .await;
    send(
        &app,
        request(
            "POST",
            "/api/receipts",
            Some(json!({"amount_minor": 1000, "date": "2025-03-01"})),
        ),
    )
    .await;

    let too_much = send(
        &app,
        request(
            "POST",
            "/api/manual-fund-distributions",
            Some(json!({"fund_id": fund["id"], "amount_minor": 600, "date": "2025-03-02"})),
        ),
    )
    .await;
    assert_eq!(too_much.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let ok = send(
        &app,
        request(
            "POST",
            "/api/manual-fund-distributions",
            Some(json!({"fund_id": fund["id"], "amount_minor": 500, "date": "2025-03-02"})),
        ),
    )
    .await;
    assert_eq!(ok.status(), StatusCode::CREATED);

    let report = json_body(send(&app, request("GET", "/api/reports/fund-balance", None)).await).await;
    assert_eq!(report["rows"][0]["balance_minor"], 1000);
    assert_eq!(report["difference_bp"], 5000);
    assert_eq!(report["unallocated_minor"], 0);

    let stats = json_body(send(&app, request("GET", "/api/dashboard/stats", None)).await).await;
    assert_eq!(stats["total_receipts_minor"], 1000);
    assert_eq!(stats["active_funds"], 1);

    let activity =
        json_body(send(&app, request("GET", "/api/dashboard/activity?limit=1", None)).await).await;
    assert_eq!(activity.as_array().unwrap().len(), 1);
    assert_eq!(activity[0]["kind"], "manual_distribution");
}
