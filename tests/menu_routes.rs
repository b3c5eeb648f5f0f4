use axum::{
    Router,
    body::{self, Body},
    http::{Request, StatusCode, header},
};
use sea_orm::{DatabaseBackend, MockDatabase};
use serde_json::json;
use tower::ServiceExt; // for `oneshot`
use uuid::Uuid;

use hemis_auth::{
    auth::{
        Role,
        jwt::{JwtKeys, encode_token, make_access_claims},
    },
    routes::API_PREFIX,
    test_helpers::{role_model, test_router_with_db, user_model},
};

const SECRET: &[u8] = b"integration-secret";

fn app(db: sea_orm::DatabaseConnection) -> Router {
    test_router_with_db(db, SECRET)
}

fn menu_request(user_id: &Uuid, locale: Option<&str>) -> Request<Body> {
    let claims = make_access_claims(user_id, vec![Role::Staff], 3600);
    let token = encode_token(&JwtKeys::from_secret(SECRET), &claims).expect("encode token");
    let uri = match locale {
        Some(locale) => format!("{API_PREFIX}/menu?locale={locale}"),
        None => format!("{API_PREFIX}/menu"),
    };
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request should build")
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should read");
    serde_json::from_slice(&bytes).expect("body should be json")
}

fn menu_ids(data: &serde_json::Value) -> Vec<String> {
    data["menu"]
        .as_array()
        .expect("menu should be an array")
        .iter()
        .map(|item| item["id"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[tokio::test]
async fn menu_requires_bearer_token() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    let response = app(db)
        .oneshot(
            Request::builder()
                .uri(format!("{API_PREFIX}/menu"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("request should succeed");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn menu_is_filtered_by_role_permissions() {
    let user_id = Uuid::new_v4();
    let role_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user_model(user_id, "staff@hemis.uz", role_id)]])
        .append_query_results([vec![role_model(
            role_id,
            "staff",
            &["student.view", "report.*"],
        )]])
        .into_connection();

    let response = app(db)
        .oneshot(menu_request(&user_id, None))
        .await
        .expect("request should succeed");
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let data = &body["data"];

    let ids = menu_ids(data);
    assert!(ids.contains(&"dashboard".to_string()));
    assert!(ids.contains(&"students".to_string()));
    assert!(ids.contains(&"reports".to_string()));
    assert!(!ids.contains(&"employees".to_string()));
    assert_eq!(data["cached"], false);
    assert_eq!(data["locale"], "uz");
    assert_eq!(data["permissions"], json!(["student.view", "report.*"]));
}

#[tokio::test]
async fn second_request_is_served_from_cache() {
    let user_id = Uuid::new_v4();
    let role_id = Uuid::new_v4();
    let user = user_model(user_id, "staff@hemis.uz", role_id);
    let role = role_model(role_id, "staff", &["report.*"]);
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user.clone()]])
        .append_query_results([vec![role.clone()]])
        .append_query_results([vec![user]])
        .append_query_results([vec![role]])
        .into_connection();
    let app = app(db);

    let first = app
        .clone()
        .oneshot(menu_request(&user_id, None))
        .await
        .expect("request should succeed");
    let first_body = json_body(first).await;
    assert_eq!(first_body["data"]["cached"], false);

    let second = app
        .oneshot(menu_request(&user_id, None))
        .await
        .expect("request should succeed");
    let second_body = json_body(second).await;
    assert_eq!(second_body["data"]["cached"], true);
    assert_eq!(second_body["data"]["menu"], first_body["data"]["menu"]);
}

// Regression for the role-switch staleness bug: a new role id must never be
// served the previous role's cached menu.
#[tokio::test]
async fn role_switch_recomputes_menu() {
    let user_id = Uuid::new_v4();
    let staff_role = Uuid::new_v4();
    let student_role = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user_model(user_id, "person@hemis.uz", staff_role)]])
        .append_query_results([vec![role_model(staff_role, "staff", &["student.*"])]])
        .append_query_results([vec![user_model(user_id, "person@hemis.uz", student_role)]])
        .append_query_results([vec![role_model(student_role, "student", &[])]])
        .into_connection();
    let app = app(db);

    let as_staff = app
        .clone()
        .oneshot(menu_request(&user_id, None))
        .await
        .expect("request should succeed");
    let staff_body = json_body(as_staff).await;
    assert!(menu_ids(&staff_body["data"]).contains(&"students".to_string()));

    let as_student = app
        .oneshot(menu_request(&user_id, None))
        .await
        .expect("request should succeed");
    let student_body = json_body(as_student).await;
    assert_eq!(student_body["data"]["cached"], false);
    assert!(!menu_ids(&student_body["data"]).contains(&"students".to_string()));
}

#[tokio::test]
async fn locale_selects_translated_labels() {
    let user_id = Uuid::new_v4();
    let role_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user_model(user_id, "staff@hemis.uz", role_id)]])
        .append_query_results([vec![role_model(role_id, "staff", &["*"])]])
        .into_connection();

    let response = app(db)
        .oneshot(menu_request(&user_id, Some("ru")))
        .await
        .expect("request should succeed");
    let body = json_body(response).await;
    let data = &body["data"];

    assert_eq!(data["locale"], "ru");
    let dashboard = data["menu"]
        .as_array()
        .expect("menu should be an array")
        .iter()
        .find(|item| item["id"] == "dashboard")
        .expect("dashboard should be visible");
    assert_eq!(dashboard["label"], "Панель управления");
}
