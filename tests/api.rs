use std::str::FromStr;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use blog_backend::{AppState, config::Config, database, router::create_router};
use serde_json::{Value, json};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tower::ServiceExt;

// bcrypt 允许的最小 cost
const TEST_COST: u32 = 4;

fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".into(),
        database_max_connections: 1,
        server_host: "127.0.0.1".into(),
        server_port: 0,
        api_base_uri: "/api".into(),
        session_secret: "integration-secret".into(),
        session_expiration_secs: 7 * 24 * 3600,
        bcrypt_cost: TEST_COST,
        app_env: "development".into(),
    }
}

async fn app() -> Router {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();
    database::migrate(&pool).await.unwrap();

    create_router(AppState::new(pool, test_config()))
}

struct TestResponse {
    status: StatusCode,
    session: Option<String>,
    body: Value,
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    session: Option<&str>,
    body: Option<Value>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = session {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let session = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or_default().to_string());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    TestResponse {
        status,
        session,
        body,
    }
}

async fn signup(app: &Router, email: &str, password: &str, name: &str) -> String {
    let res = send(
        app,
        Method::POST,
        "/api/auth/signup",
        None,
        Some(json!({ "email": email, "password": password, "name": name })),
    )
    .await;
    assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);
    res.session.expect("signup sets a session cookie")
}

async fn login(app: &Router, email: &str, password: &str) -> TestResponse {
    send(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await
}

#[tokio::test]
async fn owner_flow_and_foreign_delete_is_forbidden() {
    let app = app().await;
    signup(&app, "alice@example.com", "pw123", "Alice").await;
    signup(&app, "bob@example.com", "pw456", "Bob").await;

    let alice = login(&app, "alice@example.com", "pw123").await;
    assert_eq!(alice.status, StatusCode::OK);
    assert_eq!(alice.body["resp_data"]["name"], "Alice");
    let alice = alice.session.unwrap();

    let created = send(
        &app,
        Method::POST,
        "/api/blogs",
        Some(&alice),
        Some(json!({ "title": "Hello", "content": "World" })),
    )
    .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let id = created.body["resp_data"]["blog_id"].as_i64().unwrap();

    let fetched = send(&app, Method::GET, &format!("/api/blogs/{id}"), None, None).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["code"], 0);
    assert_eq!(fetched.body["resp_data"]["title"], "Hello");
    assert_eq!(fetched.body["resp_data"]["content"], "World");
    assert_eq!(fetched.body["resp_data"]["author_name"], "Alice");

    let bob = login(&app, "bob@example.com", "pw456").await.session.unwrap();
    let denied = send(&app, Method::DELETE, &format!("/api/blogs/{id}"), Some(&bob), None).await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);
    assert_eq!(denied.body["code"], 1003);

    let still_there = send(&app, Method::GET, &format!("/api/blogs/{id}"), None, None).await;
    assert_eq!(still_there.status, StatusCode::OK);

    let deleted = send(&app, Method::DELETE, &format!("/api/blogs/{id}"), Some(&alice), None).await;
    assert_eq!(deleted.status, StatusCode::OK);
    let gone = send(&app, Method::GET, &format!("/api/blogs/{id}"), None, None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn mutations_require_a_session() {
    let app = app().await;
    let alice = signup(&app, "alice@example.com", "pw123", "Alice").await;
    let created = send(
        &app,
        Method::POST,
        "/api/blogs",
        Some(&alice),
        Some(json!({ "title": "Hello", "content": "World" })),
    )
    .await;
    let id = created.body["resp_data"]["blog_id"].as_i64().unwrap();

    let body = json!({ "title": "T", "content": "C" });
    let create = send(&app, Method::POST, "/api/blogs", None, Some(body.clone())).await;
    assert_eq!(create.status, StatusCode::UNAUTHORIZED);

    let uri = format!("/api/blogs/{id}");
    let update = send(&app, Method::PUT, &uri, None, Some(body)).await;
    assert_eq!(update.status, StatusCode::UNAUTHORIZED);
    let delete = send(&app, Method::DELETE, &uri, None, None).await;
    assert_eq!(delete.status, StatusCode::UNAUTHORIZED);

    // 伪造的 cookie 不被接受
    let forged = format!("session={}", alice_id(&app, &alice).await);
    let delete = send(&app, Method::DELETE, &uri, Some(&forged), None).await;
    assert_eq!(delete.status, StatusCode::UNAUTHORIZED);
}

async fn alice_id(app: &Router, session: &str) -> i64 {
    let me = send(app, Method::GET, "/api/auth/me", Some(session), None).await;
    me.body["resp_data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn update_validation_and_not_found() {
    let app = app().await;
    let alice = signup(&app, "alice@example.com", "pw123", "Alice").await;

    let missing = send(
        &app,
        Method::POST,
        "/api/blogs",
        Some(&alice),
        Some(json!({ "title": "only a title" })),
    )
    .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.body["code"], 1000);

    let absent = send(
        &app,
        Method::PUT,
        "/api/blogs/999",
        Some(&alice),
        Some(json!({ "title": "T", "content": "C" })),
    )
    .await;
    assert_eq!(absent.status, StatusCode::NOT_FOUND);

    let created = send(
        &app,
        Method::POST,
        "/api/blogs",
        Some(&alice),
        Some(json!({ "title": "T1", "content": "C1" })),
    )
    .await;
    let id = created.body["resp_data"]["blog_id"].as_i64().unwrap();

    let updated = send(
        &app,
        Method::PUT,
        &format!("/api/blogs/{id}"),
        Some(&alice),
        Some(json!({ "title": "T2", "content": "C2" })),
    )
    .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["resp_data"]["id"], id);
    assert_eq!(updated.body["resp_data"]["title"], "T2");
    assert_eq!(updated.body["resp_data"]["content"], "C2");
    assert_eq!(updated.body["resp_data"]["author_name"], "Alice");

    let fetched = send(&app, Method::GET, &format!("/api/blogs/{id}"), None, None).await;
    assert_eq!(fetched.body["resp_data"], updated.body["resp_data"]);
}

#[tokio::test]
async fn non_numeric_blog_id_is_not_found() {
    let app = app().await;
    let alice = signup(&app, "alice@example.com", "pw123", "Alice").await;

    let get = send(&app, Method::GET, "/api/blogs/abc", None, None).await;
    assert_eq!(get.status, StatusCode::NOT_FOUND);
    assert_eq!(get.body["code"], 1004);
    assert_eq!(get.body["msg"], "Blog not found");

    let body = json!({ "title": "T", "content": "C" });
    let put = send(&app, Method::PUT, "/api/blogs/abc", Some(&alice), Some(body)).await;
    assert_eq!(put.status, StatusCode::NOT_FOUND);
    assert_eq!(put.body["code"], 1004);

    let delete = send(&app, Method::DELETE, "/api/blogs/abc", Some(&alice), None).await;
    assert_eq!(delete.status, StatusCode::NOT_FOUND);
    assert_eq!(delete.body["code"], 1004);
}

#[tokio::test]
async fn list_is_public_and_newest_first() {
    let app = app().await;
    let alice = signup(&app, "alice@example.com", "pw123", "Alice").await;

    for title in ["P1", "P2", "P3"] {
        let res = send(
            &app,
            Method::POST,
            "/api/blogs",
            Some(&alice),
            Some(json!({ "title": title, "content": "body" })),
        )
        .await;
        assert_eq!(res.status, StatusCode::CREATED);
    }

    let list = send(&app, Method::GET, "/api/blogs", None, None).await;
    assert_eq!(list.status, StatusCode::OK);
    let titles: Vec<&str> = list.body["resp_data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["P3", "P2", "P1"]);
}

#[tokio::test]
async fn login_failures_and_duplicate_signup() {
    let app = app().await;
    signup(&app, "alice@example.com", "pw123", "Alice").await;

    let wrong = login(&app, "alice@example.com", "nope").await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.body["msg"], "Invalid credentials");
    assert!(wrong.session.is_none());

    let unknown = login(&app, "carol@example.com", "pw123").await;
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.body["msg"], "Invalid credentials");

    let dup = send(
        &app,
        Method::POST,
        "/api/auth/signup",
        None,
        Some(json!({ "email": "alice@example.com", "password": "x", "name": "Other" })),
    )
    .await;
    assert_eq!(dup.status, StatusCode::CONFLICT);
    assert_eq!(dup.body["code"], 1001);
}

#[tokio::test]
async fn logout_is_idempotent_and_ends_the_session() {
    let app = app().await;

    let never_logged_in = send(&app, Method::POST, "/api/auth/logout", None, None).await;
    assert_eq!(never_logged_in.status, StatusCode::OK);
    assert_eq!(never_logged_in.session.as_deref(), Some("session="));

    let alice = signup(&app, "alice@example.com", "pw123", "Alice").await;
    let me = send(&app, Method::GET, "/api/auth/me", Some(&alice), None).await;
    assert_eq!(me.status, StatusCode::OK);

    let out = send(&app, Method::GET, "/api/auth/logout", Some(&alice), None).await;
    assert_eq!(out.status, StatusCode::OK);
    let cleared = out.session.expect("logout sends a removal cookie");
    assert_eq!(cleared, "session=");

    let me = send(&app, Method::GET, "/api/auth/me", Some(&cleared), None).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_lists_own_posts_with_stats() {
    let app = app().await;
    let alice = signup(&app, "alice@example.com", "pw123", "Alice").await;
    let bob = signup(&app, "bob@example.com", "pw456", "Bob").await;

    for (session, content) in [(&alice, "one two three"), (&bob, "four"), (&alice, "five six")] {
        send(
            &app,
            Method::POST,
            "/api/blogs",
            Some(session),
            Some(json!({ "title": "t", "content": content })),
        )
        .await;
    }

    let profile = send(&app, Method::GET, "/api/profile", Some(&alice), None).await;
    assert_eq!(profile.status, StatusCode::OK);
    let data = &profile.body["resp_data"];
    assert_eq!(data["user"]["email"], "alice@example.com");
    assert!(data["user"].get("password_hash").is_none());
    assert_eq!(data["total_posts"], 2);
    assert_eq!(data["total_words"], 5);
    assert_eq!(data["blogs"][0]["content"], "five six");

    let anonymous = send(&app, Method::GET, "/api/profile", None, None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app().await;
    let res = send(&app, Method::GET, "/api/health", None, None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["resp_data"]["status"], "ok");
}
