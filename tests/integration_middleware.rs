mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use common::{TEST_PASSWORD, setup_test_app, setup_test_app_with, test_config};
use snipit::middleware::headers::CONTENT_SECURITY_POLICY;
use snipit_models::SnippetStore;
use tower_sessions::{SessionStore, session::Id};

#[tokio::test]
async fn test_ping() {
    let app = setup_test_app();
    let mut client = app.client();

    let response = client.get("/ping").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "OK");
    assert!(response.headers.get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_security_headers_on_every_response() {
    let app = setup_test_app();
    let mut client = app.client();

    for uri in ["/ping", "/", "/no/such/page"] {
        let response = client.get(uri).await;
        assert_eq!(
            response.header("content-security-policy"),
            Some(CONTENT_SECURITY_POLICY),
            "{uri}"
        );
        assert_eq!(
            response.header("referrer-policy"),
            Some("origin-when-cross-origin")
        );
        assert_eq!(response.header("x-content-type-options"), Some("nosniff"));
        assert_eq!(response.header("x-frame-options"), Some("deny"));
        assert_eq!(response.header("x-xss-protection"), Some("0"));
    }
}

#[tokio::test]
async fn test_static_files_are_served_without_session() {
    let app = setup_test_app();
    let mut client = app.client();

    let response = client.get("/static/css/main.css").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.headers.get(header::SET_COOKIE).is_none());

    let missing = client.get("/static/css/missing.css").await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = setup_test_app();
    let mut client = app.client();

    let response = client.get("/missing").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body, "Not Found");
}

#[tokio::test]
async fn test_session_cookie_attributes() {
    let app = setup_test_app();
    let mut client = app.client();

    let response = client.get("/").await;

    let cookie = response.header("set-cookie").unwrap();
    assert!(cookie.starts_with("snipit_session="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
}

#[tokio::test]
async fn test_post_without_csrf_token_is_rejected() {
    let app = setup_test_app();
    app.create_user("Alice", "alice@example.com", TEST_PASSWORD).await;
    let mut client = app.client();
    client.get("/user/login").await;

    let response = client
        .post_raw("/user/login", "email=alice%40example.com&password=pa%24%24word123")
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_post_with_wrong_csrf_token_is_rejected() {
    let app = setup_test_app();
    let mut client = app.client();
    client.get("/user/login").await;

    let response = client
        .post_raw(
            "/user/login",
            &format!("email=a%40b.com&password=x&csrf_token={}", "0".repeat(64)),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_csrf_token_from_another_session_is_rejected() {
    let app = setup_test_app();
    let mut victim = app.client();
    victim.get("/").await;
    let victims_token = victim.csrf_token.clone().unwrap();

    let mut attacker = app.client();
    attacker.get("/").await;
    attacker.csrf_token = Some(victims_token);

    let response = attacker
        .post_form("/user/login", &[("email", "a@b.com"), ("password", "x")])
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_csrf_token_accepted_in_header() {
    let app = setup_test_app();
    app.create_user("Alice", "alice@example.com", TEST_PASSWORD).await;
    let mut client = app.client();
    client.get("/user/login").await;
    let token = client.csrf_token.clone().unwrap();

    let request = Request::builder()
        .method("POST")
        .uri("/user/login")
        .header(header::COOKIE, client.cookie.clone().unwrap())
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header("x-csrf-token", token)
        .body(Body::from("email=alice%40example.com&password=pa%24%24word123"))
        .unwrap();
    let response = client.send(request).await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/snippet/create"));
}

#[tokio::test]
async fn test_server_error_hides_detail_by_default() {
    let app = setup_test_app();
    app.snippets.set_unavailable(true);
    let mut client = app.client();

    let response = client.get("/").await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body, "Internal Server Error");
    assert!(!response.body.contains("database"));
}

#[tokio::test]
async fn test_debug_mode_exposes_error_chain() {
    let mut config = test_config();
    config.server.debug = true;
    let app = setup_test_app_with(config);
    app.snippets.set_unavailable(true);
    let mut client = app.client();

    let response = client.get("/").await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.body.contains("models: database error"));
    assert!(response.body.contains("pool timed out"));
}

#[tokio::test]
async fn test_panic_is_recovered() {
    let app = setup_test_app();
    app.snippets.insert("Still here", "after the panic", 7).await.unwrap();
    app.snippets.panic_on_next_call();
    let mut client = app.client();

    let response = client.get("/").await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.header("connection"), Some("close"));
    assert_eq!(response.body, "Internal Server Error");

    let response = client.get("/").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Still here"));
}

#[tokio::test]
async fn test_session_is_saved_on_server_error() {
    let app = setup_test_app();
    app.snippets.set_unavailable(true);
    let mut client = app.client();

    let response = client.get("/").await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    let cookie = response
        .header("set-cookie")
        .expect("session cookie on error response");
    assert!(cookie.starts_with("snipit_session="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));

    let id: Id = cookie
        .split(';')
        .next()
        .unwrap()
        .trim_start_matches("snipit_session=")
        .parse()
        .unwrap();
    let record = app.sessions.load(&id).await.unwrap().expect("saved session");
    assert!(record.data.contains_key("csrfToken"));

    let saved_cookie = client.cookie.clone();
    app.snippets.set_unavailable(false);
    let response = client.get("/").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(client.cookie, saved_cookie);
}
