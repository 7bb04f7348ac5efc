mod common;

use axum::http::StatusCode;
use chrono::Duration;
use common::{TEST_PASSWORD, setup_test_app};
use snipit_models::SnippetStore;

#[tokio::test]
async fn test_home_lists_latest_snippets() {
    let app = setup_test_app();
    app.snippets.insert("First <one>", "body", 7).await.unwrap();
    app.snippets.insert("Second", "body", 7).await.unwrap();

    let mut client = app.client();
    let response = client.get("/").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Latest Snippets"));
    assert!(response.body.contains("First &lt;one&gt;"));
    assert!(response.body.contains(r#"href="/snippet/view/2""#));
    let second = response.body.find("Second").unwrap();
    let first = response.body.find("First").unwrap();
    assert!(second < first, "newest snippet should be listed first");
}

#[tokio::test]
async fn test_home_without_snippets() {
    let app = setup_test_app();
    let mut client = app.client();

    let response = client.get("/").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("There's nothing to see here... yet!"));
}

#[tokio::test]
async fn test_home_caps_listing_at_ten() {
    let app = setup_test_app();
    for i in 1..=12 {
        app.snippets
            .insert(&format!("Snippet number {i}"), "body", 365)
            .await
            .unwrap();
    }

    let mut client = app.client();
    let response = client.get("/").await;

    assert_eq!(response.body.matches("/snippet/view/").count(), 10);
    assert!(!response.body.contains(r#"href="/snippet/view/1""#));
    assert!(!response.body.contains(r#"href="/snippet/view/2""#));
}

#[tokio::test]
async fn test_view_existing_snippet() {
    let app = setup_test_app();
    let id = app
        .snippets
        .insert("An old silent pond", "A frog jumps into the pond", 7)
        .await
        .unwrap();

    let mut client = app.client();
    let response = client.get(&format!("/snippet/view/{id}")).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("An old silent pond"));
    assert!(response.body.contains("A frog jumps into the pond"));
    assert!(response.body.contains(&format!("Snippet #{id}")));
}

#[tokio::test]
async fn test_view_invalid_ids_are_not_found() {
    let app = setup_test_app();
    app.snippets.insert("Exists", "body", 7).await.unwrap();
    let mut client = app.client();

    for uri in [
        "/snippet/view/2",
        "/snippet/view/0",
        "/snippet/view/-1",
        "/snippet/view/1.23",
        "/snippet/view/foo",
        "/snippet/view/99999999999999999999",
    ] {
        let response = client.get(uri).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(response.body, "Not Found");
    }
}

#[tokio::test]
async fn test_expired_snippets_are_hidden() {
    let app = setup_test_app();
    let expired = app.snippets.insert_expired("Long gone", "body", 2);
    let mut client = app.client();

    let view = client.get(&format!("/snippet/view/{expired}")).await;
    let home = client.get("/").await;

    assert_eq!(view.status, StatusCode::NOT_FOUND);
    assert!(!home.body.contains("Long gone"));
}

#[tokio::test]
async fn test_create_form_defaults_to_one_year() {
    let app = setup_test_app();
    app.create_user("Alice", "alice@example.com", TEST_PASSWORD).await;
    let mut client = app.client();
    client.login("alice@example.com", TEST_PASSWORD).await;

    let response = client.get("/snippet/create").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains(r#"value="365" checked"#));
    assert_eq!(response.header("cache-control"), Some("no-store"));
}

#[tokio::test]
async fn test_create_snippet_redirects_and_flashes_once() {
    let app = setup_test_app();
    app.create_user("Alice", "alice@example.com", TEST_PASSWORD).await;
    let mut client = app.client();
    client.login("alice@example.com", TEST_PASSWORD).await;

    let response = client
        .post_form(
            "/snippet/create",
            &[
                ("title", "O snail"),
                ("content", "Climb Mount Fuji,\nBut slowly, slowly!"),
                ("expires", "7"),
            ],
        )
        .await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/snippet/view/1"));
    assert_eq!(app.snippets.count(), 1);

    let snippet = app.snippets.get(1).await.unwrap();
    assert_eq!(snippet.expires - snippet.created, Duration::days(7));

    let first = client.get("/snippet/view/1").await;
    assert!(first.body.contains("Snippet successfully created!"));
    let second = client.get("/snippet/view/1").await;
    assert!(!second.body.contains("Snippet successfully created!"));
}

#[tokio::test]
async fn test_create_snippet_validation_rerenders_form() {
    let app = setup_test_app();
    app.create_user("Alice", "alice@example.com", TEST_PASSWORD).await;
    let mut client = app.client();
    client.login("alice@example.com", TEST_PASSWORD).await;
    let long_title = "x".repeat(101);

    let response = client
        .post_form(
            "/snippet/create",
            &[("title", &long_title), ("content", "  "), ("expires", "30")],
        )
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("This field cannot be more than 100 characters long"));
    assert!(response.body.contains("This field cannot be blank"));
    assert!(response.body.contains("This field must equal 1, 7 or 365"));
    assert!(response.body.contains(&long_title));
    assert_eq!(app.snippets.count(), 0);
}

#[tokio::test]
async fn test_create_snippet_malformed_body_is_bad_request() {
    let app = setup_test_app();
    app.create_user("Alice", "alice@example.com", TEST_PASSWORD).await;
    let mut client = app.client();
    client.login("alice@example.com", TEST_PASSWORD).await;

    let response = client
        .post_form(
            "/snippet/create",
            &[("title", "t"), ("content", "c"), ("expires", "soon")],
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.snippets.count(), 0);
}

#[tokio::test]
async fn test_store_failure_is_opaque_server_error() {
    let app = setup_test_app();
    app.snippets.set_unavailable(true);
    let mut client = app.client();

    let response = client.get("/").await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body, "Internal Server Error");
}
