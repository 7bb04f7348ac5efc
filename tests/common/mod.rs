#![allow(dead_code)]

use std::sync::{Arc, LazyLock};

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use http_body_util::BodyExt;
use regex::Regex;
use snipit::router::init_router;
use snipit::state::AppState;
use snipit_config::AppConfig;
use snipit_models::mocks::{MemorySnippetStore, MemoryUserStore};
use snipit_models::UserStore;
use tower::ServiceExt;
use tower_sessions::MemoryStore;

pub const TEST_PASSWORD: &str = "pa$$word123";

static CSRF_RX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"name="csrf_token" value="([0-9a-f]+)""#).unwrap());

pub struct TestApp {
    pub router: Router,
    pub snippets: Arc<MemorySnippetStore>,
    pub users: Arc<MemoryUserStore>,
    pub sessions: MemoryStore,
}

impl TestApp {
    pub fn client(&self) -> TestClient {
        TestClient {
            router: self.router.clone(),
            cookie: None,
            csrf_token: None,
        }
    }

    /// Creates an account directly in the store and returns its id.
    pub async fn create_user(&self, name: &str, email: &str, password: &str) -> i64 {
        self.users.insert(name, email, password).await.unwrap();
        self.users.id_for_email(email).unwrap()
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.session.secure_cookie = false;
    config.server.static_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/ui/static").to_string();
    config
}

pub fn setup_test_app() -> TestApp {
    setup_test_app_with(test_config())
}

pub fn setup_test_app_with(config: AppConfig) -> TestApp {
    let snippets = Arc::new(MemorySnippetStore::new());
    let users = Arc::new(MemoryUserStore::new());
    let sessions = MemoryStore::default();

    let state = AppState::new(snippets.clone(), users.clone(), config);
    let router = init_router(state, sessions.clone());

    TestApp {
        router,
        snippets,
        users,
        sessions,
    }
}

#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// A browser-like client: keeps the session cookie between requests and
/// remembers the last CSRF token seen on a page.
pub struct TestClient {
    router: Router,
    pub cookie: Option<String>,
    pub csrf_token: Option<String>,
}

impl TestClient {
    pub async fn send(&mut self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();

        if let Some(set_cookie) = headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
        {
            let pair = set_cookie.split(';').next().unwrap_or_default().to_string();
            if set_cookie.contains("Max-Age=0") {
                self.cookie = None;
            } else {
                self.cookie = Some(pair);
            }
        }

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = String::from_utf8_lossy(&bytes).into_owned();

        if let Some(caps) = CSRF_RX.captures(&body) {
            self.csrf_token = Some(caps[1].to_string());
        }

        TestResponse {
            status,
            headers,
            body,
        }
    }

    fn request(&self, method: &str, uri: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(uri);
        match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = self.request("GET", uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    /// Posts a form without adding a CSRF token.
    pub async fn post_raw(&mut self, uri: &str, body: &str) -> TestResponse {
        let request = self
            .request("POST", uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Posts a form carrying the current CSRF token, fetching one first if needed.
    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        if self.csrf_token.is_none() {
            self.get("/").await;
        }
        let token = self.csrf_token.clone().unwrap();

        let mut all: Vec<(&str, &str)> = fields.to_vec();
        all.push(("csrf_token", token.as_str()));
        let body = serde_urlencoded::to_string(&all).unwrap();

        self.post_raw(uri, &body).await
    }

    pub async fn login(&mut self, email: &str, password: &str) -> TestResponse {
        self.get("/user/login").await;
        self.post_form("/user/login", &[("email", email), ("password", password)])
            .await
    }
}
