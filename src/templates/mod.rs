//! Server-side page rendering.
//!
//! Pages are maud templates over [`TemplateData`], registered by name in a
//! [`TemplateCache`] built once at startup. maud escapes every interpolated
//! value. A page is rendered into a `String` in full before any response is
//! built, so a failing render never produces a half-written page.

mod data;
mod pages;

use std::collections::HashMap;

use anyhow::anyhow;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use maud::Markup;
use snipit_core::AppError;
use tracing::instrument;

pub use data::{FormData, PageContext, TemplateData};

/// A named page: its `<title>` and its `<main>` content.
#[derive(Clone, Copy)]
pub struct Page {
    title: fn(&TemplateData) -> String,
    main: fn(&TemplateData) -> Markup,
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page").finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
pub struct TemplateCache {
    pages: HashMap<&'static str, Page>,
}

impl TemplateCache {
    pub fn contains(&self, name: &str) -> bool {
        self.pages.contains_key(name)
    }

    pub fn render_to_string(&self, name: &str, data: &TemplateData) -> Result<String, AppError> {
        let page = self
            .pages
            .get(name)
            .ok_or_else(|| AppError::internal(anyhow!("the template {name} does not exist")))?;

        let title = (page.title)(data);
        Ok(pages::layout(&title, (page.main)(data), data).into_string())
    }

    /// Renders `name` and wraps it in a response with `status`.
    #[instrument(skip(self, data))]
    pub fn render(
        &self,
        status: StatusCode,
        name: &str,
        data: &TemplateData,
    ) -> Result<Response, AppError> {
        let html = self.render_to_string(name, data)?;
        Ok((status, Html(html)).into_response())
    }
}

pub fn new_template_cache() -> TemplateCache {
    let pages = HashMap::from([
        ("home", Page { title: pages::home_title, main: pages::home }),
        ("view", Page { title: pages::view_title, main: pages::view }),
        ("create", Page { title: pages::create_title, main: pages::create }),
        ("signup", Page { title: pages::signup_title, main: pages::signup }),
        ("login", Page { title: pages::login_title, main: pages::login }),
        ("account", Page { title: pages::account_title, main: pages::account }),
        ("password", Page { title: pages::password_title, main: pages::password }),
        ("about", Page { title: pages::about_title, main: pages::about }),
    ]);

    TemplateCache { pages }
}

/// Formats a timestamp as `02 Jan 2006 at 15:04` in UTC.
pub fn human_date(t: &DateTime<Utc>) -> String {
    t.format("%d %b %Y at %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use snipit_models::Snippet;

    #[test]
    fn human_date_uses_day_month_year_and_time() {
        let t = Utc.with_ymd_and_hms(2024, 3, 17, 10, 15, 0).unwrap();
        assert_eq!(human_date(&t), "17 Mar 2024 at 10:15");
    }

    #[test]
    fn every_page_is_registered() {
        let cache = new_template_cache();
        for name in [
            "home", "view", "create", "signup", "login", "account", "password", "about",
        ] {
            assert!(cache.contains(name), "missing page {name}");
        }
    }

    #[test]
    fn unknown_template_is_a_server_error() {
        let cache = new_template_cache();
        let err = cache
            .render(StatusCode::OK, "missing", &TemplateData::default())
            .unwrap_err();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn snippet_content_is_escaped_in_view() {
        let cache = new_template_cache();
        let now = Utc::now();
        let data = TemplateData {
            snippet: Some(Snippet {
                id: 1,
                title: "<b>bold</b>".to_string(),
                content: r#"a < b && "c""#.to_string(),
                created: now,
                expires: now,
            }),
            ..TemplateData::default()
        };

        let html = cache.render_to_string("view", &data).unwrap();
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
        assert!(html.contains("a &lt; b &amp;&amp; &quot;c&quot;"));
        assert!(!html.contains("<b>bold</b>"));
    }

    #[test]
    fn password_page_shows_non_field_errors() {
        let cache = new_template_cache();
        let mut validator = snipit_core::Validator::default();
        validator.add_non_field_error("Current password is incorrect");
        let data = TemplateData::default().with_form(FormData::new(&(), validator));

        let html = cache.render_to_string("password", &data).unwrap();
        assert!(html.contains(r#"<div class="error">Current password is incorrect</div>"#));
    }

    #[test]
    fn nav_reflects_authentication() {
        let cache = new_template_cache();

        let anonymous = cache
            .render_to_string("home", &TemplateData::default())
            .unwrap();
        assert!(anonymous.contains(r#"href="/user/login""#));
        assert!(!anonymous.contains(r#"action="/user/logout""#));

        let data = TemplateData {
            is_authenticated: true,
            csrf_token: "tok".to_string(),
            ..TemplateData::default()
        };
        let authenticated = cache.render_to_string("home", &data).unwrap();
        assert!(authenticated.contains(r#"action="/user/logout""#));
        assert!(authenticated.contains(r#"name="csrf_token" value="tok""#));
    }
}
