//! Session cookie configuration.
//!
//! # Environment Variables
//!
//! - `SESSION_LIFETIME_HOURS`: inactivity timeout in hours (default: 12,
//!   capped at one year)
//! - `SESSION_COOKIE_NAME`: cookie name (default: `snipit_session`)
//! - `SESSION_SECURE_COOKIE`: set the `Secure` attribute (default: true)

use std::env;

use crate::env_flag;

const DEFAULT_LIFETIME_HOURS: i64 = 12;

/// Longest accepted inactivity timeout.
pub const MAX_LIFETIME_HOURS: i64 = 24 * 365;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    pub lifetime_hours: i64,
    pub cookie_name: String,
    pub secure_cookie: bool,
}

impl SessionConfig {
    pub fn from_env() -> Self {
        Self {
            lifetime_hours: parse_lifetime_hours(env::var("SESSION_LIFETIME_HOURS").ok().as_deref()),
            cookie_name: env::var("SESSION_COOKIE_NAME")
                .unwrap_or_else(|_| "snipit_session".to_string()),
            secure_cookie: env_flag("SESSION_SECURE_COOKIE").unwrap_or(true),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            lifetime_hours: DEFAULT_LIFETIME_HOURS,
            cookie_name: "snipit_session".to_string(),
            secure_cookie: true,
        }
    }
}

fn parse_lifetime_hours(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|hours| *hours > 0)
        .map(|hours| hours.min(MAX_LIFETIME_HOURS))
        .unwrap_or(DEFAULT_LIFETIME_HOURS)
}
