//! Form validation.
//!
//! A [`Validator`] accumulates the errors of one form submission. Field
//! errors are keyed by input name and only the first failure per field is
//! kept; non-field errors (for example wrong credentials) are kept in the
//! order they were added.
//!
//! The predicates in this module are plain functions so handlers can
//! combine them freely:
//!
//! ```ignore
//! let mut v = Validator::default();
//! v.check_field(not_blank(&form.title), "title", "This field cannot be blank");
//! v.check_field(max_chars(&form.title, 100), "title", "This field cannot be more than 100 characters long");
//! v.check_field(permitted_value(&form.expires, &[1, 7, 365]), "expires", "This field must equal 1, 7 or 365");
//! ```

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Loose shape check for email addresses (the W3C `input[type=email]` pattern).
pub static EMAIL_RX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern is a valid regex")
});

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validator {
    field_errors: BTreeMap<String, String>,
    non_field_errors: Vec<String>,
}

impl Validator {
    /// True when neither field nor non-field errors were recorded.
    pub fn valid(&self) -> bool {
        self.field_errors.is_empty() && self.non_field_errors.is_empty()
    }

    /// Records `message` for `key` unless the field already failed.
    pub fn add_field_error(&mut self, key: &str, message: &str) {
        self.field_errors
            .entry(key.to_string())
            .or_insert_with(|| message.to_string());
    }

    pub fn add_non_field_error(&mut self, message: &str) {
        self.non_field_errors.push(message.to_string());
    }

    /// Records `message` for `key` when `ok` is false.
    pub fn check_field(&mut self, ok: bool, key: &str, message: &str) {
        if !ok {
            self.add_field_error(key, message);
        }
    }

    pub fn field_error(&self, key: &str) -> Option<&str> {
        self.field_errors.get(key).map(String::as_str)
    }

    pub fn field_errors(&self) -> &BTreeMap<String, String> {
        &self.field_errors
    }

    pub fn non_field_errors(&self) -> &[String] {
        &self.non_field_errors
    }
}

pub fn not_blank(value: &str) -> bool {
    !value.trim().is_empty()
}

pub fn min_chars(value: &str, n: usize) -> bool {
    value.chars().count() >= n
}

pub fn max_chars(value: &str, n: usize) -> bool {
    value.chars().count() <= n
}

pub fn matches(value: &str, rx: &Regex) -> bool {
    rx.is_match(value)
}

pub fn permitted_value<T: PartialEq>(value: &T, permitted: &[T]) -> bool {
    permitted.contains(value)
}

pub fn same<T: PartialEq>(a: &T, b: &T) -> bool {
    a == b
}
