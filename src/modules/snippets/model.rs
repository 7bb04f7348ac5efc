use serde::{Deserialize, Serialize};
use snipit_core::validator::{Validator, max_chars, not_blank, permitted_value};

pub const DEFAULT_EXPIRES_DAYS: i32 = 365;
pub const PERMITTED_EXPIRES_DAYS: [i32; 3] = [1, 7, 365];
pub const TITLE_MAX_CHARS: usize = 100;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnippetCreateForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub expires: i32,
}

impl SnippetCreateForm {
    /// The empty form shown on first visit.
    pub fn blank() -> Self {
        Self {
            expires: DEFAULT_EXPIRES_DAYS,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Validator {
        let mut v = Validator::default();
        v.check_field(not_blank(&self.title), "title", "This field cannot be blank");
        v.check_field(
            max_chars(&self.title, TITLE_MAX_CHARS),
            "title",
            "This field cannot be more than 100 characters long",
        );
        v.check_field(not_blank(&self.content), "content", "This field cannot be blank");
        v.check_field(
            permitted_value(&self.expires, &PERMITTED_EXPIRES_DAYS),
            "expires",
            "This field must equal 1, 7 or 365",
        );
        v
    }
}
