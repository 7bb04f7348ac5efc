use serde::{Deserialize, Serialize};
use snipit_core::validator::{EMAIL_RX, Validator, matches, min_chars, not_blank, same};

pub const PASSWORD_MIN_CHARS: usize = 8;

const BLANK: &str = "This field cannot be blank";
const TOO_SHORT: &str = "This field must be at least 8 characters long";
const BAD_EMAIL: &str = "This field must be a valid email address";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserSignupForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing)]
    pub password: String,
}

impl UserSignupForm {
    pub fn validate(&self) -> Validator {
        let mut v = Validator::default();
        v.check_field(not_blank(&self.name), "name", BLANK);
        v.check_field(not_blank(&self.email), "email", BLANK);
        v.check_field(matches(&self.email, &EMAIL_RX), "email", BAD_EMAIL);
        v.check_field(not_blank(&self.password), "password", BLANK);
        v.check_field(min_chars(&self.password, PASSWORD_MIN_CHARS), "password", TOO_SHORT);
        v
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserLoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing)]
    pub password: String,
}

impl UserLoginForm {
    pub fn validate(&self) -> Validator {
        let mut v = Validator::default();
        v.check_field(not_blank(&self.email), "email", BLANK);
        v.check_field(matches(&self.email, &EMAIL_RX), "email", BAD_EMAIL);
        v.check_field(not_blank(&self.password), "password", BLANK);
        v
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PasswordUpdateForm {
    #[serde(default, skip_serializing)]
    pub current_password: String,
    #[serde(default, skip_serializing)]
    pub new_password: String,
    #[serde(default, skip_serializing)]
    pub new_password_confirmation: String,
}

impl PasswordUpdateForm {
    pub fn validate(&self) -> Validator {
        let mut v = Validator::default();
        v.check_field(not_blank(&self.current_password), "current_password", BLANK);
        v.check_field(not_blank(&self.new_password), "new_password", BLANK);
        v.check_field(
            min_chars(&self.new_password, PASSWORD_MIN_CHARS),
            "new_password",
            TOO_SHORT,
        );
        v.check_field(
            !same(&self.new_password, &self.current_password),
            "new_password",
            "New password must be different from your current password",
        );
        v.check_field(
            not_blank(&self.new_password_confirmation),
            "new_password_confirmation",
            BLANK,
        );
        v.check_field(
            same(&self.new_password, &self.new_password_confirmation),
            "new_password_confirmation",
            "Passwords do not match",
        );
        v
    }
}
