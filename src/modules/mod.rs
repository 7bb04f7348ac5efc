pub mod pages;
pub mod snippets;
pub mod users;

pub use self::snippets::model::SnippetCreateForm;
pub use self::users::model::{PasswordUpdateForm, UserLoginForm, UserSignupForm};
