//! # Snipit Core
//!
//! Core types, errors, and utilities for the Snipit web application.
//!
//! This crate provides foundational types used throughout the application:
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`password`]: Salted password hashing and verification
//! - [`validator`]: Form validation accumulator and field predicates
//!
//! # Example
//!
//! ```ignore
//! use snipit_core::errors::AppError;
//! use snipit_core::validator::{Validator, not_blank};
//!
//! let mut form = Validator::default();
//! form.check_field(not_blank(&title), "title", "This field cannot be blank");
//!
//! if !form.valid() {
//!     // re-render with a 422
//! }
//! ```

pub mod errors;
pub mod password;
pub mod validator;

// Re-export commonly used types at crate root
pub use errors::{AppError, ErrorDetail};
pub use password::{hash_password, verify_password};
pub use validator::Validator;
