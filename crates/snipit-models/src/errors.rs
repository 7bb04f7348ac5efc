use thiserror::Error;

/// Classified store failure.
///
/// Handlers match on the first three variants to choose a response shape;
/// anything else is a server error.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("models: no matching record found")]
    NoRecord,

    #[error("models: invalid credentials")]
    InvalidCredentials,

    #[error("models: duplicate email")]
    DuplicateEmail,

    #[error("models: database error")]
    Database(#[from] sqlx::Error),

    #[error("models: password hashing error")]
    Hash(#[from] bcrypt::BcryptError),
}
