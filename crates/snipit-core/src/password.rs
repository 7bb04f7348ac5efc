//! Password hashing backed by bcrypt.

use bcrypt::{BcryptError, hash, verify};

/// Work factor used for every stored password.
pub const HASH_COST: u32 = 12;

pub fn hash_password(password: &str) -> Result<String, BcryptError> {
    hash_password_with_cost(password, HASH_COST)
}

/// Hashes with an explicit work factor. Production code should go through
/// [`hash_password`]; lower costs are for in-memory test stores.
pub fn hash_password_with_cost(password: &str, cost: u32) -> Result<String, BcryptError> {
    hash(password, cost)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, BcryptError> {
    verify(password, hash)
}
