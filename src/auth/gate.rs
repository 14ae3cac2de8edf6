// src/auth/gate.rs
use crate::auth::token::{hash_token, hashes_equal};

/// Single shared credential for the whole shop.
#[derive(Clone)]
pub struct PasswordGate {
    password_hash: [u8; 32],
}

impl PasswordGate {
    pub fn new(password: &str) -> Self {
        Self {
            password_hash: hash_token(password),
        }
    }

    pub fn check(&self, attempt: &str) -> bool {
        hashes_equal(&self.password_hash, &hash_token(attempt))
    }
}

impl std::fmt::Debug for PasswordGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordGate(..)")
    }
}
