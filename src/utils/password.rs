use bcrypt::{hash, verify, BcryptError};

/// Hashes `password` with a per-call random salt
pub fn hash_password(password: &str, cost: u32) -> Result<String, BcryptError> {
    hash(password.as_bytes(), cost)
}

pub fn verify_password(password: &str, hashed: &str) -> Result<bool, BcryptError> {
    verify(password.as_bytes(), hashed)
}
