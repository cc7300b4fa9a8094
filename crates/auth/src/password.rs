//! Argon2id password hashing and verification.
use super::*;

fn salt(length: usize) -> Result<Vec<u8>, PasswordError> {
    use rand::TryRngCore;
    let mut bytes = vec![0u8; length];
    rand::rngs::OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|_| PasswordError::RandomnessUnavailable)?;
    Ok(bytes)
}

/// Hashes `password` under `params` with a fresh salt.
pub fn hash(password: &str, params: &Params) -> Result<String, PasswordError> {
    Record::derive(password.as_bytes(), params, salt(params.salt_length())?)
        .map(|record| record.to_string())
}

/// Checks `password` against a stored record using the record's own costs.
///
/// `Ok(false)` for a mismatch, `Err` only when `hashword` is not a record.
pub fn verify(password: &str, hashword: &str) -> Result<bool, PasswordError> {
    hashword.parse::<Record>()?.matches(password.as_bytes())
}

/// Whether `hashword` should be re-hashed under `params`.
pub fn stale(hashword: &str, params: &Params) -> bool {
    hashword
        .parse::<Record>()
        .map(|record| record.stale(params))
        .unwrap_or(false)
}
