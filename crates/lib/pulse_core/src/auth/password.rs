//! Password hashing via bcrypt.

use super::AuthError;

/// bcrypt cost factor.
const BCRYPT_COST: u32 = 10;

/// A valid bcrypt hash of a random throwaway string. Compared against when
/// a record has no stored hash, so the missing-hash path takes the same
/// time as a wrong password and returns the same outcome.
const DUMMY_HASH: &str = "$2b$10$7EqJtq98hPqEX7fNZaFWoOhi5B0X0PxRy0Qw8a2N9S1h1mVY0y2V6";

/// Hash a password with bcrypt (cost 10).
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    bcrypt::hash(password, BCRYPT_COST)
        .map_err(|e| AuthError::Internal(format!("bcrypt hash: {e}")))
}

/// Verify a password against a bcrypt hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    bcrypt::verify(password, hash).map_err(|e| AuthError::Internal(format!("bcrypt verify: {e}")))
}

/// Verify a password against an optional stored hash, failing closed.
///
/// A record without a hash (e.g. a federated account) never matches, but
/// still burns a bcrypt comparison.
pub fn verify_password_opt(password: &str, hash: Option<&str>) -> Result<bool, AuthError> {
    match hash {
        Some(hash) => verify_password(password, hash),
        None => {
            let _ = bcrypt::verify(password, DUMMY_HASH);
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let hash = hash_password("hunter22").unwrap();
        assert!(verify_password("hunter22", &hash).unwrap());
        assert!(!verify_password("hunter23", &hash).unwrap());
    }

    #[test]
    fn missing_hash_fails_closed() {
        assert!(!verify_password_opt("anything", None).unwrap());
    }

    #[test]
    fn opt_verify_matches_plain_verify() {
        let hash = hash_password("s3cret!").unwrap();
        assert!(verify_password_opt("s3cret!", Some(&hash)).unwrap());
        assert!(!verify_password_opt("wrong", Some(&hash)).unwrap());
    }
}
