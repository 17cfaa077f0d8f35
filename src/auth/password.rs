//! Password hashing and verification using bcrypt
//!
//! Every hash carries its own random salt, so two hashes of the same
//! password differ while both verify. The work factor is tunable through
//! `auth.bcrypt_cost`.

use crate::core::error::{LiftlogError, Result};

/// Hash a password with the given bcrypt cost
pub fn hash_password(password: &str, cost: u32) -> Result<String> {
    bcrypt::hash(password, cost)
        .map_err(|e| LiftlogError::HashingError(format!("bcrypt hash failed: {}", e)))
}

/// Verify a password against a stored hash
///
/// Fails closed: a malformed or truncated hash verifies as false instead of
/// surfacing an error to the caller. The underlying comparison is
/// constant-time.
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TEST_COST: u32 = 4;

    #[test]
    fn test_same_password_hashes_differently() {
        let a = hash_password("asdfASDF1234!@#$", TEST_COST).unwrap();
        let b = hash_password("asdfASDF1234!@#$", TEST_COST).unwrap();

        assert_ne!(a, b);
        assert!(verify_password("asdfASDF1234!@#$", &a));
        assert!(verify_password("asdfASDF1234!@#$", &b));
    }

    #[test]
    fn test_wrong_password_fails() {
        let hash = hash_password("asdfASDF1234!@#$", TEST_COST).unwrap();
        assert!(!verify_password("1234!@#$asdfASDF", &hash));
    }

    #[test]
    fn test_malformed_hash_fails_closed() {
        assert!(!verify_password("anything", "not-a-bcrypt-hash"));
        assert!(!verify_password("anything", ""));
    }

    #[test]
    fn test_invalid_cost_is_an_error() {
        assert!(matches!(
            hash_password("password", 2),
            Err(LiftlogError::HashingError(_))
        ));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_hash_never_equals_plaintext(password in "[a-zA-Z0-9!@#$%^&*]{1,40}") {
            let hash = hash_password(&password, TEST_COST).unwrap();
            prop_assert_ne!(&hash, &password);
            prop_assert!(verify_password(&password, &hash));
        }
    }
}
