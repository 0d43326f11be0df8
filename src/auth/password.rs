//! Password hashing
//!
//! Thin wrappers over bcrypt. The random salt is baked into the 60-char
//! output, so identical plaintexts never produce identical hashes, and
//! verification recomputes rather than comparing prefixes. Plaintext
//! passwords are never persisted or logged.

use bcrypt::DEFAULT_COST;

use crate::error::ApiError;

/// Hash a plaintext password with a fresh random salt
pub fn hash_password(plaintext: &str) -> Result<String, ApiError> {
    bcrypt::hash(plaintext, DEFAULT_COST).map_err(|e| {
        tracing::error!(error = %e, "Password hashing failed");
        ApiError::internal("Failed to process credentials")
    })
}

/// Verify a plaintext password against a stored hash
pub fn verify_password(plaintext: &str, hash: &str) -> Result<bool, ApiError> {
    bcrypt::verify(plaintext, hash).map_err(|e| {
        tracing::error!(error = %e, "Password verification failed");
        ApiError::internal("Failed to process credentials")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // Low cost keeps the tests fast; verify() reads the cost out of the hash
    const TEST_COST: u32 = 4;

    #[test]
    fn test_same_plaintext_hashes_differently() {
        let a = bcrypt::hash("secret123", TEST_COST).unwrap();
        let b = bcrypt::hash("secret123", TEST_COST).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_round_trip() {
        let hash = bcrypt::hash("secret123", TEST_COST).unwrap();
        assert!(verify_password("secret123", &hash).unwrap());
        assert!(!verify_password("secret124", &hash).unwrap());
    }

    #[test]
    fn test_hash_output_is_fixed_width() {
        let hash = hash_password("secret123").unwrap();
        assert_eq!(hash.len(), 60);
        assert!(verify_password("secret123", &hash).unwrap());
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(verify_password("secret123", "not-a-bcrypt-hash").is_err());
    }
}
