use crate::core::error::{AppError, Result};
use crate::shared::constants::{ROLE_CODE_ALPHABET, ROLE_CODE_LENGTH};
use rand::Rng;

/// Hash a password on the blocking pool
pub async fn hash_password(password: String, cost: u32) -> Result<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))?
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// Check a password against a stored hash on the blocking pool.
/// An empty or malformed hash never verifies.
pub async fn verify_password(password: String, hash: String) -> Result<bool> {
    if hash.is_empty() {
        return Ok(false);
    }
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false))
        .await
        .map_err(|e| AppError::Internal(format!("Verification task failed: {}", e)))
}

/// Generate an organization role code
pub fn generate_role_code() -> String {
    let mut rng = rand::thread_rng();
    (0..ROLE_CODE_LENGTH)
        .map(|_| ROLE_CODE_ALPHABET[rng.gen_range(0..ROLE_CODE_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::validation::ROLE_CODE_REGEX;

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hash = hash_password("correct horse".to_string(), 4).await.unwrap();
        assert_ne!(hash, "correct horse");
        assert!(verify_password("correct horse".to_string(), hash.clone())
            .await
            .unwrap());
        assert!(!verify_password("wrong horse".to_string(), hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_empty_hash_never_verifies() {
        assert!(!verify_password("anything".to_string(), String::new())
            .await
            .unwrap());
    }

    #[test]
    fn test_role_code_shape() {
        for _ in 0..50 {
            assert!(ROLE_CODE_REGEX.is_match(&generate_role_code()));
        }
    }
}
