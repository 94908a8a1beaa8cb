//! Bcrypt adapter for the password hashing port.
//!
//! Bcrypt work runs on the blocking thread pool so request workers are not
//! stalled by the deliberately slow hash function.

use async_trait::async_trait;
use tokio::task;

use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// [`PasswordHasher`] backed by bcrypt.
#[derive(Debug, Clone)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// Hasher with the library's default cost.
    pub fn new() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Hasher with an explicit cost; tests use a low cost to stay fast.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        let cost = self.cost;
        let password = password.to_owned();
        task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|err| PasswordHashError::hash(format!("hashing task failed: {err}")))?
            .map_err(|err| PasswordHashError::hash(err.to_string()))
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError> {
        let password = password.to_owned();
        let hash = hash.to_owned();
        task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|err| PasswordHashError::verify(format!("verification task failed: {err}")))?
            .map_err(|err| PasswordHashError::verify(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[tokio::test]
    async fn hash_and_verify_round_trip() {
        let hasher = BcryptPasswordHasher::with_cost(4);
        let hash = hasher.hash("secret").await.expect("hash succeeds");
        assert_ne!(hash, "secret");
        assert!(hasher.verify("secret", &hash).await.expect("verify succeeds"));
        assert!(!hasher.verify("wrong", &hash).await.expect("verify succeeds"));
    }

    #[tokio::test]
    async fn malformed_hash_is_an_error() {
        let hasher = BcryptPasswordHasher::with_cost(4);
        let err = hasher
            .verify("secret", "not-a-bcrypt-hash")
            .await
            .expect_err("malformed hash must fail");
        assert!(matches!(err, PasswordHashError::Verify { .. }));
    }
}
