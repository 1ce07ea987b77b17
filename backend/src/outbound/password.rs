//! Bcrypt [`PasswordHasher`].

use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Hashes passwords with bcrypt at a fixed cost.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// Hasher using `cost` rounds (bcrypt accepts 4..=31).
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher for BcryptPasswordHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        bcrypt::hash(password, self.cost).map_err(|err| PasswordHashError::hash(err.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError> {
        bcrypt::verify(password, hash).map_err(|err| PasswordHashError::hash(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_verify_only_the_original_password() {
        let hasher = BcryptPasswordHasher::new(4);
        let hash = hasher.hash("hunter22").expect("hash");
        assert!(hash.starts_with("$2"));
        assert!(hasher.verify("hunter22", &hash).expect("verify"));
        assert!(!hasher.verify("hunter23", &hash).expect("verify"));
    }

    #[test]
    fn malformed_hashes_are_errors() {
        let hasher = BcryptPasswordHasher::new(4);
        assert!(hasher.verify("hunter22", "not-a-hash").is_err());
    }
}
