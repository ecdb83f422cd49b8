//! # ac-auth-simple
//!
//! Argon2-based implementation of [`CredentialHasher`]. Covers both
//! administrator passwords and the 4-character security PINs; the stored
//! value is a self-describing PHC string.

use anyhow::anyhow;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use ac_core::traits::CredentialHasher;

#[derive(Default)]
pub struct ArgonCredentialHasher;

impl CredentialHasher for ArgonCredentialHasher {
    fn hash(&self, secret: &str) -> anyhow::Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|err| anyhow!("credential hashing failed: {err}"))?;
        Ok(hash.to_string())
    }

    fn verify(&self, secret: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(secret.as_bytes(), &parsed)
            .is_ok()
    }
}
