//! bcrypt password hashing for the sign-up and sign-in forms.

pub const MIN_PASSWORD_LEN: usize = 8;

pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, cost)
}

/// A malformed stored hash counts as a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match bcrypt::verify(password, hash) {
        Ok(matches) => matches,
        Err(e) => {
            tracing::warn!("Stored password hash could not be verified: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_only_the_original_password() {
        let hash = hash_password("correct horse", 4).unwrap();
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("battery staple", &hash));
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-bcrypt-hash"));
    }
}
