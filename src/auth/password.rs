use sha2::{Digest, Sha256};

pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, cost)
}

/// Check a plaintext password against a stored digest.
///
/// Databases created before the switch to bcrypt hold unsalted SHA-256 hex
/// digests; those still verify so existing accounts keep working.
pub fn verify_password(password: &str, digest: &str) -> Result<bool, bcrypt::BcryptError> {
    if digest.starts_with("$2") {
        return bcrypt::verify(password, digest);
    }

    Ok(legacy_sha256_hex(password) == digest.to_ascii_lowercase())
}

fn legacy_sha256_hex(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bcrypt_digest_round_trips() {
        let digest = hash_password("hunter2", 4).unwrap();
        assert_ne!(digest, "hunter2");
        assert!(verify_password("hunter2", &digest).unwrap());
        assert!(!verify_password("hunter3", &digest).unwrap());
    }

    #[test]
    fn same_password_hashes_differently() {
        let a = hash_password("hunter2", 4).unwrap();
        let b = hash_password("hunter2", 4).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn legacy_sha256_digest_still_verifies() {
        // sha256("password")
        let digest = "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8";
        assert!(verify_password("password", digest).unwrap());
        assert!(!verify_password("Password", digest).unwrap());
    }
}
