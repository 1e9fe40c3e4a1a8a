//! Signed session cookies.
//!
//! A session token is `hex(json(claims)).hex(hmac_sha256(key, payload))`.
//! Nothing is stored server-side; the signing key is the only secret.

use chrono::Utc;
use hmac::{Hmac, Mac};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::config::AuthConfig;

type HmacSha256 = Hmac<Sha256>;

/// The identity carried by a valid session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub uid: i64,
    pub username: String,
    /// Unix timestamp after which the session is rejected.
    pub exp: i64,
}

pub struct SessionSigner {
    key: Vec<u8>,
    cookie_name: String,
    ttl_hours: u64,
    secure: bool,
}

impl SessionSigner {
    pub fn new(key: impl Into<Vec<u8>>, auth: &AuthConfig) -> Self {
        Self {
            key: key.into(),
            cookie_name: auth.cookie_name.clone(),
            ttl_hours: auth.session_hours,
            secure: auth.secure_cookie,
        }
    }

    /// Build a signer from config, generating a throwaway key when none is set.
    pub fn from_config(auth: &AuthConfig) -> Self {
        match auth.secret_key.as_deref() {
            Some(secret) => Self::new(secret.as_bytes(), auth),
            None => {
                tracing::warn!(
                    "No session secret configured; using a random key. Sessions will not survive a restart."
                );
                Self::new(generate_key(), auth)
            }
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Issue a token for the given user, valid for the configured lifetime.
    pub fn issue(&self, uid: i64, username: &str) -> String {
        let ttl_secs = i64::try_from(self.ttl_hours * 3600).unwrap_or(i64::MAX);
        let claims = SessionClaims {
            uid,
            username: username.to_string(),
            exp: Utc::now().timestamp().saturating_add(ttl_secs),
        };
        self.sign(&claims)
    }

    fn sign(&self, claims: &SessionClaims) -> String {
        // SessionClaims has no map keys or non-string keys, so this cannot fail
        let json = serde_json::to_vec(claims).unwrap_or_default();
        let payload = hex::encode(json);
        let signature = hex::encode(self.mac(&payload).finalize().into_bytes());
        format!("{}.{}", payload, signature)
    }

    /// Return the claims of a well-formed, correctly signed, unexpired token.
    pub fn verify(&self, token: &str) -> Option<SessionClaims> {
        let (payload, signature) = token.split_once('.')?;
        let signature = hex::decode(signature).ok()?;
        self.mac(payload).verify_slice(&signature).ok()?;

        let json = hex::decode(payload).ok()?;
        let claims: SessionClaims = serde_json::from_slice(&json).ok()?;
        if claims.exp <= Utc::now().timestamp() {
            return None;
        }
        Some(claims)
    }

    fn mac(&self, payload: &str) -> HmacSha256 {
        let mut mac =
            HmacSha256::new_from_slice(&self.key).expect("HMAC can take key of any size");
        mac.update(payload.as_bytes());
        mac
    }

    pub fn session_cookie(&self, token: &str) -> String {
        let max_age_secs = self.ttl_hours * 3600;
        format!(
            "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}{}",
            self.cookie_name,
            token,
            max_age_secs,
            self.secure_attr()
        )
    }

    pub fn clear_cookie(&self) -> String {
        format!(
            "{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0{}",
            self.cookie_name,
            self.secure_attr()
        )
    }

    fn secure_attr(&self) -> &'static str {
        if self.secure {
            "; Secure"
        } else {
            ""
        }
    }
}

/// Generate a cryptographically random 32-byte key.
fn generate_key() -> Vec<u8> {
    let mut rng = rand::thread_rng();
    let bytes: [u8; 32] = rng.gen();
    bytes.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer(key: &str) -> SessionSigner {
        SessionSigner::new(key.as_bytes(), &AuthConfig::default())
    }

    #[test]
    fn issued_token_verifies() {
        let signer = signer("secret");
        let token = signer.issue(7, "alice");
        let claims = signer.verify(&token).unwrap();
        assert_eq!(claims.uid, 7);
        assert_eq!(claims.username, "alice");
    }

    #[test]
    fn token_from_another_key_is_rejected() {
        let token = signer("secret-a").issue(7, "alice");
        assert!(signer("secret-b").verify(&token).is_none());
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let signer = signer("secret");
        let token = signer.issue(7, "alice");
        let (_, signature) = token.split_once('.').unwrap();

        let forged = SessionClaims {
            uid: 8,
            username: "mallory".to_string(),
            exp: i64::MAX,
        };
        let forged_payload = hex::encode(serde_json::to_vec(&forged).unwrap());
        assert!(signer
            .verify(&format!("{}.{}", forged_payload, signature))
            .is_none());
    }

    #[test]
    fn expired_token_is_rejected() {
        let signer = signer("secret");
        let token = signer.sign(&SessionClaims {
            uid: 7,
            username: "alice".to_string(),
            exp: Utc::now().timestamp() - 1,
        });
        assert!(signer.verify(&token).is_none());
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        let signer = signer("secret");
        for token in ["", "nodot", "zz.zz", ".", "abcd."] {
            assert!(signer.verify(token).is_none(), "accepted {:?}", token);
        }
    }

    #[test]
    fn cookies_carry_name_and_attributes() {
        let auth = AuthConfig {
            secure_cookie: true,
            session_hours: 2,
            ..AuthConfig::default()
        };
        let signer = SessionSigner::new(b"k".to_vec(), &auth);

        let cookie = signer.session_cookie("tok");
        assert!(cookie.starts_with("healthlog_session=tok;"));
        assert!(cookie.contains("Max-Age=7200"));
        assert!(cookie.ends_with("; Secure"));

        let cleared = signer.clear_cookie();
        assert!(cleared.starts_with("healthlog_session=;"));
        assert!(cleared.contains("Max-Age=0"));
    }

    #[test]
    fn generate_key_is_random() {
        assert_eq!(generate_key().len(), 32);
        assert_ne!(generate_key(), generate_key());
    }
}
