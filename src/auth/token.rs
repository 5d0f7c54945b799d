//! Password reset tokens.
//!
//! A reset link carries the user's id encoded as URL-safe base64 and a
//! signed token. The token embeds a fingerprint of the fields a
//! successful reset or login changes, so it verifies at most once and
//! only until it expires.

use std::time::Duration;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::debug;

use crate::db::User;

/// Default token lifetime (three days).
pub const DEFAULT_RESET_TIMEOUT_SECS: u64 = 3 * 24 * 60 * 60;

/// Longest accepted token lifetime (one year).
pub const MAX_RESET_TIMEOUT_SECS: u64 = 365 * 24 * 60 * 60;

/// Token errors.
#[derive(Error, Debug)]
pub enum TokenError {
    /// Signing failed.
    #[error("token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// Claims carried by a reset token.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ResetClaims {
    /// Subject (user ID).
    sub: String,
    /// Fingerprint of the user's state when the token was issued.
    fp: String,
    /// Issued at timestamp.
    iat: i64,
    /// Expiration timestamp.
    exp: i64,
}

/// Generates and checks password reset tokens.
#[derive(Clone)]
pub struct PasswordResetTokenGenerator {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    timeout: Duration,
}

impl PasswordResetTokenGenerator {
    /// Create a generator signing with `secret`, issuing tokens valid for `timeout`.
    ///
    /// Lifetimes above [`MAX_RESET_TIMEOUT_SECS`] are cut down to it.
    pub fn new(secret: &str, timeout: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            timeout: timeout.min(Duration::from_secs(MAX_RESET_TIMEOUT_SECS)),
        }
    }

    /// Make a token for the user, valid from now.
    pub fn make_token(&self, user: &User) -> Result<String, TokenError> {
        self.make_token_at(user, Utc::now().timestamp())
    }

    fn make_token_at(&self, user: &User, issued_at: i64) -> Result<String, TokenError> {
        let lifetime = i64::try_from(self.timeout.as_secs()).unwrap_or(i64::MAX);
        let claims = ResetClaims {
            sub: user.id.to_string(),
            fp: fingerprint(user),
            iat: issued_at,
            exp: issued_at.checked_add(lifetime).unwrap_or(i64::MAX),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Check that a token was issued for this user in its current state
    /// and has not expired.
    pub fn check_token(&self, user: &User, token: &str) -> bool {
        let data = match decode::<ResetClaims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => data,
            Err(e) => {
                debug!("Reset token rejected: {}", e);
                return false;
            }
        };

        data.claims.sub == user.id.to_string() && data.claims.fp == fingerprint(user)
    }
}

/// Hash of the user fields that change on reset or login.
fn fingerprint(user: &User) -> String {
    let material = format!(
        "{}:{}:{}:{}",
        user.id,
        user.password,
        user.last_login.as_deref().unwrap_or_default(),
        user.email
    );
    format!("{:x}", Sha256::digest(material.as_bytes()))
}

/// Encode a user id for use in a reset link.
pub fn encode_uid(id: i64) -> String {
    URL_SAFE_NO_PAD.encode(id.to_string())
}

/// Decode a user id from a reset link.
pub fn decode_uid(uidb64: &str) -> Option<i64> {
    let bytes = URL_SAFE_NO_PAD.decode(uidb64).ok()?;
    String::from_utf8(bytes).ok()?.parse().ok()
}
