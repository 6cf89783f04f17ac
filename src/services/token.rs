//! Session tokens
//!
//! Stateless, signed session credentials. A token is
//! `base64url(claims_json) + "." + base64url(hmac_sha256(claims_json))`,
//! signed with the server secret and carrying an expiry. Nothing is
//! persisted server-side; logout is a client-side cookie deletion.
//!
//! Every verification failure (malformed, bad signature, expired) collapses
//! into the single `InvalidToken` kind, so callers cannot distinguish a
//! forged token from a stale one.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use data_encoding::BASE64URL_NOPAD;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// The single failure kind for token validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Invalid session token")]
pub struct InvalidToken;

/// Identity carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User's email address
    pub email: String,
    /// User's id
    pub user_id: i64,
    /// Expiry timestamp
    pub expires_at: DateTime<Utc>,
}

/// Issues and validates signed session tokens.
pub struct TokenSigner {
    secret: Vec<u8>,
    ttl: Duration,
}

impl TokenSigner {
    /// Create a signer.
    ///
    /// Fails if the secret is empty, the one misconfiguration this layer
    /// can detect.
    pub fn new(secret: &str, ttl_hours: i64) -> Result<Self> {
        if secret.is_empty() {
            anyhow::bail!("Signing secret is not configured (set auth.secret or RIPPLE_AUTH_SECRET)");
        }
        Ok(Self {
            secret: secret.as_bytes().to_vec(),
            ttl: Duration::hours(ttl_hours),
        })
    }

    fn mac(&self, payload: &[u8]) -> Result<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| anyhow::anyhow!("Failed to initialize HMAC: {}", e))?;
        mac.update(payload);
        Ok(mac)
    }

    /// Issue a signed token for the given identity.
    pub fn sign(&self, email: &str, user_id: i64) -> Result<String> {
        let claims = TokenClaims {
            email: email.to_string(),
            user_id,
            expires_at: Utc::now() + self.ttl,
        };
        let payload = serde_json::to_vec(&claims)?;
        let signature = self.mac(&payload)?.finalize().into_bytes();

        Ok(format!(
            "{}.{}",
            BASE64URL_NOPAD.encode(&payload),
            BASE64URL_NOPAD.encode(&signature)
        ))
    }

    /// Validate a token and return its claims.
    ///
    /// Signature comparison uses the Mac's own constant-time check.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, InvalidToken> {
        let (payload_b64, signature_b64) = token.split_once('.').ok_or(InvalidToken)?;

        let payload = BASE64URL_NOPAD
            .decode(payload_b64.as_bytes())
            .map_err(|_| InvalidToken)?;
        let signature = BASE64URL_NOPAD
            .decode(signature_b64.as_bytes())
            .map_err(|_| InvalidToken)?;

        self.mac(&payload)
            .map_err(|_| InvalidToken)?
            .verify_slice(&signature)
            .map_err(|_| InvalidToken)?;

        let claims: TokenClaims = serde_json::from_slice(&payload).map_err(|_| InvalidToken)?;
        if claims.expires_at < Utc::now() {
            return Err(InvalidToken);
        }

        Ok(claims)
    }
}
