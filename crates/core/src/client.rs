//! Client (tenant) identity and API key handling.
//!
//! Keys are generated once at registration and never recoverable afterwards:
//! only the SHA-256 digest is stored, and authentication is a point lookup
//! on the digest.

use std::sync::LazyLock;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use rand::{rngs::OsRng, RngCore};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// Prefix identifying collector keys in logs and configs.
pub const API_KEY_PREFIX: &str = "sk_";

/// Format: `sk_` followed by 43 URL-safe base64 chars (32 random bytes).
static API_KEY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^sk_[A-Za-z0-9_-]{43}$").expect("invalid API key pattern"));

/// A registered tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    /// Unique client ID, assigned by the store.
    pub id: i32,
    /// Display name; not unique.
    pub name: String,
    /// Registration timestamp; immutable.
    pub created_at: DateTime<Utc>,
    /// Inactive clients are rejected at auth regardless of key validity.
    pub is_active: bool,
}

/// A plaintext API key.
///
/// Exists only in two places: the registration response and an incoming
/// request being authenticated. Storage sees the digest.
#[derive(Debug, Clone)]
pub struct ApiKey(String);

impl ApiKey {
    /// Generates a fresh key: 32 bytes from the OS RNG, URL-safe base64,
    /// `sk_` prefix.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        Self(format!("{API_KEY_PREFIX}{}", URL_SAFE_NO_PAD.encode(bytes)))
    }

    /// Parse a candidate key from a request.
    ///
    /// Keys that cannot have been issued by [`ApiKey::generate`] are rejected
    /// before any store lookup; the response is indistinguishable from an
    /// unknown key.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(Error::missing_key());
        }

        if !API_KEY_REGEX.is_match(raw) {
            return Err(Error::invalid_key());
        }

        Ok(Self(raw.to_string()))
    }

    /// Get the raw key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the key, yielding the plaintext for the registration response.
    pub fn into_string(self) -> String {
        self.0
    }

    /// SHA-256 digest of the key, lowercase hex. This is what the store
    /// indexes and what auth looks up.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.0.as_bytes());
        hasher
            .finalize()
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect()
    }
}
