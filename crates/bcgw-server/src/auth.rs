//! Credential verification and JWT issuing for the login endpoint.
//!
//! Users are configured out of band as `username:salt:sha256hex` triples
//! (the hex digest is SHA-256 of salt concatenated with password); the
//! gateway never stores or logs a plaintext password. Issued tokens are
//! HS256 with issuer, audience, and expiry claims; the middleware in
//! [`crate::middleware`] verifies all three.

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use bcgw_core::{AppConfig, Environment};

/// Claims carried by gateway-issued tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iss: String,
    pub aud: String,
    pub exp: i64,
}

#[derive(Clone)]
struct UserRecord {
    username: String,
    salt: String,
    password_hash: Vec<u8>,
}

/// Credential store parsed from `BCGW_USER_CREDENTIALS`
/// (comma-separated `username:salt:sha256hex` entries).
#[derive(Clone)]
pub struct UserStore {
    users: Vec<UserRecord>,
}

impl UserStore {
    /// Builds the store from the configured credential string.
    ///
    /// In development a missing/empty credential string yields an empty
    /// store (every login fails) so local iteration doesn't need users
    /// provisioned. Outside development it fails startup.
    ///
    /// # Errors
    ///
    /// Returns an error when an entry is malformed, when the hash is not
    /// valid hex, or when no credentials are configured outside
    /// development.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let raw = config.user_credentials.clone().unwrap_or_default();
        let entries: Vec<&str> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        if entries.is_empty() {
            if config.env == Environment::Development {
                tracing::warn!(
                    "BCGW_USER_CREDENTIALS not set; every login will fail in this development run"
                );
                return Ok(Self { users: Vec::new() });
            }
            anyhow::bail!(
                "BCGW_USER_CREDENTIALS is required outside development; \
                 provide comma-separated username:salt:sha256hex entries"
            );
        }

        let mut users = Vec::with_capacity(entries.len());
        for entry in entries {
            let mut parts = entry.splitn(3, ':');
            let (Some(username), Some(salt), Some(hash_hex)) =
                (parts.next(), parts.next(), parts.next())
            else {
                anyhow::bail!("malformed credential entry; expected username:salt:sha256hex");
            };
            if username.is_empty() || salt.is_empty() {
                anyhow::bail!("credential entry has an empty username or salt");
            }
            let password_hash = hex::decode(hash_hex)
                .map_err(|_| anyhow::anyhow!("credential hash for {username} is not valid hex"))?;
            if password_hash.len() != 32 {
                anyhow::bail!("credential hash for {username} is not a SHA-256 digest");
            }
            users.push(UserRecord {
                username: username.to_owned(),
                salt: salt.to_owned(),
                password_hash,
            });
        }

        Ok(Self { users })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Constant-time password check against the stored digest.
    fn verify(&self, username: &str, password: &str) -> bool {
        let Some(user) = self.users.iter().find(|u| u.username == username) else {
            return false;
        };
        let mut hasher = Sha256::new();
        hasher.update(user.salt.as_bytes());
        hasher.update(password.as_bytes());
        let digest = hasher.finalize();
        digest.as_slice().ct_eq(&user.password_hash).into()
    }
}

/// Issues HS256 tokens for verified credentials.
#[derive(Clone)]
pub struct AuthIssuer {
    store: UserStore,
    encoding_key: EncodingKey,
    issuer: String,
    audience: String,
    token_ttl_hours: i64,
}

impl AuthIssuer {
    #[must_use]
    pub fn new(store: UserStore, config: &AppConfig) -> Self {
        Self {
            store,
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: config.jwt_issuer.clone(),
            audience: config.jwt_audience.clone(),
            token_ttl_hours: config.token_ttl_hours,
        }
    }

    /// Verifies the credentials and issues a token.
    ///
    /// `Ok(None)` means the credentials were rejected; blank usernames or
    /// passwords are rejected before any lookup.
    ///
    /// # Errors
    ///
    /// Returns an error only when token encoding itself fails.
    pub fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<String>, jsonwebtoken::errors::Error> {
        if username.trim().is_empty() || password.trim().is_empty() {
            return Ok(None);
        }
        if !self.store.verify(username, password) {
            tracing::debug!(username, "login rejected");
            return Ok(None);
        }

        let claims = Claims {
            sub: username.to_owned(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            exp: (Utc::now() + Duration::hours(self.token_ttl_hours)).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding_key).map(Some)
    }
}
