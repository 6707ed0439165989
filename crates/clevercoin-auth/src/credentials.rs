//! API credentials for CleverCoin private endpoints
//!
//! # Security
//!
//! The API secret is stored using the `secrecy` crate which:
//! - Zeroizes memory on drop
//! - Prevents accidental logging via Debug impl
//! - Provides explicit access via `expose_secret()`
//!
//! The secret is only ever used as an HMAC key. It is never sent on the wire.

use secrecy::{ExposeSecret, SecretBox};

use crate::error::{AuthError, AuthResult};

/// Environment variable holding the API key
pub const ENV_API_KEY: &str = "CLEVERCOIN_API_KEY";

/// Environment variable holding the API secret
pub const ENV_API_SECRET: &str = "CLEVERCOIN_API_SECRET";

/// API credentials for authenticated requests
///
/// Immutable once constructed. The secret is zeroized when dropped.
pub struct Credentials {
    /// API key (sent as `X-Auth-Key`)
    api_key: String,
    /// API secret (HMAC key only)
    api_secret: SecretBox<Vec<u8>>,
}

impl Credentials {
    /// Create new credentials from an API key and secret
    ///
    /// Both values are opaque strings; the secret bytes are used verbatim as
    /// the HMAC-SHA256 key.
    pub fn new(api_key: impl Into<String>, api_secret: impl AsRef<[u8]>) -> AuthResult<Self> {
        let api_key = api_key.into();
        let api_secret = api_secret.as_ref();

        if api_key.is_empty() {
            return Err(AuthError::InvalidCredentials("API key is empty".to_string()));
        }
        if api_secret.is_empty() {
            return Err(AuthError::InvalidCredentials("API secret is empty".to_string()));
        }

        Ok(Self {
            api_key,
            api_secret: SecretBox::new(Box::new(api_secret.to_vec())),
        })
    }

    /// Create credentials from environment variables
    ///
    /// Reads `CLEVERCOIN_API_KEY` and `CLEVERCOIN_API_SECRET`.
    pub fn from_env() -> AuthResult<Self> {
        let api_key = std::env::var(ENV_API_KEY)
            .map_err(|_| AuthError::EnvVarNotSet(ENV_API_KEY.to_string()))?;
        let api_secret = std::env::var(ENV_API_SECRET)
            .map_err(|_| AuthError::EnvVarNotSet(ENV_API_SECRET.to_string()))?;

        Self::new(api_key, api_secret)
    }

    /// Get the API key
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub(crate) fn secret(&self) -> &[u8] {
        self.api_secret.expose_secret()
    }
}

impl Clone for Credentials {
    fn clone(&self) -> Self {
        Self {
            api_key: self.api_key.clone(),
            api_secret: SecretBox::new(Box::new(self.api_secret.expose_secret().clone())),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let visible: String = self.api_key.chars().take(8).collect();
        f.debug_struct("Credentials")
            .field("api_key", &format!("{}...", visible))
            .field("api_secret", &"[REDACTED]")
            .finish()
    }
}
