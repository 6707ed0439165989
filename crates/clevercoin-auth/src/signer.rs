//! Request signing for CleverCoin private endpoints
//!
//! CleverCoin signature algorithm:
//! 1. Collect `X-Auth-Key`, `X-Auth-Nonce`, `X-Auth-Request` (`"<METHOD> <path>"`)
//!    and every body parameter into one map
//! 2. Sort by key and form-encode as `key=value&key=value...`
//! 3. HMAC-SHA256 the encoded payload with the API secret
//! 4. Hex encode the result and send it as `X-Auth-Signature`

use std::collections::BTreeMap;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::trace;

use crate::credentials::Credentials;
use crate::error::{AuthError, AuthResult};
use crate::nonce::Nonce;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the API key
pub const HEADER_KEY: &str = "X-Auth-Key";
/// Header carrying the nonce
pub const HEADER_NONCE: &str = "X-Auth-Nonce";
/// Header carrying the hex signature
pub const HEADER_SIGNATURE: &str = "X-Auth-Signature";
/// Payload-only field holding `"<METHOD> <path>"`; never sent as a header
pub const HEADER_REQUEST: &str = "X-Auth-Request";

const RESERVED: [&str; 4] = [HEADER_KEY, HEADER_NONCE, HEADER_SIGNATURE, HEADER_REQUEST];

/// Compute `hex(HMAC-SHA256(secret, message))`
pub fn hmac_sha256_hex(secret: &[u8], message: &[u8]) -> AuthResult<String> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| AuthError::InvalidCredentials(e.to_string()))?;
    mac.update(message);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Authentication headers for one signed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeaders {
    pub key: String,
    pub nonce: Nonce,
    pub signature: String,
}

impl AuthHeaders {
    /// Header name/value pairs in the order they are sent
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            (HEADER_KEY, self.key.as_str()),
            (HEADER_NONCE, self.nonce.as_str()),
            (HEADER_SIGNATURE, self.signature.as_str()),
        ]
        .into_iter()
    }

    /// Owned header name/value pairs in the order they are sent
    pub fn to_vec(&self) -> Vec<(&'static str, String)> {
        self.iter()
            .map(|(name, value)| (name, value.to_string()))
            .collect()
    }
}

/// Request signer bound to one nonce
///
/// Create a fresh signer for every request.
#[derive(Debug)]
pub struct RequestSigner<'a> {
    credentials: &'a Credentials,
    nonce: Nonce,
}

impl<'a> RequestSigner<'a> {
    /// Create a signer with a nonce taken from the system clock
    pub fn new(credentials: &'a Credentials) -> Self {
        Self::with_nonce(credentials, Nonce::now())
    }

    /// Create a signer with an explicit nonce
    pub fn with_nonce(credentials: &'a Credentials, nonce: Nonce) -> Self {
        Self { credentials, nonce }
    }

    /// Get the nonce for this request
    pub fn nonce(&self) -> &Nonce {
        &self.nonce
    }

    /// Get the API key
    pub fn api_key(&self) -> &str {
        self.credentials.api_key()
    }

    /// Build the canonical payload that gets signed
    ///
    /// `path` is the request path including any query string.
    pub fn payload<I, K, V>(&self, method: &str, path: &str, body: I) -> AuthResult<String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut fields: BTreeMap<String, String> = BTreeMap::new();
        fields.insert(HEADER_KEY.to_string(), self.api_key().to_string());
        fields.insert(HEADER_NONCE.to_string(), self.nonce.to_string());
        fields.insert(HEADER_REQUEST.to_string(), format!("{} {}", method, path));

        for (key, value) in body {
            let key = key.as_ref();
            if RESERVED.contains(&key) {
                return Err(AuthError::ReservedParameter(key.to_string()));
            }
            fields.insert(key.to_string(), value.as_ref().to_string());
        }

        serde_urlencoded::to_string(&fields).map_err(|e| AuthError::Encoding(e.to_string()))
    }

    /// Sign the request and return the headers to attach
    pub fn sign<I, K, V>(&self, method: &str, path: &str, body: I) -> AuthResult<AuthHeaders>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let payload = self.payload(method, path, body)?;
        let signature = hmac_sha256_hex(self.credentials.secret(), payload.as_bytes())?;

        trace!(method, path, nonce = %self.nonce, "Signed request");

        Ok(AuthHeaders {
            key: self.api_key().to_string(),
            nonce: self.nonce.clone(),
            signature,
        })
    }
}
