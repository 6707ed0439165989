//! Credentials, nonces and request signing for the CleverCoin REST API
//!
//! Private endpoints are authenticated with three headers: `X-Auth-Key`,
//! `X-Auth-Nonce` and `X-Auth-Signature`. The signature is a hex-encoded
//! HMAC-SHA256 over a sorted, form-encoded payload of the key, nonce, the
//! request line and the body parameters.
//!
//! # Example
//!
//! ```
//! use clevercoin_auth::{Credentials, Nonce, RequestSigner};
//!
//! let creds = Credentials::new("K", "S").unwrap();
//! let signer = RequestSigner::with_nonce(&creds, Nonce::from("123456000001"));
//! let headers = signer
//!     .sign("GET", "/v1/wallets", std::iter::empty::<(&str, &str)>())
//!     .unwrap();
//!
//! assert_eq!(headers.signature.len(), 64);
//! ```

mod credentials;
mod error;
mod nonce;
mod signer;

pub use credentials::{Credentials, ENV_API_KEY, ENV_API_SECRET};
pub use error::{AuthError, AuthResult};
pub use nonce::{Clock, FixedClock, Nonce, SystemClock};
pub use signer::{
    hmac_sha256_hex, AuthHeaders, RequestSigner, HEADER_KEY, HEADER_NONCE, HEADER_REQUEST,
    HEADER_SIGNATURE,
};
