//! Signed REST request executor for the CleverCoin exchange
//!
//! This crate provides the single entry point that endpoint wrappers build on:
//! describe a call with [`CallSpec`], hand it to [`ClevercoinClient::execute`],
//! and get back either the response JSON object or a [`RestError`].
//!
//! # Pipeline
//!
//! Every call runs the same steps and stops at the first failure:
//!
//! 1. **Build**: path `/v1/{name}`, query string in caller order, form body
//! 2. **Sign** (private calls): `X-Auth-Key`, `X-Auth-Nonce`, `X-Auth-Signature`
//! 3. **Dispatch**: one HTTP exchange with timeouts and TLS verification
//! 4. **Classify**: 200 + JSON object is success, everything else is an error
//!
//! # Errors
//!
//! - [`RestError::Validation`]: caller misuse, raised before any network I/O
//! - [`RestError::Transport`]: connection, timeout or TLS failure
//! - [`RestError::Protocol`]: HTTP 200 without a JSON object body
//! - [`RestError::Api`]: any other status, with the server's message
//!
//! The client never retries. See [`RestError::is_retryable`].
//!
//! # Example
//!
//! ```no_run
//! use clevercoin_rest::{CallSpec, ClevercoinClient, ClientConfig, Method};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ClevercoinClient::with_config(ClientConfig::from_env()?)?;
//!
//!     let book = client
//!         .execute(&CallSpec::public(Method::Get, "orderbook").query("currency", "EUR"))
//!         .await?;
//!     println!("{:?}", book);
//!
//!     let order = client
//!         .execute(
//!             &CallSpec::private(Method::Post, "orders")
//!                 .body("type", "bid")
//!                 .body("amount", "0.1")
//!                 .body("price", "250"),
//!         )
//!         .await?;
//!     println!("{:?}", order);
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod request;
pub mod response;
pub mod types;

pub use client::{ClevercoinClient, ClientConfig, DEFAULT_BASE_URL, ENV_BASE_URL};
pub use error::{RestError, RestResult};
pub use request::{build_request, PreparedRequest};
pub use response::classify_response;
pub use types::{CallSpec, JsonObject, Method, Params, Visibility};

pub use clevercoin_auth::{Clock, Credentials, FixedClock, SystemClock};
