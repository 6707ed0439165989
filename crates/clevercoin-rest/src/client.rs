//! Main REST client implementation

use std::sync::Arc;
use std::time::Duration;

use clevercoin_auth::{Clock, Credentials, SystemClock};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::error::{RestError, RestResult};
use crate::request::{build_request, PreparedRequest, FORM_CONTENT_TYPE};
use crate::response::classify_response;
use crate::types::{CallSpec, JsonObject, Method, Params, Visibility};

/// Production API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.clevercoin.com";

/// Environment variable overriding the base URL
pub const ENV_BASE_URL: &str = "CLEVERCOIN_BASE_URL";

/// Default request and connect timeout
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// CleverCoin REST API client
///
/// Executes public and private calls described by a [`CallSpec`]. Each call
/// runs build, sign (private only), dispatch and classify, and stops at the
/// first failure. Nothing is retried.
///
/// Clones share the HTTP connection pool and the signing lock. Private calls
/// are serialized through that lock so that each signed request carries a
/// later nonce than the previous one.
///
/// # Example
///
/// ```no_run
/// use clevercoin_rest::{CallSpec, ClevercoinClient, ClientConfig, Method};
/// use clevercoin_auth::Credentials;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = ClevercoinClient::with_config(
///         ClientConfig::new().with_credentials(Credentials::from_env()?),
///     )?;
///
///     let ticker = client
///         .execute(&CallSpec::public(Method::Get, "ticker"))
///         .await?;
///     let wallets = client
///         .execute(&CallSpec::private(Method::Get, "wallets"))
///         .await?;
///
///     println!("{:?} {:?}", ticker, wallets);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct ClevercoinClient {
    http_client: Client,
    base_url: String,
    credentials: Option<Credentials>,
    clock: Arc<dyn Clock>,
    signing: Arc<Mutex<()>>,
}

impl ClevercoinClient {
    /// Create a new client without credentials
    ///
    /// Only public calls will succeed.
    pub fn new() -> RestResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with credentials
    pub fn with_credentials(credentials: Credentials) -> RestResult<Self> {
        Self::with_config(ClientConfig::default().with_credentials(credentials))
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> RestResult<Self> {
        let base_url = parse_base_url(&config.base_url)?;

        if config.accept_invalid_certs {
            warn!("TLS certificate verification is disabled");
        }

        let user_agent = config
            .user_agent
            .unwrap_or_else(|| format!("clevercoin-rest/{}", env!("CARGO_PKG_VERSION")));

        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .user_agent(user_agent)
            .build()?;

        info!(base_url = %base_url, "Created CleverCoin REST client");

        Ok(Self {
            http_client,
            base_url,
            credentials: config.credentials,
            clock: Arc::new(SystemClock),
            signing: Arc::new(Mutex::new(())),
        })
    }

    /// Replace the clock used for nonces
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Check if the client has credentials for private calls
    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Execute a call and return the response object
    #[instrument(skip(self, call), fields(visibility = %call.visibility, method = %call.method, name = %call.name))]
    pub async fn execute(&self, call: &CallSpec) -> RestResult<JsonObject> {
        let guard = match call.visibility {
            Visibility::Private => Some(self.signing.lock().await),
            Visibility::Public => None,
        };

        let request = build_request(
            &self.base_url,
            call,
            self.credentials.as_ref(),
            self.clock.as_ref(),
        )?;
        let (status, body) = self.dispatch(request).await?;
        drop(guard);

        classify_response(status, &body)
    }

    /// Execute a call given its parts
    pub async fn call(
        &self,
        visibility: Visibility,
        method: Method,
        name: &str,
        query: Params,
        body: Params,
    ) -> RestResult<JsonObject> {
        let call = CallSpec {
            visibility,
            method,
            name: name.to_string(),
            query,
            body,
        };
        self.execute(&call).await
    }

    /// Execute a call and deserialize the response object into `T`
    ///
    /// A success response that does not fit `T` is a protocol error.
    pub async fn execute_as<T: DeserializeOwned>(&self, call: &CallSpec) -> RestResult<T> {
        let value = Value::Object(self.execute(call).await?);
        T::deserialize(&value).map_err(|e| RestError::Protocol {
            message: format!("unexpected response shape: {}", e),
            body: value.to_string(),
        })
    }

    /// Release this handle on the HTTP transport
    ///
    /// The connection pool closes once every clone has been closed or dropped.
    pub fn close(self) {
        debug!(base_url = %self.base_url, "Closing CleverCoin REST client");
        drop(self);
    }

    async fn dispatch(&self, request: PreparedRequest) -> RestResult<(u16, String)> {
        debug!(method = %request.method, path = %request.path, "Sending request");

        let mut builder = self
            .http_client
            .request(request.method.into(), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }
        if let Some(body) = request.body {
            builder = builder.header(CONTENT_TYPE, FORM_CONTENT_TYPE).body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!(status, bytes = body.len(), "Received response");

        Ok((status, body))
    }
}

/// Validate a base URL and strip its trailing slashes
fn parse_base_url(base_url: &str) -> RestResult<String> {
    let trimmed = base_url.trim_end_matches('/');
    let url = Url::parse(trimmed)
        .map_err(|e| RestError::validation(format!("invalid base URL {:?}: {}", base_url, e)))?;

    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(RestError::validation(format!(
            "base URL {:?} must be an absolute http(s) URL",
            base_url
        )));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(RestError::validation(format!(
            "base URL {:?} cannot carry a query or fragment",
            base_url
        )));
    }

    Ok(trimmed.to_string())
}

impl std::fmt::Debug for ClevercoinClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClevercoinClient")
            .field("base_url", &self.base_url)
            .field("has_credentials", &self.has_credentials())
            .finish()
    }
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL
    pub base_url: String,
    /// API credentials (optional)
    pub credentials: Option<Credentials>,
    /// Overall request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// Skip TLS certificate verification. Never enable against production.
    pub accept_invalid_certs: bool,
    /// Custom user agent
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            accept_invalid_certs: false,
            user_agent: None,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Load credentials and an optional base URL from the environment
    ///
    /// Reads `CLEVERCOIN_API_KEY`, `CLEVERCOIN_API_SECRET` and, if set,
    /// `CLEVERCOIN_BASE_URL`.
    pub fn from_env() -> RestResult<Self> {
        let mut config = Self::default().with_credentials(Credentials::from_env()?);
        if let Ok(base_url) = std::env::var(ENV_BASE_URL) {
            config = config.with_base_url(base_url);
        }
        Ok(config)
    }

    /// Set base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set credentials
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set overall request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set connect timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Disable TLS certificate verification (testing only)
    pub fn danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Set user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}
