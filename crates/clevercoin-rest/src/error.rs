//! Error types for REST API operations

use clevercoin_auth::AuthError;

/// Errors that can occur while executing a call
///
/// Every failure of a call is exactly one of these. The client never retries;
/// use [`RestError::is_retryable`] to decide at the call site.
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    /// Caller misuse detected before any network I/O
    #[error("Validation error: {0}")]
    Validation(String),

    /// Network or TLS failure while talking to the server
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// HTTP 200 with a body that is not a JSON object
    #[error("Protocol error: {message}")]
    Protocol {
        /// What was wrong with the response
        message: String,
        /// Raw response body
        body: String,
    },

    /// Non-200 response
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// `error` field of the response, or the raw body
        message: String,
    },
}

impl RestError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn not_an_object(body: impl Into<String>) -> Self {
        Self::Protocol {
            message: "response is not valid JSON object".to_string(),
            body: body.into(),
        }
    }

    /// HTTP status associated with this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|s| s.as_u16()),
            Self::Validation(_) | Self::Protocol { .. } => None,
        }
    }

    /// Check if the call may reasonably be retried by the caller
    ///
    /// True for transport failures and 5xx responses.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Api { status, .. } => *status >= 500,
            Self::Validation(_) | Self::Protocol { .. } => false,
        }
    }

    /// Check if the server rejected the request as a client error (4xx)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Api { status, .. } if (400..500).contains(status))
    }

    /// Check if the underlying transport failure was a timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(err) if err.is_timeout())
    }
}

impl From<AuthError> for RestError {
    fn from(err: AuthError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;
