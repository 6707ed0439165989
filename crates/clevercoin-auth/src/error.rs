//! Error types for authentication operations

/// Errors that can occur while loading credentials or signing a request
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Invalid API credentials
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Environment variable not set
    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),

    /// A body parameter uses a name reserved for the signature payload
    #[error("Parameter name is reserved for authentication: {0}")]
    ReservedParameter(String),

    /// Failed to encode the signature payload
    #[error("Encoding error: {0}")]
    Encoding(String),
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AuthError::EnvVarNotSet("CLEVERCOIN_API_KEY".to_string());
        assert!(err.to_string().contains("CLEVERCOIN_API_KEY"));
    }

    #[test]
    fn test_reserved_parameter_display() {
        let err = AuthError::ReservedParameter("X-Auth-Nonce".to_string());
        assert_eq!(
            err.to_string(),
            "Parameter name is reserved for authentication: X-Auth-Nonce"
        );
    }
}
