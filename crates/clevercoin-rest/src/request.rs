//! Request building
//!
//! Turns a [`CallSpec`] into the URL, headers and body that go on the wire.
//! Every check here runs before any network I/O.

use clevercoin_auth::{Clock, Credentials, Nonce, RequestSigner};

use crate::error::{RestError, RestResult};
use crate::types::{CallSpec, Method, Visibility};

/// Content type used for request bodies
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A fully built request, ready for dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    pub method: Method,
    /// Path including the query string, as signed
    pub path: String,
    pub url: String,
    /// Authentication headers; empty for public calls
    pub headers: Vec<(&'static str, String)>,
    /// Form-encoded body; `None` for GET and HEAD
    pub body: Option<String>,
}

/// GET and HEAD never send a body
fn carries_body(method: Method) -> bool {
    !matches!(method, Method::Get | Method::Head)
}

/// Check that an endpoint name reaches the server exactly as it is signed
///
/// Only unreserved characters and `/` are allowed, and no segment may be `.`
/// or `..`. Anything else would be escaped or normalized by the URL parser.
fn validate_name(name: &str) -> RestResult<()> {
    if name.is_empty() {
        return Err(RestError::validation("endpoint name is empty"));
    }
    if let Some(c) = name
        .chars()
        .find(|&c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~' | '/')))
    {
        return Err(RestError::validation(format!(
            "endpoint name {:?} contains invalid character {:?}",
            name, c
        )));
    }
    if name.split('/').any(|segment| segment == "." || segment == "..") {
        return Err(RestError::validation(format!(
            "endpoint name {:?} contains a dot segment",
            name
        )));
    }
    Ok(())
}

/// Build the request for `call` against `base_url`
///
/// `credentials` is required for private calls and ignored for public ones.
/// The clock is only read when the call is signed.
pub fn build_request(
    base_url: &str,
    call: &CallSpec,
    credentials: Option<&Credentials>,
    clock: &dyn Clock,
) -> RestResult<PreparedRequest> {
    validate_name(&call.name)?;
    if !carries_body(call.method) && !call.body.is_empty() {
        return Err(RestError::validation(format!(
            "{} request cannot carry body parameters",
            call.method
        )));
    }

    let mut path = call.path();
    if !call.query.is_empty() {
        path.push('?');
        path.push_str(&call.query.to_query_string()?);
    }

    let headers = match call.visibility {
        Visibility::Public => Vec::new(),
        Visibility::Private => {
            let credentials = credentials.ok_or_else(|| {
                RestError::validation("private call requires API credentials")
            })?;
            RequestSigner::with_nonce(credentials, Nonce::from_clock(clock))
                .sign(call.method.as_str(), &path, call.body.iter())?
                .to_vec()
        }
    };

    let body = if carries_body(call.method) {
        Some(call.body.to_query_string()?)
    } else {
        None
    };

    Ok(PreparedRequest {
        method: call.method,
        url: format!("{}{}", base_url, path),
        path,
        headers,
        body,
    })
}
