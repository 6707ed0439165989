//! Call description types
//!
//! A [`CallSpec`] is everything an endpoint wrapper needs to hand the client:
//! visibility, verb, endpoint name, query parameters and body parameters.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;

use crate::error::{RestError, RestResult};

/// JSON object returned by a successful call
pub type JsonObject = serde_json::Map<String, serde_json::Value>;

/// Whether a call is authenticated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// No authentication headers
    Public,
    /// Signed with the account credentials
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }
}

impl FromStr for Visibility {
    type Err = RestError;

    fn from_str(s: &str) -> RestResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "public" => Ok(Self::Public),
            "private" => Ok(Self::Private),
            _ => Err(RestError::validation(format!("unknown call visibility: {}", s))),
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supported HTTP verbs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Head,
}

impl Method {
    /// Upper-case verb as it appears on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
        }
    }
}

impl FromStr for Method {
    type Err = RestError;

    fn from_str(s: &str) -> RestResult<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            "HEAD" => Ok(Self::Head),
            _ => Err(RestError::validation(format!("unsupported HTTP method: {}", s))),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
            Method::Head => reqwest::Method::HEAD,
        }
    }
}

/// Insertion-ordered string parameters
///
/// Re-inserting a key replaces its value but keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(IndexMap<String, String>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a parameter, returning the previous value if any
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Chainable insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Form-encode in insertion order
    pub fn to_query_string(&self) -> RestResult<String> {
        let pairs: Vec<(&str, &str)> = self.iter().collect();
        serde_urlencoded::to_string(pairs).map_err(|e| RestError::validation(e.to_string()))
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Params
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// Description of one API call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSpec {
    pub visibility: Visibility,
    pub method: Method,
    /// Endpoint name, appended to `/v1/`
    pub name: String,
    pub query: Params,
    pub body: Params,
}

impl CallSpec {
    pub fn new(visibility: Visibility, method: Method, name: impl Into<String>) -> Self {
        Self {
            visibility,
            method,
            name: name.into(),
            query: Params::new(),
            body: Params::new(),
        }
    }

    /// Unauthenticated call
    pub fn public(method: Method, name: impl Into<String>) -> Self {
        Self::new(Visibility::Public, method, name)
    }

    /// Signed call
    pub fn private(method: Method, name: impl Into<String>) -> Self {
        Self::new(Visibility::Private, method, name)
    }

    /// Add a query parameter
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key, value);
        self
    }

    /// Add a body parameter
    pub fn body(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.body.insert(key, value);
        self
    }

    /// Endpoint path without the query string
    pub fn path(&self) -> String {
        format!("/v1/{}", self.name)
    }
}
