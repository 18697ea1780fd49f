use std::fmt;
use std::str::FromStr;

use crate::error::BatchError;
use crate::request::options::{OptionOverrides, TransportOptions};

/// HTTP verbs the batch supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }

    /// POST and PUT carry a payload; GET and DELETE never do.
    pub(crate) fn takes_body(&self) -> bool {
        matches!(self, Method::Post | Method::Put)
    }

    pub(crate) fn to_reqwest(self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

impl FromStr for Method {
    type Err = BatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            other => Err(BatchError::InvalidMethod(other.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One registered, not-yet-sent request.
///
/// Built fluently and handed to [`crate::RequestBatch::register`], which
/// validates the key and method and merges the transport options. The URL
/// is not validated here; a malformed URL surfaces as a transport error in
/// that request's [`crate::ResultEntry`].
///
/// ```
/// use http_batch::RequestSpec;
///
/// let spec = RequestSpec::post("http://example.test/create")
///     .key("create")
///     .header("Content-Type: application/x-www-form-urlencoded")
///     .body("x=1");
/// ```
#[derive(Debug, Clone)]
pub struct RequestSpec<K> {
    pub(crate) key: Option<K>,
    pub(crate) url: String,
    pub(crate) method: String,
    pub(crate) headers: Vec<String>,
    pub(crate) body: Option<Vec<u8>>,
    pub(crate) overrides: OptionOverrides,
}

impl<K> RequestSpec<K> {
    /// Starts a spec with the default method, GET.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            key: None,
            url: url.into(),
            method: "GET".to_string(),
            headers: Vec::new(),
            body: None,
            overrides: OptionOverrides::default(),
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(url).method("POST")
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(url).method("PUT")
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(url).method("DELETE")
    }

    /// Identifier the result entry is returned under. Required; registering
    /// a spec without a key fails with [`BatchError::MissingKey`].
    pub fn key(mut self, key: K) -> Self {
        self.key = Some(key);
        self
    }

    /// Case-insensitive; validated and normalized at registration.
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// Adds one `"Name: value"` header line, passed through to the
    /// transport in registration order.
    pub fn header(mut self, line: impl Into<String>) -> Self {
        self.headers.push(line.into());
        self
    }

    pub fn headers<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headers.extend(lines.into_iter().map(Into::into));
        self
    }

    /// Raw payload for POST and PUT; ignored for GET and DELETE.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Transport option overrides, merged over the method defaults.
    pub fn overrides(mut self, overrides: OptionOverrides) -> Self {
        self.overrides = overrides;
        self
    }
}

/// A spec that passed registration: method parsed, options merged, payload
/// dropped for verbs that do not carry one.
#[derive(Debug, Clone)]
pub(crate) struct PreparedRequest {
    pub url: String,
    pub method: Method,
    pub headers: Vec<String>,
    pub body: Option<Vec<u8>>,
    pub options: TransportOptions,
}

impl<K> RequestSpec<K> {
    // Method is validated before the key, matching registration error
    // precedence when both are wrong.
    pub(crate) fn prepare(mut self) -> Result<(K, PreparedRequest), BatchError> {
        let method: Method = self.method.parse()?;
        let key = self.key.take().ok_or(BatchError::MissingKey)?;
        Ok((key, self.into_prepared(method)))
    }

    pub(crate) fn prepare_unkeyed(self) -> Result<PreparedRequest, BatchError> {
        let method: Method = self.method.parse()?;
        Ok(self.into_prepared(method))
    }

    fn into_prepared(self, method: Method) -> PreparedRequest {
        let options = TransportOptions::for_method(method).overlay(&self.overrides);
        let body = if method.takes_body() { self.body } else { None };
        PreparedRequest {
            url: self.url,
            method,
            headers: self.headers,
            body,
            options,
        }
    }
}
