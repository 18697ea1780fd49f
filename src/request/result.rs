use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// One completed request's outcome.
///
/// Returned under the key the request was registered with. Transport-level
/// failures do not remove an entry from the mapping; they set
/// [`ResultEntry::error`] and leave `status` at 0, so callers inspect each
/// entry to determine per-request success.
#[derive(Debug, Clone, Serialize)]
pub struct ResultEntry {
    /// HTTP status code, or 0 when no status was obtained from the server.
    pub status: u16,
    /// URL the response was ultimately served from.
    pub effective_url: String,
    /// Response headers in arrival order.
    pub headers: Vec<(String, String)>,
    /// Full buffered response body.
    pub content: String,
    /// Wall-clock duration of the request, in seconds.
    pub total_time: f64,
    /// `"start -> end"` local timestamps for the request.
    pub request_time: String,
    /// Transport-level failure, if any. `None` does not imply a 2xx status.
    pub error: Option<TransportError>,
}

impl ResultEntry {
    pub fn is_success(&self) -> bool {
        self.error.is_none() && (200..300).contains(&self.status)
    }
}

/// A request-level transport failure, captured in the entry it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{kind}: {message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransportErrorKind {
    /// The connect or total timeout elapsed.
    Timeout,
    /// The connection could not be established.
    Connect,
    /// The request failed for another transport reason, or the handle
    /// could not be constructed.
    Request,
    /// The response arrived but its body could not be read.
    Body,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransportErrorKind::Timeout => "timeout",
            TransportErrorKind::Connect => "connect error",
            TransportErrorKind::Request => "request error",
            TransportErrorKind::Body => "body read error",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(status: u16, error: Option<TransportError>) -> ResultEntry {
        ResultEntry {
            status,
            effective_url: String::new(),
            headers: Vec::new(),
            content: String::new(),
            total_time: 0.0,
            request_time: String::new(),
            error,
        }
    }

    #[test]
    fn success_requires_2xx_and_no_error() {
        assert!(entry(200, None).is_success());
        assert!(entry(201, None).is_success());
        assert!(!entry(404, None).is_success());
        assert!(!entry(0, None).is_success());

        let err = TransportError {
            kind: TransportErrorKind::Timeout,
            message: "request timed out".to_string(),
        };
        assert!(!entry(200, Some(err)).is_success());
    }

    #[test]
    fn transport_error_displays_kind_and_message() {
        let err = TransportError {
            kind: TransportErrorKind::Connect,
            message: "connection refused".to_string(),
        };
        assert_eq!(err.to_string(), "connect error: connection refused");
    }
}
