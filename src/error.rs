use thiserror::Error;

/// Registration-time failures.
///
/// Transport-level failures (timeouts, refused connections, body read
/// errors) never surface here; they are captured per entry in
/// [`crate::ResultEntry::error`] so that one failing request cannot abort
/// its siblings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchError {
    /// The method is not one of GET, POST, PUT, DELETE.
    #[error("invalid method: {0}")]
    InvalidMethod(String),

    /// The request spec was built without a key.
    #[error("request spec has no key")]
    MissingKey,
}
