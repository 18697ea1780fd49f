use std::time::Duration;

use crate::request::spec::Method;

/// Default connect and total timeouts applied to every request.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(4);
pub const TIMEOUT: Duration = Duration::from_secs(4);

/// Merged, immutable transport configuration for one request.
///
/// Built once at registration by overlaying the caller's
/// [`OptionOverrides`] onto the method-derived defaults; never mutated
/// afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportOptions {
    pub connect_timeout: Duration,
    /// Total wall-clock budget for the request, connect time included.
    pub timeout: Duration,
    pub follow_redirects: bool,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            connect_timeout: CONNECT_TIMEOUT,
            timeout: TIMEOUT,
            follow_redirects: false,
        }
    }
}

impl TransportOptions {
    /// Method-derived defaults. Every verb shares the same base; the verb
    /// itself selects payload handling, not the option set.
    pub(crate) fn for_method(_method: Method) -> Self {
        Self::default()
    }

    pub(crate) fn overlay(mut self, overrides: &OptionOverrides) -> Self {
        if let Some(connect_timeout) = overrides.connect_timeout {
            self.connect_timeout = connect_timeout;
        }
        if let Some(timeout) = overrides.timeout {
            self.timeout = timeout;
        }
        if let Some(follow_redirects) = overrides.follow_redirects {
            self.follow_redirects = follow_redirects;
        }
        self
    }
}

/// Per-request overrides, overlaid last so they win over the defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptionOverrides {
    pub connect_timeout: Option<Duration>,
    pub timeout: Option<Duration>,
    pub follow_redirects: Option<bool>,
}
