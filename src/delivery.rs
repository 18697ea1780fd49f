use std::collections::HashMap;

use crate::request::result::ResultEntry;

/// How a finished batch's results are handed over.
///
/// Dormant extension point: asynchronous delivery with caller
/// notification was planned in the original design but never built, and
/// [`crate::RequestBatch::execute`] always returns the mapping directly.
/// A configured strategy is invoked synchronously after the mapping is
/// assembled, before `execute` returns.
pub trait Delivery<K>: Send + Sync {
    fn deliver(&self, results: &HashMap<K, ResultEntry>);
}

/// Default strategy: results go back to the caller as the return value
/// and nothing else happens.
#[derive(Debug, Clone, Copy, Default)]
pub struct Inline;

impl<K> Delivery<K> for Inline {
    fn deliver(&self, _results: &HashMap<K, ResultEntry>) {}
}
