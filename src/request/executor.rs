use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, SystemTime};

use futures::future::join_all;
use log::{debug, warn};
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::redirect::Policy;
use reqwest::Client;

use crate::delivery::Delivery;
use crate::error::BatchError;
use crate::request::result::{ResultEntry, TransportError, TransportErrorKind};
use crate::request::spec::{PreparedRequest, RequestSpec};
use crate::utils::time::format_span;

const REDIRECT_LIMIT: usize = 10;

/// Accumulates keyed request specs and executes them all concurrently.
///
/// Requests are held as an ordered list of `(key, request)` pairs, and
/// results are threaded through dispatch and collection by that pairing,
/// so each entry in the returned mapping corresponds exactly to the spec
/// registered under its key regardless of completion order.
///
/// A batch is constructed empty, filled via [`register`](Self::register),
/// and drained by [`execute`](Self::execute); it can be reused for a new
/// round afterwards. `execute` takes `&mut self`, so registration cannot
/// race an in-flight execution.
///
/// ```no_run
/// use http_batch::{RequestBatch, RequestSpec};
///
/// # async fn run() -> Result<(), http_batch::BatchError> {
/// let mut batch = RequestBatch::new();
/// batch.register(RequestSpec::get("http://example.test/ok").key("a"))?;
/// batch.register(RequestSpec::post("http://example.test/create").key("b").body("x=1"))?;
///
/// let results = batch.execute().await;
/// assert_eq!(results.len(), 2);
/// # Ok(())
/// # }
/// ```
pub struct RequestBatch<K> {
    requests: Vec<(K, PreparedRequest)>,
    delivery: Option<Box<dyn Delivery<K>>>,
}

impl<K> Default for RequestBatch<K> {
    fn default() -> Self {
        Self {
            requests: Vec::new(),
            delivery: None,
        }
    }
}

impl<K: Eq + Hash> RequestBatch<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of currently registered specs.
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Validates and stores a spec under its key, overwriting any prior
    /// spec with the same key. Sends nothing.
    ///
    /// Fails with [`BatchError::InvalidMethod`] or
    /// [`BatchError::MissingKey`]; neither failure touches batch state.
    pub fn register(&mut self, spec: RequestSpec<K>) -> Result<(), BatchError> {
        let (key, prepared) = spec.prepare()?;
        match self.requests.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = prepared,
            None => self.requests.push((key, prepared)),
        }
        Ok(())
    }

    /// Installs a delivery strategy observed after each execution.
    ///
    /// Extension point held over for asynchronous result delivery, which
    /// does not exist yet: [`execute`](Self::execute) always returns the
    /// mapping directly and invokes the strategy synchronously.
    pub fn set_delivery(&mut self, delivery: impl Delivery<K> + 'static) {
        self.delivery = Some(Box::new(delivery));
    }

    /// Executes every registered spec concurrently and returns the
    /// per-key results once all of them have reached a terminal state.
    ///
    /// Each request gets its own transport handle configured with its
    /// merged options; all handles are started together, awaited at a
    /// single suspension point, and released before this method returns.
    /// Transport-level failures land in the affected entry's
    /// [`error`](ResultEntry::error) field and never abort the batch, so
    /// the mapping always holds one entry per registered spec. An empty
    /// batch returns an empty mapping.
    pub async fn execute(&mut self) -> HashMap<K, ResultEntry> {
        let requests: Vec<(K, PreparedRequest)> = self.requests.drain(..).collect();
        debug!("executing batch of {} requests", requests.len());

        let futures = requests.into_iter().map(|(key, request)| async move {
            let entry = execute_single_request(request).await;
            (key, entry)
        });

        let mut results = HashMap::new();
        for (key, entry) in join_all(futures).await {
            results.insert(key, entry);
        }

        if let Some(delivery) = &self.delivery {
            delivery.deliver(&results);
        }
        results
    }
}

/// Executes one spec on its own, outside any batch. The spec's key, if
/// set, is ignored; the entry is returned directly.
pub async fn execute_one<K>(spec: RequestSpec<K>) -> Result<ResultEntry, BatchError> {
    let prepared = spec.prepare_unkeyed()?;
    Ok(execute_single_request(prepared).await)
}

async fn execute_single_request(request: PreparedRequest) -> ResultEntry {
    let start = SystemTime::now();

    let outcome = match build_handle(&request) {
        Ok(builder) => send_and_read(&request, builder).await,
        Err(e) => Outcome::failed(
            TransportErrorKind::Request,
            format!("handle construction failed: {}", e),
        ),
    };

    let end = SystemTime::now();
    let total_time = end
        .duration_since(start)
        .unwrap_or(Duration::from_secs(0))
        .as_secs_f64();

    debug!(
        "{} {} finished: status {} in {:.4}s",
        request.method, request.url, outcome.status, total_time
    );

    ResultEntry {
        status: outcome.status,
        effective_url: outcome.effective_url.unwrap_or(request.url),
        headers: outcome.headers,
        content: outcome.content,
        total_time,
        request_time: format_span(start, end),
        error: outcome.error,
    }
}

struct Outcome {
    status: u16,
    effective_url: Option<String>,
    headers: Vec<(String, String)>,
    content: String,
    error: Option<TransportError>,
}

impl Outcome {
    fn failed(kind: TransportErrorKind, message: String) -> Self {
        Self {
            status: 0,
            effective_url: None,
            headers: Vec::new(),
            content: String::new(),
            error: Some(TransportError { kind, message }),
        }
    }
}

/// Builds the independent transport handle for one request: a client of
/// its own carrying the merged options, plus the configured request.
fn build_handle(request: &PreparedRequest) -> reqwest::Result<reqwest::RequestBuilder> {
    let redirect = if request.options.follow_redirects {
        Policy::limited(REDIRECT_LIMIT)
    } else {
        Policy::none()
    };

    let client = Client::builder()
        .connect_timeout(request.options.connect_timeout)
        .timeout(request.options.timeout)
        .redirect(redirect)
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .build()?;

    let mut builder = client.request(request.method.to_reqwest(), &request.url);
    for line in &request.headers {
        match parse_header_line(line) {
            Some((name, value)) => builder = builder.header(name, value),
            None => warn!("skipping malformed header line: {:?}", line),
        }
    }
    if let Some(body) = &request.body {
        builder = builder.body(body.clone());
    }
    Ok(builder)
}

async fn send_and_read(request: &PreparedRequest, builder: reqwest::RequestBuilder) -> Outcome {
    // The client already carries the total timeout; this outer guard bounds
    // the whole send-and-buffer sequence with the same budget.
    match tokio::time::timeout(request.options.timeout, builder.send()).await {
        Ok(Ok(response)) => {
            let status = response.status().as_u16();
            let effective_url = Some(response.url().to_string());
            let headers = response
                .headers()
                .iter()
                .map(|(name, value)| {
                    (
                        name.to_string(),
                        value.to_str().unwrap_or_default().to_string(),
                    )
                })
                .collect();
            match response.text().await {
                Ok(content) => Outcome {
                    status,
                    effective_url,
                    headers,
                    content,
                    error: None,
                },
                Err(e) => Outcome {
                    status,
                    effective_url,
                    headers,
                    content: String::new(),
                    error: Some(TransportError {
                        kind: TransportErrorKind::Body,
                        message: format!("failed to read response body: {}", e),
                    }),
                },
            }
        }
        Ok(Err(e)) => {
            let kind = if e.is_timeout() {
                TransportErrorKind::Timeout
            } else if e.is_connect() {
                TransportErrorKind::Connect
            } else {
                TransportErrorKind::Request
            };
            Outcome::failed(kind, format!("request error: {}", e))
        }
        Err(_) => Outcome::failed(
            TransportErrorKind::Timeout,
            format!(
                "request timed out after {:.2} seconds",
                request.options.timeout.as_secs_f64()
            ),
        ),
    }
}

fn parse_header_line(line: &str) -> Option<(HeaderName, HeaderValue)> {
    let (name, value) = line.split_once(':')?;
    let name = HeaderName::from_bytes(name.trim().as_bytes()).ok()?;
    let value = HeaderValue::from_str(value.trim()).ok()?;
    Some((name, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::spec::Method;

    #[test]
    fn register_rejects_invalid_method_without_side_effects() {
        let mut batch = RequestBatch::new();
        batch
            .register(RequestSpec::get("http://example.test/a").key("a"))
            .unwrap();

        let err = batch
            .register(
                RequestSpec::new("http://example.test/b")
                    .key("b")
                    .method("PATCH"),
            )
            .unwrap_err();
        assert_eq!(err, BatchError::InvalidMethod("PATCH".to_string()));
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.requests[0].0, "a");
    }

    #[test]
    fn register_rejects_missing_key_without_side_effects() {
        let mut batch: RequestBatch<&str> = RequestBatch::new();
        let err = batch
            .register(RequestSpec::get("http://example.test/"))
            .unwrap_err();
        assert_eq!(err, BatchError::MissingKey);
        assert!(batch.is_empty());
    }

    #[test]
    fn reregistering_a_key_overwrites_in_place() {
        let mut batch = RequestBatch::new();
        batch
            .register(RequestSpec::get("http://example.test/old").key("a"))
            .unwrap();
        batch
            .register(RequestSpec::get("http://example.test/z").key("z"))
            .unwrap();
        batch
            .register(
                RequestSpec::post("http://example.test/new")
                    .key("a")
                    .body("x=1"),
            )
            .unwrap();

        assert_eq!(batch.len(), 2);
        let (key, prepared) = &batch.requests[0];
        assert_eq!(*key, "a");
        assert_eq!(prepared.url, "http://example.test/new");
        assert_eq!(prepared.method, Method::Post);
    }

    #[test]
    fn header_lines_parse_and_trim() {
        let (name, value) = parse_header_line("Content-Type: application/json").unwrap();
        assert_eq!(name.as_str(), "content-type");
        assert_eq!(value.to_str().unwrap(), "application/json");

        assert!(parse_header_line("no separator here").is_none());
        assert!(parse_header_line("bad name{}: x").is_none());
    }

    #[tokio::test]
    async fn executing_an_empty_batch_returns_an_empty_mapping() {
        let mut batch: RequestBatch<String> = RequestBatch::new();
        let results = batch.execute().await;
        assert!(results.is_empty());
    }
}
