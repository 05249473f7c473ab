use crate::config::Config;
use crate::feed::parser::{parse_feed, FeedEntry};
use futures::StreamExt;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);
const MAX_FEED_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Errors from a single fetch attempt.
///
/// Every variant is retried with the same fixed delay; see [`FeedClient::fetch`].
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,
    /// Body could not be parsed as RSS, Atom or JSON Feed
    #[error("Parse error: {0}")]
    Parse(String),
    /// Response body exceeded the 10MB size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Response was incomplete (received fewer bytes than Content-Length)
    #[error("Incomplete response: expected {expected} bytes, received {received}")]
    IncompleteResponse { expected: u64, received: usize },
}

impl FetchError {
    fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Network(e)
        }
    }
}

/// Terminal outcome of [`FeedClient::fetch`] when no entries can be shown.
#[derive(Debug, Error)]
pub enum FetchFailure {
    /// Every attempt failed; holds the error from the last one.
    #[error("Giving up after {attempts} attempts: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: FetchError },
    /// The feed parsed cleanly but contained no entries.
    #[error("No entries found in feed")]
    EmptyFeed,
}

/// Fixed-delay retry settings for [`FeedClient::fetch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt, so `max_retries + 1` attempts in total.
    pub max_retries: u32,
    /// Pause between consecutive attempts.
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

/// Receives the user-facing progress of a fetch.
///
/// The console implementation prints each event; tests record them.
pub trait FetchReporter {
    /// An attempt failed with a transport or parse error.
    fn attempt_failed(&mut self, error: &FetchError);
    /// About to sleep before retry number `retry` of `max_retries`.
    fn retrying(&mut self, retry: u32, max_retries: u32, delay: Duration);
    /// The last allowed attempt failed.
    fn gave_up(&mut self, attempts: u32);
    /// The feed parsed but had no entries.
    fn no_entries(&mut self);
}

/// Prints fetch progress to stdout.
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl FetchReporter for ConsoleReporter {
    fn attempt_failed(&mut self, error: &FetchError) {
        println!("Error fetching feed: {}", error);
    }

    fn retrying(&mut self, retry: u32, max_retries: u32, _delay: Duration) {
        println!("Retrying... ({}/{})", retry, max_retries);
    }

    fn gave_up(&mut self, _attempts: u32) {
        println!("Maximum retries reached, giving up.");
    }

    fn no_entries(&mut self) {
        println!("No entries found in this feed.");
    }
}

/// HTTP client plus retry policy for fetching a single feed.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    policy: RetryPolicy,
}

impl FeedClient {
    pub fn new(http: reqwest::Client, policy: RetryPolicy) -> Self {
        Self { http, policy }
    }

    /// Builds the HTTP client and retry policy described by `config`.
    ///
    /// No request timeout is set unless `request_timeout_secs` is non-zero.
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self::new(builder.build()?, config.retry_policy()))
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Fetches `url` and returns its entries in feed order.
    ///
    /// Transport errors and parse errors each consume one retry; after
    /// `max_retries` retries the last error is returned inside
    /// [`FetchFailure::RetriesExhausted`]. A feed that parses but has no
    /// entries yields [`FetchFailure::EmptyFeed`] without retrying.
    ///
    /// All progress, including the failure itself, is sent to `reporter`
    /// before returning.
    pub async fn fetch<R: FetchReporter + ?Sized>(
        &self,
        url: &str,
        reporter: &mut R,
    ) -> Result<Vec<FeedEntry>, FetchFailure> {
        let mut retries = 0;

        let entries = loop {
            match self.fetch_once(url).await {
                Ok(entries) => break entries,
                Err(e) => {
                    self.retry_or_give_up(url, &mut retries, e, reporter)
                        .await?
                }
            }
        };

        if entries.is_empty() {
            tracing::info!(url = %url, "Feed parsed but contains no entries");
            reporter.no_entries();
            return Err(FetchFailure::EmptyFeed);
        }

        tracing::debug!(url = %url, entries = entries.len(), attempts = retries + 1, "Feed fetched");
        Ok(entries)
    }

    /// Shared failure path for transport and parse errors.
    ///
    /// Sleeps and bumps `retries` when another attempt is allowed, otherwise
    /// hands back the terminal failure.
    async fn retry_or_give_up<R: FetchReporter + ?Sized>(
        &self,
        url: &str,
        retries: &mut u32,
        error: FetchError,
        reporter: &mut R,
    ) -> Result<(), FetchFailure> {
        reporter.attempt_failed(&error);

        if *retries >= self.policy.max_retries {
            let attempts = *retries + 1;
            tracing::warn!(url = %url, attempts, error = %error, "Feed fetch failed, retries exhausted");
            reporter.gave_up(attempts);
            return Err(FetchFailure::RetriesExhausted {
                attempts,
                last_error: error,
            });
        }

        let delay = self.policy.retry_delay;
        tracing::warn!(
            url = %url,
            retry = *retries + 1,
            max_retries = self.policy.max_retries,
            delay_ms = delay.as_millis() as u64,
            error = %error,
            "Feed fetch failed, retrying after delay"
        );
        reporter.retrying(*retries + 1, self.policy.max_retries, delay);

        tokio::time::sleep(delay).await;
        *retries += 1;
        Ok(())
    }

    async fn fetch_once(&self, url: &str) -> Result<Vec<FeedEntry>, FetchError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(FetchError::from_reqwest)?;

        if !response.status().is_success() {
            return Err(FetchError::HttpStatus(response.status().as_u16()));
        }

        let bytes = read_limited_bytes(response, MAX_FEED_SIZE).await?;

        // Body is treated as UTF-8 whatever charset the server declares
        let text = String::from_utf8_lossy(&bytes);

        parse_feed(text.as_bytes()).map_err(|e| FetchError::Parse(e.to_string()))
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    let expected_length = response.content_length();

    if let Some(len) = expected_length {
        if len > limit as u64 {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::from_reqwest)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    if let Some(expected) = expected_length {
        if (bytes.len() as u64) < expected {
            return Err(FetchError::IncompleteResponse {
                expected,
                received: bytes.len(),
            });
        }
    }

    Ok(bytes)
}
