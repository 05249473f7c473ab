//! Feed fetching and parsing.
//!
//! - [`parser`] - RSS/Atom/JSON Feed parsing using the `feed-rs` crate
//! - [`fetcher`] - HTTP fetching with fixed-delay retry and progress reporting
//!
//! # Example
//!
//! ```ignore
//! use newsfetch::feed::{ConsoleReporter, FeedClient, RetryPolicy};
//!
//! let client = FeedClient::new(reqwest::Client::new(), RetryPolicy::default());
//! let entries = client.fetch("https://example.com/feed.xml", &mut ConsoleReporter).await?;
//! ```

mod fetcher;
mod parser;

pub use fetcher::{
    ConsoleReporter, FeedClient, FetchError, FetchFailure, FetchReporter, RetryPolicy,
    DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY,
};
pub use parser::{parse_feed, FeedEntry, UNKNOWN_DATE};
