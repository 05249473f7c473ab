//! Fetch an RSS/Atom feed and browse its entries from the terminal.
//!
//! - [`feed`] - HTTP fetching with fixed-delay retry, and feed parsing
//! - [`ui`] - numbered listing and interactive selection loop
//! - [`util`] - HTML cleanup, control-character stripping, URL validation
//! - [`config`] - optional TOML configuration

pub mod config;
pub mod feed;
pub mod ui;
pub mod util;
