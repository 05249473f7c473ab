//! Utility functions for common operations.
//!
//! This module provides reusable utilities for:
//!
//! - **URL validation**: Reject URLs that can never be fetched before any request is made
//! - **Text processing**: HTML-to-text cleanup and terminal control character stripping
//!
//! # Examples
//!
//! ```
//! use newsfetch::util::{clean, strip_control_chars, validate_url};
//!
//! let url = validate_url("https://example.com/feed.xml").unwrap();
//! assert_eq!(url.scheme(), "https");
//!
//! assert_eq!(clean("<p>Hello</p>"), "Hello");
//! assert_eq!(strip_control_chars("\x1b[1mbold\x1b[0m"), "bold");
//! ```

mod text;
mod url_validator;

pub use text::{clean, strip_control_chars};
pub use url_validator::{validate_url, UrlValidationError};
