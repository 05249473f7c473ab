//! Terminal interface for browsing fetched entries.
//!
//! The browser is plain line-oriented I/O over any `BufRead`/`Write` pair, so
//! the binary drives it with stdin/stdout and tests drive it with byte buffers.

mod browser;

pub use browser::{
    print_detail, print_listing, run, Action, INVALID_INPUT, INVALID_NUMBER, PROMPT,
};
