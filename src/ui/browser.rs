//! Numbered entry listing followed by a read-select-print loop.

use crate::feed::FeedEntry;
use crate::util::{clean, strip_control_chars};
use std::io::{self, BufRead, Write};
use std::num::IntErrorKind;

const RULE_WIDTH: usize = 80;

pub const PROMPT: &str = "Enter an entry number to view (or 'q' to quit): ";
pub const INVALID_NUMBER: &str = "Invalid number, please try again.";
pub const INVALID_INPUT: &str = "Invalid input, please try again.";

/// Result of handling one line of input.
///
/// Returned by the input handler to signal whether the prompt loop should
/// keep reading or stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Prompt again.
    Continue,
    /// Leave the browser.
    Quit,
}

/// What a line of input asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Selection {
    Quit,
    /// Zero-based index into the entry list.
    Entry(usize),
    OutOfRange,
    NotANumber,
}

fn parse_selection(line: &str, count: usize) -> Selection {
    let trimmed = line.trim();
    if trimmed.eq_ignore_ascii_case("q") {
        return Selection::Quit;
    }

    match trimmed.parse::<i64>() {
        Ok(n) if n >= 1 && (n as u64) <= count as u64 => Selection::Entry(n as usize - 1),
        Ok(_) => Selection::OutOfRange,
        // Still a whole number, just not one any list can hold
        Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
            Selection::OutOfRange
        }
        Err(_) => Selection::NotANumber,
    }
}

fn rule() -> String {
    "-".repeat(RULE_WIDTH)
}

/// Prints the numbered summary of every entry.
pub fn print_listing<W: Write>(entries: &[FeedEntry], out: &mut W) -> io::Result<()> {
    for (i, entry) in entries.iter().enumerate() {
        writeln!(out, "{}. {}", i + 1, strip_control_chars(&entry.title))?;
        writeln!(out, "   Link: {}", strip_control_chars(&entry.link))?;
        writeln!(out, "   Published: {}", strip_control_chars(&entry.published))?;
        writeln!(out, "{}", rule())?;
    }
    Ok(())
}

/// Prints one entry in full, with its summary converted to plain text.
pub fn print_detail<W: Write>(entry: &FeedEntry, out: &mut W) -> io::Result<()> {
    writeln!(out, "Title: {}", strip_control_chars(&entry.title))?;
    writeln!(out, "Link: {}", strip_control_chars(&entry.link))?;
    writeln!(out, "Published: {}", strip_control_chars(&entry.published))?;
    writeln!(out, "Summary: {}", strip_control_chars(&clean(&entry.summary)))?;
    writeln!(out, "{}", rule())
}

fn handle_input<W: Write>(
    line: &str,
    entries: &[FeedEntry],
    out: &mut W,
) -> io::Result<Action> {
    match parse_selection(line, entries.len()) {
        Selection::Quit => return Ok(Action::Quit),
        Selection::Entry(index) => print_detail(&entries[index], out)?,
        Selection::OutOfRange => writeln!(out, "{}", INVALID_NUMBER)?,
        Selection::NotANumber => writeln!(out, "{}", INVALID_INPUT)?,
    }
    Ok(Action::Continue)
}

/// Lists `entries`, then prompts for selections until the user quits.
///
/// Valid numbers (1-based, inclusive of both ends) print the entry in full;
/// anything else prints a message and prompts again. Only `q` (any case,
/// surrounding whitespace ignored) or end of input leaves the loop.
pub fn run<R: BufRead, W: Write>(
    entries: &[FeedEntry],
    mut input: R,
    out: &mut W,
) -> io::Result<()> {
    print_listing(entries, out)?;

    let mut line = String::new();
    loop {
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            tracing::debug!("Input closed, leaving browser");
            writeln!(out)?;
            return Ok(());
        }

        if handle_input(&line, entries, out)? == Action::Quit {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(n: usize) -> FeedEntry {
        FeedEntry {
            title: format!("Title {}", n),
            link: format!("https://example.com/{}", n),
            published: "Mon, 01 Jan 2024 00:00:00 +0000".to_string(),
            summary: format!("<p>Summary {} &amp; more</p>", n),
        }
    }

    fn entries(count: usize) -> Vec<FeedEntry> {
        (1..=count).map(entry).collect()
    }

    fn run_with(entries: &[FeedEntry], input: &str) -> String {
        let mut out = Vec::new();
        run(entries, input.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_selection_quit() {
        assert_eq!(parse_selection("q\n", 3), Selection::Quit);
        assert_eq!(parse_selection("  Q  \n", 3), Selection::Quit);
        assert_eq!(parse_selection("quit", 3), Selection::NotANumber);
    }

    #[test]
    fn test_parse_selection_boundaries() {
        assert_eq!(parse_selection("1", 3), Selection::Entry(0));
        assert_eq!(parse_selection("3", 3), Selection::Entry(2));
        assert_eq!(parse_selection("0", 3), Selection::OutOfRange);
        assert_eq!(parse_selection("4", 3), Selection::OutOfRange);
        assert_eq!(parse_selection("-1", 3), Selection::OutOfRange);
    }

    #[test]
    fn test_parse_selection_huge_integers_are_out_of_range() {
        assert_eq!(parse_selection("99999999999999999999", 3), Selection::OutOfRange);
        assert_eq!(parse_selection("-99999999999999999999\n", 3), Selection::OutOfRange);
    }

    #[test]
    fn test_huge_integer_prints_invalid_number() {
        let output = run_with(&entries(3), "99999999999999999999\nq\n");
        assert_eq!(output.matches(INVALID_NUMBER).count(), 1);
        assert_eq!(output.matches(INVALID_INPUT).count(), 0);
    }

    #[test]
    fn test_parse_selection_not_a_number() {
        assert_eq!(parse_selection("abc", 3), Selection::NotANumber);
        assert_eq!(parse_selection("", 3), Selection::NotANumber);
        assert_eq!(parse_selection("2.5", 3), Selection::NotANumber);
    }

    #[test]
    fn test_listing_format() {
        let mut out = Vec::new();
        print_listing(&entries(1), &mut out).unwrap();
        let expected = format!(
            "1. Title 1\n   Link: https://example.com/1\n   Published: Mon, 01 Jan 2024 00:00:00 +0000\n{}\n",
            "-".repeat(80)
        );
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn test_detail_uses_cleaned_summary() {
        let mut out = Vec::new();
        print_detail(&entry(2), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Title: Title 2\n"));
        assert!(text.contains("Link: https://example.com/2\n"));
        assert!(text.contains("Summary: Summary 2  more\n"));
    }

    #[test]
    fn test_quit_immediately_prints_listing_and_one_prompt() {
        let list = entries(2);
        let output = run_with(&list, "q\n");
        let mut listing = Vec::new();
        print_listing(&list, &mut listing).unwrap();
        let expected = format!("{}{}", String::from_utf8(listing).unwrap(), PROMPT);
        assert_eq!(output, expected);
    }

    #[test]
    fn test_selection_does_not_leave_loop() {
        let output = run_with(&entries(3), "1\n1\nq\n");
        assert_eq!(output.matches("Title: Title 1").count(), 2);
        assert_eq!(output.matches(PROMPT).count(), 3);
    }

    #[test]
    fn test_end_of_input_leaves_loop() {
        let output = run_with(&entries(1), "abc\n");
        assert_eq!(output.matches(INVALID_INPUT).count(), 1);
        assert!(output.ends_with(&format!("{}\n", PROMPT)));
    }

    #[test]
    fn test_control_sequences_not_echoed() {
        let list = vec![FeedEntry {
            title: "\x1b]0;pwned\x07Safe title".to_string(),
            link: "https://example.com".to_string(),
            published: "Unknown".to_string(),
            summary: "\x1b[2Jcleared".to_string(),
        }];
        let output = run_with(&list, "1\nq\n");
        assert!(!output.contains('\x1b'));
        assert!(output.contains("1. Safe title"));
        assert!(output.contains("Summary: cleared"));
    }
}
