use anyhow::Result;
use chrono::{DateTime, Utc};
use feed_rs::parser;

/// Shown in place of a publish date when the entry carries none.
pub const UNKNOWN_DATE: &str = "Unknown";

/// One item of a fetched feed, ready for display.
///
/// `summary` is the raw HTML from the feed; run it through
/// [`crate::util::clean`] before printing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
    pub published: String,
    pub summary: String,
}

pub fn parse_feed(bytes: &[u8]) -> Result<Vec<FeedEntry>> {
    let feed = parser::parse(bytes)?;

    let entries = feed
        .entries
        .into_iter()
        .map(|entry| {
            let title = entry
                .title
                .map(|t| t.content)
                .unwrap_or_else(|| "Untitled".to_string());
            let link = entry
                .links
                .into_iter()
                .next()
                .map(|l| l.href)
                .unwrap_or_default();
            let published = entry
                .published
                .or(entry.updated)
                .map(format_published)
                .unwrap_or_else(|| UNKNOWN_DATE.to_string());
            let summary = entry
                .summary
                .map(|s| s.content)
                .or_else(|| entry.content.and_then(|c| c.body))
                .unwrap_or_default();

            FeedEntry {
                title,
                link,
                published,
                summary,
            }
        })
        .collect();

    Ok(entries)
}

/// Feeds carry dates in several formats; they are shown uniformly as RFC 2822.
fn format_published(dt: DateTime<Utc>) -> String {
    dt.to_rfc2822()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_rss_entries_in_order() {
        let rss = r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>News</title>
    <item>
        <title>First</title>
        <link>https://example.com/1</link>
        <pubDate>Tue, 10 Jun 2003 04:00:00 GMT</pubDate>
        <description>&lt;p&gt;Hello&lt;/p&gt;</description>
    </item>
    <item>
        <title>Second</title>
        <link>https://example.com/2</link>
    </item>
</channel></rss>"#;

        let entries = parse_feed(rss.as_bytes()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "First");
        assert_eq!(entries[0].link, "https://example.com/1");
        assert_eq!(entries[0].published, "Tue, 10 Jun 2003 04:00:00 +0000");
        assert_eq!(entries[0].summary, "<p>Hello</p>");
        assert_eq!(entries[1].title, "Second");
        assert_eq!(entries[1].published, UNKNOWN_DATE);
        assert_eq!(entries[1].summary, "");
    }

    #[test]
    fn test_parse_atom_falls_back_to_updated_and_content() {
        let atom = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
    <title>Example</title>
    <id>urn:example</id>
    <updated>2024-01-12T03:04:05Z</updated>
    <entry>
        <title>Atom entry</title>
        <id>urn:example:1</id>
        <link href="https://example.com/atom/1"/>
        <updated>2024-01-12T03:04:05Z</updated>
        <content type="html">&lt;b&gt;Body&lt;/b&gt;</content>
    </entry>
</feed>"#;

        let entries = parse_feed(atom.as_bytes()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].link, "https://example.com/atom/1");
        assert_eq!(entries[0].published, "Fri, 12 Jan 2024 03:04:05 +0000");
        assert_eq!(entries[0].summary, "<b>Body</b>");
    }

    #[test]
    fn test_missing_title_and_link() {
        let rss = r#"<?xml version="1.0"?>
<rss version="2.0"><channel><item><description>x</description></item></channel></rss>"#;

        let entries = parse_feed(rss.as_bytes()).unwrap();
        assert_eq!(entries[0].title, "Untitled");
        assert_eq!(entries[0].link, "");
    }

    #[test]
    fn test_empty_channel_parses_to_no_entries() {
        let rss = r#"<?xml version="1.0"?><rss version="2.0"><channel></channel></rss>"#;
        assert!(parse_feed(rss.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_input_is_an_error() {
        assert!(parse_feed(b"<not valid xml").is_err());
        assert!(parse_feed(b"<html><body>Not found</body></html>").is_err());
    }
}
