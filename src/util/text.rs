use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

/// Tags and lowercase entity references, matched in a single pass.
const MARKUP_PATTERN: &str = r"<.*?>|&([a-z0-9]+|#[0-9]{1,6}|#x[0-9a-f]{1,6});";

static MARKUP_RE: OnceLock<Regex> = OnceLock::new();

fn markup_re() -> &'static Regex {
    MARKUP_RE.get_or_init(|| Regex::new(MARKUP_PATTERN).expect("markup pattern compiles"))
}

/// Converts a feed summary from HTML to plain text.
///
/// Tags and entity references such as `&amp;` or `&#39;` are removed in the
/// same pass, so they are dropped rather than decoded. Only references the
/// pattern does not match are decoded afterwards with HTML5 rules: uppercase
/// names like `&Eacute;`, legacy references without a semicolon like `&copy`,
/// and out-of-range code points, which become U+FFFD.
///
/// # Examples
///
/// ```
/// use newsfetch::util::clean;
///
/// assert_eq!(clean("<b>Hi</b> there"), "Hi there");
/// assert_eq!(clean("Fish &amp; chips"), "Fish  chips");
/// assert_eq!(clean("Caf&Eacute;"), "CafÉ");
/// ```
pub fn clean(raw: &str) -> String {
    let stripped = markup_re().replace_all(raw, "");
    htmlize::unescape(stripped).into_owned()
}

fn is_stripped_control(b: u8) -> bool {
    b == 0x1b || b == 0x7f || (b < 0x20 && b != b'\t' && b != b'\n' && b != b'\r')
}

/// Strips terminal control characters and ANSI escape sequences.
///
/// Feed titles and summaries are printed straight to the terminal, so CSI
/// (`ESC [` ... final byte) and OSC (`ESC ]` ... BEL or `ESC \`) sequences are
/// dropped whole, along with C0 controls other than tab, LF and CR.
///
/// Returns `Cow::Borrowed` when nothing needs stripping.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    if !s.bytes().any(is_stripped_control) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\x1b' => match chars.peek() {
                Some('[') => {
                    chars.next();
                    for c in chars.by_ref() {
                        if ('\x40'..='\x7e').contains(&c) {
                            break;
                        }
                    }
                }
                Some(']') => {
                    chars.next();
                    while let Some(c) = chars.next() {
                        if c == '\x07' {
                            break;
                        }
                        if c == '\x1b' && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {}
            },
            c if c.is_ascii() && is_stripped_control(c as u8) => {}
            c => out.push(c),
        }
    }

    Cow::Owned(out)
}
