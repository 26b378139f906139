//! Length-prefix repair for PHP serialized strings.
//!
//! Horde stored some preference blobs after counting characters instead of
//! bytes, so every `s:<n>:"…";` literal containing a multi-byte character
//! declares a length that is too short. A byte-counting decoder then cuts
//! the literal in the middle and loses its place in the stream.
//!
//! The repair walks the literals in order, normalizes each one's content to
//! NFKD and rewrites its declared length to the UTF-8 byte length.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Start of one string literal, up to and including the opening quote.
static LITERAL_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"s:(\d+):""#).expect("valid literal prefix pattern"));

const TERMINATOR: &str = "\";";

/// Rewrite every string literal's declared length to its byte length.
///
/// The end of each literal is found by trying, in order:
/// 1. the declared length as a byte count,
/// 2. the declared length as a character count,
/// 3. the first `";` after the opening quote.
///
/// The first candidate followed by `";` wins, so correct prefixes are kept
/// even when the content itself contains `";`. Scanning resumes after the
/// literal, so content is never mistaken for structure. Text that does not
/// end a literal is left for the decoder to report.
pub fn repair_length_prefixes(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + raw.len() / 8);
    let mut cursor = 0;
    let mut rewritten = 0usize;

    while let Some(caps) = LITERAL_PREFIX.captures_at(raw, cursor) {
        let (Some(whole), Some(declared)) = (caps.get(0), caps.get(1)) else {
            break;
        };
        let content_start = whole.end();
        let declared_len = declared.as_str().parse::<usize>().ok();

        let Some(content_len) = literal_content_len(&raw[content_start..], declared_len) else {
            break;
        };

        out.extend(raw[cursor..whole.start()].nfkd());
        let content: String = raw[content_start..content_start + content_len]
            .nfkd()
            .collect();
        if declared_len != Some(content.len()) {
            rewritten += 1;
        }
        out.push_str(&format!("s:{}:\"{}\";", content.len(), content));

        cursor = content_start + content_len + TERMINATOR.len();
    }
    out.extend(raw[cursor..].nfkd());

    if rewritten > 0 {
        tracing::debug!(rewritten, "Repaired string length prefixes");
    }

    out
}

/// Byte length of the literal content at the start of `rest`.
fn literal_content_len(rest: &str, declared: Option<usize>) -> Option<usize> {
    let ends_literal = |end: usize| rest.get(end..).is_some_and(|tail| tail.starts_with(TERMINATOR));

    if let Some(n) = declared {
        if ends_literal(n) {
            return Some(n);
        }
        if let Some(end) = char_boundary_after(rest, n) {
            if ends_literal(end) {
                return Some(end);
            }
        }
    }
    rest.find(TERMINATOR)
}

/// Byte offset just past the first `count` characters of `text`.
fn char_boundary_after(text: &str, count: usize) -> Option<usize> {
    if count == 0 {
        return Some(0);
    }
    text.char_indices()
        .nth(count - 1)
        .map(|(i, c)| i + c.len_utf8())
}
