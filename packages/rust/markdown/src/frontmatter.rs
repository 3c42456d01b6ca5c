//! Leading `---` metadata blocks: detection and flat `key: value` parsing.
//!
//! Only flat scalar lines are understood. Nested maps, lists and multi-line
//! values are ignored line by line rather than rejected, so a file with
//! exotic frontmatter still assembles; it just yields no order hints.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

/// Flat, case-sensitive key/value view of a frontmatter block.
pub type FrontmatterData = BTreeMap<String, String>;

/// A document split into its optional frontmatter and the remaining body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split<'a> {
    /// Text between the delimiter lines, without the delimiters.
    pub frontmatter: Option<&'a str>,
    /// Everything after the closing delimiter line.
    pub body: &'a str,
}

/// Split a leading `---` ... `---` block off `content`.
///
/// The block must start at the very first byte. Delimiter lines may carry
/// trailing whitespace and end in LF or CRLF; the closing line may also end
/// the input. Blank lines directly after the closing delimiter belong to the
/// delimiter, not the body. Without such a block the body is `content`
/// unchanged.
pub fn split_frontmatter(content: &str) -> Split<'_> {
    static BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?s)\A---\s*\r?\n(.*?)\r?\n---\s*(?:\r?\n|\z)").expect("valid regex")
    });

    match BLOCK_RE.captures(content) {
        Some(caps) => {
            let whole = caps.get(0).map_or(0, |m| m.end());
            Split {
                frontmatter: caps.get(1).map(|m| m.as_str()),
                body: &content[whole..],
            }
        }
        None => Split {
            frontmatter: None,
            body: content,
        },
    }
}

/// Parse raw frontmatter text into flat key/value pairs.
///
/// Blank lines and `#` comments are skipped, as is any line that is not
/// `identifier: value`. Values are trimmed and lose one layer of matching
/// single or double quotes. A repeated key keeps its last value.
pub fn parse_frontmatter(raw: Option<&str>) -> FrontmatterData {
    static LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^([A-Za-z0-9_-]+)\s*:\s*(.+)$").expect("valid regex")
    });

    let mut data = FrontmatterData::new();
    let Some(raw) = raw else {
        return data;
    };

    for line in raw.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let Some(caps) = LINE_RE.captures(trimmed) else {
            trace!(line = trimmed, "skipping unrecognised frontmatter line");
            continue;
        };
        let value = strip_matching_quotes(caps[2].trim());
        data.insert(caps[1].to_string(), value.to_string());
    }

    data
}

fn strip_matching_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_simple_block() {
        let split = split_frontmatter("---\nfoo: 1\n---\nBODY");
        assert_eq!(split.frontmatter, Some("foo: 1"));
        assert_eq!(split.body, "BODY");
    }

    #[test]
    fn no_block_leaves_body_unchanged() {
        let doc = "# Title\n\n---\nnot: frontmatter\n---\n";
        let split = split_frontmatter(doc);
        assert_eq!(split.frontmatter, None);
        assert_eq!(split.body, doc);
    }

    #[test]
    fn block_must_start_at_first_byte() {
        let doc = "\n---\norder: 1\n---\nBody";
        assert_eq!(split_frontmatter(doc).frontmatter, None);
    }

    #[test]
    fn handles_crlf_and_trailing_whitespace() {
        let split = split_frontmatter("--- \r\norder: 3\r\ntitle: Hi\r\n---\t\r\n# Body\r\n");
        assert_eq!(split.frontmatter, Some("order: 3\r\ntitle: Hi"));
        assert_eq!(split.body, "# Body\r\n");
    }

    #[test]
    fn blank_lines_after_closing_delimiter_are_dropped() {
        let split = split_frontmatter("---\norder: 1\n---\n\n# Title\n");
        assert_eq!(split.frontmatter, Some("order: 1"));
        assert_eq!(split.body, "# Title\n");

        let split = split_frontmatter("---\r\norder: 1\r\n---\r\n\r\n  \r\n# Title\r\n");
        assert_eq!(split.body, "# Title\r\n");

        // Indentation on the first content line is kept.
        assert_eq!(split_frontmatter("---\na: 1\n---\n\n    code\n").body, "    code\n");
    }

    #[test]
    fn closing_delimiter_may_end_the_input() {
        let split = split_frontmatter("---\norder: 2\n---");
        assert_eq!(split.frontmatter, Some("order: 2"));
        assert_eq!(split.body, "");
    }

    #[test]
    fn unterminated_block_is_not_frontmatter() {
        let doc = "---\norder: 2\n# Body without closing delimiter\n";
        let split = split_frontmatter(doc);
        assert_eq!(split.frontmatter, None);
        assert_eq!(split.body, doc);
    }

    #[test]
    fn closing_line_must_be_exactly_three_dashes() {
        let doc = "---\norder: 2\n----\nstill meta\n---\nBody";
        let split = split_frontmatter(doc);
        assert_eq!(split.frontmatter, Some("order: 2\n----\nstill meta"));
        assert_eq!(split.body, "Body");
    }

    #[test]
    fn parses_flat_pairs_and_strips_quotes() {
        let data = parse_frontmatter(Some(
            "title: \"Quickstart\"\nsidebar_position: '3'\n# comment\n\norder:   7  \nweird line\nnested:\n  child: x",
        ));
        assert_eq!(data.get("title").map(String::as_str), Some("Quickstart"));
        assert_eq!(data.get("sidebar_position").map(String::as_str), Some("3"));
        assert_eq!(data.get("order").map(String::as_str), Some("7"));
        // Indented child lines are trimmed first, so they read as flat pairs.
        assert_eq!(data.get("child").map(String::as_str), Some("x"));
        assert!(!data.contains_key("nested"));
        assert!(!data.contains_key("weird line"));
    }

    #[test]
    fn mismatched_quotes_are_kept() {
        let data = parse_frontmatter(Some("a: \"open\nb: 'x\"\nc: \"\""));
        assert_eq!(data["a"], "\"open");
        assert_eq!(data["b"], "'x\"");
        assert_eq!(data["c"], "");
    }

    #[test]
    fn value_may_contain_colons() {
        let data = parse_frontmatter(Some("url: https://gradio.app/guides"));
        assert_eq!(data["url"], "https://gradio.app/guides");
    }

    #[test]
    fn keys_are_case_sensitive_and_last_wins() {
        let data = parse_frontmatter(Some("Order: 1\norder: 2\norder: 3"));
        assert_eq!(data["Order"], "1");
        assert_eq!(data["order"], "3");
    }

    #[test]
    fn none_parses_to_empty() {
        assert!(parse_frontmatter(None).is_empty());
    }
}
