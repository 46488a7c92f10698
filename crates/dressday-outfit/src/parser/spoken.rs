//! Picks the sentence(s) meant to be read aloud out of free text.

use std::sync::LazyLock;

use regex::Regex;

use crate::parser::labeled::{is_label_line, spoken_marker};
use crate::parser::markdown::{strip_markdown, strip_surrounding_quotes};

/// Whole-text fallback only applies below this length
pub const SHORT_TEXT_CHARS: usize = 500;

#[allow(clippy::expect_used)]
static PARAGRAPH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*\n").expect("static regex compiles"));

#[allow(clippy::expect_used)]
static ADDRESSED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\byour?\b").expect("static regex compiles"));

/// Markdown stripped per line, lines joined, one pair of quotes removed.
pub(crate) fn clean(text: &str) -> String {
    let joined = text
        .lines()
        .map(strip_markdown)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    strip_surrounding_quotes(&joined).to_string()
}

/// Paragraph text with category label lines removed
fn prose_lines(paragraph: &str) -> String {
    paragraph
        .lines()
        .filter(|line| !is_label_line(line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Extract the spoken response. Never fails; returns an empty string when
/// the text is empty.
pub fn extract_spoken_response(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }

    if let Some(marked) = spoken_marker(text) {
        return clean(marked);
    }

    let paragraphs: Vec<&str> = PARAGRAPH_RE
        .split(text)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    if let Some(addressed) = paragraphs
        .iter()
        .map(|p| prose_lines(p))
        .find(|p| ADDRESSED_RE.is_match(p))
    {
        return clean(&addressed);
    }

    if text.chars().count() < SHORT_TEXT_CHARS {
        return clean(text);
    }

    paragraphs.first().map(|p| clean(p)).unwrap_or_default()
}
