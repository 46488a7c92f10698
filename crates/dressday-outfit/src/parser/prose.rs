//! Keyword scan over unstructured prose. Best effort only.
//!
//! Each keyword hit contributes the text around it as the item, so the
//! result reads like a phrase from the response rather than a bare noun.

use std::sync::LazyLock;

use regex::Regex;

use crate::keywords::matcher;
use crate::parser::markdown::strip_markdown;
use crate::recommendation::{Category, ClothingItem, RecommendationSet};

/// Characters kept on each side of a keyword hit
pub const CONTEXT_CHARS: usize = 50;
pub const MAX_ITEMS_PER_CATEGORY: usize = 3;

#[allow(clippy::expect_used)]
static SENTENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+\s+|\n+").expect("static regex compiles"));

fn context_window(text: &str, start: usize, end: usize) -> &str {
    let from = text[..start]
        .char_indices()
        .rev()
        .take(CONTEXT_CHARS)
        .last()
        .map_or(start, |(i, _)| i);
    let to = text[end..]
        .char_indices()
        .nth(CONTEXT_CHARS)
        .map_or(text.len(), |(i, _)| end + i);
    &text[from..to]
}

fn clean(window: &str) -> String {
    strip_markdown(window)
        .trim_matches(|c: char| !c.is_alphanumeric() && c != ')')
        .to_string()
}

pub fn parse_prose(text: &str) -> RecommendationSet {
    let mut set = RecommendationSet::default();

    for sentence in SENTENCE_RE.split(text).map(str::trim).filter(|s| !s.is_empty()) {
        for category in Category::ALL {
            for hit in matcher(category).find_iter(sentence) {
                if set.items(category).len() >= MAX_ITEMS_PER_CATEGORY {
                    break;
                }
                let item = clean(context_window(sentence, hit.start(), hit.end()));
                set.add(category, ClothingItem::new(item));
            }
        }
    }

    set
}
