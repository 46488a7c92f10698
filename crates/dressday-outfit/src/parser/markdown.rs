//! Markdown cleanup shared by the parser paths.

use std::sync::LazyLock;

use regex::Regex;

#[allow(clippy::expect_used)]
static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*```[A-Za-z0-9_-]*\s*\n?(.*?)\n?\s*```\s*$").expect("static regex compiles")
});

#[allow(clippy::expect_used)]
static INNER_FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[A-Za-z0-9_-]*[ \t]*\n(.*?)```").expect("static regex compiles")
});

#[allow(clippy::expect_used)]
static EMPHASIS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*{1,3}|_{2,3}|`|~~").expect("static regex compiles"));

#[allow(clippy::expect_used)]
static LINE_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:#{1,6}\s+|>\s*|[-*+•]\s+|\d+[.)]\s+)").expect("static regex compiles")
});

/// Remove one surrounding code fence (```` ```json ... ``` ````), if present.
pub fn strip_code_fence(text: &str) -> &str {
    match FENCE_RE.captures(text).and_then(|c| c.get(1)) {
        Some(inner) => inner.as_str(),
        None => text.trim(),
    }
}

/// A JSON object embedded after preface text: the first fenced block whose
/// body is an object, else the span from the first `{` to the last `}`.
pub fn embedded_json(text: &str) -> Option<&str> {
    let fenced = INNER_FENCE_RE
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .find(|body| body.starts_with('{'));
    if fenced.is_some() {
        return fenced;
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// Strip emphasis and a leading list/heading/quote marker from one line.
pub fn strip_markdown(text: &str) -> String {
    let without_marker = LINE_MARKER_RE.replace(text, "");
    EMPHASIS_RE
        .replace_all(&without_marker, "")
        .trim()
        .to_string()
}

/// Remove a single pair of matching surrounding quotes.
pub fn strip_surrounding_quotes(text: &str) -> &str {
    let trimmed = text.trim();
    for (open, close) in [('"', '"'), ('\'', '\''), ('“', '”'), ('‘', '’')] {
        if let Some(inner) = trimmed
            .strip_prefix(open)
            .and_then(|rest| rest.strip_suffix(close))
        {
            return inner.trim();
        }
    }
    trimmed
}
