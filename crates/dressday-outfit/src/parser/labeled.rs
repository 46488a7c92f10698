//! "Base layers: a, b" style output from older prompt templates.

use std::sync::LazyLock;

use regex::Regex;

use crate::parser::markdown::strip_markdown;
use crate::recommendation::{Category, ClothingItem, RecommendationSet};

fn label_pattern(category: Category) -> &'static str {
    match category {
        Category::BaseLayers => r"base[ _-]?layers?",
        Category::Outerwear => r"outer[ _-]?wear",
        Category::Bottoms => r"bottoms?",
        Category::Accessories => r"accessor(?:y|ies)",
        Category::Footwear => r"foot[ _-]?wear|shoes",
    }
}

#[allow(clippy::expect_used)]
static LABEL_RES: LazyLock<[(Category, Regex); 5]> = LazyLock::new(|| {
    Category::ALL.map(|category| {
        // Optional list/heading marker and emphasis around the label
        let pattern = format!(
            r"(?im)^[ \t#>*+\-•]*[*_]*(?:{})[*_]*[ \t]*:[*_]*[ \t]*(.*)$",
            label_pattern(category)
        );
        (category, Regex::new(&pattern).expect("static regex compiles"))
    })
});

#[allow(clippy::expect_used)]
static SPOKEN_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t#>*+\-•]*[*_]*spoken(?:[ _]response)?[*_]*[ \t]*:[*_]*[ \t]*(.*)$").expect("static regex compiles")
});

/// Whether a line starts with one of the category labels (or the spoken marker)
pub fn is_label_line(line: &str) -> bool {
    SPOKEN_LABEL_RE.is_match(line) || LABEL_RES.iter().any(|(_, re)| re.is_match(line))
}

/// Text after an explicit "Spoken:" marker, up to the end of that line
pub fn spoken_marker(text: &str) -> Option<&str> {
    SPOKEN_LABEL_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
}

/// Items listed after one category label, markdown stripped
pub fn extract_category(text: &str, category: Category) -> Vec<ClothingItem> {
    let Some((_, re)) = LABEL_RES.iter().find(|(c, _)| *c == category) else {
        return Vec::new();
    };
    let Some(captured) = re.captures(text).and_then(|c| c.get(1)) else {
        return Vec::new();
    };

    captured
        .as_str()
        .split(',')
        .map(strip_markdown)
        .map(|item| item.trim_end_matches('.').trim().to_string())
        .filter(|item| !item.is_empty())
        .map(ClothingItem::new)
        .collect()
}

/// Whether any category label appears in the text
pub fn has_labels(text: &str) -> bool {
    LABEL_RES.iter().any(|(_, re)| re.is_match(text))
}

pub fn parse_labeled(text: &str) -> RecommendationSet {
    let mut set = RecommendationSet::default();
    for category in Category::ALL {
        for item in extract_category(text, category) {
            set.add(category, item);
        }
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emphasis_is_stripped() {
        let items = extract_category("Outerwear: **Warm coat**, *windbreaker*", Category::Outerwear);
        let names: Vec<&str> = items.iter().map(|i| i.item.as_str()).collect();
        assert_eq!(names, vec!["Warm coat", "windbreaker"]);
    }

    #[test]
    fn test_all_labels_parsed() {
        let text = "\
Here is the outfit:
- **Base layers:** Long-sleeve shirt, undershirt
- **Outerwear:** Raincoat
Bottoms: Jeans.
## Accessories: Umbrella
Footwear: Rain boots

Spoken: Grab your raincoat!";
        let set = parse_labeled(text);
        assert_eq!(set.names(Category::BaseLayers), vec!["Long-sleeve shirt", "undershirt"]);
        assert_eq!(set.names(Category::Outerwear), vec!["Raincoat"]);
        assert_eq!(set.names(Category::Bottoms), vec!["Jeans"]);
        assert_eq!(set.names(Category::Accessories), vec!["Umbrella"]);
        assert_eq!(set.names(Category::Footwear), vec!["Rain boots"]);
    }

    #[test]
    fn test_label_lines() {
        assert!(is_label_line("Outerwear: coat"));
        assert!(is_label_line("**Footwear:** boots"));
        assert!(is_label_line("Spoken: hi"));
        assert!(!is_label_line("You should wear a coat."));
        assert!(!has_labels("Wear a warm coat today."));
    }

    #[test]
    fn test_spoken_marker() {
        assert_eq!(spoken_marker("Outerwear: coat\n**Spoken:** Wear your coat!"), Some("Wear your coat!"));
        assert_eq!(spoken_marker("Spoken response: Hi there"), Some("Hi there"));
        assert_eq!(spoken_marker("Spoken:\n"), None);
        assert_eq!(spoken_marker("No marker here"), None);
    }

    #[test]
    fn test_empty_label_yields_nothing() {
        assert!(extract_category("Accessories:\nFootwear: boots", Category::Accessories).is_empty());
    }
}
