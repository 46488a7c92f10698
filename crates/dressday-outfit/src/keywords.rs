//! Keyword tables for free-text clothing extraction and prompt analysis.
//!
//! Kept as data so the tables can be inspected and tested on their own.
//! Matching is whole-word and case-insensitive, with an optional plural `s`.

use std::sync::LazyLock;

use regex::Regex;

use crate::recommendation::Category;

pub const BASE_LAYER_KEYWORDS: &[&str] = &[
    "t-shirt", "shirt", "tee", "top", "blouse", "sweater", "sweatshirt", "thermal", "long-sleeve",
    "tank top", "dress", "sundress", "undershirt", "layer",
];

pub const OUTERWEAR_KEYWORDS: &[&str] = &[
    "coat", "jacket", "raincoat", "parka", "windbreaker", "hoodie", "fleece", "vest", "poncho",
    "cardigan", "snowsuit",
];

pub const BOTTOM_KEYWORDS: &[&str] = &[
    "pants", "jeans", "shorts", "leggings", "skirt", "trousers", "overalls", "joggers",
    "snow pants", "sweatpants", "tights",
];

pub const ACCESSORY_KEYWORDS: &[&str] = &[
    "hat", "cap", "beanie", "gloves", "mittens", "scarf", "umbrella", "sunglasses", "sunscreen",
    "earmuffs", "neck gaiter", "backpack",
];

pub const FOOTWEAR_KEYWORDS: &[&str] = &[
    "shoes", "boots", "sneakers", "sandals", "socks", "rain boots", "snow boots", "flip-flops",
    "wellies",
];

/// Keyword table for a category
pub fn keywords_for(category: Category) -> &'static [&'static str] {
    match category {
        Category::BaseLayers => BASE_LAYER_KEYWORDS,
        Category::Outerwear => OUTERWEAR_KEYWORDS,
        Category::Bottoms => BOTTOM_KEYWORDS,
        Category::Accessories => ACCESSORY_KEYWORDS,
        Category::Footwear => FOOTWEAR_KEYWORDS,
    }
}

fn build_matcher(words: &[&str]) -> Regex {
    // Longest first so "rain boots" wins over "boots"
    let mut words: Vec<&str> = words.to_vec();
    words.sort_by_key(|w| std::cmp::Reverse(w.len()));
    let alternation = words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");
    #[allow(clippy::expect_used)]
    Regex::new(&format!(r"(?i)\b(?:{alternation})s?\b")).expect("static keyword regex compiles")
}

static MATCHERS: LazyLock<[(Category, Regex); 5]> = LazyLock::new(|| {
    Category::ALL.map(|category| (category, build_matcher(keywords_for(category))))
});

/// Compiled whole-word matcher for a category's keywords
pub fn matcher(category: Category) -> &'static Regex {
    let index = Category::ALL
        .iter()
        .position(|c| *c == category)
        .unwrap_or_default();
    &MATCHERS[index].1
}

/// Categories whose keywords appear in `text`, in canonical order
pub fn categories_in(text: &str) -> Vec<Category> {
    Category::ALL
        .into_iter()
        .filter(|c| matcher(*c).is_match(text))
        .collect()
}

/// Coat-class outerwear: the heavy layer that only appears in cold bands.
pub fn is_coat_class(item: &str) -> bool {
    let lower = item.to_lowercase();
    ["coat", "parka", "snowsuit"]
        .iter()
        .any(|k| lower.contains(k))
        && !lower.contains("raincoat")
}

/// Rain-class outerwear or footwear
pub fn is_rain_class(item: &str) -> bool {
    let lower = item.to_lowercase();
    ["rain", "poncho", "waterproof"].iter().any(|k| lower.contains(k))
}
