//! The recommendation contract shared by the rule engine and the LLM path.

use chrono::{DateTime, Utc};
use dressday_weather::WeatherSnapshot;
use serde::{Deserialize, Deserializer, Serialize};

/// One clothing suggestion. Accepts either `"Raincoat"` or
/// `{"item": "Raincoat", "reason": "..."}` on the way in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClothingItem {
    pub item: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ClothingItem {
    pub fn new(item: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            reason: None,
        }
    }

    pub fn with_reason(item: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            reason: Some(reason.into()),
        }
    }

    /// Same item ignoring case and surrounding whitespace
    pub fn same_item(&self, name: &str) -> bool {
        self.item.trim().eq_ignore_ascii_case(name.trim())
    }
}

impl From<&str> for ClothingItem {
    fn from(item: &str) -> Self {
        ClothingItem::new(item)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ItemRepr {
    Bare(String),
    Detailed {
        item: String,
        #[serde(default)]
        reason: Option<String>,
    },
}

impl<'de> Deserialize<'de> for ClothingItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match ItemRepr::deserialize(deserializer)? {
            ItemRepr::Bare(item) => ClothingItem::new(item),
            ItemRepr::Detailed { item, reason } => ClothingItem {
                item,
                reason: reason.filter(|r| !r.trim().is_empty()),
            },
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    BaseLayers,
    Outerwear,
    Bottoms,
    Accessories,
    Footwear,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::BaseLayers,
        Category::Outerwear,
        Category::Bottoms,
        Category::Accessories,
        Category::Footwear,
    ];

    /// Human label as used in labeled LLM output ("Base layers: ...")
    pub fn label(self) -> &'static str {
        match self {
            Category::BaseLayers => "Base layers",
            Category::Outerwear => "Outerwear",
            Category::Bottoms => "Bottoms",
            Category::Accessories => "Accessories",
            Category::Footwear => "Footwear",
        }
    }

    pub fn json_key(self) -> &'static str {
        match self {
            Category::BaseLayers => "baseLayers",
            Category::Outerwear => "outerwear",
            Category::Bottoms => "bottoms",
            Category::Accessories => "accessories",
            Category::Footwear => "footwear",
        }
    }
}

/// Five ordered clothing lists plus free-text notes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationSet {
    #[serde(default)]
    pub base_layers: Vec<ClothingItem>,
    #[serde(default)]
    pub outerwear: Vec<ClothingItem>,
    #[serde(default)]
    pub bottoms: Vec<ClothingItem>,
    #[serde(default)]
    pub accessories: Vec<ClothingItem>,
    #[serde(default)]
    pub footwear: Vec<ClothingItem>,
    #[serde(default)]
    pub special_notes: Vec<String>,
}

impl RecommendationSet {
    pub fn items(&self, category: Category) -> &[ClothingItem] {
        match category {
            Category::BaseLayers => &self.base_layers,
            Category::Outerwear => &self.outerwear,
            Category::Bottoms => &self.bottoms,
            Category::Accessories => &self.accessories,
            Category::Footwear => &self.footwear,
        }
    }

    fn items_mut(&mut self, category: Category) -> &mut Vec<ClothingItem> {
        match category {
            Category::BaseLayers => &mut self.base_layers,
            Category::Outerwear => &mut self.outerwear,
            Category::Bottoms => &mut self.bottoms,
            Category::Accessories => &mut self.accessories,
            Category::Footwear => &mut self.footwear,
        }
    }

    /// Append unless an item with the same name is already in the category.
    /// Returns whether the item was added.
    pub fn add(&mut self, category: Category, item: impl Into<ClothingItem>) -> bool {
        let item = item.into();
        if item.item.trim().is_empty() || self.contains(category, &item.item) {
            return false;
        }
        self.items_mut(category).push(item);
        true
    }

    /// Drop whatever the category held and use `items` instead (deduplicated).
    pub fn replace(&mut self, category: Category, items: Vec<ClothingItem>) {
        self.items_mut(category).clear();
        for item in items {
            self.add(category, item);
        }
    }

    pub fn contains(&self, category: Category, name: &str) -> bool {
        self.items(category).iter().any(|i| i.same_item(name))
    }

    /// Case-insensitive substring match over item names in a category
    pub fn mentions(&self, category: Category, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.items(category)
            .iter()
            .any(|i| i.item.to_lowercase().contains(&needle))
    }

    pub fn add_note(&mut self, note: impl Into<String>) -> bool {
        let note = note.into();
        if note.trim().is_empty() || self.special_notes.iter().any(|n| n == &note) {
            return false;
        }
        self.special_notes.push(note);
        true
    }

    /// No clothing in any category (notes don't count)
    pub fn is_empty(&self) -> bool {
        Category::ALL.iter().all(|c| self.items(*c).is_empty())
    }

    pub fn item_count(&self) -> usize {
        Category::ALL.iter().map(|c| self.items(*c).len()).sum()
    }

    pub fn names(&self, category: Category) -> Vec<&str> {
        self.items(category).iter().map(|i| i.item.as_str()).collect()
    }
}

/// Which path produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Rules,
    Llm,
}

/// Final, immutable answer handed to voice/UI consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResult {
    pub id: String,
    pub profile_id: String,
    pub weather_data: WeatherSnapshot,
    pub recommendations: RecommendationSet,
    pub spoken_response: String,
    pub source: Source,
    pub confidence: f64,
    pub created_at: DateTime<Utc>,
    pub processing_time_ms: u64,
}
