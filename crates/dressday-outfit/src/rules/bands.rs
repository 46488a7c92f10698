//! Temperature bands and the base outfit for each.
//!
//! Bands are half-open `[low, high)` in °F.

use serde::{Deserialize, Serialize};

use crate::profile::{Gender, Profile};
use crate::recommendation::{Category, ClothingItem, RecommendationSet};

pub const COLD_BELOW_F: f64 = 40.0;
pub const COOL_BELOW_F: f64 = 60.0;
pub const MODERATE_BELOW_F: f64 = 75.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureBand {
    Cold,
    Cool,
    Moderate,
    Hot,
}

impl TemperatureBand {
    pub fn for_temperature(temperature: f64) -> Self {
        if temperature < COLD_BELOW_F {
            TemperatureBand::Cold
        } else if temperature < COOL_BELOW_F {
            TemperatureBand::Cool
        } else if temperature < MODERATE_BELOW_F {
            TemperatureBand::Moderate
        } else {
            TemperatureBand::Hot
        }
    }

    /// One word for spoken output
    pub fn describe(self) -> &'static str {
        match self {
            TemperatureBand::Cold => "cold",
            TemperatureBand::Cool => "cool",
            TemperatureBand::Moderate => "mild",
            TemperatureBand::Hot => "hot",
        }
    }
}

fn item(name: &str, reason: &str) -> ClothingItem {
    ClothingItem::with_reason(name, reason)
}

/// Base outfit for a band, with age/gender wording applied.
pub fn base_outfit(band: TemperatureBand, profile: &Profile) -> RecommendationSet {
    let mut set = RecommendationSet::default();
    let young = profile.is_young();
    let girl = profile.gender == Gender::Girl;

    match band {
        TemperatureBand::Cold => {
            set.add(Category::BaseLayers, item("Long-sleeve thermal shirt", "keeps your body warm"));
            set.add(Category::BaseLayers, item("Warm sweater", "an extra cozy layer"));
            set.add(Category::Outerwear, item("Winter coat", "blocks the cold"));
            let bottoms = if girl {
                item("Fleece-lined leggings", "warm and stretchy")
            } else {
                item("Warm pants", "keeps your legs warm")
            };
            set.add(Category::Bottoms, bottoms);
            set.add(Category::Accessories, item("Warm hat", "keeps your head and ears warm"));
            let hands = if young {
                item("Mittens", "keeps little fingers toasty")
            } else {
                item("Gloves", "keeps your fingers warm")
            };
            set.add(Category::Accessories, hands);
            set.add(Category::Accessories, item("Scarf", "covers your neck"));
            set.add(Category::Footwear, item("Insulated winter boots", "warm, dry feet"));
        }
        TemperatureBand::Cool => {
            set.add(Category::BaseLayers, item("Long-sleeve shirt", "covers your arms"));
            set.add(Category::Outerwear, item("Light jacket", "for the chilly air"));
            let bottoms = if girl {
                item("Leggings or jeans", "comfy and warm enough")
            } else {
                item("Jeans or long pants", "comfy and warm enough")
            };
            set.add(Category::Bottoms, bottoms);
            set.add(Category::Footwear, item("Sneakers", "good for running around"));
        }
        TemperatureBand::Moderate => {
            set.add(Category::BaseLayers, item("T-shirt", "just right for mild weather"));
            let layer = if young {
                item("Light sweater", "in case it gets chilly")
            } else {
                item("Hoodie or light sweater", "easy to take off if you warm up")
            };
            set.add(Category::Outerwear, layer);
            let bottoms = if girl {
                item("Skirt with leggings", "comfy for playing")
            } else {
                item("Pants", "comfy for playing")
            };
            set.add(Category::Bottoms, bottoms);
            set.add(Category::Footwear, item("Sneakers", "good for running around"));
        }
        TemperatureBand::Hot => {
            let top = if girl {
                item("Sundress or T-shirt", "light and cool")
            } else {
                item("Short-sleeve shirt", "light and cool")
            };
            set.add(Category::BaseLayers, top);
            let bottoms = if girl {
                item("Shorts or a skirt", "keeps you cool")
            } else {
                item("Shorts", "keeps you cool")
            };
            set.add(Category::Bottoms, bottoms);
            let shoes = if young {
                item("Sandals with straps", "stay on while you play")
            } else {
                item("Sandals", "let your feet breathe")
            };
            set.add(Category::Footwear, shoes);
        }
    }

    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::is_coat_class;
    use crate::profile::Age;

    #[test]
    fn test_band_boundaries_are_half_open() {
        assert_eq!(TemperatureBand::for_temperature(39.9), TemperatureBand::Cold);
        assert_eq!(TemperatureBand::for_temperature(40.0), TemperatureBand::Cool);
        assert_eq!(TemperatureBand::for_temperature(59.9), TemperatureBand::Cool);
        assert_eq!(TemperatureBand::for_temperature(60.0), TemperatureBand::Moderate);
        assert_eq!(TemperatureBand::for_temperature(74.9), TemperatureBand::Moderate);
        assert_eq!(TemperatureBand::for_temperature(75.0), TemperatureBand::Hot);
    }

    #[test]
    fn test_young_children_get_mittens() {
        let young = base_outfit(TemperatureBand::Cold, &Profile::new("a", Age::Four, Gender::Boy));
        let older = base_outfit(TemperatureBand::Cold, &Profile::new("b", Age::Ten, Gender::Boy));
        assert!(young.contains(Category::Accessories, "Mittens"));
        assert!(older.contains(Category::Accessories, "Gloves"));
        assert!(!older.contains(Category::Accessories, "Mittens"));
    }

    #[test]
    fn test_bottoms_follow_gender() {
        let girl = base_outfit(TemperatureBand::Hot, &Profile::new("a", Age::Seven, Gender::Girl));
        let boy = base_outfit(TemperatureBand::Hot, &Profile::new("b", Age::Seven, Gender::Boy));
        assert!(girl.mentions(Category::Bottoms, "skirt"));
        assert!(!boy.mentions(Category::Bottoms, "skirt"));
    }

    #[test]
    fn test_only_cold_band_has_coat() {
        let profile = Profile::new("a", Age::Seven, Gender::Boy);
        let cold = base_outfit(TemperatureBand::Cold, &profile);
        assert!(cold.outerwear.iter().any(|i| is_coat_class(&i.item)));
        for band in [TemperatureBand::Cool, TemperatureBand::Moderate, TemperatureBand::Hot] {
            let set = base_outfit(band, &profile);
            assert!(!set.outerwear.iter().any(|i| is_coat_class(&i.item)), "{band:?}");
        }
    }

    #[test]
    fn test_hot_band_has_no_outerwear() {
        let set = base_outfit(TemperatureBand::Hot, &Profile::new("a", Age::Ten, Gender::Girl));
        assert!(set.outerwear.is_empty());
    }
}
