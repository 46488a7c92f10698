//! Child profiles. Complexity and vocabulary follow from age.

use dressday_core::ValidationError;
use serde::{Deserialize, Serialize};

/// Supported ages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Age {
    Four,
    Seven,
    Ten,
}

impl Age {
    pub fn years(self) -> u8 {
        match self {
            Age::Four => 4,
            Age::Seven => 7,
            Age::Ten => 10,
        }
    }

    /// Ages that get "mittens" rather than "gloves" and the simplest wording.
    pub fn is_young(self) -> bool {
        self.years() <= 5
    }
}

impl TryFrom<u8> for Age {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            4 => Ok(Age::Four),
            7 => Ok(Age::Seven),
            10 => Ok(Age::Ten),
            other => Err(format!("unsupported age {other}, expected 4, 7 or 10")),
        }
    }
}

impl From<Age> for u8 {
    fn from(age: Age) -> Self {
        age.years()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Girl,
    Boy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityLevel {
    Simple,
    Moderate,
    Complex,
}

impl ComplexityLevel {
    pub fn for_age(age: Age) -> Self {
        match age {
            Age::Four => ComplexityLevel::Simple,
            Age::Seven => ComplexityLevel::Moderate,
            Age::Ten => ComplexityLevel::Complex,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VocabularyStyle {
    Playful,
    Friendly,
    Descriptive,
}

impl VocabularyStyle {
    pub fn for_age(age: Age) -> Self {
        match age {
            Age::Four => VocabularyStyle::Playful,
            Age::Seven => VocabularyStyle::Friendly,
            Age::Ten => VocabularyStyle::Descriptive,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub age: Age,
    pub gender: Gender,
    pub complexity_level: ComplexityLevel,
    pub vocabulary_style: VocabularyStyle,
}

impl Profile {
    pub fn new(id: impl Into<String>, age: Age, gender: Gender) -> Self {
        Self {
            id: id.into(),
            age,
            gender,
            complexity_level: ComplexityLevel::for_age(age),
            vocabulary_style: VocabularyStyle::for_age(age),
        }
    }

    /// Reject profiles whose complexity level does not match their age.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::new("profile.id", "must not be empty"));
        }
        let expected = ComplexityLevel::for_age(self.age);
        if self.complexity_level != expected {
            return Err(ValidationError::new(
                "profile.complexityLevel",
                format!(
                    "age {} requires {:?}, got {:?}",
                    self.age.years(),
                    expected,
                    self.complexity_level
                ),
            ));
        }
        Ok(())
    }

    pub fn is_young(&self) -> bool {
        self.age.is_young()
    }
}
