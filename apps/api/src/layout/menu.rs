//! Normalized menu model: the engine's input, already mapped from storage.
//!
//! Iteration order of `sections` and `items` is the output order. The engine never re-sorts;
//! `sort_order` is carried through for callers and for validation only.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedMenu {
    pub id: Uuid,
    pub name: String,
    /// Logo image reference, drawn in the header region when the policy allows.
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub footer_text: Option<String>,
    #[serde(default)]
    pub sections: Vec<MenuSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuSection {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    /// Image reference; never fetched by the engine.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub indicators: Indicators,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub sort_order: i32,
}

/// Dietary / allergen markers. Missing fields default to empty lists and no spice level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub dietary: Vec<String>,
    #[serde(default)]
    pub allergens: Vec<String>,
    #[serde(default)]
    pub spice_level: Option<u8>,
}

impl NormalizedMenu {
    pub fn item_count(&self) -> usize {
        self.sections.iter().map(|s| s.items.len()).sum()
    }

    /// Sections that will actually be laid out (empty ones are skipped).
    pub fn non_empty_sections(&self) -> impl Iterator<Item = &MenuSection> {
        self.sections.iter().filter(|s| !s.items.is_empty())
    }
}
