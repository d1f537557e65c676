//! Tile model: positioned boxes emitted by the engine.
//!
//! The tile `type` and its `content` are a single sum type, so a payload can never disagree
//! with its kind. On the wire they serialize as adjacent `"type"` / `"content"` fields.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::layout::regions::RegionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TileType {
    ItemCard,
    ItemTextRow,
    FeatureCard,
    SectionHeader,
    DecorativeDivider,
    Filler,
    Logo,
    Title,
    FooterInfo,
}

impl TileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TileType::ItemCard => "ITEM_CARD",
            TileType::ItemTextRow => "ITEM_TEXT_ROW",
            TileType::FeatureCard => "FEATURE_CARD",
            TileType::SectionHeader => "SECTION_HEADER",
            TileType::DecorativeDivider => "DECORATIVE_DIVIDER",
            TileType::Filler => "FILLER",
            TileType::Logo => "LOGO",
            TileType::Title => "TITLE",
            TileType::FooterInfo => "FOOTER_INFO",
        }
    }

    /// Tile kinds that live on the body grid.
    pub fn is_body(&self) -> bool {
        matches!(
            self,
            TileType::ItemCard
                | TileType::ItemTextRow
                | TileType::FeatureCard
                | TileType::SectionHeader
                | TileType::DecorativeDivider
                | TileType::Filler
        )
    }
}

impl std::fmt::Display for TileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display data for a menu item. Never carries geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemContent {
    pub item_id: Uuid,
    pub section_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Price already formatted with the caller's currency.
    pub price: Option<String>,
    pub image: Option<String>,
    pub dietary: Vec<String>,
    pub allergens: Vec<String>,
    pub spice_level: Option<u8>,
    /// True when name or description were cut to fit the content budget.
    pub truncated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionHeaderContent {
    pub section_id: Uuid,
    pub title: String,
    /// Repeated header at the top of a continuation page.
    pub continued: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividerContent {
    pub style: String,
    /// Visual rule thickness in points.
    pub thickness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillerContent {
    pub filler_id: String,
    pub asset: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogoContent {
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleContent {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FooterContent {
    pub page_number: usize,
    pub page_count: usize,
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TileContent {
    ItemCard(ItemContent),
    ItemTextRow(ItemContent),
    FeatureCard(ItemContent),
    SectionHeader(SectionHeaderContent),
    DecorativeDivider(DividerContent),
    Filler(FillerContent),
    Logo(LogoContent),
    Title(TitleContent),
    FooterInfo(FooterContent),
}

impl TileContent {
    pub fn tile_type(&self) -> TileType {
        match self {
            TileContent::ItemCard(_) => TileType::ItemCard,
            TileContent::ItemTextRow(_) => TileType::ItemTextRow,
            TileContent::FeatureCard(_) => TileType::FeatureCard,
            TileContent::SectionHeader(_) => TileType::SectionHeader,
            TileContent::DecorativeDivider(_) => TileType::DecorativeDivider,
            TileContent::Filler(_) => TileType::Filler,
            TileContent::Logo(_) => TileType::Logo,
            TileContent::Title(_) => TileType::Title,
            TileContent::FooterInfo(_) => TileType::FooterInfo,
        }
    }

    pub fn item(&self) -> Option<&ItemContent> {
        match self {
            TileContent::ItemCard(item)
            | TileContent::ItemTextRow(item)
            | TileContent::FeatureCard(item) => Some(item),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileLayer {
    Background,
    Content,
}

/// A tile with its final, region-relative position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileInstance {
    pub id: String,
    #[serde(flatten)]
    pub content: TileContent,
    pub region_id: RegionId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub col_span: u32,
    pub row_span: u32,
    pub grid_row: u32,
    pub grid_col: u32,
    pub layer: TileLayer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

impl TileInstance {
    pub fn tile_type(&self) -> TileType {
        self.content.tile_type()
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Strict rectangle intersection; touching edges do not count.
    pub fn overlaps(&self, other: &TileInstance, epsilon: f64) -> bool {
        self.x < other.right() - epsilon
            && other.x < self.right() - epsilon
            && self.y < other.bottom() - epsilon
            && other.y < self.bottom() - epsilon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(x: f64, y: f64, w: f64, h: f64) -> TileInstance {
        TileInstance {
            id: "t".to_string(),
            content: TileContent::Title(TitleContent {
                text: "Menu".to_string(),
            }),
            region_id: RegionId::Body,
            x,
            y,
            width: w,
            height: h,
            col_span: 1,
            row_span: 1,
            grid_row: 0,
            grid_col: 0,
            layer: TileLayer::Content,
            style: None,
        }
    }

    #[test]
    fn test_touching_tiles_do_not_overlap() {
        let a = tile(0.0, 0.0, 10.0, 10.0);
        let b = tile(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b, 1e-6));
    }

    #[test]
    fn test_intersecting_tiles_overlap() {
        let a = tile(0.0, 0.0, 10.0, 10.0);
        let b = tile(5.0, 5.0, 10.0, 10.0);
        assert!(a.overlaps(&b, 1e-6));
        assert!(b.overlaps(&a, 1e-6));
    }

    #[test]
    fn test_content_serializes_with_type_tag() {
        let value = serde_json::to_value(tile(0.0, 0.0, 1.0, 1.0)).unwrap();
        assert_eq!(value["type"], "TITLE");
        assert_eq!(value["content"]["text"], "Menu");
        assert_eq!(value["region_id"], "body");
        assert!(value.get("style").is_none());
    }
}
