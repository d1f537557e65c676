//! Tile Placer: chooses the tile variant for an entity and resolves its footprint and payload.
//!
//! No coordinates are assigned here; the paginator decides where a placed tile goes.
//!
//! # Variant selection for items
//! - featured + FEATURE_CARD defined + not text-only → FEATURE_CARD
//! - text-only → ITEM_TEXT_ROW
//! - otherwise → ITEM_CARD
//!
//! A template without FEATURE_CARD silently lays featured items out as ITEM_CARD.

use uuid::Uuid;

use crate::errors::LayoutError;
use crate::layout::engine::LayoutOptions;
use crate::layout::font_metrics::{get_metrics, points_to_em};
use crate::layout::menu::{MenuItem, MenuSection};
use crate::layout::regions::RegionId;
use crate::layout::template::{ContentBudget, Template, TileVariant};
use crate::layout::text_fit::fit_text;
use crate::layout::tile::{
    DividerContent, ItemContent, SectionHeaderContent, TileContent, TileInstance, TileLayer,
    TileType,
};

/// Something the paginator wants a tile for.
#[derive(Debug, Clone, Copy)]
pub enum PlaceEntity<'a> {
    Item {
        item: &'a MenuItem,
        /// False once the section's featured cap is used up.
        allow_feature: bool,
    },
    SectionHeader {
        section: &'a MenuSection,
        continued: bool,
    },
    Divider {
        ordinal: usize,
    },
}

/// A tile with footprint and content resolved but no position yet.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedTile {
    pub id: String,
    pub col_span: u32,
    pub row_span: u32,
    pub width: f64,
    pub height: f64,
    pub style: Option<String>,
    pub content: TileContent,
}

impl PlacedTile {
    pub fn tile_type(&self) -> TileType {
        self.content.tile_type()
    }

    /// Pins the tile to a body grid cell.
    pub fn at(self, grid_row: u32, grid_col: u32, x: f64, y: f64) -> TileInstance {
        TileInstance {
            id: self.id,
            content: self.content,
            region_id: RegionId::Body,
            x,
            y,
            width: self.width,
            height: self.height,
            col_span: self.col_span,
            row_span: self.row_span,
            grid_row,
            grid_col,
            layer: TileLayer::Content,
            style: self.style,
        }
    }
}

/// Placement context for one layout run.
pub struct TilePlacer<'a> {
    template: &'a Template,
    body_width: f64,
    options: &'a LayoutOptions,
}

impl<'a> TilePlacer<'a> {
    pub fn new(template: &'a Template, body_width: f64, options: &'a LayoutOptions) -> Self {
        TilePlacer {
            template,
            body_width,
            options,
        }
    }

    pub fn place(&self, entity: PlaceEntity<'_>, section_id: Uuid) -> Result<PlacedTile, LayoutError> {
        match entity {
            PlaceEntity::Item {
                item,
                allow_feature,
            } => self.place_item(item, section_id, allow_feature),
            PlaceEntity::SectionHeader { section, continued } => {
                let variant = self.template.require_variant(TileType::SectionHeader)?;
                let id = if continued {
                    format!("section-{}-continued", section.id)
                } else {
                    format!("section-{}", section.id)
                };
                Ok(self.full_width(
                    id,
                    variant,
                    TileContent::SectionHeader(SectionHeaderContent {
                        section_id,
                        title: section.name.clone(),
                        continued,
                    }),
                ))
            }
            PlaceEntity::Divider { ordinal } => {
                let variant = self.template.require_variant(TileType::DecorativeDivider)?;
                let (style, thickness) = match &self.template.divider {
                    Some(spec) => (spec.style.clone(), spec.height),
                    None => ("line".to_string(), 1.0),
                };
                Ok(self.full_width(
                    format!("divider-{ordinal}"),
                    variant,
                    TileContent::DecorativeDivider(DividerContent { style, thickness }),
                ))
            }
        }
    }

    fn place_item(
        &self,
        item: &MenuItem,
        section_id: Uuid,
        allow_feature: bool,
    ) -> Result<PlacedTile, LayoutError> {
        let feature_variant = self
            .template
            .variant(TileType::FeatureCard)
            .filter(|_| item.is_featured && allow_feature && !self.options.text_only);

        let (tile_type, variant) = match feature_variant {
            Some(variant) => (TileType::FeatureCard, variant),
            None if self.options.text_only => (
                TileType::ItemTextRow,
                self.template.require_variant(TileType::ItemTextRow)?,
            ),
            None => (
                TileType::ItemCard,
                self.template.require_variant(TileType::ItemCard)?,
            ),
        };

        let width = self
            .template
            .body
            .footprint_width(variant.col_span, self.body_width);
        let payload = self.item_content(item, section_id, &variant.content_budget, width, tile_type);
        let content = match tile_type {
            TileType::FeatureCard => TileContent::FeatureCard(payload),
            TileType::ItemTextRow => TileContent::ItemTextRow(payload),
            _ => TileContent::ItemCard(payload),
        };

        Ok(PlacedTile {
            id: format!("item-{}", item.id),
            col_span: variant.col_span,
            row_span: variant.row_span,
            width,
            height: self.template.body.footprint_height(variant.row_span),
            style: variant.style.clone(),
            content,
        })
    }

    fn item_content(
        &self,
        item: &MenuItem,
        section_id: Uuid,
        budget: &ContentBudget,
        tile_width: f64,
        tile_type: TileType,
    ) -> ItemContent {
        let metrics = get_metrics(budget.font);
        let text_width_em = points_to_em(tile_width - 2.0 * budget.padding_x, budget.font_size);

        let name = fit_text(&item.name, metrics, text_width_em, budget.name_lines.max(1));
        let description = item
            .description
            .as_deref()
            .map(|d| fit_text(d, metrics, text_width_em, budget.description_lines));
        let description_truncated = description.as_ref().is_some_and(|d| d.truncated);

        ItemContent {
            item_id: item.id,
            section_id,
            name: name.joined().unwrap_or_default(),
            description: description.and_then(|d| d.joined()),
            price: item.price.map(|p| self.options.currency.format(p)),
            image: match tile_type {
                TileType::ItemTextRow => None,
                _ => item.image.clone(),
            },
            dietary: item.indicators.dietary.clone(),
            allergens: item.indicators.allergens.clone(),
            spice_level: item.indicators.spice_level,
            truncated: name.truncated || description_truncated,
        }
    }

    /// Headers and dividers always span the whole grid width.
    fn full_width(&self, id: String, variant: &TileVariant, content: TileContent) -> PlacedTile {
        let cols = self.template.body.cols;
        PlacedTile {
            id,
            col_span: cols,
            row_span: variant.row_span,
            width: self.template.body.footprint_width(cols, self.body_width),
            height: self.template.body.footprint_height(variant.row_span),
            style: variant.style.clone(),
            content,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::menu::Indicators;
    use crate::layout::template::tests::{body_variant, make_template};

    const BODY_WIDTH: f64 = 540.0;

    fn make_item(featured: bool) -> MenuItem {
        MenuItem {
            id: Uuid::from_u128(7),
            name: "Margherita".to_string(),
            description: Some("Tomato, mozzarella, basil".to_string()),
            price: Some(11.0),
            image: Some("img/margherita.jpg".to_string()),
            indicators: Indicators {
                dietary: vec!["vegetarian".to_string()],
                allergens: vec!["gluten".to_string(), "dairy".to_string()],
                spice_level: None,
            },
            is_featured: featured,
            sort_order: 0,
        }
    }

    fn with_feature(mut template: Template) -> Template {
        let grid = template.body;
        template
            .tiles
            .insert(TileType::FeatureCard, body_variant(&grid, 2, 2));
        template
    }

    fn place_item(template: &Template, options: &LayoutOptions, item: &MenuItem) -> PlacedTile {
        TilePlacer::new(template, BODY_WIDTH, options)
            .place(
                PlaceEntity::Item {
                    item,
                    allow_feature: true,
                },
                Uuid::from_u128(1),
            )
            .unwrap()
    }

    #[test]
    fn test_plain_item_is_card() {
        let tile = place_item(&make_template(), &LayoutOptions::default(), &make_item(false));
        assert_eq!(tile.tile_type(), TileType::ItemCard);
        assert_eq!((tile.col_span, tile.row_span), (1, 1));
        assert!((tile.width - 129.0).abs() < 1e-9);
        assert!((tile.height - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_featured_item_uses_feature_card() {
        let template = with_feature(make_template());
        let tile = place_item(&template, &LayoutOptions::default(), &make_item(true));
        assert_eq!(tile.tile_type(), TileType::FeatureCard);
        assert_eq!((tile.col_span, tile.row_span), (2, 2));
        assert!((tile.width - 266.0).abs() < 1e-9);
        assert!((tile.height - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_featured_without_variant_falls_back_to_card() {
        let tile = place_item(&make_template(), &LayoutOptions::default(), &make_item(true));
        assert_eq!(tile.tile_type(), TileType::ItemCard);
    }

    #[test]
    fn test_featured_cap_exhausted_falls_back_to_card() {
        let template = with_feature(make_template());
        let options = LayoutOptions::default();
        let item = make_item(true);
        let tile = TilePlacer::new(&template, BODY_WIDTH, &options)
            .place(
                PlaceEntity::Item {
                    item: &item,
                    allow_feature: false,
                },
                Uuid::from_u128(1),
            )
            .unwrap();
        assert_eq!(tile.tile_type(), TileType::ItemCard);
    }

    #[test]
    fn test_text_only_uses_text_row_without_image() {
        let mut template = with_feature(make_template());
        let grid = template.body;
        template
            .tiles
            .insert(TileType::ItemTextRow, body_variant(&grid, 2, 1));
        let options = LayoutOptions {
            text_only: true,
            ..LayoutOptions::default()
        };
        let tile = place_item(&template, &options, &make_item(true));
        assert_eq!(tile.tile_type(), TileType::ItemTextRow);
        let item = tile.content.item().unwrap();
        assert_eq!(item.image, None);
        assert_eq!(item.price.as_deref(), Some("$11.00"));
    }

    #[test]
    fn test_text_only_without_variant_is_error() {
        let options = LayoutOptions {
            text_only: true,
            ..LayoutOptions::default()
        };
        let item = make_item(false);
        let err = TilePlacer::new(&make_template(), BODY_WIDTH, &options)
            .place(
                PlaceEntity::Item {
                    item: &item,
                    allow_feature: true,
                },
                Uuid::from_u128(1),
            )
            .unwrap_err();
        assert!(matches!(err, LayoutError::MissingVariant { .. }));
    }

    #[test]
    fn test_item_content_carries_display_data() {
        let tile = place_item(&make_template(), &LayoutOptions::default(), &make_item(false));
        let item = tile.content.item().unwrap();
        assert_eq!(item.item_id, Uuid::from_u128(7));
        assert_eq!(item.section_id, Uuid::from_u128(1));
        assert_eq!(item.name, "Margherita");
        assert_eq!(item.dietary, vec!["vegetarian".to_string()]);
        assert_eq!(item.allergens.len(), 2);
        assert_eq!(item.image.as_deref(), Some("img/margherita.jpg"));
        assert!(!item.truncated);
        assert_eq!(tile.id, format!("item-{}", Uuid::from_u128(7)));
    }

    #[test]
    fn test_long_description_truncated_to_budget() {
        let mut item = make_item(false);
        item.description = Some("word ".repeat(80));
        let tile = place_item(&make_template(), &LayoutOptions::default(), &item);
        let content = tile.content.item().unwrap();
        assert!(content.truncated);
        assert!(content.description.as_deref().unwrap().ends_with('…'));
    }

    #[test]
    fn test_section_header_spans_full_width() {
        let template = make_template();
        let options = LayoutOptions::default();
        let section = MenuSection {
            id: Uuid::from_u128(1),
            name: "Pizza".to_string(),
            sort_order: 0,
            items: vec![],
        };
        let tile = TilePlacer::new(&template, BODY_WIDTH, &options)
            .place(
                PlaceEntity::SectionHeader {
                    section: &section,
                    continued: false,
                },
                section.id,
            )
            .unwrap();
        assert_eq!(tile.tile_type(), TileType::SectionHeader);
        assert_eq!(tile.col_span, 4);
        assert!((tile.width - BODY_WIDTH).abs() < 1e-9);
    }

    #[test]
    fn test_divider_requires_variant() {
        let template = make_template();
        let options = LayoutOptions::default();
        let err = TilePlacer::new(&template, BODY_WIDTH, &options)
            .place(PlaceEntity::Divider { ordinal: 0 }, Uuid::from_u128(1))
            .unwrap_err();
        assert!(matches!(err, LayoutError::MissingVariant { .. }));
    }
}
