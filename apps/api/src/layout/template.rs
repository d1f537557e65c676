//! Template model: the validated, in-memory description of a menu page format.
//!
//! Parsing the template definition language happens upstream; this module only holds the
//! result and enforces the invariants the engine relies on:
//! - the body region has positive height for the template's default page
//! - the body grid has at least one column and positive row height
//! - every tile variant's declared `content_budget.total_height` equals its footprint
//! - ITEM_CARD and SECTION_HEADER variants exist (DECORATIVE_DIVIDER too when dividers are on)
//! - safe zones reference columns inside the grid

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::LayoutError;
use crate::layout::document::PageType;
use crate::layout::font_metrics::FontFamily;
use crate::layout::regions::{partition_regions, PageSpec, RegionHeights, RegionId};
use crate::layout::tile::TileType;

/// Tolerance when comparing declared heights against computed footprints.
const FOOTPRINT_EPSILON: f64 = 0.01;

// ────────────────────────────────────────────────────────────────────────────
// Grid
// ────────────────────────────────────────────────────────────────────────────

/// Body grid geometry. Column width is derived from the body width at layout time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub cols: u32,
    pub row_height: f64,
    #[serde(default)]
    pub gap_x: f64,
    #[serde(default)]
    pub gap_y: f64,
}

impl GridSpec {
    pub fn column_width(&self, body_width: f64) -> f64 {
        let cols = self.cols as f64;
        (body_width - (cols - 1.0) * self.gap_x) / cols
    }

    /// Width of a tile spanning `col_span` columns, gaps between them included.
    pub fn footprint_width(&self, col_span: u32, body_width: f64) -> f64 {
        let span = col_span as f64;
        span * self.column_width(body_width) + (span - 1.0) * self.gap_x
    }

    /// Height of a tile spanning `row_span` rows, gaps between them included.
    pub fn footprint_height(&self, row_span: u32) -> f64 {
        let span = row_span as f64;
        span * self.row_height + (span - 1.0) * self.gap_y
    }

    /// Number of whole rows that fit in a body of the given height.
    pub fn rows_per_page(&self, body_height: f64) -> u32 {
        // A tiny epsilon keeps exact fits (e.g. 3 × 70 + 2 × 10 = 230) from rounding down.
        ((body_height + self.gap_y + 1e-9) / (self.row_height + self.gap_y)).floor() as u32
    }

    pub fn cell_x(&self, col: u32, body_width: f64) -> f64 {
        col as f64 * (self.column_width(body_width) + self.gap_x)
    }

    pub fn cell_y(&self, row: u32) -> f64 {
        row as f64 * (self.row_height + self.gap_y)
    }

    /// Horizontal distance between the left edges of two adjacent columns.
    pub fn column_pitch(&self, body_width: f64) -> f64 {
        self.column_width(body_width) + self.gap_x
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tile variants
// ────────────────────────────────────────────────────────────────────────────

fn default_lines() -> u32 {
    1
}

fn default_font_size() -> f64 {
    10.0
}

/// Text / image allowance for a tile variant. Governs truncation only, never placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBudget {
    #[serde(default = "default_lines")]
    pub name_lines: u32,
    #[serde(default)]
    pub description_lines: u32,
    #[serde(default)]
    pub image_box_height: f64,
    #[serde(default)]
    pub padding_x: f64,
    #[serde(default)]
    pub padding_y: f64,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default)]
    pub font: FontFamily,
    /// Must equal the variant footprint height.
    pub total_height: f64,
}

fn default_span() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileVariant {
    pub region: RegionId,
    #[serde(default = "default_span")]
    pub col_span: u32,
    #[serde(default = "default_span")]
    pub row_span: u32,
    pub content_budget: ContentBudget,
    #[serde(default)]
    pub style: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Dividers and fillers
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividerSpec {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_divider_style")]
    pub style: String,
    /// Rule thickness passed to renderers; the footprint comes from the variant.
    #[serde(default = "default_divider_height")]
    pub height: f64,
}

fn default_divider_style() -> String {
    "line".to_string()
}

fn default_divider_height() -> f64 {
    1.0
}

/// Row bound of a safe zone. Markers are resolved per page at fill time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RowBoundRepr", into = "RowBoundRepr")]
pub enum RowBound {
    Index(u32),
    /// Last grid row of the page body.
    Last,
    /// Last row holding real content (fillers excluded).
    LastContent,
}

#[derive(Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
enum RowBoundRepr {
    Index(u32),
    Marker(RowMarker),
}

#[derive(Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum RowMarker {
    Last,
    LastContent,
}

impl From<RowBoundRepr> for RowBound {
    fn from(repr: RowBoundRepr) -> Self {
        match repr {
            RowBoundRepr::Index(i) => RowBound::Index(i),
            RowBoundRepr::Marker(RowMarker::Last) => RowBound::Last,
            RowBoundRepr::Marker(RowMarker::LastContent) => RowBound::LastContent,
        }
    }
}

impl From<RowBound> for RowBoundRepr {
    fn from(bound: RowBound) -> Self {
        match bound {
            RowBound::Index(i) => RowBoundRepr::Index(i),
            RowBound::Last => RowBoundRepr::Marker(RowMarker::Last),
            RowBound::LastContent => RowBoundRepr::Marker(RowMarker::LastContent),
        }
    }
}

/// Rectangle of body grid cells reserved for fillers. All bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafeZone {
    pub start_row: RowBound,
    pub end_row: RowBound,
    pub start_col: u32,
    pub end_col: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillerTile {
    pub id: String,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub asset: Option<String>,
    /// Page types this tile may appear on under `BY_PAGE_TYPE`. Empty means all.
    #[serde(default)]
    pub page_types: Vec<PageType>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelectionPolicy {
    #[default]
    Sequential,
    ByPageType,
    RandomSeeded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillerSpec {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub safe_zones: Vec<SafeZone>,
    #[serde(default)]
    pub tiles: Vec<FillerTile>,
    #[serde(default)]
    pub selection_policy: SelectionPolicy,
}

// ────────────────────────────────────────────────────────────────────────────
// Policies
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BalancePolicy {
    Center,
    #[default]
    Left,
    Right,
}

fn default_keep_with_next() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

fn default_title_pages() -> Vec<PageType> {
    vec![PageType::First, PageType::Single]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutPolicies {
    #[serde(default)]
    pub last_row_balancing: BalancePolicy,
    #[serde(default = "default_keep_with_next")]
    pub section_header_keep_with_next_items: u32,
    #[serde(default = "default_true")]
    pub repeat_section_header_on_continuation: bool,
    #[serde(default = "PageType::all")]
    pub show_logo_on_pages: Vec<PageType>,
    #[serde(default = "default_title_pages")]
    pub show_title_on_pages: Vec<PageType>,
    #[serde(default)]
    pub max_featured_per_section: Option<u32>,
}

impl Default for LayoutPolicies {
    fn default() -> Self {
        LayoutPolicies {
            last_row_balancing: BalancePolicy::default(),
            section_header_keep_with_next_items: default_keep_with_next(),
            repeat_section_header_on_continuation: true,
            show_logo_on_pages: PageType::all(),
            show_title_on_pages: default_title_pages(),
            max_featured_per_section: None,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Template
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub version: String,
    #[serde(default)]
    pub name: String,
    /// Default page geometry; a layout request may supply its own.
    pub page: PageSpec,
    #[serde(default)]
    pub regions: RegionHeights,
    pub body: GridSpec,
    pub tiles: BTreeMap<TileType, TileVariant>,
    #[serde(default)]
    pub divider: Option<DividerSpec>,
    #[serde(default)]
    pub filler: Option<FillerSpec>,
    #[serde(default)]
    pub policies: LayoutPolicies,
}

impl Template {
    pub fn variant(&self, tile_type: TileType) -> Option<&TileVariant> {
        self.tiles.get(&tile_type)
    }

    pub fn require_variant(&self, tile_type: TileType) -> Result<&TileVariant, LayoutError> {
        self.variant(tile_type)
            .ok_or_else(|| LayoutError::MissingVariant {
                template_id: self.id.clone(),
                variant: tile_type.to_string(),
            })
    }

    /// Divider spec when dividers are switched on.
    pub fn active_divider(&self) -> Option<&DividerSpec> {
        self.divider.as_ref().filter(|d| d.enabled)
    }

    /// Filler spec when fillers are switched on.
    pub fn active_filler(&self) -> Option<&FillerSpec> {
        self.filler.as_ref().filter(|f| f.enabled)
    }

    /// Checks every structural invariant. Fails on the first problem found.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let regions = partition_regions(&self.page, &self.regions)?;
        self.validate_grid()?;
        self.check_body_width(regions.body.width)?;

        self.require_variant(TileType::ItemCard)?;
        self.require_variant(TileType::SectionHeader)?;
        if self.active_divider().is_some() {
            self.require_variant(TileType::DecorativeDivider)?;
        }

        for (tile_type, variant) in &self.tiles {
            self.validate_variant(*tile_type, variant)?;
        }

        if let Some(filler) = self.active_filler() {
            self.validate_filler(filler)?;
        }
        Ok(())
    }

    fn validate_grid(&self) -> Result<(), LayoutError> {
        let grid = &self.body;
        if grid.cols == 0 {
            return Err(LayoutError::InvalidGrid(
                "grid needs at least one column".to_string(),
            ));
        }
        if !grid.row_height.is_finite() || grid.row_height <= 0.0 {
            return Err(LayoutError::InvalidGrid(format!(
                "row_height must be positive, got {}",
                grid.row_height
            )));
        }
        if !grid.gap_x.is_finite() || grid.gap_x < 0.0 || !grid.gap_y.is_finite() || grid.gap_y < 0.0
        {
            return Err(LayoutError::InvalidGrid(
                "gaps must be finite and non-negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Fails when the column gaps leave no room for columns in a body `body_width` wide.
    pub fn check_body_width(&self, body_width: f64) -> Result<(), LayoutError> {
        let column_width = self.body.column_width(body_width);
        if column_width <= 0.0 {
            return Err(LayoutError::InvalidGrid(format!(
                "{} columns with gap_x {} leave no room in a {body_width}pt body (column width {column_width}pt)",
                self.body.cols, self.body.gap_x
            )));
        }
        Ok(())
    }

    fn validate_variant(&self, tile_type: TileType, variant: &TileVariant) -> Result<(), LayoutError> {
        let invalid = |reason: String| LayoutError::InvalidVariant {
            variant: tile_type.to_string(),
            reason,
        };

        if variant.col_span == 0 || variant.row_span == 0 {
            return Err(invalid("col_span and row_span must be at least 1".to_string()));
        }
        let expected_region = if tile_type.is_body() {
            RegionId::Body
        } else {
            match tile_type {
                TileType::Logo => RegionId::Header,
                TileType::Title => RegionId::Title,
                _ => RegionId::Footer,
            }
        };
        if variant.region != expected_region {
            return Err(invalid(format!(
                "must live in the {expected_region:?} region, not {:?}",
                variant.region
            )));
        }
        if tile_type.is_body() && variant.col_span > self.body.cols {
            return Err(invalid(format!(
                "col_span {} exceeds the grid's {} columns",
                variant.col_span, self.body.cols
            )));
        }

        // Only grid tiles have a footprint to check against.
        if tile_type.is_body() {
            let footprint = self.body.footprint_height(variant.row_span);
            let declared = variant.content_budget.total_height;
            if (declared - footprint).abs() > FOOTPRINT_EPSILON {
                return Err(LayoutError::ContentBudgetMismatch {
                    variant: tile_type.to_string(),
                    declared,
                    footprint,
                });
            }
        }
        Ok(())
    }

    fn validate_filler(&self, filler: &FillerSpec) -> Result<(), LayoutError> {
        if filler.tiles.is_empty() {
            return Err(LayoutError::InvalidSafeZone {
                index: 0,
                reason: "fillers are enabled but no filler tiles are defined".to_string(),
            });
        }
        for (index, zone) in filler.safe_zones.iter().enumerate() {
            if zone.start_col > zone.end_col {
                return Err(LayoutError::InvalidSafeZone {
                    index,
                    reason: format!("start_col {} > end_col {}", zone.start_col, zone.end_col),
                });
            }
            if zone.end_col >= self.body.cols {
                return Err(LayoutError::InvalidSafeZone {
                    index,
                    reason: format!(
                        "end_col {} outside a {}-column grid",
                        zone.end_col, self.body.cols
                    ),
                });
            }
            if let (RowBound::Index(start), RowBound::Index(end)) = (zone.start_row, zone.end_row) {
                if start > end {
                    return Err(LayoutError::InvalidSafeZone {
                        index,
                        reason: format!("start_row {start} > end_row {end}"),
                    });
                }
            }
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
