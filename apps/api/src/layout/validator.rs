//! Invariant Validator: development-time audit of a finished layout document.
//!
//! Checks are collected, never fail-fast, so one run reports every problem at once:
//! - every tile rectangle lies inside its region
//! - no two tiles in one region overlap
//! - every input item appears in exactly one tile, in input order
//! - divider count is `max(0, non_empty_sections - 1)` when enabled, else 0
//! - no page ends with a section header
//! - re-running the same inputs serializes byte-identically

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::layout::document::LayoutDocument;
use crate::layout::menu::NormalizedMenu;
use crate::layout::regions::RegionId;
use crate::layout::template::Template;
use crate::layout::tile::{TileInstance, TileLayer, TileType};

const EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    OutOfBounds,
    Overlap,
    MissingItem,
    DuplicateItem,
    UnexpectedItem,
    ItemOrder,
    DividerCount,
    OrphanedHeader,
    NonDeterministic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvariantViolation {
    pub kind: ViolationKind,
    pub page_index: Option<usize>,
    pub tile_id: Option<String>,
    pub message: String,
}

impl InvariantViolation {
    fn new(kind: ViolationKind, page_index: Option<usize>, tile_id: Option<&str>, message: String) -> Self {
        InvariantViolation {
            kind,
            page_index,
            tile_id: tile_id.map(str::to_string),
            message,
        }
    }
}

/// Runs every structural check and returns all violations found.
pub fn validate_document(
    doc: &LayoutDocument,
    menu: &NormalizedMenu,
    template: &Template,
) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    check_bounds(doc, &mut violations);
    check_overlaps(doc, &mut violations);
    check_items(doc, menu, &mut violations);
    check_dividers(doc, menu, template, &mut violations);
    check_orphaned_headers(doc, &mut violations);
    violations
}

/// Compares two runs of the same inputs by their serialized bytes.
pub fn check_determinism(first: &LayoutDocument, second: &LayoutDocument) -> Option<InvariantViolation> {
    let a = serde_json::to_vec(first).ok()?;
    let b = serde_json::to_vec(second).ok()?;
    if a == b {
        return None;
    }
    let page = first
        .pages
        .iter()
        .zip(second.pages.iter())
        .position(|(x, y)| x != y);
    Some(InvariantViolation::new(
        ViolationKind::NonDeterministic,
        page,
        None,
        format!(
            "re-running identical inputs produced different output ({} vs {} pages)",
            first.pages.len(),
            second.pages.len()
        ),
    ))
}

fn check_bounds(doc: &LayoutDocument, out: &mut Vec<InvariantViolation>) {
    for page in &doc.pages {
        for tile in &page.tiles {
            let Some(region) = page.regions.iter().find(|r| r.id == tile.region_id) else {
                out.push(InvariantViolation::new(
                    ViolationKind::OutOfBounds,
                    Some(page.page_index),
                    Some(&tile.id),
                    format!("tile references missing region {:?}", tile.region_id),
                ));
                continue;
            };
            let inside = tile.x >= -EPSILON
                && tile.y >= -EPSILON
                && tile.right() <= region.width + EPSILON
                && tile.bottom() <= region.height + EPSILON;
            if !inside {
                out.push(InvariantViolation::new(
                    ViolationKind::OutOfBounds,
                    Some(page.page_index),
                    Some(&tile.id),
                    format!(
                        "({:.2},{:.2})-({:.2},{:.2}) outside {:?} region {:.2}×{:.2}",
                        tile.x,
                        tile.y,
                        tile.right(),
                        tile.bottom(),
                        region.id,
                        region.width,
                        region.height
                    ),
                ));
            }
        }
    }
}

fn check_overlaps(doc: &LayoutDocument, out: &mut Vec<InvariantViolation>) {
    for page in &doc.pages {
        let mut by_region: HashMap<RegionId, Vec<&TileInstance>> = HashMap::new();
        for tile in &page.tiles {
            by_region.entry(tile.region_id).or_default().push(tile);
        }
        let mut regions: Vec<_> = by_region.into_iter().collect();
        regions.sort_by_key(|(id, _)| *id);

        for (_, tiles) in regions {
            for (i, a) in tiles.iter().enumerate() {
                for b in &tiles[i + 1..] {
                    if a.overlaps(b, EPSILON) {
                        out.push(InvariantViolation::new(
                            ViolationKind::Overlap,
                            Some(page.page_index),
                            Some(&a.id),
                            format!("'{}' overlaps '{}'", a.id, b.id),
                        ));
                    }
                }
            }
        }
    }
}

fn check_items(doc: &LayoutDocument, menu: &NormalizedMenu, out: &mut Vec<InvariantViolation>) {
    let expected: Vec<Uuid> = menu
        .sections
        .iter()
        .flat_map(|s| s.items.iter().map(|i| i.id))
        .collect();

    // Reading order: page, then grid row, then grid column.
    let mut placed: Vec<(usize, u32, u32, Uuid)> = Vec::new();
    for page in &doc.pages {
        for tile in &page.tiles {
            if let Some(item) = tile.content.item() {
                placed.push((page.page_index, tile.grid_row, tile.grid_col, item.item_id));
            }
        }
    }
    placed.sort_by_key(|(page, row, col, _)| (*page, *row, *col));
    let actual: Vec<Uuid> = placed.into_iter().map(|(_, _, _, id)| id).collect();

    let mut counts: HashMap<Uuid, usize> = HashMap::new();
    for id in &actual {
        *counts.entry(*id).or_default() += 1;
    }

    let mut conserved = true;
    for id in &expected {
        match counts.get(id).copied().unwrap_or(0) {
            1 => {}
            0 => {
                conserved = false;
                out.push(InvariantViolation::new(
                    ViolationKind::MissingItem,
                    None,
                    None,
                    format!("item {id} was not placed"),
                ));
            }
            n => {
                conserved = false;
                out.push(InvariantViolation::new(
                    ViolationKind::DuplicateItem,
                    None,
                    None,
                    format!("item {id} placed {n} times"),
                ));
            }
        }
    }
    for id in counts.keys() {
        if !expected.contains(id) {
            conserved = false;
            out.push(InvariantViolation::new(
                ViolationKind::UnexpectedItem,
                None,
                None,
                format!("item {id} is not in the menu"),
            ));
        }
    }

    if conserved && actual != expected {
        let at = actual
            .iter()
            .zip(expected.iter())
            .position(|(a, e)| a != e)
            .unwrap_or(0);
        out.push(InvariantViolation::new(
            ViolationKind::ItemOrder,
            None,
            None,
            format!("items diverge from input order at position {at}"),
        ));
    }
}

fn check_dividers(
    doc: &LayoutDocument,
    menu: &NormalizedMenu,
    template: &Template,
    out: &mut Vec<InvariantViolation>,
) {
    let expected = if template.active_divider().is_some() {
        menu.non_empty_sections().count().saturating_sub(1)
    } else {
        0
    };
    let actual = doc.count_tiles(TileType::DecorativeDivider);
    if actual != expected {
        out.push(InvariantViolation::new(
            ViolationKind::DividerCount,
            None,
            None,
            format!("expected {expected} dividers, found {actual}"),
        ));
    }
}

fn check_orphaned_headers(doc: &LayoutDocument, out: &mut Vec<InvariantViolation>) {
    for page in &doc.pages {
        let last = page
            .tiles
            .iter()
            .filter(|t| t.region_id == RegionId::Body && t.layer == TileLayer::Content)
            .max_by_key(|t| (t.grid_row, t.grid_col));
        if let Some(tile) = last.filter(|t| t.tile_type() == TileType::SectionHeader) {
            out.push(InvariantViolation::new(
                ViolationKind::OrphanedHeader,
                Some(page.page_index),
                Some(&tile.id),
                "section header is the last tile on the page".to_string(),
            ));
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
