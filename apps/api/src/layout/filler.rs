//! Filler Manager: decorates unused body cells inside the template's safe zones.
//!
//! Runs once per finalized page, after content placement, page typing and balancing.
//! `LAST` / `LAST_CONTENT` row markers are resolved against that page only.
//!
//! Pages holding a multi-cell FEATURE_CARD only get fillers in rows after the last content
//! row (trailing placement); interspersing around a reserved feature rectangle is not done.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

use crate::layout::document::PageType;
use crate::layout::paginator::PageDraft;
use crate::layout::regions::RegionId;
use crate::layout::template::{FillerTile, RowBound, SafeZone, SelectionPolicy, Template};
use crate::layout::tile::{FillerContent, TileContent, TileInstance, TileLayer, TileType};

/// Deterministic PRNG seed for `RANDOM_SEEDED` selection.
pub fn filler_seed(menu_id: Uuid, page_index: usize) -> u64 {
    let v = menu_id.as_u128();
    let folded = (v >> 64) as u64 ^ v as u64;
    folded ^ (page_index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

struct FillerPicker<'a> {
    tiles: Vec<&'a FillerTile>,
    next: usize,
    rng: Option<StdRng>,
}

impl<'a> FillerPicker<'a> {
    fn new(policy: SelectionPolicy, tiles: Vec<&'a FillerTile>, seed: u64) -> Self {
        FillerPicker {
            tiles,
            next: 0,
            rng: match policy {
                SelectionPolicy::RandomSeeded => Some(StdRng::seed_from_u64(seed)),
                _ => None,
            },
        }
    }

    fn pick(&mut self) -> &'a FillerTile {
        let idx = match self.rng.as_mut() {
            Some(rng) => rng.gen_range(0..self.tiles.len()),
            None => {
                let idx = self.next % self.tiles.len();
                self.next += 1;
                idx
            }
        };
        self.tiles[idx]
    }
}

/// Resolves a zone's row bounds for one page. `None` when the zone selects no rows.
fn resolve_rows(zone: &SafeZone, rows: u32, last_content: Option<u32>) -> Option<(u32, u32)> {
    let resolve = |bound: RowBound| match bound {
        RowBound::Index(i) => Some(i),
        RowBound::Last => rows.checked_sub(1),
        RowBound::LastContent => last_content,
    };
    let start = resolve(zone.start_row)?;
    let end = resolve(zone.end_row)?.min(rows.checked_sub(1)?);
    (start <= end).then_some((start, end))
}

/// Builds the filler tiles for one page. Returns an empty list when fillers are disabled.
pub fn fill_page(
    draft: &PageDraft,
    page_type: PageType,
    menu_id: Uuid,
    template: &Template,
    body_width: f64,
) -> Vec<TileInstance> {
    let Some(spec) = template.active_filler() else {
        return Vec::new();
    };

    let candidates: Vec<&FillerTile> = match spec.selection_policy {
        SelectionPolicy::ByPageType => spec
            .tiles
            .iter()
            .filter(|t| t.page_types.is_empty() || t.page_types.contains(&page_type))
            .collect(),
        _ => spec.tiles.iter().collect(),
    };
    if candidates.is_empty() {
        return Vec::new();
    }

    let grid_spec = template.body;
    let rows = draft.grid.rows();
    let cols = draft.grid.cols();
    let last_content = draft.last_content_row();
    let trailing_only = draft.tiles.iter().any(|t| {
        t.tile_type() == TileType::FeatureCard && t.col_span * t.row_span > 1
    });
    let first_trailing_row = last_content.map_or(0, |r| r + 1);
    let variant_style = template
        .variant(TileType::Filler)
        .and_then(|v| v.style.clone());

    let mut grid = draft.grid.clone();
    let mut picker = FillerPicker::new(
        spec.selection_policy,
        candidates,
        filler_seed(menu_id, draft.index),
    );
    let mut tiles = Vec::new();

    for zone in &spec.safe_zones {
        let Some((mut start, end)) = resolve_rows(zone, rows, last_content) else {
            continue;
        };
        if trailing_only {
            start = start.max(first_trailing_row);
        }
        for row in start..=end {
            if draft.balanced_row == Some(row) {
                continue;
            }
            for col in zone.start_col..=zone.end_col.min(cols.saturating_sub(1)) {
                if grid.is_occupied(row, col) {
                    continue;
                }
                grid.occupy(row, col, 1, 1);
                let filler = picker.pick();
                tiles.push(TileInstance {
                    id: format!("filler-p{}-r{}-c{}", draft.index, row, col),
                    content: TileContent::Filler(FillerContent {
                        filler_id: filler.id.clone(),
                        asset: filler.asset.clone(),
                    }),
                    region_id: RegionId::Body,
                    x: grid_spec.cell_x(col, body_width),
                    y: grid_spec.cell_y(row),
                    width: grid_spec.column_width(body_width),
                    height: grid_spec.row_height,
                    col_span: 1,
                    row_span: 1,
                    grid_row: row,
                    grid_col: col,
                    layer: TileLayer::Background,
                    style: filler.style.clone().or_else(|| variant_style.clone()),
                });
            }
        }
    }
    tiles
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
