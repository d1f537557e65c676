//! Streaming Paginator: one forward pass over the menu that fills body grids page by page.
//!
//! # States
//! - `BuildingPage`: the current page accepts tiles at the grid cursor while they fit.
//! - `FinalizingPage`: the page is closed, its last partial row is balanced, and a fresh page
//!   becomes current.
//! - `Done`: the last page is closed once every section has been consumed.
//!
//! # Page-break policy
//! - Empty sections produce nothing, not even dividers.
//! - A divider precedes every emitted section except the first when dividers are enabled.
//! - Keep-with-next: divider + header + the first N items must fit together, otherwise the
//!   page breaks before the divider. Pages without content never break for this.
//! - A header that cannot share an empty page with its first item is a configuration error.
//! - Items that do not fit break the page; continuation pages may repeat the section header.
//!
//! Tiles are never moved once placed, except for the horizontal last-row shift.

use serde::Serialize;
use tracing::debug;

use crate::errors::LayoutError;
use crate::layout::grid::{GridCursor, GridOccupancy};
use crate::layout::menu::{MenuSection, NormalizedMenu};
use crate::layout::placer::{PlaceEntity, PlacedTile, TilePlacer};
use crate::layout::regions::Region;
use crate::layout::template::{BalancePolicy, GridSpec, Template};
use crate::layout::tile::{TileInstance, TileType};

/// A finalized page body, before page typing and fillers.
#[derive(Debug, Clone)]
pub struct PageDraft {
    pub index: usize,
    pub grid: GridOccupancy,
    pub tiles: Vec<TileInstance>,
    /// Row whose tiles were shifted by last-row balancing. Its cells are off the grid pitch.
    pub balanced_row: Option<u32>,
}

impl PageDraft {
    /// Last grid row covered by real content, if any.
    pub fn last_content_row(&self) -> Option<u32> {
        last_row_of(&self.tiles)
    }
}

/// Counters reported after pagination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PaginationStats {
    pub sections_emitted: usize,
    pub sections_skipped: usize,
    pub dividers: usize,
    pub items: usize,
    pub continuation_headers: usize,
}

fn last_row_of(tiles: &[TileInstance]) -> Option<u32> {
    tiles
        .iter()
        .map(|t| t.grid_row + t.row_span.saturating_sub(1))
        .max()
}

// ────────────────────────────────────────────────────────────────────────────
// Page under construction
// ────────────────────────────────────────────────────────────────────────────

struct PageBuilder {
    index: usize,
    grid: GridOccupancy,
    cursor: GridCursor,
    tiles: Vec<TileInstance>,
}

impl PageBuilder {
    fn new(index: usize, cols: u32, rows: u32) -> Self {
        PageBuilder {
            index,
            grid: GridOccupancy::new(cols, rows),
            cursor: GridCursor::default(),
            tiles: Vec::new(),
        }
    }

    fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    fn fits(&self, tile: &PlacedTile) -> bool {
        self.grid
            .find_slot(self.cursor, tile.col_span, tile.row_span)
            .is_some()
    }

    /// Dry run: would all tiles fit, in order, from the current cursor?
    fn fits_all(&self, tiles: &[&PlacedTile]) -> bool {
        let mut grid = self.grid.clone();
        let mut cursor = self.cursor;
        for tile in tiles {
            match grid.find_slot(cursor, tile.col_span, tile.row_span) {
                Some(slot) => {
                    grid.occupy(slot.row, slot.col, tile.col_span, tile.row_span);
                    cursor = slot.advance(tile.col_span, grid.cols());
                }
                None => return false,
            }
        }
        true
    }

    /// Places the tile at the next free slot. Hands the tile back when it does not fit.
    fn push(
        &mut self,
        tile: PlacedTile,
        grid_spec: &GridSpec,
        body_width: f64,
    ) -> Result<(), PlacedTile> {
        let Some(slot) = self
            .grid
            .find_slot(self.cursor, tile.col_span, tile.row_span)
        else {
            return Err(tile);
        };
        self.grid
            .occupy(slot.row, slot.col, tile.col_span, tile.row_span);
        self.cursor = slot.advance(tile.col_span, self.grid.cols());

        let x = grid_spec.cell_x(slot.col, body_width);
        let y = grid_spec.cell_y(slot.row);
        self.tiles.push(tile.at(slot.row, slot.col, x, y));
        Ok(())
    }

    /// Closes the page, shifting a partial last row according to `policy`.
    fn finalize(mut self, policy: BalancePolicy, pitch: f64) -> PageDraft {
        let balanced_row = balance_last_row(&mut self.tiles, self.grid.cols(), policy, pitch);
        PageDraft {
            index: self.index,
            grid: self.grid,
            tiles: self.tiles,
            balanced_row,
        }
    }
}

/// Shifts the tiles of a partially filled last row. Returns the row when anything moved.
///
/// Only rows made entirely of single-row item tiles are balanced; a row crossed by a
/// multi-row tile keeps its positions.
fn balance_last_row(
    tiles: &mut [TileInstance],
    cols: u32,
    policy: BalancePolicy,
    pitch: f64,
) -> Option<u32> {
    let last_row = last_row_of(tiles)?;

    let crossed_by_tall_tile = tiles
        .iter()
        .any(|t| t.row_span > 1 && t.grid_row <= last_row && t.grid_row + t.row_span > last_row);
    if crossed_by_tall_tile {
        return None;
    }

    let in_row = |t: &TileInstance| t.grid_row == last_row;
    if tiles
        .iter()
        .filter(|t| in_row(t))
        .any(|t| t.content.item().is_none())
    {
        return None;
    }

    let used: u32 = tiles.iter().filter(|t| in_row(t)).map(|t| t.col_span).sum();
    if used >= cols {
        return None;
    }

    let free = (cols - used) as f64;
    let offset = match policy {
        BalancePolicy::Left => 0.0,
        BalancePolicy::Right => free * pitch,
        BalancePolicy::Center => free * pitch / 2.0,
    };
    if offset <= 0.0 {
        return None;
    }

    for tile in tiles.iter_mut().filter(|t| in_row(t)) {
        tile.x += offset;
    }
    Some(last_row)
}

/// Grid rows `tiles` occupy when placed in order on an unbounded page.
fn rows_needed(tiles: &[&PlacedTile], cols: u32) -> u32 {
    let bound: u32 = tiles.iter().map(|t| t.row_span).sum();
    let mut grid = GridOccupancy::new(cols, bound);
    let mut cursor = GridCursor::default();
    let mut rows = 0;
    for tile in tiles {
        let Some(slot) = grid.find_slot(cursor, tile.col_span, tile.row_span) else {
            return bound;
        };
        grid.occupy(slot.row, slot.col, tile.col_span, tile.row_span);
        cursor = slot.advance(tile.col_span, cols);
        rows = rows.max(slot.row + tile.row_span);
    }
    rows
}

// ────────────────────────────────────────────────────────────────────────────
// Paginator
// ────────────────────────────────────────────────────────────────────────────

pub struct Paginator<'a> {
    template: &'a Template,
    placer: &'a TilePlacer<'a>,
    body_width: f64,
    rows_per_page: u32,
    pages: Vec<PageDraft>,
    current: PageBuilder,
    stats: PaginationStats,
}

impl<'a> Paginator<'a> {
    pub fn new(template: &'a Template, placer: &'a TilePlacer<'a>, body: &Region) -> Self {
        let rows_per_page = template.body.rows_per_page(body.height);
        Paginator {
            template,
            placer,
            body_width: body.width,
            rows_per_page,
            pages: Vec::new(),
            current: PageBuilder::new(0, template.body.cols, rows_per_page),
            stats: PaginationStats::default(),
        }
    }

    pub fn rows_per_page(&self) -> u32 {
        self.rows_per_page
    }

    /// Lays out every section of the menu and returns the finalized pages.
    pub fn run(mut self, menu: &NormalizedMenu) -> Result<(Vec<PageDraft>, PaginationStats), LayoutError> {
        for section in &menu.sections {
            self.push_section(section)?;
        }
        Ok(self.finish())
    }

    fn push_section(&mut self, section: &MenuSection) -> Result<(), LayoutError> {
        if section.items.is_empty() {
            debug!(section_id = %section.id, "Skipping empty section");
            self.stats.sections_skipped += 1;
            return Ok(());
        }

        let divider = match self.template.active_divider() {
            Some(_) if self.stats.sections_emitted > 0 => Some(self.placer.place(
                PlaceEntity::Divider {
                    ordinal: self.stats.dividers,
                },
                section.id,
            )?),
            _ => None,
        };
        let header = self.placer.place(
            PlaceEntity::SectionHeader {
                section,
                continued: false,
            },
            section.id,
        )?;
        let items = self.place_items(section)?;

        for tile in divider.iter().chain(std::iter::once(&header)).chain(items.iter()) {
            self.ensure_fits_empty(tile)?;
        }
        self.ensure_header_fits_with_item(section, divider.as_ref(), &header, &items[0])?;

        // Keep-with-next: a header is never the last thing on a page while its items spill over.
        let keep = (self
            .template
            .policies
            .section_header_keep_with_next_items
            .max(1) as usize)
            .min(items.len());
        let group: Vec<&PlacedTile> = divider
            .iter()
            .chain(std::iter::once(&header))
            .chain(items[..keep].iter())
            .collect();
        if !self.current.is_empty() && !self.current.fits_all(&group) {
            debug!(
                page_index = self.current.index,
                section_id = %section.id,
                keep_with_next = keep,
                "Section header would be orphaned; breaking page"
            );
            self.break_page();
        }

        if let Some(divider) = divider {
            self.place_or_break(divider)?;
            self.stats.dividers += 1;
        }
        self.place_or_break(header)?;

        for tile in items {
            if !self.current.fits(&tile) {
                self.break_page();
                self.repeat_header(section, &tile)?;
            }
            self.place_or_break(tile)?;
            self.stats.items += 1;
        }

        self.stats.sections_emitted += 1;
        Ok(())
    }

    /// Resolves every item tile of a section, applying the featured cap in input order.
    fn place_items(&self, section: &MenuSection) -> Result<Vec<PlacedTile>, LayoutError> {
        let cap = self.template.policies.max_featured_per_section;
        let mut featured = 0u32;
        let mut tiles = Vec::with_capacity(section.items.len());
        for item in &section.items {
            let allow_feature = cap.map_or(true, |cap| featured < cap);
            let tile = self.placer.place(
                PlaceEntity::Item {
                    item,
                    allow_feature,
                },
                section.id,
            )?;
            if tile.tile_type() == TileType::FeatureCard {
                featured += 1;
            }
            tiles.push(tile);
        }
        Ok(tiles)
    }

    /// Emits a lightweight header at the top of a continuation page, if it can share the
    /// page with the item that caused the break.
    fn repeat_header(&mut self, section: &MenuSection, next: &PlacedTile) -> Result<(), LayoutError> {
        if !self.template.policies.repeat_section_header_on_continuation {
            return Ok(());
        }
        let mut header = self.placer.place(
            PlaceEntity::SectionHeader {
                section,
                continued: true,
            },
            section.id,
        )?;
        if !self.current.fits_all(&[&header, next]) {
            debug!(
                page_index = self.current.index,
                section_id = %section.id,
                "Continuation header does not fit beside the next item; omitted"
            );
            return Ok(());
        }
        header.id = format!("{}-p{}", header.id, self.current.index);
        self.place_or_break(header)?;
        self.stats.continuation_headers += 1;
        Ok(())
    }

    fn ensure_fits_empty(&self, tile: &PlacedTile) -> Result<(), LayoutError> {
        if tile.row_span > self.rows_per_page || tile.col_span > self.template.body.cols {
            return Err(LayoutError::FootprintNeverFits {
                what: format!("{} tile '{}'", tile.tile_type(), tile.id),
                row_span: tile.row_span,
                rows_per_page: self.rows_per_page,
            });
        }
        Ok(())
    }

    /// A header must be able to share an empty page with its first item (and the divider in
    /// front of it); otherwise it would always end up alone at the bottom of a page.
    fn ensure_header_fits_with_item(
        &self,
        section: &MenuSection,
        divider: Option<&PlacedTile>,
        header: &PlacedTile,
        first_item: &PlacedTile,
    ) -> Result<(), LayoutError> {
        let group: Vec<&PlacedTile> = divider
            .into_iter()
            .chain([header, first_item])
            .collect();
        let empty = PageBuilder::new(0, self.template.body.cols, self.rows_per_page);
        if empty.fits_all(&group) {
            return Ok(());
        }
        Err(LayoutError::FootprintNeverFits {
            what: format!("section '{}' header with its first item", section.name),
            row_span: rows_needed(&group, self.template.body.cols),
            rows_per_page: self.rows_per_page,
        })
    }

    fn place_or_break(&mut self, tile: PlacedTile) -> Result<(), LayoutError> {
        let grid = self.template.body;
        let tile = match self.current.push(tile, &grid, self.body_width) {
            Ok(()) => return Ok(()),
            Err(tile) => tile,
        };
        self.break_page();
        self.current
            .push(tile, &grid, self.body_width)
            .map_err(|tile| LayoutError::FootprintNeverFits {
                what: format!("{} tile '{}'", tile.tile_type(), tile.id),
                row_span: tile.row_span,
                rows_per_page: self.rows_per_page,
            })
    }

    fn break_page(&mut self) {
        let next = PageBuilder::new(
            self.current.index + 1,
            self.template.body.cols,
            self.rows_per_page,
        );
        let finished = std::mem::replace(&mut self.current, next);
        debug!(
            page_index = finished.index,
            tiles = finished.tiles.len(),
            cursor_row = finished.cursor.row,
            rows_per_page = self.rows_per_page,
            "Finalizing page"
        );
        let draft = self.finalize(finished);
        self.pages.push(draft);
    }

    fn finalize(&self, page: PageBuilder) -> PageDraft {
        page.finalize(
            self.template.policies.last_row_balancing,
            self.template.body.column_pitch(self.body_width),
        )
    }

    fn finish(mut self) -> (Vec<PageDraft>, PaginationStats) {
        // An empty trailing builder only survives when nothing was placed at all.
        if !self.current.is_empty() || self.pages.is_empty() {
            let last = std::mem::replace(
                &mut self.current,
                PageBuilder::new(0, self.template.body.cols, self.rows_per_page),
            );
            let draft = self.finalize(last);
            self.pages.push(draft);
        }
        (self.pages, self.stats)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::engine::LayoutOptions;
    use crate::layout::menu::{Indicators, MenuItem};
    use crate::layout::regions::RegionId;
    use crate::layout::template::tests::{body_variant, make_template};
    use crate::layout::template::DividerSpec;
    use uuid::Uuid;

    fn body(height: f64) -> Region {
        Region {
            id: RegionId::Body,
            x: 0.0,
            y: 0.0,
            width: 540.0,
            height,
        }
    }

    fn make_item(n: u128, featured: bool) -> MenuItem {
        MenuItem {
            id: Uuid::from_u128(1000 + n),
            name: format!("Item {n}"),
            description: None,
            price: Some(9.5),
            image: None,
            indicators: Indicators::default(),
            is_featured: featured,
            sort_order: n as i32,
        }
    }

    fn make_section(n: u128, items: usize) -> MenuSection {
        MenuSection {
            id: Uuid::from_u128(n),
            name: format!("Section {n}"),
            sort_order: n as i32,
            items: (0..items)
                .map(|i| make_item(n * 100 + i as u128, false))
                .collect(),
        }
    }

    fn make_menu(sections: Vec<MenuSection>) -> NormalizedMenu {
        NormalizedMenu {
            id: Uuid::from_u128(42),
            name: "Test".to_string(),
            logo: None,
            footer_text: None,
            sections,
        }
    }

    fn with_divider(mut template: Template) -> Template {
        template.divider = Some(DividerSpec {
            enabled: true,
            style: "line".to_string(),
            height: 1.0,
        });
        let grid = template.body;
        template
            .tiles
            .insert(TileType::DecorativeDivider, body_variant(&grid, 4, 1));
        template
    }

    fn run(template: &Template, menu: &NormalizedMenu, body_height: f64) -> (Vec<PageDraft>, PaginationStats) {
        let options = LayoutOptions::default();
        let region = body(body_height);
        let placer = TilePlacer::new(template, region.width, &options);
        Paginator::new(template, &placer, &region).run(menu).unwrap()
    }

    fn types(page: &PageDraft) -> Vec<TileType> {
        page.tiles.iter().map(|t| t.tile_type()).collect()
    }

    #[test]
    fn test_single_section_single_page() {
        let template = make_template();
        let (pages, stats) = run(&template, &make_menu(vec![make_section(1, 3)]), 720.0);
        assert_eq!(pages.len(), 1);
        assert_eq!(
            types(&pages[0]),
            vec![
                TileType::SectionHeader,
                TileType::ItemCard,
                TileType::ItemCard,
                TileType::ItemCard
            ]
        );
        assert_eq!(stats.items, 3);
        // items start on the row below the header, left to right
        let cols: Vec<u32> = pages[0].tiles[1..].iter().map(|t| t.grid_col).collect();
        assert_eq!(cols, vec![0, 1, 2]);
        assert!(pages[0].tiles[1..].iter().all(|t| t.grid_row == 1));
        assert!((pages[0].tiles[2].x - 137.0).abs() < 1e-9);
        assert!((pages[0].tiles[2].y - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_sections_skipped_without_dividers() {
        let template = with_divider(make_template());
        let menu = make_menu(vec![
            make_section(1, 0),
            make_section(2, 2),
            make_section(3, 0),
            make_section(4, 1),
            make_section(5, 0),
        ]);
        let (pages, stats) = run(&template, &menu, 720.0);
        assert_eq!(stats.dividers, 1);
        assert_eq!(stats.sections_skipped, 3);
        assert_eq!(stats.sections_emitted, 2);
        assert_eq!(
            types(&pages[0]),
            vec![
                TileType::SectionHeader,
                TileType::ItemCard,
                TileType::ItemCard,
                TileType::DecorativeDivider,
                TileType::SectionHeader,
                TileType::ItemCard
            ]
        );
    }

    #[test]
    fn test_items_overflow_to_next_page_with_repeated_header() {
        let template = make_template();
        // 3 rows per page: header + 2 rows of 4 items
        let (pages, stats) = run(&template, &make_menu(vec![make_section(1, 10)]), 230.0);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].tiles.len(), 9);
        let continued = &pages[1].tiles[0];
        assert_eq!(continued.tile_type(), TileType::SectionHeader);
        assert_eq!(continued.grid_row, 0);
        match &continued.content {
            crate::layout::tile::TileContent::SectionHeader(h) => assert!(h.continued),
            other => panic!("unexpected content {other:?}"),
        }
        assert_eq!(stats.continuation_headers, 1);
        assert_eq!(stats.items, 10);
    }

    #[test]
    fn test_repeat_header_disabled() {
        let mut template = make_template();
        template.policies.repeat_section_header_on_continuation = false;
        let (pages, _) = run(&template, &make_menu(vec![make_section(1, 10)]), 230.0);
        assert_eq!(pages[1].tiles[0].tile_type(), TileType::ItemCard);
    }

    #[test]
    fn test_keep_with_next_moves_header_to_next_page() {
        let template = make_template();
        // 3 rows: section 1 uses header + 1 row, leaving 1 row: header fits but its item would not
        let menu = make_menu(vec![make_section(1, 4), make_section(2, 2)]);
        let (pages, _) = run(&template, &menu, 230.0);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].tiles.len(), 5);
        assert_eq!(pages[1].tiles[0].tile_type(), TileType::SectionHeader);
        assert_eq!(pages[1].tiles[0].id, format!("section-{}", Uuid::from_u128(2)));
    }

    #[test]
    fn test_divider_breaks_to_top_of_new_page() {
        let template = with_divider(make_template());
        let menu = make_menu(vec![make_section(1, 4), make_section(2, 2)]);
        let (pages, stats) = run(&template, &menu, 230.0);
        assert_eq!(pages.len(), 2);
        assert_eq!(stats.dividers, 1);
        assert_eq!(pages[1].tiles[0].tile_type(), TileType::DecorativeDivider);
        assert_eq!(pages[1].tiles[0].grid_row, 0);
        assert_eq!(pages[1].tiles[1].tile_type(), TileType::SectionHeader);
    }

    #[test]
    fn test_feature_card_reserves_rectangle() {
        let mut template = make_template();
        let grid = template.body;
        template
            .tiles
            .insert(TileType::FeatureCard, body_variant(&grid, 2, 2));
        let mut section = make_section(1, 5);
        section.items[0].is_featured = true;
        let (pages, _) = run(&template, &make_menu(vec![section]), 720.0);
        let tiles = &pages[0].tiles;
        assert_eq!(tiles[1].tile_type(), TileType::FeatureCard);
        let positions: Vec<(u32, u32)> = tiles[2..].iter().map(|t| (t.grid_row, t.grid_col)).collect();
        assert_eq!(positions, vec![(1, 2), (1, 3), (2, 2), (2, 3)]);
    }

    #[test]
    fn test_featured_cap_per_section() {
        let mut template = make_template();
        let grid = template.body;
        template
            .tiles
            .insert(TileType::FeatureCard, body_variant(&grid, 2, 2));
        template.policies.max_featured_per_section = Some(1);
        let mut section = make_section(1, 3);
        for item in &mut section.items {
            item.is_featured = true;
        }
        let (pages, _) = run(&template, &make_menu(vec![section]), 720.0);
        let features = pages[0]
            .tiles
            .iter()
            .filter(|t| t.tile_type() == TileType::FeatureCard)
            .count();
        assert_eq!(features, 1);
    }

    #[test]
    fn test_last_row_center_balancing() {
        let mut template = make_template();
        template.policies.last_row_balancing = BalancePolicy::Center;
        let (pages, _) = run(&template, &make_menu(vec![make_section(1, 6)]), 720.0);
        let page = &pages[0];
        assert_eq!(page.balanced_row, Some(2));
        // 2 items in a 4-col row: shift by one pitch (129 + 8)
        let last: Vec<f64> = page.tiles.iter().filter(|t| t.grid_row == 2).map(|t| t.x).collect();
        assert_eq!(last.len(), 2);
        assert!((last[0] - 137.0).abs() < 1e-9);
        assert!((last[1] - 274.0).abs() < 1e-9);
    }

    #[test]
    fn test_last_row_right_balancing() {
        let mut template = make_template();
        template.policies.last_row_balancing = BalancePolicy::Right;
        let (pages, _) = run(&template, &make_menu(vec![make_section(1, 5)]), 720.0);
        let last: Vec<&TileInstance> = pages[0].tiles.iter().filter(|t| t.grid_row == 2).collect();
        assert_eq!(last.len(), 1);
        assert!((last[0].right() - 540.0).abs() < 1e-9);
    }

    #[test]
    fn test_left_balancing_moves_nothing() {
        let (pages, _) = run(&make_template(), &make_menu(vec![make_section(1, 5)]), 720.0);
        assert_eq!(pages[0].balanced_row, None);
    }

    #[test]
    fn test_item_taller_than_page_is_fatal() {
        let mut template = make_template();
        let grid = template.body;
        template
            .tiles
            .insert(TileType::ItemCard, body_variant(&grid, 1, 4));
        let options = LayoutOptions::default();
        let region = body(230.0);
        let placer = TilePlacer::new(&template, region.width, &options);
        let err = Paginator::new(&template, &placer, &region)
            .run(&make_menu(vec![make_section(1, 1)]))
            .unwrap_err();
        match err {
            LayoutError::FootprintNeverFits {
                row_span,
                rows_per_page,
                ..
            } => {
                assert_eq!(row_span, 4);
                assert_eq!(rows_per_page, 3);
            }
            other => panic!("expected FootprintNeverFits, got {other:?}"),
        }
    }

    #[test]
    fn test_header_that_cannot_share_a_page_with_its_item_is_fatal() {
        let mut template = make_template();
        let grid = template.body;
        template
            .tiles
            .insert(TileType::ItemCard, body_variant(&grid, 1, 3));
        let options = LayoutOptions::default();
        let region = body(230.0);
        let placer = TilePlacer::new(&template, region.width, &options);
        let err = Paginator::new(&template, &placer, &region)
            .run(&make_menu(vec![make_section(1, 2)]))
            .unwrap_err();
        match err {
            LayoutError::FootprintNeverFits {
                what,
                row_span,
                rows_per_page,
            } => {
                assert!(what.contains("Section 1"));
                assert_eq!(row_span, 4);
                assert_eq!(rows_per_page, 3);
            }
            other => panic!("expected FootprintNeverFits, got {other:?}"),
        }
    }

    #[test]
    fn test_keep_with_next_counts_several_items() {
        // 4 rows: section 1 takes header + 1 row, leaving 2 rows
        let menu = make_menu(vec![make_section(1, 4), make_section(2, 6)]);

        // one item is enough to keep section 2's header on the first page
        let (pages, _) = run(&make_template(), &menu, 310.0);
        assert_eq!(pages[0].tiles.len(), 10);
        assert_eq!(pages[0].tiles[5].tile_type(), TileType::SectionHeader);

        let mut template = make_template();
        template.policies.section_header_keep_with_next_items = 5;
        let (pages, _) = run(&template, &menu, 310.0);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].tiles.len(), 5);
        assert_eq!(pages[1].tiles[0].id, format!("section-{}", Uuid::from_u128(2)));
        assert_eq!(pages[1].tiles.len(), 7);
    }

    #[test]
    fn test_continuation_header_omitted_when_it_cannot_fit_beside_item() {
        let mut template = make_template();
        let grid = template.body;
        template
            .tiles
            .insert(TileType::FeatureCard, body_variant(&grid, 2, 3));
        let mut section = make_section(1, 2);
        section.items[1].is_featured = true;

        let (pages, stats) = run(&template, &make_menu(vec![section]), 230.0);
        assert_eq!(pages.len(), 2);
        assert_eq!(
            types(&pages[0]),
            vec![TileType::SectionHeader, TileType::ItemCard]
        );
        assert_eq!(types(&pages[1]), vec![TileType::FeatureCard]);
        assert_eq!(stats.continuation_headers, 0);
    }

    #[test]
    fn test_empty_menu_yields_one_empty_page() {
        let (pages, stats) = run(&make_template(), &make_menu(vec![]), 720.0);
        assert_eq!(pages.len(), 1);
        assert!(pages[0].tiles.is_empty());
        assert_eq!(stats, PaginationStats::default());
    }
}
