//! Layout engine entry point.
//!
//! `build_layout` is a pure function of `(menu, template, page_spec, options)`:
//! regions → paginator (with the tile placer) → page typing → static region tiles →
//! fillers → `LayoutDocument`. `LayoutEngine` wraps it with the optional invariant audit.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::LayoutError;
use crate::layout::document::{LayoutDocument, Page, PageType};
use crate::layout::filler::fill_page;
use crate::layout::menu::NormalizedMenu;
use crate::layout::paginator::{PageDraft, Paginator};
use crate::layout::placer::TilePlacer;
use crate::layout::price::Currency;
use crate::layout::regions::{partition_regions, PageSpec, Region, RegionLayout};
use crate::layout::template::Template;
use crate::layout::tile::{
    FooterContent, LogoContent, TileContent, TileInstance, TileLayer, TitleContent,
};
use crate::layout::validator::{check_determinism, validate_document};

/// Per-run switches supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutOptions {
    /// Lay items out as ITEM_TEXT_ROW tiles without images.
    #[serde(default)]
    pub text_only: bool,
    #[serde(default)]
    pub currency: Currency,
}

/// Lays out `menu` on pages of `page_spec` using `template`.
pub fn build_layout(
    menu: &NormalizedMenu,
    template: &Template,
    page_spec: &PageSpec,
    options: &LayoutOptions,
) -> Result<LayoutDocument, LayoutError> {
    template.validate()?;
    let regions = partition_regions(page_spec, &template.regions)?;
    template.check_body_width(regions.body.width)?;

    let placer = TilePlacer::new(template, regions.body.width, options);
    let paginator = Paginator::new(template, &placer, &regions.body);
    let rows_per_page = paginator.rows_per_page();
    let (drafts, stats) = paginator.run(menu)?;

    let page_count = drafts.len();
    let pages: Vec<Page> = drafts
        .into_iter()
        .map(|draft| {
            let page_type = PageType::classify(draft.index, page_count);
            assemble_page(draft, page_type, page_count, menu, template, &regions)
        })
        .collect();

    info!(
        menu_id = %menu.id,
        template_id = %template.id,
        pages = page_count,
        rows_per_page,
        items = stats.items,
        sections = stats.sections_emitted,
        skipped_sections = stats.sections_skipped,
        dividers = stats.dividers,
        "Menu layout complete"
    );

    Ok(LayoutDocument {
        template_id: template.id.clone(),
        template_version: template.version.clone(),
        page_spec: *page_spec,
        pages,
    })
}

/// Orders a page's tiles: header, title, body content, fillers, footer.
fn assemble_page(
    draft: PageDraft,
    page_type: PageType,
    page_count: usize,
    menu: &NormalizedMenu,
    template: &Template,
    regions: &RegionLayout,
) -> Page {
    let policies = &template.policies;
    let fillers = fill_page(&draft, page_type, menu.id, template, regions.body.width);
    let page_index = draft.index;
    let mut tiles = Vec::with_capacity(draft.tiles.len() + fillers.len() + 3);

    if let Some(logo) = menu.logo.as_ref() {
        if regions.header.height > 0.0 && policies.show_logo_on_pages.contains(&page_type) {
            tiles.push(region_tile(
                &regions.header,
                format!("logo-p{page_index}"),
                TileContent::Logo(LogoContent {
                    image: logo.clone(),
                }),
                template,
            ));
        }
    }

    if regions.title.height > 0.0 && policies.show_title_on_pages.contains(&page_type) {
        tiles.push(region_tile(
            &regions.title,
            format!("title-p{page_index}"),
            TileContent::Title(TitleContent {
                text: menu.name.clone(),
            }),
            template,
        ));
    }

    tiles.extend(draft.tiles);
    tiles.extend(fillers);

    if regions.footer.height > 0.0 {
        tiles.push(region_tile(
            &regions.footer,
            format!("footer-p{page_index}"),
            TileContent::FooterInfo(FooterContent {
                page_number: page_index + 1,
                page_count,
                text: menu.footer_text.clone(),
            }),
            template,
        ));
    }

    Page {
        page_index,
        page_type,
        regions: regions.to_vec(),
        tiles,
    }
}

/// A tile covering a whole fixed region.
fn region_tile(region: &Region, id: String, content: TileContent, template: &Template) -> TileInstance {
    let style = template
        .variant(content.tile_type())
        .and_then(|v| v.style.clone());
    TileInstance {
        id,
        content,
        region_id: region.id,
        x: 0.0,
        y: 0.0,
        width: region.width,
        height: region.height,
        col_span: 1,
        row_span: 1,
        grid_row: 0,
        grid_col: 0,
        layer: TileLayer::Content,
        style,
    }
}

/// Runs layouts, optionally auditing every result.
#[derive(Debug, Clone, Copy)]
pub struct LayoutEngine {
    validate: bool,
}

impl LayoutEngine {
    pub fn new(validate: bool) -> Self {
        LayoutEngine { validate }
    }

    pub fn validates(&self) -> bool {
        self.validate
    }

    pub fn run(
        &self,
        menu: &NormalizedMenu,
        template: &Template,
        page_spec: &PageSpec,
        options: &LayoutOptions,
    ) -> Result<LayoutDocument, LayoutError> {
        let document = build_layout(menu, template, page_spec, options)?;
        if !self.validate {
            return Ok(document);
        }

        let mut violations = validate_document(&document, menu, template);
        let rerun = build_layout(menu, template, page_spec, options)?;
        violations.extend(check_determinism(&document, &rerun));

        if !violations.is_empty() {
            warn!(
                menu_id = %menu.id,
                template_id = %template.id,
                count = violations.len(),
                "Layout failed invariant validation"
            );
            return Err(LayoutError::InvariantViolations(violations));
        }
        Ok(document)
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        LayoutEngine::new(cfg!(debug_assertions))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
