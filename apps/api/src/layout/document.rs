use serde::{Deserialize, Serialize};

use crate::layout::regions::{PageSpec, Region};
use crate::layout::tile::{TileInstance, TileType};

/// Position of a page within the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PageType {
    First,
    Continuation,
    Final,
    Single,
}

impl PageType {
    /// Classifies page `index` of a document with `page_count` pages.
    pub fn classify(index: usize, page_count: usize) -> PageType {
        if page_count <= 1 {
            PageType::Single
        } else if index == 0 {
            PageType::First
        } else if index + 1 == page_count {
            PageType::Final
        } else {
            PageType::Continuation
        }
    }

    pub fn all() -> Vec<PageType> {
        vec![
            PageType::First,
            PageType::Continuation,
            PageType::Final,
            PageType::Single,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub page_index: usize,
    pub page_type: PageType,
    pub regions: Vec<Region>,
    pub tiles: Vec<TileInstance>,
}

impl Page {
    pub fn tiles_of_type(&self, tile_type: TileType) -> impl Iterator<Item = &TileInstance> {
        self.tiles
            .iter()
            .filter(move |t| t.tile_type() == tile_type)
    }
}

/// Final output of one layout run. Renderers treat this as read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutDocument {
    pub template_id: String,
    pub template_version: String,
    pub page_spec: PageSpec,
    pub pages: Vec<Page>,
}

impl LayoutDocument {
    pub fn count_tiles(&self, tile_type: TileType) -> usize {
        self.pages
            .iter()
            .map(|p| p.tiles_of_type(tile_type).count())
            .sum()
    }

    /// Number of tiles carrying a menu item (cards, text rows, feature cards).
    pub fn item_tile_count(&self) -> usize {
        self.pages
            .iter()
            .flat_map(|p| p.tiles.iter())
            .filter(|t| t.content.item().is_some())
            .count()
    }
}
