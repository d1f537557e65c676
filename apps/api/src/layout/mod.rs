// Menu layout engine: template-driven grid pagination of a normalized menu.
// The engine itself is synchronous and pure; the HTTP handlers run it on the blocking pool.

pub mod cache;
pub mod document;
pub mod engine;
pub mod filler;
pub mod font_metrics;
pub mod grid;
pub mod handlers;
pub mod menu;
pub mod paginator;
pub mod placer;
pub mod price;
pub mod regions;
pub mod template;
pub mod text_fit;
pub mod tile;
pub mod validator;

// Re-export the public API consumed by the router and integration tests.
pub use cache::{Published, TemplateCache};
pub use document::{LayoutDocument, Page, PageType};
pub use engine::{build_layout, LayoutEngine, LayoutOptions};
pub use menu::NormalizedMenu;
pub use regions::PageSpec;
pub use template::Template;
pub use tile::{TileInstance, TileType};
