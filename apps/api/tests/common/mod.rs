#![allow(dead_code)]

use menu_layout::layout::menu::{Indicators, MenuItem, MenuSection};
use menu_layout::layout::{NormalizedMenu, Template};
use serde_json::{json, Value};
use uuid::Uuid;

fn budget(total_height: f64) -> Value {
    json!({
        "name_lines": 1,
        "description_lines": 2,
        "padding_x": 4.0,
        "padding_y": 4.0,
        "font_size": 10.0,
        "total_height": total_height
    })
}

/// 4 columns of 70pt rows with 8/10pt gaps on US letter; item cards span `card_rows` rows.
pub fn template_json(id: &str, card_rows: u32, dividers: bool) -> Value {
    let card_height = 70.0 * card_rows as f64 + 10.0 * (card_rows as f64 - 1.0);
    json!({
        "id": id,
        "version": "1",
        "name": "Bistro",
        "page": {
            "width": 612.0,
            "height": 792.0,
            "margins": { "top": 36.0, "right": 36.0, "bottom": 36.0, "left": 36.0 }
        },
        "body": { "cols": 4, "row_height": 70.0, "gap_x": 8.0, "gap_y": 10.0 },
        "tiles": {
            "ITEM_CARD": { "region": "body", "col_span": 1, "row_span": card_rows, "content_budget": budget(card_height) },
            "SECTION_HEADER": { "region": "body", "col_span": 4, "row_span": 1, "content_budget": budget(70.0) },
            "DECORATIVE_DIVIDER": { "region": "body", "col_span": 4, "row_span": 1, "content_budget": budget(70.0) }
        },
        "divider": { "enabled": dividers, "style": "flourish" }
    })
}

pub fn template(card_rows: u32, dividers: bool) -> Template {
    serde_json::from_value(template_json("bistro", card_rows, dividers)).unwrap()
}

pub fn menu(section_sizes: &[usize]) -> NormalizedMenu {
    NormalizedMenu {
        id: Uuid::from_u128(0xC0FFEE),
        name: "Evening Menu".to_string(),
        logo: None,
        footer_text: None,
        sections: section_sizes
            .iter()
            .enumerate()
            .map(|(s, &n)| MenuSection {
                id: Uuid::from_u128(1000 + s as u128),
                name: format!("Course {}", s + 1),
                sort_order: s as i32,
                items: (0..n)
                    .map(|i| MenuItem {
                        id: Uuid::from_u128(((s as u128 + 1) << 16) + i as u128),
                        name: format!("Plate {}.{}", s + 1, i + 1),
                        description: Some("Seasonal vegetables, brown butter".to_string()),
                        price: Some(9.5 + i as f64),
                        image: None,
                        indicators: Indicators::default(),
                        is_featured: false,
                        sort_order: i as i32,
                    })
                    .collect(),
            })
            .collect(),
    }
}
