//! Region Partitioner: splits the page content box into header / title / body / footer.
//!
//! All region coordinates are relative to the content box: every region has `x = 0`, the
//! `y` offsets stack contiguously from 0 and the four heights sum to the content height.

use serde::{Deserialize, Serialize};

use crate::errors::LayoutError;

/// Page margins in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    pub fn uniform(points: f64) -> Self {
        Margins {
            top: points,
            right: points,
            bottom: points,
            left: points,
        }
    }
}

/// Physical page geometry for one layout run. All values are in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSpec {
    pub width: f64,
    pub height: f64,
    pub margins: Margins,
}

impl PageSpec {
    /// A4 portrait (595 × 842pt) with 36pt margins.
    pub fn a4() -> Self {
        PageSpec {
            width: 595.0,
            height: 842.0,
            margins: Margins::uniform(36.0),
        }
    }

    /// US letter portrait (612 × 792pt) with 36pt margins.
    pub fn letter() -> Self {
        PageSpec {
            width: 612.0,
            height: 792.0,
            margins: Margins::uniform(36.0),
        }
    }

    pub fn content_width(&self) -> f64 {
        self.width - self.margins.left - self.margins.right
    }

    pub fn content_height(&self) -> f64 {
        self.height - self.margins.top - self.margins.bottom
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        let values = [
            self.width,
            self.height,
            self.margins.top,
            self.margins.right,
            self.margins.bottom,
            self.margins.left,
        ];
        if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(LayoutError::InvalidPageSpec(
                "dimensions and margins must be finite and non-negative".to_string(),
            ));
        }
        if self.content_width() <= 0.0 || self.content_height() <= 0.0 {
            return Err(LayoutError::InvalidPageSpec(format!(
                "margins leave no content box ({}pt × {}pt)",
                self.content_width(),
                self.content_height()
            )));
        }
        Ok(())
    }
}

/// Heights of the three fixed regions. The body takes whatever is left.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionHeights {
    #[serde(default)]
    pub header: f64,
    #[serde(default)]
    pub title: f64,
    #[serde(default)]
    pub footer: f64,
}

impl RegionHeights {
    pub fn fixed_total(&self) -> f64 {
        self.header + self.title + self.footer
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionId {
    Header,
    Title,
    Body,
    Footer,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// The four regions of one page, in stacking order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionLayout {
    pub header: Region,
    pub title: Region,
    pub body: Region,
    pub footer: Region,
}

impl RegionLayout {
    pub fn get(&self, id: RegionId) -> &Region {
        match id {
            RegionId::Header => &self.header,
            RegionId::Title => &self.title,
            RegionId::Body => &self.body,
            RegionId::Footer => &self.footer,
        }
    }

    pub fn to_vec(&self) -> Vec<Region> {
        vec![self.header, self.title, self.body, self.footer]
    }
}

/// Partitions the page content box into the four regions.
///
/// Fails with `BodyHeightNotPositive` when the fixed regions consume the whole content
/// height: that is a template authoring bug, never a runtime condition.
pub fn partition_regions(
    page: &PageSpec,
    heights: &RegionHeights,
) -> Result<RegionLayout, LayoutError> {
    page.validate()?;

    let fixed = [heights.header, heights.title, heights.footer];
    if fixed.iter().any(|h| !h.is_finite() || *h < 0.0) {
        return Err(LayoutError::InvalidPageSpec(
            "region heights must be finite and non-negative".to_string(),
        ));
    }

    let width = page.content_width();
    let content_height = page.content_height();
    let fixed_total = heights.fixed_total();
    let body_height = content_height - fixed_total;
    if body_height <= 0.0 {
        return Err(LayoutError::BodyHeightNotPositive {
            content_height,
            fixed_total,
        });
    }

    let region = |id, y, height| Region {
        id,
        x: 0.0,
        y,
        width,
        height,
    };

    let header = region(RegionId::Header, 0.0, heights.header);
    let title = region(RegionId::Title, header.y + header.height, heights.title);
    let body = region(RegionId::Body, title.y + title.height, body_height);
    // Footer height is derived from the remainder so the stack sums exactly.
    let footer_y = body.y + body.height;
    let footer = region(RegionId::Footer, footer_y, content_height - footer_y);

    Ok(RegionLayout {
        header,
        title,
        body,
        footer,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn heights(header: f64, title: f64, footer: f64) -> RegionHeights {
        RegionHeights {
            header,
            title,
            footer,
        }
    }

    #[test]
    fn test_regions_stack_contiguously() {
        let page = PageSpec::a4();
        let layout = partition_regions(&page, &heights(60.0, 40.0, 30.0)).unwrap();
        let regions = layout.to_vec();

        let mut expected_y = 0.0;
        for region in &regions {
            assert_eq!(region.x, 0.0);
            assert!((region.y - expected_y).abs() < 1e-9, "{:?} not contiguous", region.id);
            assert!((region.width - page.content_width()).abs() < 1e-9);
            expected_y += region.height;
        }
        assert!((expected_y - page.content_height()).abs() < 1e-9);
    }

    #[test]
    fn test_body_takes_remaining_height() {
        let page = PageSpec::letter(); // content height 720
        let layout = partition_regions(&page, &heights(50.0, 30.0, 20.0)).unwrap();
        assert!((layout.body.height - 620.0).abs() < 1e-9);
        assert!((layout.body.y - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_height_regions_are_allowed() {
        let layout = partition_regions(&PageSpec::a4(), &RegionHeights::default()).unwrap();
        assert_eq!(layout.header.height, 0.0);
        assert_eq!(layout.body.y, 0.0);
        assert!((layout.body.height - PageSpec::a4().content_height()).abs() < 1e-9);
    }

    #[test]
    fn test_non_positive_body_is_fatal() {
        let page = PageSpec::letter(); // content height 720
        let err = partition_regions(&page, &heights(400.0, 200.0, 120.0)).unwrap_err();
        match err {
            LayoutError::BodyHeightNotPositive {
                content_height,
                fixed_total,
            } => {
                assert!((content_height - 720.0).abs() < 1e-9);
                assert!((fixed_total - 720.0).abs() < 1e-9);
            }
            other => panic!("expected BodyHeightNotPositive, got {other:?}"),
        }
    }

    #[test]
    fn test_margins_swallowing_page_rejected() {
        let page = PageSpec {
            width: 100.0,
            height: 100.0,
            margins: Margins::uniform(60.0),
        };
        assert!(matches!(
            partition_regions(&page, &RegionHeights::default()),
            Err(LayoutError::InvalidPageSpec(_))
        ));
    }
}
