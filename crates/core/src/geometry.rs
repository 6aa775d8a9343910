//! Slide geometry: canvas, regions and the two-column layout resolver.
//!
//! A slide is split into a title band across the top and, below it, a
//! bullet column on the left and an image region on the right. The split
//! point is `canvas.width * left_column_ratio`; every region is derived
//! from the canvas and the [`LayoutConfig`] and never stored as layout
//! state.

use crate::error::{Error, Result};
use crate::units::Length;
use serde::{Deserialize, Serialize};

/// The fixed-size drawing surface of one deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: Length,
    pub height: Length,
}

impl Canvas {
    pub const fn new(width: Length, height: Length) -> Self {
        Self { width, height }
    }

    /// The whole canvas as a region.
    pub fn bounds(&self) -> Region {
        Region::new(Length::ZERO, Length::ZERO, self.width, self.height)
    }
}

impl Default for Canvas {
    /// 10 in × 7.5 in, the 4:3 size of a blank presentation.
    fn default() -> Self {
        Self::new(Length::from_emu(9_144_000), Length::from_emu(6_858_000))
    }
}

/// A rectangle in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub left: Length,
    pub top: Length,
    pub width: Length,
    pub height: Length,
}

impl Region {
    pub const fn new(left: Length, top: Length, width: Length, height: Length) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> Length {
        self.left + self.width
    }

    pub fn bottom(&self) -> Length {
        self.top + self.height
    }

    /// True if the region has no area.
    pub fn is_empty(&self) -> bool {
        !self.width.is_positive() || !self.height.is_positive()
    }

    /// True if both regions share some area. Touching edges do not count.
    pub fn overlaps(&self, other: &Region) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.left < other.right()
            && other.left < self.right()
            && self.top < other.bottom()
            && other.top < self.bottom()
    }

    /// True if `other` lies entirely inside this region.
    pub fn contains(&self, other: &Region) -> bool {
        other.left >= self.left
            && other.top >= self.top
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

/// The regions of one slide, as computed by [`resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Regions {
    /// Title band above the body.
    pub title: Region,
    /// Left column holding the bullet list.
    pub bullets: Region,
    /// Right column holding the image grid.
    pub images: Region,
}

/// Compute the title band, bullet column and image region for a canvas.
///
/// Both body regions start at `margin_top` and extend to
/// `margin_x` above the bottom edge. Widths that would go negative on a
/// degenerate canvas saturate at zero.
pub fn resolve(
    canvas: Canvas,
    left_column_ratio: f64,
    margin_x: Length,
    margin_top: Length,
) -> Regions {
    let split = canvas.width.scale(left_column_ratio);
    let body_height = (canvas.height - margin_top - margin_x).non_negative();

    let bullets = Region::new(
        margin_x,
        margin_top,
        (split - margin_x * 2).non_negative(),
        body_height,
    );

    let image_left = (split + margin_x).min(canvas.width);
    let images = Region::new(
        image_left,
        margin_top,
        (canvas.width - image_left - margin_x).non_negative(),
        body_height,
    );

    let title = Region::new(
        margin_x,
        margin_x.half(),
        (canvas.width - margin_x * 2).non_negative(),
        (margin_top - margin_x).non_negative(),
    );

    Regions {
        title,
        bullets,
        images,
    }
}

/// Layout parameters shared by every slide of a deck.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Share of the canvas width given to the bullet column.
    pub left_column_ratio: f64,
    /// Horizontal margin; also the bottom margin and twice the grid gutter.
    pub margin_x: Length,
    /// Top of the body regions; the title band sits above it.
    pub margin_top: Length,
    /// Largest width of one image cell.
    pub image_max_width: Length,
    /// Largest height of one image cell.
    pub image_max_height: Length,
    /// Font size of each bullet paragraph.
    pub bullet_font_size: Length,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            left_column_ratio: 0.55,
            margin_x: Length::from_inches(0.4),
            margin_top: Length::from_inches(1.5),
            image_max_width: Length::from_inches(3.5),
            image_max_height: Length::from_inches(3.0),
            bullet_font_size: Length::from_points(18.0),
        }
    }
}

impl LayoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_left_column_ratio(mut self, ratio: f64) -> Self {
        self.left_column_ratio = ratio;
        self
    }

    pub fn with_margins(mut self, margin_x: Length, margin_top: Length) -> Self {
        self.margin_x = margin_x;
        self.margin_top = margin_top;
        self
    }

    pub fn with_image_max(mut self, width: Length, height: Length) -> Self {
        self.image_max_width = width;
        self.image_max_height = height;
        self
    }

    pub fn with_bullet_font_size(mut self, size: Length) -> Self {
        self.bullet_font_size = size;
        self
    }

    /// Gap between neighbouring image cells.
    pub fn gutter(&self) -> Length {
        self.margin_x.half()
    }

    /// Check that the parameters describe a usable two-column layout.
    pub fn validate(&self) -> Result<()> {
        let ratio = self.left_column_ratio;
        if !(ratio > 0.0 && ratio < 1.0) {
            return Err(Error::InvalidArgument(format!(
                "left column ratio must be strictly between 0 and 1, got {}",
                ratio
            )));
        }
        if self.margin_x < Length::ZERO || self.margin_top < Length::ZERO {
            return Err(Error::InvalidArgument(
                "margins must not be negative".to_string(),
            ));
        }
        if !self.image_max_width.is_positive() || !self.image_max_height.is_positive() {
            return Err(Error::InvalidArgument(
                "maximum image size must be positive".to_string(),
            ));
        }
        if !self.bullet_font_size.is_positive() {
            return Err(Error::InvalidArgument(
                "bullet font size must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve the regions of a slide on `canvas`.
    pub fn resolve(&self, canvas: Canvas) -> Regions {
        resolve(canvas, self.left_column_ratio, self.margin_x, self.margin_top)
    }
}
