//! Image placement grid.
//!
//! Arranges up to four images row-major in the image region: one column
//! for a single image, two otherwise. A failed download leaves its cell
//! empty; later images keep their own cells.

use crate::deck::{Picture, Slide};
use crate::geometry::{LayoutConfig, Region};
use crate::image::{self, FetchError};
use crate::ports::ImageFetcher;
use crate::units::Length;

/// Most images a slide can hold.
pub const MAX_IMAGES: usize = 4;

/// Cell geometry for a given image count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub columns: usize,
    pub rows: usize,
    pub cell_width: Length,
    pub cell_height: Length,
    gutter: Length,
    origin: Region,
}

impl GridLayout {
    /// Lay out `count` images (capped at [`MAX_IMAGES`]) inside `region`.
    ///
    /// Returns `None` when there is nothing to place.
    pub fn new(region: Region, count: usize, layout: &LayoutConfig) -> Option<Self> {
        let count = count.min(MAX_IMAGES);
        if count == 0 {
            return None;
        }

        let columns = if count == 1 { 1 } else { 2 };
        let rows = count.div_ceil(columns);

        let cell_width = layout
            .image_max_width
            .min(region.width / columns as i64);
        let cell_height = layout
            .image_max_height
            .min(region.height / rows as i64);

        Some(Self {
            columns,
            rows,
            cell_width,
            cell_height,
            gutter: layout.gutter(),
            origin: region,
        })
    }

    /// Number of cells in the grid.
    pub fn capacity(&self) -> usize {
        self.columns * self.rows
    }

    /// Rectangle of the cell at row-major `index`.
    pub fn cell(&self, index: usize) -> Region {
        let column = (index % self.columns) as i64;
        let row = (index / self.columns) as i64;
        Region::new(
            self.origin.left + (self.cell_width + self.gutter) * column,
            self.origin.top + (self.cell_height + self.gutter) * row,
            self.cell_width,
            self.cell_height,
        )
    }
}

/// What happened to one requested image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImagePlacement {
    /// The image was fetched and drawn into `cell`.
    Placed { url: String, cell: Region },
    /// The image could not be used; `cell` was left empty.
    Skipped {
        url: String,
        cell: Region,
        reason: FetchError,
    },
}

impl ImagePlacement {
    pub fn url(&self) -> &str {
        match self {
            Self::Placed { url, .. } | Self::Skipped { url, .. } => url,
        }
    }

    pub fn cell(&self) -> Region {
        match self {
            Self::Placed { cell, .. } | Self::Skipped { cell, .. } => *cell,
        }
    }

    pub fn is_placed(&self) -> bool {
        matches!(self, Self::Placed { .. })
    }
}

/// Fetch each URL and place it into its grid cell on `slide`.
///
/// Best effort: failures are logged and reported as
/// [`ImagePlacement::Skipped`], and the slide is never left unfinished.
pub fn place_images(
    slide: &mut Slide,
    region: Region,
    urls: &[String],
    layout: &LayoutConfig,
    fetcher: &dyn ImageFetcher,
) -> Vec<ImagePlacement> {
    let urls = &urls[..urls.len().min(MAX_IMAGES)];
    let Some(grid) = GridLayout::new(region, urls.len(), layout) else {
        return Vec::new();
    };

    log::debug!(
        "Placing {} images in a {}x{} grid of {} x {} cells",
        urls.len(),
        grid.columns,
        grid.rows,
        grid.cell_width,
        grid.cell_height
    );

    urls.iter()
        .enumerate()
        .map(|(index, url)| {
            let cell = grid.cell(index);
            let fetched = fetcher
                .fetch(url)
                .and_then(|data| image::decode(&data).map(|format| (data, format)));

            match fetched {
                Ok((data, format)) => {
                    slide.add_picture(Picture {
                        url: url.clone(),
                        cell: index,
                        frame: cell,
                        format,
                        data,
                    });
                    ImagePlacement::Placed {
                        url: url.clone(),
                        cell,
                    }
                }
                Err(reason) => {
                    log::warn!("Could not place image {}: {}", url, reason);
                    ImagePlacement::Skipped {
                        url: url.clone(),
                        cell,
                        reason,
                    }
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Canvas;

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    /// Serves PNG bytes for every URL containing "ok".
    struct FakeFetcher;

    impl ImageFetcher for FakeFetcher {
        fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            if url.contains("ok") {
                Ok(PNG.to_vec())
            } else if url.contains("html") {
                Ok(b"<html></html>".to_vec())
            } else {
                Err(FetchError::Status(404))
            }
        }
    }

    fn image_region() -> (Region, LayoutConfig) {
        let layout = LayoutConfig::default();
        (layout.resolve(Canvas::default()).images, layout)
    }

    fn empty_slide() -> Slide {
        let frame = Canvas::default().bounds();
        Slide::new("t", Vec::new(), frame, frame, Length::from_points(18.0))
    }

    fn urls(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_single_image_uses_one_column() {
        let (region, layout) = image_region();
        let grid = GridLayout::new(region, 1, &layout).unwrap();
        assert_eq!((grid.columns, grid.rows), (1, 1));
        assert_eq!(grid.cell_width, layout.image_max_width.min(region.width));
        assert_eq!(grid.cell(0).left, region.left);
        assert_eq!(grid.cell(0).top, region.top);
    }

    #[test]
    fn test_three_images_use_two_by_two() {
        let (region, layout) = image_region();
        let grid = GridLayout::new(region, 3, &layout).unwrap();
        assert_eq!((grid.columns, grid.rows), (2, 2));
        assert_eq!(grid.capacity(), 4);
        assert_eq!(grid.cell_width, layout.image_max_width.min(region.width / 2));
        assert_eq!(grid.cell_height, layout.image_max_height.min(region.height / 2));
    }

    #[test]
    fn test_cells_fill_row_major_with_gutter() {
        let (region, layout) = image_region();
        let grid = GridLayout::new(region, 4, &layout).unwrap();
        let gutter = layout.gutter();

        assert_eq!(grid.cell(1).left, region.left + grid.cell_width + gutter);
        assert_eq!(grid.cell(1).top, region.top);
        assert_eq!(grid.cell(2).left, region.left);
        assert_eq!(grid.cell(2).top, region.top + grid.cell_height + gutter);
        assert_eq!(grid.cell(3).left, grid.cell(1).left);
        assert_eq!(grid.cell(3).top, grid.cell(2).top);
    }

    #[test]
    fn test_count_is_capped() {
        let (region, layout) = image_region();
        assert!(GridLayout::new(region, 0, &layout).is_none());
        assert_eq!(GridLayout::new(region, 9, &layout).unwrap().rows, 2);
    }

    #[test]
    fn test_five_urls_use_first_four() {
        let (region, layout) = image_region();
        let mut slide = empty_slide();
        let placements = place_images(
            &mut slide,
            region,
            &urls(&["ok1", "ok2", "ok3", "ok4", "ok5"]),
            &layout,
            &FakeFetcher,
        );
        assert_eq!(placements.len(), 4);
        assert_eq!(slide.pictures().len(), 4);
        assert!(placements.iter().all(|p| p.url() != "ok5"));
    }

    #[test]
    fn test_three_urls_leave_last_cell_empty() {
        let (region, layout) = image_region();
        let grid = GridLayout::new(region, 3, &layout).unwrap();
        let mut slide = empty_slide();
        place_images(
            &mut slide,
            region,
            &urls(&["ok1", "ok2", "ok3"]),
            &layout,
            &FakeFetcher,
        );

        let frames: Vec<Region> = slide.pictures().iter().map(|p| p.frame).collect();
        assert_eq!(frames, vec![grid.cell(0), grid.cell(1), grid.cell(2)]);
        assert!(!frames.contains(&grid.cell(3)));
    }

    #[test]
    fn test_failed_fetch_does_not_shift_later_images() {
        let (region, layout) = image_region();
        let grid = GridLayout::new(region, 3, &layout).unwrap();
        let mut slide = empty_slide();
        let placements = place_images(
            &mut slide,
            region,
            &urls(&["ok-a", "missing", "ok-c"]),
            &layout,
            &FakeFetcher,
        );

        assert!(placements[0].is_placed());
        assert_eq!(
            placements[1],
            ImagePlacement::Skipped {
                url: "missing".to_string(),
                cell: grid.cell(1),
                reason: FetchError::Status(404),
            }
        );
        assert!(placements[2].is_placed());

        let pictures = slide.pictures();
        assert_eq!(pictures.len(), 2);
        assert_eq!((pictures[0].cell, pictures[0].frame), (0, grid.cell(0)));
        assert_eq!((pictures[1].cell, pictures[1].frame), (2, grid.cell(2)));
    }

    #[test]
    fn test_undecodable_body_is_skipped() {
        let (region, layout) = image_region();
        let mut slide = empty_slide();
        let placements =
            place_images(&mut slide, region, &urls(&["page.html"]), &layout, &FakeFetcher);
        assert!(matches!(
            placements[0],
            ImagePlacement::Skipped {
                reason: FetchError::UnrecognizedFormat,
                ..
            }
        ));
        assert!(slide.pictures().is_empty());
    }
}
