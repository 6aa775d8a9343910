//! Slide composition.

use crate::deck::{Deck, Slide};
use crate::geometry::LayoutConfig;
use crate::grid::{place_images, ImagePlacement, MAX_IMAGES};
use crate::ports::ImageFetcher;

/// Content of one slide before layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlideContent {
    pub title: String,
    pub bullets: Vec<String>,
    /// Image URLs; only the first four are used.
    pub images: Vec<String>,
    pub notes: Option<String>,
}

impl SlideContent {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_bullets<I, S>(mut self, bullets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bullets = bullets.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_images<I, S>(mut self, images: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.images = images.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Lays out slides and appends them to a deck.
pub struct SlideComposer<'a> {
    layout: LayoutConfig,
    fetcher: &'a dyn ImageFetcher,
}

impl<'a> SlideComposer<'a> {
    /// Create a composer; `layout` is expected to be validated already.
    pub fn new(layout: LayoutConfig, fetcher: &'a dyn ImageFetcher) -> Self {
        Self { layout, fetcher }
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Lay out `content` and append it to `deck` as one slide.
    ///
    /// The title goes into the top band, each bullet becomes one paragraph
    /// of the left column, and images fill the right-hand grid. Image
    /// failures only leave their cell empty; the returned report says what
    /// happened to each image.
    pub fn compose(&self, deck: &mut Deck, content: SlideContent) -> Vec<ImagePlacement> {
        let regions = self.layout.resolve(deck.canvas());
        let SlideContent {
            title,
            bullets,
            mut images,
            notes,
        } = content;

        let mut slide = Slide::new(
            title,
            bullets,
            regions.title,
            regions.bullets,
            self.layout.bullet_font_size,
        );

        let placements = if images.is_empty() {
            Vec::new()
        } else {
            if images.len() > MAX_IMAGES {
                log::debug!(
                    "Dropping {} images beyond the first {}",
                    images.len() - MAX_IMAGES,
                    MAX_IMAGES
                );
                images.truncate(MAX_IMAGES);
            }
            place_images(
                &mut slide,
                regions.images,
                &images,
                &self.layout,
                self.fetcher,
            )
        };

        if let Some(notes) = notes.filter(|n| !n.is_empty()) {
            slide.set_notes(notes);
        }

        log::debug!(
            "Composed slide {} '{}' with {} bullets and {} pictures",
            deck.len() + 1,
            slide.title(),
            slide.bullets().len(),
            slide.pictures().len()
        );
        deck.push(slide);

        placements
    }
}
