//! The deck accumulator and the slides it owns.

use crate::error::{Error, Result};
use crate::geometry::{Canvas, Region};
use crate::image::ImageFormat;
use crate::ports::DeckSink;
use crate::units::Length;
use chrono::Local;
use std::path::{Path, PathBuf};

/// Name of the layout that declares a title role and a body role.
pub const CONTENT_LAYOUT_NAME: &str = "Title and Content";

/// Extension given to exported files that have none.
pub const DECK_EXTENSION: &str = "pptx";

/// An ordered sequence of composed slides on a fixed canvas.
///
/// A deck is created once per generation request and only grows by
/// appending slides through [`crate::SlideComposer`]. Slides are exposed
/// by shared reference only, so they cannot change after being appended.
#[derive(Debug, Clone)]
pub struct Deck {
    /// Drawing surface shared by every slide.
    canvas: Canvas,

    /// Name of the layout the slides are built on.
    layout_name: String,

    /// Slides in composition order.
    slides: Vec<Slide>,
}

impl Deck {
    /// Create an empty deck on the given canvas.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            layout_name: CONTENT_LAYOUT_NAME.to_string(),
            slides: Vec::new(),
        }
    }

    /// Use a different name for the content layout.
    pub fn with_layout_name(mut self, name: impl Into<String>) -> Self {
        self.layout_name = name.into();
        self
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn layout_name(&self) -> &str {
        &self.layout_name
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// True if any slide carries speaker notes.
    pub fn has_notes(&self) -> bool {
        self.slides.iter().any(|s| s.notes.is_some())
    }

    /// Total number of placed pictures over all slides.
    pub fn picture_count(&self) -> usize {
        self.slides.iter().map(|s| s.pictures.len()).sum()
    }

    pub(crate) fn push(&mut self, slide: Slide) {
        self.slides.push(slide);
    }

    /// Write the deck to `out_dir` through `sink`.
    ///
    /// `filename` defaults to a timestamped `deck_YYYYMMDD_HHMMSS.pptx`;
    /// a name not already ending in `.pptx` gets it appended. Returns the
    /// absolute path of the written file.
    pub fn export(
        &self,
        sink: &dyn DeckSink,
        out_dir: &Path,
        filename: Option<&str>,
    ) -> Result<PathBuf> {
        std::fs::create_dir_all(out_dir).map_err(|e| Error::persistence(out_dir, e))?;

        let path = out_dir.join(resolve_filename(filename));
        sink.persist(self, &path)?;

        let absolute = std::fs::canonicalize(&path).map_err(|e| Error::persistence(&path, e))?;
        log::info!(
            "Exported {} slides to {}",
            self.slides.len(),
            absolute.display()
        );
        Ok(absolute)
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new(Canvas::default())
    }
}

/// Timestamp-derived file name used when the caller gives none.
pub fn default_filename() -> String {
    format!(
        "deck_{}.{}",
        Local::now().format("%Y%m%d_%H%M%S"),
        DECK_EXTENSION
    )
}

/// True if `name` already ends in `.pptx`, in any case.
fn has_deck_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(DECK_EXTENSION))
}

fn resolve_filename(filename: Option<&str>) -> String {
    match filename.map(str::trim).filter(|f| !f.is_empty()) {
        Some(name) if has_deck_extension(name) => name.to_string(),
        Some(name) => format!("{}.{}", name, DECK_EXTENSION),
        None => default_filename(),
    }
}

/// A single composed slide.
#[derive(Debug, Clone)]
pub struct Slide {
    /// Title text, placed in the title band.
    title: String,

    /// Bullet paragraphs, in input order.
    bullets: Vec<String>,

    /// Pictures that were fetched and placed, in grid order.
    pictures: Vec<Picture>,

    /// Speaker notes, if any.
    notes: Option<String>,

    /// Frame of the title shape.
    title_frame: Region,

    /// Frame of the bullet body shape.
    body_frame: Region,

    /// Font size of each bullet paragraph.
    bullet_font_size: Length,
}

impl Slide {
    pub(crate) fn new(
        title: impl Into<String>,
        bullets: Vec<String>,
        title_frame: Region,
        body_frame: Region,
        bullet_font_size: Length,
    ) -> Self {
        Self {
            title: title.into(),
            bullets,
            pictures: Vec::new(),
            notes: None,
            title_frame,
            body_frame,
            bullet_font_size,
        }
    }

    pub(crate) fn add_picture(&mut self, picture: Picture) {
        self.pictures.push(picture);
    }

    pub(crate) fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = Some(notes.into());
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn bullets(&self) -> &[String] {
        &self.bullets
    }

    pub fn pictures(&self) -> &[Picture] {
        &self.pictures
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn title_frame(&self) -> Region {
        self.title_frame
    }

    pub fn body_frame(&self) -> Region {
        self.body_frame
    }

    pub fn bullet_font_size(&self) -> Length {
        self.bullet_font_size
    }
}

/// An image embedded in a slide.
#[derive(Debug, Clone)]
pub struct Picture {
    /// Where the bytes were fetched from.
    pub url: String,

    /// Row-major index of the grid cell the picture fills.
    pub cell: usize,

    /// The cell rectangle; the image is stretched to fit it.
    pub frame: Region,

    /// Detected container format.
    pub format: ImageFormat,

    /// Raw image bytes.
    pub data: Vec<u8>,
}
