//! End-to-end generation: script, images, slides, export.

use crate::composer::{SlideComposer, SlideContent};
use crate::deck::{Deck, DECK_EXTENSION};
use crate::error::Result;
use crate::geometry::LayoutConfig;
use crate::grid::ImagePlacement;
use crate::ports::{DeckSink, ImageFetcher, ImageSearch, ScriptSource};
use crate::request::GenerateRequest;
use crate::text::slugify;
use std::path::{Path, PathBuf};

/// What one generation run produced.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    /// Absolute path of the exported deck.
    pub path: PathBuf,

    /// One entry per slide, in deck order.
    pub slides: Vec<SlideReport>,
}

impl GenerationReport {
    /// Number of images that could not be placed.
    pub fn skipped_images(&self) -> usize {
        self.slides
            .iter()
            .flat_map(|s| s.placements.iter())
            .filter(|p| !p.is_placed())
            .count()
    }
}

/// Per-slide outcome.
#[derive(Debug, Clone)]
pub struct SlideReport {
    pub title: String,
    pub placements: Vec<ImagePlacement>,
}

/// Runs a request against the external collaborators.
///
/// The generator holds no deck: every call to [`Generator::generate`]
/// works on the deck it is handed, so separate requests never share
/// state.
pub struct Generator<'a> {
    script_source: &'a dyn ScriptSource,
    image_search: &'a dyn ImageSearch,
    fetcher: &'a dyn ImageFetcher,
    sink: &'a dyn DeckSink,
    layout: LayoutConfig,
    out_dir: PathBuf,
    filename: Option<String>,
}

impl<'a> Generator<'a> {
    pub fn new(
        script_source: &'a dyn ScriptSource,
        image_search: &'a dyn ImageSearch,
        fetcher: &'a dyn ImageFetcher,
        sink: &'a dyn DeckSink,
    ) -> Self {
        Self {
            script_source,
            image_search,
            fetcher,
            sink,
            layout: LayoutConfig::default(),
            out_dir: PathBuf::from("slides"),
            filename: None,
        }
    }

    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_out_dir(mut self, out_dir: impl Into<PathBuf>) -> Self {
        self.out_dir = out_dir.into();
        self
    }

    /// Export under `filename` instead of the topic slug.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Generate a deck for `request` into `deck` and export it.
    ///
    /// The request and layout are validated before any external call. The
    /// file is named after the topic slug unless a filename was set.
    pub fn generate(&self, request: &GenerateRequest, mut deck: Deck) -> Result<GenerationReport> {
        request.validate()?;
        self.layout.validate()?;

        let script = self
            .script_source
            .generate_script(&request.topic, request.slides, &request.tone)?;
        log::info!(
            "Script for '{}' has {} slides",
            script.topic,
            script.slides.len()
        );

        let composer = SlideComposer::new(self.layout, self.fetcher);
        let mut reports = Vec::with_capacity(script.slides.len());

        for entry in script.slides {
            let images = if request.images_per_slide > 0 {
                self.image_search.search_images(
                    &entry.title,
                    request.images_per_slide,
                    request.orientation,
                )?
            } else {
                Vec::new()
            };

            let content = SlideContent::new(entry.title.clone())
                .with_bullets(entry.bullets)
                .with_images(images);
            let placements = composer.compose(&mut deck, content);

            reports.push(SlideReport {
                title: entry.title,
                placements,
            });
        }

        let filename = self
            .filename
            .clone()
            .unwrap_or_else(|| format!("{}.{}", slugify(&request.topic), DECK_EXTENSION));
        let path = deck.export(self.sink, &self.out_dir, Some(&filename))?;

        Ok(GenerationReport {
            path,
            slides: reports,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::image::FetchError;
    use crate::ports::Orientation;
    use crate::script::{Script, ScriptSlide};
    use std::cell::{Cell, RefCell};

    struct FakeScripts {
        calls: Cell<usize>,
    }

    impl ScriptSource for FakeScripts {
        fn generate_script(&self, topic: &str, slides: usize, _tone: &str) -> Result<Script> {
            self.calls.set(self.calls.get() + 1);
            Ok(Script {
                topic: topic.to_string(),
                slides: (0..slides)
                    .map(|i| ScriptSlide {
                        title: format!("Slide {}", i),
                        bullets: vec![format!("Point {}", i)],
                    })
                    .collect(),
            })
        }
    }

    struct FakeSearch {
        queries: RefCell<Vec<(String, usize)>>,
    }

    impl ImageSearch for FakeSearch {
        fn search_images(
            &self,
            query: &str,
            count: usize,
            _orientation: Option<Orientation>,
        ) -> Result<Vec<String>> {
            self.queries.borrow_mut().push((query.to_string(), count));
            Ok((0..count).map(|i| format!("https://img/{}/{}", query, i)).collect())
        }
    }

    struct FakeFetcher;

    impl ImageFetcher for FakeFetcher {
        fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, FetchError> {
            if url.ends_with("/1") {
                Err(FetchError::Status(500))
            } else {
                Ok(b"GIF89a-data".to_vec())
            }
        }
    }

    /// Writes one line per slide: title and picture count.
    struct TextSink;

    impl DeckSink for TextSink {
        fn persist(&self, deck: &Deck, path: &Path) -> Result<()> {
            let lines: Vec<String> = deck
                .slides()
                .iter()
                .map(|s| format!("{} {}", s.title(), s.pictures().len()))
                .collect();
            std::fs::write(path, lines.join("\n")).map_err(|e| Error::persistence(path, e))
        }
    }

    fn fakes() -> (FakeScripts, FakeSearch) {
        (
            FakeScripts {
                calls: Cell::new(0),
            },
            FakeSearch {
                queries: RefCell::new(Vec::new()),
            },
        )
    }

    #[test]
    fn test_generate_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let (scripts, search) = fakes();
        let generator =
            Generator::new(&scripts, &search, &FakeFetcher, &TextSink).with_out_dir(dir.path());

        let request = GenerateRequest::new("Energía eólica")
            .with_slides(3)
            .with_images_per_slide(2);
        let report = generator.generate(&request, Deck::default()).unwrap();

        assert!(report.path.ends_with("energia-eolica.pptx"));
        assert_eq!(report.slides.len(), 3);
        assert_eq!(report.skipped_images(), 3);
        assert_eq!(
            std::fs::read_to_string(&report.path).unwrap(),
            "Slide 0 1\nSlide 1 1\nSlide 2 1"
        );
        assert_eq!(search.queries.borrow()[2], ("Slide 2".to_string(), 2));
    }

    #[test]
    fn test_no_image_search_when_zero_images() {
        let dir = tempfile::tempdir().unwrap();
        let (scripts, search) = fakes();
        let generator =
            Generator::new(&scripts, &search, &FakeFetcher, &TextSink).with_out_dir(dir.path());

        let request = GenerateRequest::new("Topic").with_images_per_slide(0);
        let report = generator.generate(&request, Deck::default()).unwrap();

        assert_eq!(report.slides.len(), 6);
        assert!(search.queries.borrow().is_empty());
        assert_eq!(report.skipped_images(), 0);
    }

    #[test]
    fn test_invalid_request_makes_no_calls() {
        let dir = tempfile::tempdir().unwrap();
        let (scripts, search) = fakes();
        let generator =
            Generator::new(&scripts, &search, &FakeFetcher, &TextSink).with_out_dir(dir.path());

        let request = GenerateRequest::new("Topic").with_slides(25);
        let err = generator.generate(&request, Deck::default()).unwrap_err();

        assert!(matches!(err, Error::InvalidArgument(_)));
        assert_eq!(scripts.calls.get(), 0);
        assert!(search.queries.borrow().is_empty());
    }

    #[test]
    fn test_explicit_filename() {
        let dir = tempfile::tempdir().unwrap();
        let (scripts, search) = fakes();
        let generator = Generator::new(&scripts, &search, &FakeFetcher, &TextSink)
            .with_out_dir(dir.path())
            .with_filename("quarterly");

        let report = generator
            .generate(&GenerateRequest::new("Topic").with_slides(1), Deck::default())
            .unwrap();
        assert!(report.path.ends_with("quarterly.pptx"));
    }

    #[test]
    fn test_invalid_layout_is_rejected() {
        let (scripts, search) = fakes();
        let generator = Generator::new(&scripts, &search, &FakeFetcher, &TextSink)
            .with_layout(LayoutConfig::default().with_left_column_ratio(1.2));

        let err = generator
            .generate(&GenerateRequest::new("Topic"), Deck::default())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert_eq!(scripts.calls.get(), 0);
    }
}
