use slides_core::{
    Canvas, Deck, FetchError, GridLayout, ImageFetcher, LayoutConfig, Length, SlideComposer,
    SlideContent,
};
use slides_pptx::{open_deck, PptxParser, PptxWriter, Template};
use std::io::Cursor;

const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0\0\x01\0\0\0\x01";
const JPEG: &[u8] = b"\xff\xd8\xff\xe0\0\x10JFIF\0";

/// Serves PNG bytes, JPEG bytes for URLs ending in `.jpg`, and fails for
/// URLs containing `broken`.
struct FakeFetcher;

impl ImageFetcher for FakeFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        if url.contains("broken") {
            Err(FetchError::Status(404))
        } else if url.ends_with(".jpg") {
            Ok(JPEG.to_vec())
        } else {
            Ok(PNG.to_vec())
        }
    }
}

fn compose(deck: &mut Deck, contents: Vec<SlideContent>) {
    let composer = SlideComposer::new(LayoutConfig::default(), &FakeFetcher);
    for content in contents {
        composer.compose(deck, content);
    }
}

fn round_trip(deck: &Deck) -> slides_pptx::PackageSummary {
    let bytes = PptxWriter::new().to_bytes(deck).unwrap();
    PptxParser::new().parse(Cursor::new(bytes)).unwrap()
}

#[test]
fn slide_count_and_order_survive() {
    for count in 0..=20 {
        let mut deck = Deck::new(Canvas::default());
        compose(
            &mut deck,
            (0..count)
                .map(|i| SlideContent::new(format!("Slide {}", i)))
                .collect(),
        );

        let summary = round_trip(&deck);
        assert_eq!(summary.slides.len(), count);
        for (i, slide) in summary.slides.iter().enumerate() {
            assert_eq!(slide.title, format!("Slide {}", i));
        }
    }
}

#[test]
fn bullets_are_one_paragraph_each() {
    let mut deck = Deck::new(Canvas::default());
    compose(
        &mut deck,
        vec![
            SlideContent::new("Costs & <risks>")
                .with_bullets(["First", "Second \"quoted\"", "Line\nbreak", "crlf\r\nbullet"]),
            SlideContent::new("Empty"),
        ],
    );

    let summary = round_trip(&deck);
    assert_eq!(summary.slides[0].title, "Costs & <risks>");
    assert_eq!(
        summary.slides[0].bullets,
        vec!["First", "Second \"quoted\"", "Line\nbreak", "crlf\r\nbullet"]
    );
    assert!(summary.slides[1].bullets.is_empty());
}

#[test]
fn notes_survive_verbatim() {
    let mut deck = Deck::new(Canvas::default());
    compose(
        &mut deck,
        vec![
            SlideContent::new("With notes").with_notes("abc"),
            SlideContent::new("Without notes"),
            SlideContent::new("Empty notes").with_notes(""),
            SlideContent::new("Multi-line").with_notes("first\nsecond"),
            SlideContent::new("Windows endings").with_notes("line one\r\nline two\r"),
            SlideContent::new("Vertical tab").with_notes("a\u{b}b"),
        ],
    );

    let summary = round_trip(&deck);
    assert_eq!(summary.slides[0].notes.as_deref(), Some("abc"));
    assert_eq!(summary.slides[1].notes, None);
    assert_eq!(summary.slides[2].notes, None);
    assert_eq!(summary.slides[3].notes.as_deref(), Some("first\nsecond"));
    assert_eq!(
        summary.slides[4].notes.as_deref(),
        Some("line one\r\nline two\r")
    );
    // Not representable in XML 1.0.
    assert_eq!(summary.slides[5].notes.as_deref(), Some("ab"));
}

#[test]
fn pictures_sit_in_their_grid_cells() {
    let layout = LayoutConfig::default();
    let mut deck = Deck::new(Canvas::default());
    let urls = [
        "https://img.test/a.png",
        "https://img.test/broken.png",
        "https://img.test/c.jpg",
    ];
    compose(&mut deck, vec![SlideContent::new("Pictures").with_images(urls)]);

    let summary = round_trip(&deck);
    let pictures = &summary.slides[0].pictures;
    assert_eq!(pictures.len(), 2);

    let regions = layout.resolve(Canvas::default());
    let grid = GridLayout::new(regions.images, urls.len(), &layout).unwrap();
    assert_eq!(pictures[0].frame, grid.cell(0));
    assert_eq!(pictures[0].description.as_deref(), Some(urls[0]));
    // The failed image leaves cell 1 empty.
    assert_eq!(pictures[1].frame, grid.cell(2));
    assert_eq!(pictures[1].description.as_deref(), Some(urls[2]));
}

#[test]
fn canvas_is_inherited_from_template() {
    let dir = tempfile::tempdir().unwrap();
    let widescreen = Canvas::new(Length::from_emu(12_192_000), Length::from_emu(6_858_000));

    let mut template_deck = Deck::new(widescreen);
    compose(&mut template_deck, vec![SlideContent::new("Template")]);
    let template_path = dir.path().join("template.pptx");
    std::fs::write(&template_path, PptxWriter::new().to_bytes(&template_deck).unwrap()).unwrap();

    let template = Template::open(&template_path).unwrap();
    assert_eq!(template.canvas(), widescreen);
    let layout = template.content_layout().unwrap();
    assert_eq!(layout.name, "Title and Content");
    assert!(layout.has_title && layout.has_body);

    let mut deck = open_deck(Some(&template_path)).unwrap();
    assert_eq!(deck.canvas(), widescreen);
    compose(&mut deck, vec![SlideContent::new("Wide")]);
    assert_eq!(round_trip(&deck).canvas, widescreen);
}

#[test]
fn export_writes_a_readable_file() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("nested").join("slides");

    let mut deck = Deck::new(Canvas::default());
    compose(
        &mut deck,
        vec![SlideContent::new("Exported")
            .with_bullets(["one"])
            .with_images(["https://img.test/a.png"])],
    );

    let path = deck.export(&PptxWriter::new(), &out_dir, Some("talk")).unwrap();
    assert!(path.is_absolute());
    assert_eq!(path.file_name().unwrap(), "talk.pptx");

    let file = std::fs::File::open(&path).unwrap();
    let summary = PptxParser::new().parse(file).unwrap();
    assert_eq!(summary.slides.len(), 1);
    assert_eq!(summary.slides[0].bullets, vec!["one"]);
    assert_eq!(summary.slides[0].pictures.len(), 1);
}

#[test]
fn unwritable_destination_is_a_persistence_error() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("file");
    std::fs::write(&blocker, b"x").unwrap();

    let deck = Deck::new(Canvas::default());
    let err = deck
        .export(&PptxWriter::new(), &blocker, Some("deck.pptx"))
        .unwrap_err();
    assert!(matches!(err, slides_core::Error::Persistence { .. }));
}
