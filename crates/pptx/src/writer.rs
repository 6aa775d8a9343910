//! PPTX package writer.
//!
//! Serializes a [`Deck`] into a PresentationML package: one master, one
//! content layout, a theme, and per slide a title shape, a body shape with
//! one paragraph per bullet, one picture per placed image and, when the
//! slide has notes, a notes slide.

use crate::opc::{
    office_rel, rels_path_for, Relationships, REL_CORE_PROPERTIES, REL_EXTENDED_PROPERTIES,
    REL_OFFICE_DOCUMENT,
};
use crate::parts::{
    app_props_xml, core_props_xml, notes_master_xml, pres_props_xml, slide_layout_xml,
    slide_master_xml, slide_size, table_styles_xml, theme_xml, view_props_xml, xfrm,
    CT_APP_PROPS, CT_CORE_PROPS, CT_NOTES_MASTER, CT_NOTES_SLIDE, CT_PRESENTATION,
    CT_PRES_PROPS, CT_SLIDE, CT_SLIDE_LAYOUT, CT_SLIDE_MASTER, CT_TABLE_STYLES, CT_THEME,
    CT_VIEW_PROPS, GROUP_HEADER, NS_DECL, XML_HEADER,
};
use crate::xml::escape_text;
use chrono::Utc;
use slides_core::{Deck, DeckSink, Error, LayoutConfig, Result, Slide};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::io::{BufWriter, Cursor, Seek, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// First id handed out in `<p:sldIdLst>`.
const FIRST_SLIDE_ID: usize = 256;

/// Notes page size (portrait letter).
const NOTES_SIZE: &str = r#"<p:notesSz cx="6858000" cy="9144000"/>"#;

const LAYOUT_PART: &str = "ppt/slideLayouts/slideLayout1.xml";
const MASTER_PART: &str = "ppt/slideMasters/slideMaster1.xml";
const NOTES_MASTER_PART: &str = "ppt/notesMasters/notesMaster1.xml";
const PRESENTATION_PART: &str = "ppt/presentation.xml";

/// Writer for PPTX (Office Open XML) files.
#[derive(Debug, Clone, Default)]
pub struct PptxWriter {
    /// Layout used for the master and layout placeholders.
    layout: LayoutConfig,
}

impl PptxWriter {
    /// Create a writer with the default layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Position master placeholders with `layout`.
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Serialize `deck` into `writer` and return it.
    pub fn write<W: Write + Seek>(&self, deck: &Deck, writer: W) -> Result<W> {
        let mut package = Package::new(writer);
        let mut types = ContentTypes::new();
        let mut pres_rels = Relationships::new();
        let regions = self.layout.resolve(deck.canvas());

        // Master, content layout and theme.
        let master_rel = pres_rels.add(office_rel("slideMaster"), "slideMasters/slideMaster1.xml");
        let mut master_rels = Relationships::new();
        let layout_rel = master_rels.add(office_rel("slideLayout"), "../slideLayouts/slideLayout1.xml");
        master_rels.add(office_rel("theme"), "../theme/theme1.xml");
        package.add_part(MASTER_PART, &slide_master_xml(&regions, &layout_rel))?;
        package.add_part(&rels_path_for(MASTER_PART), &master_rels.to_xml())?;
        types.add_override(MASTER_PART, CT_SLIDE_MASTER);

        let mut layout_rels = Relationships::new();
        layout_rels.add(office_rel("slideMaster"), "../slideMasters/slideMaster1.xml");
        package.add_part(LAYOUT_PART, &slide_layout_xml(deck.layout_name(), &regions))?;
        package.add_part(&rels_path_for(LAYOUT_PART), &layout_rels.to_xml())?;
        types.add_override(LAYOUT_PART, CT_SLIDE_LAYOUT);

        package.add_part("ppt/theme/theme1.xml", &theme_xml("Office Theme"))?;
        types.add_override("ppt/theme/theme1.xml", CT_THEME);

        // Slides, their media and notes.
        let mut slide_rel_ids = Vec::with_capacity(deck.len());
        let mut media_count = 0usize;
        let mut notes_count = 0usize;

        for (idx, slide) in deck.slides().iter().enumerate() {
            let number = idx + 1;
            let slide_part = format!("ppt/slides/slide{}.xml", number);
            slide_rel_ids.push(pres_rels.add(office_rel("slide"), format!("slides/slide{}.xml", number)));

            let mut slide_rels = Relationships::new();
            slide_rels.add(office_rel("slideLayout"), "../slideLayouts/slideLayout1.xml");

            let mut embeds = Vec::with_capacity(slide.pictures().len());
            for picture in slide.pictures() {
                media_count += 1;
                let name = format!("image{}.{}", media_count, picture.format.extension());
                package.add_media(&format!("ppt/media/{}", name), &picture.data)?;
                types.add_default(picture.format.extension(), picture.format.content_type());
                embeds.push(slide_rels.add(office_rel("image"), format!("../media/{}", name)));
            }

            if let Some(notes) = slide.notes() {
                notes_count += 1;
                let notes_part = format!("ppt/notesSlides/notesSlide{}.xml", number);
                slide_rels.add(
                    office_rel("notesSlide"),
                    format!("../notesSlides/notesSlide{}.xml", number),
                );

                let mut notes_rels = Relationships::new();
                notes_rels.add(office_rel("notesMaster"), "../notesMasters/notesMaster1.xml");
                notes_rels.add(office_rel("slide"), format!("../slides/slide{}.xml", number));
                package.add_part(&notes_part, &notes_slide_xml(notes))?;
                package.add_part(&rels_path_for(&notes_part), &notes_rels.to_xml())?;
                types.add_override(&notes_part, CT_NOTES_SLIDE);
            }

            package.add_part(&slide_part, &slide_xml(slide, &embeds))?;
            package.add_part(&rels_path_for(&slide_part), &slide_rels.to_xml())?;
            types.add_override(&slide_part, CT_SLIDE);
        }

        let notes_master_rel = if notes_count > 0 {
            let rel = pres_rels.add(office_rel("notesMaster"), "notesMasters/notesMaster1.xml");
            let mut rels = Relationships::new();
            rels.add(office_rel("theme"), "../theme/theme2.xml");
            package.add_part(NOTES_MASTER_PART, &notes_master_xml())?;
            package.add_part(&rels_path_for(NOTES_MASTER_PART), &rels.to_xml())?;
            package.add_part("ppt/theme/theme2.xml", &theme_xml("Notes Theme"))?;
            types.add_override(NOTES_MASTER_PART, CT_NOTES_MASTER);
            types.add_override("ppt/theme/theme2.xml", CT_THEME);
            Some(rel)
        } else {
            None
        };

        pres_rels.add(office_rel("theme"), "theme/theme1.xml");
        for (kind, part, xml, content_type) in [
            ("presProps", "presProps.xml", pres_props_xml(), CT_PRES_PROPS),
            ("viewProps", "viewProps.xml", view_props_xml(), CT_VIEW_PROPS),
            ("tableStyles", "tableStyles.xml", table_styles_xml(), CT_TABLE_STYLES),
        ] {
            pres_rels.add(office_rel(kind), part);
            let name = format!("ppt/{}", part);
            package.add_part(&name, &xml)?;
            types.add_override(&name, content_type);
        }

        package.add_part(
            PRESENTATION_PART,
            &presentation_xml(deck, &master_rel, notes_master_rel.as_deref(), &slide_rel_ids),
        )?;
        package.add_part(&rels_path_for(PRESENTATION_PART), &pres_rels.to_xml())?;
        types.add_override(PRESENTATION_PART, CT_PRESENTATION);

        // Document properties and package relationships.
        let title = deck
            .slides()
            .first()
            .map(|s| s.title())
            .unwrap_or("Presentation");
        let created = Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
        package.add_part("docProps/core.xml", &core_props_xml(title, &created))?;
        package.add_part("docProps/app.xml", &app_props_xml(deck.len(), notes_count))?;
        types.add_override("docProps/core.xml", CT_CORE_PROPS);
        types.add_override("docProps/app.xml", CT_APP_PROPS);

        let mut root_rels = Relationships::new();
        root_rels.add(REL_OFFICE_DOCUMENT, PRESENTATION_PART);
        root_rels.add(REL_CORE_PROPERTIES, "docProps/core.xml");
        root_rels.add(REL_EXTENDED_PROPERTIES, "docProps/app.xml");
        package.add_part("_rels/.rels", &root_rels.to_xml())?;
        package.add_part("[Content_Types].xml", &types.to_xml())?;

        log::debug!(
            "Wrote package with {} slides, {} pictures, {} notes",
            deck.len(),
            media_count,
            notes_count
        );
        package.finish()
    }

    /// Serialize `deck` into an in-memory PPTX.
    pub fn to_bytes(&self, deck: &Deck) -> Result<Vec<u8>> {
        Ok(self.write(deck, Cursor::new(Vec::new()))?.into_inner())
    }
}

impl DeckSink for PptxWriter {
    /// Write into a staging file next to `path` and rename it into place,
    /// so a failed export never leaves a truncated package behind.
    fn persist(&self, deck: &Deck, path: &Path) -> Result<()> {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let staging = tempfile::Builder::new()
            .prefix(".autoslides-")
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(|e| Error::persistence(path, e))?;

        let writer = self
            .write(deck, BufWriter::new(staging))
            .map_err(|e| Error::persistence(path, e))?;
        let staging = writer
            .into_inner()
            .map_err(|e| Error::persistence(path, e.error()))?;
        staging
            .persist(path)
            .map_err(|e| Error::persistence(path, e.error))?;

        log::debug!("Persisted deck to {}", path.display());
        Ok(())
    }
}

/// ZIP container being filled part by part.
struct Package<W: Write + Seek> {
    zip: ZipWriter<W>,
}

impl<W: Write + Seek> Package<W> {
    fn new(writer: W) -> Self {
        Self {
            zip: ZipWriter::new(writer),
        }
    }

    /// Add an XML part, deflated.
    fn add_part(&mut self, name: &str, xml: &str) -> Result<()> {
        self.add(name, xml.as_bytes(), CompressionMethod::Deflated)
    }

    /// Add a media part as-is; images are already compressed.
    fn add_media(&mut self, name: &str, data: &[u8]) -> Result<()> {
        self.add(name, data, CompressionMethod::Stored)
    }

    fn add(&mut self, name: &str, data: &[u8], method: CompressionMethod) -> Result<()> {
        let options = FileOptions::default().compression_method(method);
        self.zip
            .start_file(name, options)
            .map_err(|e| Error::ZipError(format!("Failed to start '{}': {}", name, e)))?;
        self.zip.write_all(data)?;
        Ok(())
    }

    fn finish(mut self) -> Result<W> {
        self.zip
            .finish()
            .map_err(|e| Error::ZipError(format!("Failed to finish archive: {}", e)))
    }
}

/// `[Content_Types].xml` builder.
struct ContentTypes {
    defaults: BTreeMap<&'static str, &'static str>,
    overrides: Vec<(String, &'static str)>,
}

impl ContentTypes {
    fn new() -> Self {
        let mut defaults = BTreeMap::new();
        defaults.insert("rels", "application/vnd.openxmlformats-package.relationships+xml");
        defaults.insert("xml", "application/xml");
        Self {
            defaults,
            overrides: Vec::new(),
        }
    }

    fn add_default(&mut self, extension: &'static str, content_type: &'static str) {
        self.defaults.insert(extension, content_type);
    }

    fn add_override(&mut self, part: &str, content_type: &'static str) {
        self.overrides.push((format!("/{}", part), content_type));
    }

    fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(1024 + self.overrides.len() * 128);
        xml.push_str(XML_HEADER);
        xml.push_str(
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
        );
        for (extension, content_type) in &self.defaults {
            let _ = write!(
                xml,
                r#"<Default Extension="{}" ContentType="{}"/>"#,
                extension, content_type
            );
        }
        for (part, content_type) in &self.overrides {
            let _ = write!(
                xml,
                r#"<Override PartName="{}" ContentType="{}"/>"#,
                part, content_type
            );
        }
        xml.push_str("</Types>");
        xml
    }
}

fn presentation_xml(
    deck: &Deck,
    master_rel: &str,
    notes_master_rel: Option<&str>,
    slide_rel_ids: &[String],
) -> String {
    let mut xml = String::with_capacity(1024 + slide_rel_ids.len() * 48);
    xml.push_str(XML_HEADER);
    let _ = write!(xml, r#"<p:presentation {} saveSubsetFonts="1">"#, NS_DECL);

    let _ = write!(
        xml,
        r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="{}"/></p:sldMasterIdLst>"#,
        master_rel
    );
    if let Some(rel) = notes_master_rel {
        let _ = write!(
            xml,
            r#"<p:notesMasterIdLst><p:notesMasterId r:id="{}"/></p:notesMasterIdLst>"#,
            rel
        );
    }
    if !slide_rel_ids.is_empty() {
        xml.push_str("<p:sldIdLst>");
        for (idx, rel) in slide_rel_ids.iter().enumerate() {
            let _ = write!(xml, r#"<p:sldId id="{}" r:id="{}"/>"#, FIRST_SLIDE_ID + idx, rel);
        }
        xml.push_str("</p:sldIdLst>");
    }

    xml.push_str(&slide_size(&deck.canvas()));
    xml.push_str(NOTES_SIZE);
    xml.push_str("</p:presentation>");
    xml
}

/// Font size in hundredths of a point, as DrawingML wants it.
fn font_size_attr(slide: &Slide) -> i64 {
    (slide.bullet_font_size().to_points() * 100.0).round() as i64
}

fn slide_xml(slide: &Slide, embeds: &[String]) -> String {
    let sz = font_size_attr(slide);
    let mut xml = String::with_capacity(2048 + slide.bullets().len() * 128);
    xml.push_str(XML_HEADER);
    let _ = write!(xml, "<p:sld {}><p:cSld><p:spTree>{}", NS_DECL, GROUP_HEADER);

    // Title band, left-aligned; each line is a paragraph.
    let _ = write!(
        xml,
        concat!(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/>"#,
            r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>"#,
            r#"<p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr>"#,
            r#"<p:spPr>{}</p:spPr><p:txBody><a:bodyPr/><a:lstStyle/>"#
        ),
        xfrm(&slide.title_frame())
    );
    for line in slide.title().split('\n') {
        let _ = write!(
            xml,
            r#"<a:p><a:pPr algn="l"/><a:r><a:rPr lang="en-US" dirty="0"/><a:t>{}</a:t></a:r></a:p>"#,
            escape_text(line)
        );
    }
    xml.push_str("</p:txBody></p:sp>");

    // Bullet column: one paragraph per bullet.
    let _ = write!(
        xml,
        concat!(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="3" name="Content Placeholder 2"/>"#,
            r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>"#,
            r#"<p:nvPr><p:ph idx="1"/></p:nvPr></p:nvSpPr>"#,
            r#"<p:spPr>{}</p:spPr><p:txBody><a:bodyPr><a:normAutofit/></a:bodyPr><a:lstStyle/>"#
        ),
        xfrm(&slide.body_frame())
    );
    if slide.bullets().is_empty() {
        let _ = write!(xml, r#"<a:p><a:endParaRPr lang="en-US" sz="{}" dirty="0"/></a:p>"#, sz);
    }
    for bullet in slide.bullets() {
        xml.push_str(r#"<a:p><a:pPr lvl="0"/>"#);
        for (i, line) in bullet.split('\n').enumerate() {
            if i > 0 {
                let _ = write!(xml, r#"<a:br><a:rPr lang="en-US" sz="{}"/></a:br>"#, sz);
            }
            let _ = write!(
                xml,
                r#"<a:r><a:rPr lang="en-US" sz="{}" dirty="0"/><a:t>{}</a:t></a:r>"#,
                sz,
                escape_text(line)
            );
        }
        xml.push_str("</a:p>");
    }
    xml.push_str("</p:txBody></p:sp>");

    // Pictures, stretched to their grid cells.
    for (idx, (picture, embed)) in slide.pictures().iter().zip(embeds).enumerate() {
        let id = 4 + idx;
        let _ = write!(
            xml,
            concat!(
                r#"<p:pic><p:nvPicPr><p:cNvPr id="{id}" name="Picture {n}" descr="{descr}"/>"#,
                r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr>"#,
                r#"<p:blipFill><a:blip r:embed="{embed}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill>"#,
                r#"<p:spPr>{xfrm}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#
            ),
            id = id,
            n = id - 1,
            descr = escape_text(&picture.url),
            embed = embed,
            xfrm = xfrm(&picture.frame),
        );
    }

    xml.push_str("</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>");
    xml
}

fn notes_slide_xml(notes: &str) -> String {
    let mut xml = String::with_capacity(1024 + notes.len());
    xml.push_str(XML_HEADER);
    let _ = write!(
        xml,
        concat!(
            "<p:notes {}><p:cSld><p:spTree>{}",
            r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Slide Image Placeholder 1"/>"#,
            r#"<p:cNvSpPr><a:spLocks noGrp="1" noRot="1" noChangeAspect="1"/></p:cNvSpPr>"#,
            r#"<p:nvPr><p:ph type="sldImg"/></p:nvPr></p:nvSpPr><p:spPr/></p:sp>"#,
            r#"<p:sp><p:nvSpPr><p:cNvPr id="3" name="Notes Placeholder 2"/>"#,
            r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>"#,
            r#"<p:nvPr><p:ph type="body" idx="1"/></p:nvPr></p:nvSpPr><p:spPr/>"#,
            "<p:txBody><a:bodyPr/><a:lstStyle/>"
        ),
        NS_DECL, GROUP_HEADER
    );
    for line in notes.split('\n') {
        let _ = write!(
            xml,
            r#"<a:p><a:r><a:rPr lang="en-US" dirty="0"/><a:t>{}</a:t></a:r></a:p>"#,
            escape_text(line)
        );
    }
    xml.push_str("</p:txBody></p:sp></p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:notes>");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;
    use slides_core::{Canvas, FetchError, ImageFetcher, SlideComposer, SlideContent};

    struct NoImages;

    impl ImageFetcher for NoImages {
        fn fetch(&self, _url: &str) -> std::result::Result<Vec<u8>, FetchError> {
            Err(FetchError::Empty)
        }
    }

    fn deck_with(contents: Vec<SlideContent>) -> Deck {
        let mut deck = Deck::new(Canvas::default());
        let composer = SlideComposer::new(LayoutConfig::default(), &NoImages);
        for content in contents {
            composer.compose(&mut deck, content);
        }
        deck
    }

    #[test]
    fn test_slide_xml_escapes_text() {
        let deck = deck_with(vec![
            SlideContent::new("R&D <2025>").with_bullets(["a \"quoted\" point"])
        ]);
        let xml = slide_xml(&deck.slides()[0], &[]);
        assert!(xml.contains("<a:t>R&amp;D &lt;2025&gt;</a:t>"));
        assert!(xml.contains("<a:t>a &quot;quoted&quot; point</a:t>"));
    }

    #[test]
    fn test_slide_xml_font_size_and_alignment() {
        let deck = deck_with(vec![SlideContent::new("T").with_bullets(["one", "two"])]);
        let xml = slide_xml(&deck.slides()[0], &[]);
        assert_eq!(xml.matches(r#"sz="1800""#).count(), 2);
        assert!(xml.contains(r#"<a:pPr algn="l"/>"#));
        assert!(xml.contains(r#"<p:ph type="title"/>"#));
        assert!(xml.contains(r#"<p:ph idx="1"/>"#));
    }

    #[test]
    fn test_empty_body_has_one_empty_paragraph() {
        let deck = deck_with(vec![SlideContent::new("T")]);
        let xml = slide_xml(&deck.slides()[0], &[]);
        assert!(xml.contains(r#"<a:p><a:endParaRPr lang="en-US" sz="1800" dirty="0"/></a:p>"#));
    }

    #[test]
    fn test_presentation_xml_lists_slides_in_order() {
        let deck = deck_with(vec![SlideContent::new("A"), SlideContent::new("B")]);
        let rels = vec!["rId2".to_string(), "rId3".to_string()];
        let xml = presentation_xml(&deck, "rId1", None, &rels);
        assert!(xml.contains(r#"<p:sldId id="256" r:id="rId2"/><p:sldId id="257" r:id="rId3"/>"#));
        assert!(xml.contains(r#"<p:sldSz cx="9144000" cy="6858000"/>"#));
        assert!(!xml.contains("notesMasterIdLst"));
    }

    #[test]
    fn test_content_types_defaults_are_unique() {
        let mut types = ContentTypes::new();
        types.add_default("png", "image/png");
        types.add_default("png", "image/png");
        types.add_override("ppt/slides/slide1.xml", CT_SLIDE);
        let xml = types.to_xml();
        assert_eq!(xml.matches(r#"Extension="png""#).count(), 1);
        assert!(xml.contains(r#"PartName="/ppt/slides/slide1.xml""#));
    }

    #[test]
    fn test_notes_body_matches_master_placeholder() {
        let body = r#"<p:ph type="body" idx="1"/>"#;
        assert!(notes_slide_xml("x").contains(body));
        assert!(crate::parts::notes_master_xml()
            .contains(r#"<p:ph type="body" sz="quarter" idx="1"/>"#));
    }

    #[test]
    fn test_persist_replaces_existing_file_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.pptx");
        std::fs::write(&path, b"stale").unwrap();

        let deck = deck_with(vec![SlideContent::new("Fresh")]);
        PptxWriter::new().persist(&deck, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"PK"));
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("deck.pptx")]);
    }

    #[test]
    fn test_failed_persist_leaves_target_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.pptx");
        std::fs::create_dir(&path).unwrap();

        let deck = deck_with(vec![SlideContent::new("Blocked")]);
        let err = PptxWriter::new().persist(&deck, &path).unwrap_err();
        assert!(matches!(err, Error::Persistence { .. }));
        assert!(path.is_dir());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_notes_lines_become_paragraphs() {
        let xml = notes_slide_xml("first\nsecond");
        assert_eq!(xml.matches("<a:p>").count(), 2);
        assert!(xml.contains(r#"<p:ph type="body" idx="1"/>"#));
    }
}
