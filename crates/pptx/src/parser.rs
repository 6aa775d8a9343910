//! PPTX package reader.
//!
//! Reads back what a deck looks like once persisted: the canvas size, and per
//! slide in presentation order the title text, the bullet paragraphs, the
//! picture frames and the speaker notes.

use crate::opc::{main_part, read_part, read_relationships, resolve_target, Relationship};
use crate::xml::{attr, int_attr, local_name, rel_attr};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;
use slides_core::{Canvas, Error, Length, Region, Result};
use std::collections::HashMap;
use std::io::{Read, Seek};
use zip::ZipArchive;

/// Contents of a PPTX package as seen by a reader.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageSummary {
    pub canvas: Canvas,
    pub slides: Vec<SlideSummary>,
}

/// One slide of a [`PackageSummary`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SlideSummary {
    /// Title placeholder text, lines joined with `\n`.
    pub title: String,
    /// Body placeholder paragraphs that carry text runs.
    pub bullets: Vec<String>,
    pub pictures: Vec<PictureSummary>,
    pub notes: Option<String>,
}

/// A picture shape: where it sits and its alt text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PictureSummary {
    pub frame: Region,
    pub description: Option<String>,
}

/// Parser for PPTX (Office Open XML) files.
pub struct PptxParser;

impl PptxParser {
    /// Create a new PPTX parser.
    pub fn new() -> Self {
        Self
    }

    /// Parse a PPTX file from a reader.
    pub fn parse<R: Read + Seek>(&self, reader: R) -> Result<PackageSummary> {
        let mut archive =
            ZipArchive::new(reader).map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let main = main_part(&mut archive)?;
        let presentation = read_presentation(&read_part(&mut archive, &main)?)?;
        let rels = read_relationships(&mut archive, &main)?;

        let slide_order = self.slide_order(&main, &presentation, &rels);
        log::debug!("Package has {} slides", slide_order.len());

        let mut slides = Vec::with_capacity(slide_order.len());
        for slide_path in &slide_order {
            slides.push(self.parse_slide(&mut archive, slide_path)?);
        }

        Ok(PackageSummary {
            canvas: presentation.canvas.unwrap_or_default(),
            slides,
        })
    }

    /// Slide part paths in presentation order.
    ///
    /// `<p:sldIdLst>` is authoritative; packages without one fall back to
    /// the number embedded in the relationship id or target.
    fn slide_order(
        &self,
        main: &str,
        presentation: &PresentationPart,
        rels: &[Relationship],
    ) -> Vec<String> {
        let by_id: HashMap<&str, &Relationship> = rels.iter().map(|r| (r.id.as_str(), r)).collect();

        let listed: Vec<String> = presentation
            .slide_rel_ids
            .iter()
            .filter_map(|id| by_id.get(id.as_str()))
            .filter(|r| r.is("slide"))
            .map(|r| resolve_target(main, &r.target))
            .collect();
        if !listed.is_empty() {
            return listed;
        }

        let mut slides: Vec<(String, Option<usize>)> = rels
            .iter()
            .filter(|r| r.is("slide"))
            .map(|r| {
                let order = extract_slide_number(&r.target).or_else(|| extract_slide_number(&r.id));
                (resolve_target(main, &r.target), order)
            })
            .collect();
        slides.sort_by(|a, b| match (a.1, b.1) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.0.cmp(&b.0),
        });
        slides.into_iter().map(|(path, _)| path).collect()
    }

    /// Parse a single slide and its notes from the archive.
    fn parse_slide<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        slide_path: &str,
    ) -> Result<SlideSummary> {
        let content = read_part(archive, slide_path)?;
        let mut slide = SlideSummary::default();

        for shape in read_shapes(&content)? {
            match (shape.kind, shape.role) {
                (ShapeKind::Picture, _) => slide.pictures.push(PictureSummary {
                    frame: shape.frame(),
                    description: shape.description,
                }),
                (ShapeKind::Shape, Some(Role::Title)) if slide.title.is_empty() => {
                    slide.title = shape.text();
                }
                (ShapeKind::Shape, Some(Role::Body)) => {
                    slide.bullets.extend(shape.paragraphs_with_runs());
                }
                _ => {}
            }
        }

        let notes_rel = read_relationships(archive, slide_path)?
            .into_iter()
            .find(|r| r.is("notesSlide"));
        if let Some(rel) = notes_rel {
            let notes_path = resolve_target(slide_path, &rel.target);
            let notes_xml = read_part(archive, &notes_path)?;
            let text = read_shapes(&notes_xml)?
                .into_iter()
                .filter(|s| s.role == Some(Role::Body))
                .flat_map(|s| s.paragraphs_with_runs())
                .collect::<Vec<_>>()
                .join("\n");
            if !text.is_empty() {
                slide.notes = Some(text);
            }
        }

        Ok(slide)
    }
}

impl Default for PptxParser {
    fn default() -> Self {
        Self::new()
    }
}

/// What `ppt/presentation.xml` says about the deck.
#[derive(Debug, Default)]
pub(crate) struct PresentationPart {
    pub canvas: Option<Canvas>,
    pub slide_rel_ids: Vec<String>,
    pub master_rel_ids: Vec<String>,
}

pub(crate) fn read_presentation(xml: &str) -> Result<PresentationPart> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut part = PresentationPart::default();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                b"sldSz" => {
                    if let (Some(cx), Some(cy)) = (int_attr(e, b"cx"), int_attr(e, b"cy")) {
                        part.canvas = Some(Canvas::new(Length::from_emu(cx), Length::from_emu(cy)));
                    }
                }
                b"sldId" => part.slide_rel_ids.extend(rel_attr(e, b"id")),
                b"sldMasterId" => part.master_rel_ids.extend(rel_attr(e, b"id")),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!("Error parsing presentation: {}", e)));
            }
            _ => {}
        }
    }

    Ok(part)
}

/// Placeholder role of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Role {
    Title,
    Body,
    Other,
}

impl Role {
    /// Role from a `<p:ph>` element; a missing `type` means an object
    /// placeholder, which takes body text.
    fn from_placeholder(e: &BytesStart<'_>) -> Self {
        match attr(e, b"type").as_deref() {
            Some("title") | Some("ctrTitle") => Role::Title,
            Some("body") | Some("obj") | None => Role::Body,
            Some(_) => Role::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ShapeKind {
    Shape,
    Picture,
}

#[derive(Debug, Default)]
struct Paragraph {
    text: String,
    has_run: bool,
}

/// A `<p:sp>` or `<p:pic>` with what the reader cares about.
#[derive(Debug)]
pub(crate) struct ShapeInfo {
    pub kind: ShapeKind,
    pub role: Option<Role>,
    description: Option<String>,
    offset: (i64, i64),
    extent: (i64, i64),
    paragraphs: Vec<Paragraph>,
}

impl ShapeInfo {
    fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            role: None,
            description: None,
            offset: (0, 0),
            extent: (0, 0),
            paragraphs: Vec::new(),
        }
    }

    fn frame(&self) -> Region {
        Region::new(
            Length::from_emu(self.offset.0),
            Length::from_emu(self.offset.1),
            Length::from_emu(self.extent.0),
            Length::from_emu(self.extent.1),
        )
    }

    /// All paragraphs joined with `\n`.
    fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Paragraphs holding at least one run; empty placeholder paragraphs
    /// are dropped.
    fn paragraphs_with_runs(&self) -> Vec<String> {
        self.paragraphs
            .iter()
            .filter(|p| p.has_run)
            .map(|p| p.text.clone())
            .collect()
    }
}

/// Collect the top-level shapes of a slide, layout or notes part.
pub(crate) fn read_shapes(xml: &str) -> Result<Vec<ShapeInfo>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut shapes = Vec::new();
    let mut current: Option<ShapeInfo> = None;
    let mut in_xfrm = false;
    let mut in_text_body = false;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                b"sp" => current = Some(ShapeInfo::new(ShapeKind::Shape)),
                b"pic" => current = Some(ShapeInfo::new(ShapeKind::Picture)),
                b"xfrm" => in_xfrm = true,
                b"txBody" => in_text_body = true,
                b"p" if in_text_body => {
                    if let Some(shape) = current.as_mut() {
                        shape.paragraphs.push(Paragraph::default());
                    }
                }
                b"t" if in_text_body => in_text = true,
                name => on_empty_or_start(current.as_mut(), name, e, in_xfrm, in_text_body),
            },
            Ok(Event::Empty(ref e)) => {
                let qname = e.name();
                let name = local_name(qname.as_ref());
                if name == b"p" && in_text_body {
                    if let Some(shape) = current.as_mut() {
                        shape.paragraphs.push(Paragraph::default());
                    }
                } else {
                    on_empty_or_start(current.as_mut(), name, e, in_xfrm, in_text_body);
                }
            }
            Ok(Event::Text(ref e)) if in_text => {
                let text = e
                    .unescape()
                    .map_err(|e| Error::XmlError(format!("Error decoding text: {}", e)))?;
                if let Some(p) = current.as_mut().and_then(|s| s.paragraphs.last_mut()) {
                    p.text.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                b"sp" | b"pic" => {
                    shapes.extend(current.take());
                    in_xfrm = false;
                    in_text_body = false;
                    in_text = false;
                }
                b"xfrm" => in_xfrm = false,
                b"txBody" => in_text_body = false,
                b"t" => in_text = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!("Error parsing shapes: {}", e)));
            }
            _ => {}
        }
    }

    Ok(shapes)
}

/// Elements that may appear either empty or with children.
fn on_empty_or_start(
    shape: Option<&mut ShapeInfo>,
    name: &[u8],
    e: &BytesStart<'_>,
    in_xfrm: bool,
    in_text_body: bool,
) {
    let Some(shape) = shape else {
        return;
    };
    match name {
        b"ph" => shape.role = Some(Role::from_placeholder(e)),
        b"cNvPr" => shape.description = attr(e, b"descr"),
        b"off" if in_xfrm => {
            shape.offset = (int_attr(e, b"x").unwrap_or(0), int_attr(e, b"y").unwrap_or(0));
        }
        b"ext" if in_xfrm => {
            shape.extent = (int_attr(e, b"cx").unwrap_or(0), int_attr(e, b"cy").unwrap_or(0));
        }
        b"r" if in_text_body => {
            if let Some(p) = shape.paragraphs.last_mut() {
                p.has_run = true;
            }
        }
        b"br" if in_text_body => {
            if let Some(p) = shape.paragraphs.last_mut() {
                p.text.push('\n');
            }
        }
        _ => {}
    }
}

/// Extract a slide number from a string like "rId2" or "slide3.xml".
fn extract_slide_number(s: &str) -> Option<usize> {
    let s = s.trim_end_matches(".xml").trim_end_matches(".rels");

    let digits: String = s.chars().rev().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let digits: String = digits.chars().rev().collect();
    digits.parse().ok()
}
