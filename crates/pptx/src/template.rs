//! Template inspection: canvas size and layout roles of an existing package.

use crate::opc::{main_part, read_part, read_relationships, resolve_target};
use crate::parser::{read_presentation, read_shapes, Role, ShapeKind};
use crate::xml::{attr, local_name, rel_attr};
use quick_xml::events::Event;
use quick_xml::Reader;
use slides_core::{Canvas, Deck, Error, Result, CONTENT_LAYOUT_NAME};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

/// A slide layout declared by the template's first master.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutInfo {
    pub name: String,
    /// Part name inside the package.
    pub part: String,
    pub has_title: bool,
    pub has_body: bool,
}

/// What a template contributes to a new deck.
#[derive(Debug, Clone)]
pub struct Template {
    canvas: Canvas,
    layouts: Vec<LayoutInfo>,
}

impl Template {
    /// Open and inspect the template at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| Error::Template(format!("{}: {}", path.display(), e)))?;
        Self::from_reader(BufReader::new(file))
            .map_err(|e| Error::Template(format!("{}: {}", path.display(), e)))
    }

    /// Inspect a template package from a reader.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive =
            ZipArchive::new(reader).map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let main = main_part(&mut archive)?;
        let presentation = read_presentation(&read_part(&mut archive, &main)?)?;
        let canvas = presentation.canvas.unwrap_or_else(|| {
            log::warn!("Template declares no slide size, using the default canvas");
            Canvas::default()
        });

        let pres_rels = read_relationships(&mut archive, &main)?;
        let master = presentation
            .master_rel_ids
            .first()
            .and_then(|id| pres_rels.iter().find(|r| &r.id == id))
            .or_else(|| pres_rels.iter().find(|r| r.is("slideMaster")))
            .map(|r| resolve_target(&main, &r.target));

        let layouts = match master {
            Some(master) => read_layouts(&mut archive, &master)?,
            None => Vec::new(),
        };

        Ok(Self { canvas, layouts })
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn layouts(&self) -> &[LayoutInfo] {
        &self.layouts
    }

    /// The layout slides should use: the first one declaring both a title
    /// and a body placeholder, else index 1, else index 0.
    pub fn content_layout(&self) -> Option<&LayoutInfo> {
        if let Some(layout) = self.layouts.iter().find(|l| l.has_title && l.has_body) {
            log::debug!("Using layout '{}' for content slides", layout.name);
            return Some(layout);
        }

        let fallback = self.layouts.get(1).or_else(|| self.layouts.first());
        if let Some(layout) = fallback {
            log::warn!(
                "No layout declares title and body placeholders, falling back to '{}'",
                layout.name
            );
        }
        fallback
    }
}

/// Layouts of `master` in `sldLayoutIdLst` order.
fn read_layouts<R: Read + Seek>(archive: &mut ZipArchive<R>, master: &str) -> Result<Vec<LayoutInfo>> {
    let master_xml = read_part(archive, master)?;
    let rels = read_relationships(archive, master)?;

    let mut targets: Vec<String> = read_layout_ids(&master_xml)?
        .iter()
        .filter_map(|id| rels.iter().find(|r| &r.id == id))
        .map(|r| resolve_target(master, &r.target))
        .collect();
    if targets.is_empty() {
        targets = rels
            .iter()
            .filter(|r| r.is("slideLayout"))
            .map(|r| resolve_target(master, &r.target))
            .collect();
    }

    let mut layouts = Vec::with_capacity(targets.len());
    for part in targets {
        let xml = read_part(archive, &part)?;
        let roles: Vec<Role> = read_shapes(&xml)?
            .into_iter()
            .filter(|s| s.kind == ShapeKind::Shape)
            .filter_map(|s| s.role)
            .collect();
        layouts.push(LayoutInfo {
            name: read_layout_name(&xml)?.unwrap_or_default(),
            has_title: roles.contains(&Role::Title),
            has_body: roles.contains(&Role::Body),
            part,
        });
    }
    Ok(layouts)
}

fn read_layout_ids(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut ids = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"sldLayoutId" =>
            {
                ids.extend(rel_attr(e, b"id"));
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlError(format!("Error parsing slide master: {}", e))),
            _ => {}
        }
    }
    Ok(ids)
}

fn read_layout_name(xml: &str) -> Result<Option<String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"cSld" =>
            {
                return Ok(attr(e, b"name"));
            }
            Ok(Event::Eof) => return Ok(None),
            Err(e) => return Err(Error::XmlError(format!("Error parsing slide layout: {}", e))),
            _ => {}
        }
    }
}

/// Start a deck, inheriting the canvas from `template` when it exists.
///
/// A missing template file is not an error: the default canvas is used.
/// A template that exists but cannot be read is.
pub fn open_deck(template: Option<&Path>) -> Result<Deck> {
    let Some(path) = template else {
        return Ok(Deck::new(Canvas::default()));
    };
    if !path.exists() {
        log::warn!("Template {} not found, using the default canvas", path.display());
        return Ok(Deck::new(Canvas::default()));
    }

    let template = Template::open(path)?;
    let name = template
        .content_layout()
        .map(|l| l.name.as_str())
        .filter(|name| !name.is_empty())
        .unwrap_or(CONTENT_LAYOUT_NAME)
        .to_string();
    log::info!(
        "Using template {} ({} x {})",
        path.display(),
        template.canvas().width,
        template.canvas().height
    );
    Ok(Deck::new(template.canvas()).with_layout_name(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(name: &str, has_title: bool, has_body: bool) -> LayoutInfo {
        LayoutInfo {
            name: name.to_string(),
            part: format!("ppt/slideLayouts/{}.xml", name),
            has_title,
            has_body,
        }
    }

    fn template(layouts: Vec<LayoutInfo>) -> Template {
        Template {
            canvas: Canvas::default(),
            layouts,
        }
    }

    #[test]
    fn test_content_layout_by_role() {
        let t = template(vec![
            layout("Title Slide", true, false),
            layout("Section", true, false),
            layout("Two Content", true, true),
        ]);
        assert_eq!(t.content_layout().unwrap().name, "Two Content");
    }

    #[test]
    fn test_content_layout_index_fallback() {
        let t = template(vec![layout("A", true, false), layout("B", false, false)]);
        assert_eq!(t.content_layout().unwrap().name, "B");

        let t = template(vec![layout("Only", false, false)]);
        assert_eq!(t.content_layout().unwrap().name, "Only");

        assert!(template(Vec::new()).content_layout().is_none());
    }

    #[test]
    fn test_read_layout_name() {
        let xml = r#"<p:sldLayout xmlns:p="p"><p:cSld name="Title Only"><p:spTree/></p:cSld></p:sldLayout>"#;
        assert_eq!(read_layout_name(xml).unwrap().as_deref(), Some("Title Only"));
    }

    #[test]
    fn test_open_deck_without_template() {
        let deck = open_deck(None).unwrap();
        assert_eq!(deck.canvas(), Canvas::default());
        assert_eq!(deck.layout_name(), CONTENT_LAYOUT_NAME);
    }

    #[test]
    fn test_open_deck_missing_template_uses_default() {
        let dir = tempfile::tempdir().unwrap();
        let deck = open_deck(Some(&dir.path().join("absent.pptx"))).unwrap();
        assert_eq!(deck.canvas(), Canvas::default());
    }

    #[test]
    fn test_open_deck_unreadable_template_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pptx");
        std::fs::write(&path, b"not a zip").unwrap();
        assert!(matches!(open_deck(Some(&path)), Err(Error::Template(_))));
    }
}
