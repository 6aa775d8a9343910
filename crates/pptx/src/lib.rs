//! PPTX (Office Open XML) backend for composed decks.
//!
//! Writes a [`slides_core::Deck`] as a .pptx package, reads packages back
//! for inspection, and reads templates for their canvas and layouts.

mod opc;
mod parts;
mod xml;

pub mod parser;
pub mod template;
pub mod writer;

pub use parser::{PackageSummary, PictureSummary, PptxParser, SlideSummary};
pub use template::{open_deck, LayoutInfo, Template};
pub use writer::PptxWriter;
