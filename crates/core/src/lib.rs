//! Core of the deck generator: slide geometry, the image placement grid,
//! slide composition and the deck accumulator.

pub mod composer;
pub mod deck;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod image;
pub mod pipeline;
pub mod ports;
pub mod request;
pub mod script;
pub mod text;
pub mod units;

pub use composer::{SlideComposer, SlideContent};
pub use deck::{Deck, Picture, Slide, CONTENT_LAYOUT_NAME};
pub use error::{Error, Result};
pub use geometry::{resolve, Canvas, LayoutConfig, Region, Regions};
pub use grid::{GridLayout, ImagePlacement, MAX_IMAGES};
pub use image::{FetchError, ImageFormat};
pub use pipeline::{GenerationReport, Generator, SlideReport};
pub use ports::{DeckSink, ImageFetcher, ImageSearch, Orientation, ScriptSource};
pub use request::GenerateRequest;
pub use script::{Script, ScriptSlide};
pub use text::slugify;
pub use units::Length;
