//! Collaborators the generator talks to.
//!
//! The core never performs I/O against external services itself; it calls
//! these traits. `slides-services` provides the HTTP implementations and
//! `slides-pptx` the package writer.

use crate::deck::Deck;
use crate::error::{Error, Result};
use crate::image::FetchError;
use crate::script::Script;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Produces the slide script for a topic.
pub trait ScriptSource {
    /// Generate `slides` slides about `topic` in the given `tone`.
    fn generate_script(&self, topic: &str, slides: usize, tone: &str) -> Result<Script>;
}

/// Finds image URLs for a query.
pub trait ImageSearch {
    /// Return up to `count` URLs; `count` placeholder URLs when the search
    /// has no results at all.
    fn search_images(
        &self,
        query: &str,
        count: usize,
        orientation: Option<Orientation>,
    ) -> Result<Vec<String>>;
}

/// Downloads image bytes.
pub trait ImageFetcher {
    fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, FetchError>;
}

/// Serializes a deck to a file.
pub trait DeckSink {
    fn persist(&self, deck: &Deck, path: &Path) -> Result<()>;
}

/// Requested image orientation for searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Landscape,
    Portrait,
    Squarish,
}

impl Orientation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Landscape => "landscape",
            Self::Portrait => "portrait",
            Self::Squarish => "squarish",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Orientation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "landscape" => Ok(Self::Landscape),
            "portrait" => Ok(Self::Portrait),
            "squarish" | "square" => Ok(Self::Squarish),
            other => Err(Error::InvalidArgument(format!(
                "unknown orientation `{}` (expected landscape, portrait or squarish)",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_parse() {
        assert_eq!("Landscape".parse::<Orientation>().unwrap(), Orientation::Landscape);
        assert_eq!("square".parse::<Orientation>().unwrap(), Orientation::Squarish);
        assert!("diagonal".parse::<Orientation>().is_err());
        assert_eq!(Orientation::Portrait.to_string(), "portrait");
    }
}
