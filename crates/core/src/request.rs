//! A deck generation request and its bounds.

use crate::error::{Error, Result};
use crate::grid::MAX_IMAGES;
use crate::ports::Orientation;
use std::ops::RangeInclusive;

/// Allowed number of slides per deck.
pub const SLIDE_COUNT_RANGE: RangeInclusive<usize> = 1..=20;

/// Allowed number of images per slide.
pub const IMAGES_PER_SLIDE_RANGE: RangeInclusive<usize> = 0..=MAX_IMAGES;

/// Allowed number of URLs in one image search.
pub const IMAGE_SEARCH_RANGE: RangeInclusive<usize> = 1..=50;

/// What to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    /// Topic of the presentation.
    pub topic: String,

    /// Number of slides to ask the model for.
    pub slides: usize,

    /// Tone of the text (neutral, informal, inspiring, ...).
    pub tone: String,

    /// Images searched and placed on each slide.
    pub images_per_slide: usize,

    /// Preferred image orientation.
    pub orientation: Option<Orientation>,
}

impl GenerateRequest {
    /// Create a request with the default counts and tone.
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            slides: 6,
            tone: "neutral".to_string(),
            images_per_slide: 1,
            orientation: None,
        }
    }

    pub fn with_slides(mut self, slides: usize) -> Self {
        self.slides = slides;
        self
    }

    pub fn with_tone(mut self, tone: impl Into<String>) -> Self {
        self.tone = tone.into();
        self
    }

    pub fn with_images_per_slide(mut self, images: usize) -> Self {
        self.images_per_slide = images;
        self
    }

    pub fn with_orientation(mut self, orientation: Option<Orientation>) -> Self {
        self.orientation = orientation;
        self
    }

    /// Reject out-of-range values before any external call is made.
    pub fn validate(&self) -> Result<()> {
        if self.topic.trim().is_empty() {
            return Err(Error::InvalidArgument("topic must not be empty".to_string()));
        }
        check_range("slides", self.slides, &SLIDE_COUNT_RANGE)?;
        check_range("images per slide", self.images_per_slide, &IMAGES_PER_SLIDE_RANGE)?;
        Ok(())
    }
}

/// Fail with [`Error::InvalidArgument`] if `value` is outside `range`.
pub fn check_range(name: &str, value: usize, range: &RangeInclusive<usize>) -> Result<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!(
            "{} must be between {} and {}, got {}",
            name,
            range.start(),
            range.end(),
            value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let request = GenerateRequest::new("Wind energy");
        assert_eq!(request.slides, 6);
        assert_eq!(request.tone, "neutral");
        assert_eq!(request.images_per_slide, 1);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_slide_bounds() {
        assert!(GenerateRequest::new("t").with_slides(0).validate().is_err());
        assert!(GenerateRequest::new("t").with_slides(1).validate().is_ok());
        assert!(GenerateRequest::new("t").with_slides(20).validate().is_ok());
        assert!(GenerateRequest::new("t").with_slides(21).validate().is_err());
    }

    #[test]
    fn test_image_bounds() {
        assert!(GenerateRequest::new("t").with_images_per_slide(0).validate().is_ok());
        assert!(GenerateRequest::new("t").with_images_per_slide(4).validate().is_ok());
        let err = GenerateRequest::new("t")
            .with_images_per_slide(5)
            .validate()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid argument: images per slide must be between 0 and 4, got 5"
        );
    }

    #[test]
    fn test_blank_topic() {
        assert!(matches!(
            GenerateRequest::new("   ").validate(),
            Err(Error::InvalidArgument(_))
        ));
    }
}
