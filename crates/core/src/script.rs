//! The slide script produced by the text-generation model.

use crate::error::{Error, Result};
use crate::text::collapse_whitespace;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Titles and bullets for a whole deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    /// Topic the script was written for.
    pub topic: String,

    /// Slides in presentation order.
    pub slides: Vec<ScriptSlide>,
}

/// Title and bullets of one slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptSlide {
    pub title: String,
    pub bullets: Vec<String>,
}

impl Script {
    /// Parse and validate the model's JSON answer.
    ///
    /// The payload must look like
    /// `{"slides": [{"title": str, "bullets": [str, ...]}, ...]}`.
    /// The first offending field is reported together with the raw
    /// payload. Extra slides beyond `requested` are dropped.
    pub fn from_model_json(topic: &str, raw: &str, requested: usize) -> Result<Self> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| Error::upstream_format("$", format!("invalid JSON: {}", e), raw))?;

        let entries = value
            .get("slides")
            .ok_or_else(|| Error::upstream_format("slides", "missing required key", raw))?
            .as_array()
            .ok_or_else(|| Error::upstream_format("slides", "expected an array", raw))?;

        let mut slides = entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| parse_slide(idx, entry, raw))
            .collect::<Result<Vec<_>>>()?;

        if slides.len() > requested {
            log::debug!(
                "Model returned {} slides, keeping the first {}",
                slides.len(),
                requested
            );
            slides.truncate(requested);
        } else if slides.len() < requested {
            log::warn!(
                "Model returned {} slides, {} were requested",
                slides.len(),
                requested
            );
        }

        Ok(Self {
            topic: topic.to_string(),
            slides,
        })
    }
}

fn parse_slide(idx: usize, entry: &Value, raw: &str) -> Result<ScriptSlide> {
    let field = |name: &str| format!("slides[{}].{}", idx, name);

    if !entry.is_object() {
        return Err(Error::upstream_format(
            format!("slides[{}]", idx),
            "expected an object",
            raw,
        ));
    }

    let title = entry
        .get("title")
        .ok_or_else(|| Error::upstream_format(field("title"), "missing required key", raw))?
        .as_str()
        .ok_or_else(|| Error::upstream_format(field("title"), "expected a string", raw))?;

    let bullets = entry
        .get("bullets")
        .ok_or_else(|| Error::upstream_format(field("bullets"), "missing required key", raw))?
        .as_array()
        .ok_or_else(|| Error::upstream_format(field("bullets"), "expected an array", raw))?;

    let bullets = bullets
        .iter()
        .enumerate()
        .map(|(b, bullet)| {
            bullet.as_str().map(collapse_whitespace).ok_or_else(|| {
                Error::upstream_format(
                    format!("slides[{}].bullets[{}]", idx, b),
                    "expected a string",
                    raw,
                )
            })
        })
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .filter(|b| !b.is_empty())
        .collect();

    Ok(ScriptSlide {
        title: collapse_whitespace(title),
        bullets,
    })
}

/// Prompt asking the model for a script in the expected JSON shape.
pub fn script_prompt(topic: &str, slides: usize, tone: &str) -> String {
    format!(
        "Write a script for a {slides}-slide presentation about '{topic}' \
         in a {tone} tone. Return ONLY a JSON object of the form:\n\
         {{\n  \"slides\": [\n    {{\"title\": str, \"bullets\": [str, ...]}},\n    ...\n  ]\n}}\n\
         No text outside the JSON. No comments."
    )
}
