//! Advisory pre-step: describe the source image and suggest directions.
//!
//! Analysis never fails the caller. Anything short of a complete JSON object
//! in the model's answer yields `MaterialAnalysis::default()`.

use crate::{
    models::{Direction, ImagePayload, MaterialAnalysis},
    provider::GenerativeModel,
};
use serde::Deserialize;
use serde_json::Value;

pub const MAX_COLORS: usize = 3;
pub const MAX_SUGGESTIONS: usize = 3;

pub const ANALYSIS_PROMPT: &str = r#"Analyze this marketing material image and provide:
1. Subject: What is the main subject/product in this image?
2. Style: What visual style is this (photography, illustration, 3D, etc.)?
3. Colors: List the 3 main colors used
4. Mood: What emotion/atmosphere does it convey?
5. Suggestions: Which 3 variant directions would work best? Choose from: style, tone, composition, scene, seasonal

Respond in JSON format:
{
  "subject": "description of main subject",
  "style": "current style",
  "colors": ["color1", "color2", "color3"],
  "mood": "emotional atmosphere",
  "suggestedDirections": ["direction1", "direction2", "direction3"]
}"#;

pub async fn analyze(model: &dyn GenerativeModel, image: &ImagePayload) -> MaterialAnalysis {
    let text = match model.describe(ANALYSIS_PROMPT, image).await {
        Ok(text) => text,
        Err(e) => {
            log::warn!("⚠️  Material analysis call failed, using defaults: {}", e);
            return MaterialAnalysis::default();
        }
    };

    parse_analysis(&text).unwrap_or_else(|| {
        log::warn!("⚠️  No usable analysis JSON in model answer, using defaults");
        log::debug!("Analysis answer was: {}", text);
        MaterialAnalysis::default()
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAnalysis {
    subject: String,
    style: String,
    colors: Vec<String>,
    mood: String,
    suggested_directions: Vec<String>,
}

/// Shape the first JSON object in `text` into an analysis. `None` when there is
/// no object or a field is missing or mistyped.
pub fn parse_analysis(text: &str) -> Option<MaterialAnalysis> {
    let value = first_json_object(text)?;
    let raw: RawAnalysis = serde_json::from_value(value).ok()?;

    let colors = raw
        .colors
        .into_iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .take(MAX_COLORS)
        .collect();

    let mut suggested_directions: Vec<Direction> = Vec::new();
    for direction in raw.suggested_directions.iter().filter_map(|d| Direction::parse(d)) {
        if !suggested_directions.contains(&direction) {
            suggested_directions.push(direction);
        }
    }
    suggested_directions.truncate(MAX_SUGGESTIONS);
    if suggested_directions.is_empty() {
        suggested_directions = MaterialAnalysis::DEFAULT_SUGGESTIONS.to_vec();
    }

    Some(MaterialAnalysis {
        subject: raw.subject,
        style: raw.style,
        colors,
        mood: raw.mood,
        suggested_directions,
    })
}

/// First well-formed JSON object embedded in free text.
pub fn first_json_object(text: &str) -> Option<Value> {
    text.match_indices('{').find_map(|(start, _)| {
        let mut stream = serde_json::Deserializer::from_str(&text[start..]).into_iter::<Value>();
        match stream.next() {
            Some(Ok(value @ Value::Object(_))) => Some(value),
            _ => None,
        }
    })
}
