use serde::{Deserialize, Serialize};
use std::fmt;

/// Axis of visual transformation. The set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Style,
    Tone,
    Composition,
    Scene,
    Element,
    Seasonal,
    Text,
}

impl Direction {
    pub const ALL: [Direction; 7] = [
        Direction::Style,
        Direction::Tone,
        Direction::Composition,
        Direction::Scene,
        Direction::Element,
        Direction::Seasonal,
        Direction::Text,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Style => "style",
            Direction::Tone => "tone",
            Direction::Composition => "composition",
            Direction::Scene => "scene",
            Direction::Element => "element",
            Direction::Seasonal => "seasonal",
            Direction::Text => "text",
        }
    }

    pub fn parse(raw: &str) -> Option<Direction> {
        let raw = raw.trim();
        Direction::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(raw))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog-registered transformation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantOption {
    pub id: String,
    pub direction: Direction,
    pub label: String,
    pub description: String,
    pub prompt: String,
    pub icon: String,
}

impl VariantOption {
    pub fn new(
        id: impl Into<String>,
        direction: Direction,
        label: impl Into<String>,
        description: impl Into<String>,
        prompt: impl Into<String>,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            direction,
            label: label.into(),
            description: description.into(),
            prompt: prompt.into(),
            icon: icon.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionMeta {
    pub label: String,
    pub icon: String,
    pub description: String,
}

impl DirectionMeta {
    pub const FALLBACK_ICON: &'static str = "📌";

    /// Metadata for an identifier the catalog does not know.
    pub fn fallback(raw: &str) -> Self {
        Self {
            label: raw.to_string(),
            icon: Self::FALLBACK_ICON.to_string(),
            description: raw.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parse() {
        assert_eq!(Direction::parse("seasonal"), Some(Direction::Seasonal));
        assert_eq!(Direction::parse(" Tone "), Some(Direction::Tone));
        assert_eq!(Direction::parse("lighting"), None);
    }

    #[test]
    fn test_direction_serde_lowercase() {
        let json = serde_json::to_string(&Direction::Composition).unwrap();
        assert_eq!(json, "\"composition\"");
    }
}
