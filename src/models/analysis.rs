use super::Direction;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialAnalysis {
    pub subject: String,
    pub style: String,
    pub colors: Vec<String>,
    pub mood: String,
    pub suggested_directions: Vec<Direction>,
}

impl MaterialAnalysis {
    pub const UNKNOWN: &'static str = "Unknown";
    pub const DEFAULT_SUGGESTIONS: [Direction; 3] =
        [Direction::Style, Direction::Tone, Direction::Scene];
}

impl Default for MaterialAnalysis {
    fn default() -> Self {
        Self {
            subject: Self::UNKNOWN.to_string(),
            style: Self::UNKNOWN.to_string(),
            colors: Vec::new(),
            mood: Self::UNKNOWN.to_string(),
            suggested_directions: Self::DEFAULT_SUGGESTIONS.to_vec(),
        }
    }
}
