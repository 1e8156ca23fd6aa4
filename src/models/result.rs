use super::ImagePayload;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantResult {
    pub id: String,
    pub option_id: String,
    pub option_label: String,
    pub image: ImagePayload,
    pub prompt: String,
}

/// Image produced for one task, with the prompt that produced it.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub image: ImagePayload,
    pub prompt: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The model answered but no part carried an image.
    NoImage,
    /// Network, HTTP or decoding failure.
    Transport,
    Timeout,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFailure {
    pub kind: FailureKind,
    pub reason: String,
}

impl TaskFailure {
    pub fn new(kind: FailureKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }
}

pub type TaskOutcome = std::result::Result<GeneratedImage, TaskFailure>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedTask {
    pub option_id: String,
    pub repeat_index: u32,
    pub kind: FailureKind,
    pub reason: String,
}

/// Everything a batch produced, including which tasks failed and why.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub results: Vec<VariantResult>,
    pub failures: Vec<FailedTask>,
    pub requested: usize,
}

impl BatchReport {
    pub fn is_total_failure(&self) -> bool {
        self.requested > 0 && self.results.is_empty()
    }

    pub fn was_cancelled(&self) -> bool {
        self.failures
            .iter()
            .any(|f| f.kind == FailureKind::Cancelled)
    }

    pub fn into_results(self) -> Vec<VariantResult> {
        self.results
    }
}
