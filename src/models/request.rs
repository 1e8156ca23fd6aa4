use super::{ImagePayload, VariantOption};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVariantsRequest {
    pub image: ImagePayload,
    pub selected_options: Vec<String>,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
}

impl GenerateVariantsRequest {
    pub fn new(image: ImagePayload) -> Self {
        Self {
            image,
            selected_options: Vec::new(),
            quantity: 1,
            aspect_ratio: None,
        }
    }

    pub fn with_option(mut self, option_id: impl Into<String>) -> Self {
        self.selected_options.push(option_id.into());
        self
    }

    pub fn with_options<I, S>(mut self, option_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_options
            .extend(option_ids.into_iter().map(Into::into));
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: impl Into<String>) -> Self {
        self.aspect_ratio = Some(aspect_ratio.into());
        self
    }
}

/// One unit of work: an option and which repeat of it this is.
#[derive(Debug, Clone)]
pub struct GenerationTask {
    pub option: Arc<VariantOption>,
    pub repeat_index: u32,
    /// Index in the flat task list.
    pub position: usize,
}

impl GenerationTask {
    pub fn label(&self) -> String {
        format!("{}#{}", self.option.id, self.repeat_index)
    }
}
