//! External generative model clients.
//!
//! The orchestrator only knows the [`GenerativeModel`] trait. One client is
//! built per process (see [`connect`]) and shared across batches.

pub mod bedrock;
#[cfg(test)]
pub(crate) mod fake;
pub mod gemini;

use crate::{
    config::{ProviderKind, VariantConfig},
    error::Result,
    models::ImagePayload,
};
use async_trait::async_trait;
use std::sync::Arc;

pub use bedrock::BedrockModel;
pub use gemini::GeminiClient;

/// One content part of a model response.
#[derive(Debug, Clone)]
pub enum ContentPart {
    Text(String),
    InlineImage(ImagePayload),
}

impl ContentPart {
    pub fn as_image(&self) -> Option<&ImagePayload> {
        match self {
            ContentPart::InlineImage(image) if !image.is_empty() => Some(image),
            _ => None,
        }
    }
}

/// Image-to-image request: one reference image plus the instruction prompt.
#[derive(Debug, Clone, Copy)]
pub struct ImageEditRequest<'a> {
    pub prompt: &'a str,
    pub image: &'a ImagePayload,
    pub aspect_ratio: Option<&'a str>,
}

#[async_trait]
pub trait GenerativeModel: Send + Sync {
    fn name(&self) -> &str;

    /// Free-text answer about an image.
    async fn describe(&self, prompt: &str, image: &ImagePayload) -> Result<String>;

    /// Ask for image-bearing output. An empty or text-only answer is not an error here.
    async fn generate(&self, request: ImageEditRequest<'_>) -> Result<Vec<ContentPart>>;
}

/// Build the configured backend once. Missing credentials fail here.
pub async fn connect(config: &VariantConfig) -> Result<Arc<dyn GenerativeModel>> {
    let model: Arc<dyn GenerativeModel> = match config.provider {
        ProviderKind::Gemini => Arc::new(GeminiClient::new(config.gemini.clone())?),
        ProviderKind::Bedrock => Arc::new(BedrockModel::new(config.bedrock.clone()).await?),
    };
    log::info!("🔌 Connected generative model backend: {}", model.name());
    Ok(model)
}
