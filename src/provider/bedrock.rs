use super::{ContentPart, GenerativeModel, ImageEditRequest};
use crate::{
    config::BedrockConfig,
    error::{Result, VariantError},
    models::ImagePayload,
};
use async_trait::async_trait;
use aws_sdk_bedrockruntime::{
    error::{ProvideErrorMetadata, SdkError},
    operation::invoke_model::InvokeModelError,
    config::ProvideCredentials,
    primitives::Blob,
    Client,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Clone)]
pub struct BedrockModel {
    client: Client,
    analysis_model: String,
    image_model: String,
}

impl BedrockModel {
    pub async fn new(config: BedrockConfig) -> Result<Self> {
        let region = aws_sdk_bedrockruntime::config::Region::new(
            config
                .region
                .clone()
                .unwrap_or_else(|| "us-east-1".to_string()),
        );

        let aws_config = if let (Some(access_key), Some(secret_key)) =
            (&config.access_key, &config.secret_key)
        {
            aws_config::from_env()
                .credentials_provider(aws_sdk_bedrockruntime::config::Credentials::new(
                    access_key,
                    secret_key,
                    None,
                    None,
                    "rvariant",
                ))
                .region(region)
                .load()
                .await
        } else {
            aws_config::from_env().region(region).load().await
        };

        let credentials = aws_config.credentials_provider().ok_or_else(|| {
            VariantError::ConfigError("No AWS credentials provider configured for Bedrock".into())
        })?;
        credentials.provide_credentials().await.map_err(|e| {
            VariantError::ConfigError(format!("No AWS credentials available for Bedrock: {}", e))
        })?;

        Ok(Self {
            client: Client::new(&aws_config),
            analysis_model: config.analysis_model,
            image_model: config.image_model,
        })
    }

    async fn invoke_json(&self, model_id: &str, payload: &Value) -> Result<Value> {
        let request_json = serde_json::to_string(payload)?;

        let response = self
            .client
            .invoke_model()
            .model_id(model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(request_json.into_bytes()))
            .send()
            .await
            .map_err(map_sdk_error)?;

        let response_bytes = response.body.into_inner();
        Ok(serde_json::from_slice(&response_bytes)?)
    }
}

fn map_sdk_error(e: SdkError<InvokeModelError>) -> VariantError {
    if let Some(service_error) = e.as_service_error() {
        log::debug!("Bedrock service error code: {:?}", service_error.code());
        VariantError::AwsServiceError(format!(
            "Bedrock service error: {} - {}",
            service_error.code().unwrap_or("unknown"),
            service_error.message().unwrap_or("no message")
        ))
    } else {
        VariantError::AwsError(format!("AWS SDK error: {}", e))
    }
}

/// Output size for an aspect ratio hint. Nova Canvas wants multiples of 16.
pub fn dimensions_for_aspect_ratio(aspect_ratio: Option<&str>) -> (u32, u32) {
    match aspect_ratio.map(str::trim) {
        Some("16:9") => (1280, 720),
        Some("9:16") => (720, 1280),
        Some("4:3") => (1152, 864),
        Some("3:4") => (864, 1152),
        Some("3:2") => (1152, 768),
        Some("2:3") => (768, 1152),
        Some("1:1") | None => (1024, 1024),
        Some(other) => {
            log::debug!("Unsupported aspect ratio {:?}, using 1:1", other);
            (1024, 1024)
        }
    }
}

#[derive(Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<AnthropicBlock>,
}

#[derive(Deserialize)]
struct AnthropicBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct CanvasResponse {
    #[serde(default)]
    images: Vec<String>,
    error: Option<String>,
}

fn anthropic_text(response: AnthropicResponse) -> String {
    response
        .content
        .into_iter()
        .filter(|block| block.kind == "text")
        .map(|block| block.text)
        .collect::<Vec<_>>()
        .join("")
}

fn canvas_parts(response: CanvasResponse) -> Result<Vec<ContentPart>> {
    if let Some(error) = response.error.filter(|e| !e.is_empty()) {
        return Err(VariantError::ResponseError(format!("Nova Canvas error: {}", error)));
    }

    let mut parts = Vec::new();
    let mut decode_error = None;
    for encoded in response.images.iter().filter(|i| !i.is_empty()) {
        match STANDARD.decode(encoded.as_bytes()) {
            Ok(data) => parts.push(ContentPart::InlineImage(ImagePayload::new("image/png", data))),
            Err(e) => {
                log::warn!("⚠️  Skipping Nova Canvas image that failed to decode: {}", e);
                decode_error = Some(e);
            }
        }
    }

    match decode_error {
        Some(e) if parts.is_empty() => Err(VariantError::ResponseError(format!(
            "Nova Canvas image base64 decode failed: {}",
            e
        ))),
        _ => Ok(parts),
    }
}

#[async_trait]
impl GenerativeModel for BedrockModel {
    fn name(&self) -> &str {
        "bedrock"
    }

    async fn describe(&self, prompt: &str, image: &ImagePayload) -> Result<String> {
        let payload = json!({
            "anthropic_version": "bedrock-2023-05-31",
            "max_tokens": 1024,
            "messages": [{
                "role": "user",
                "content": [
                    {
                        "type": "image",
                        "source": {
                            "type": "base64",
                            "media_type": image.mime_type,
                            "data": image.to_base64(),
                        }
                    },
                    { "type": "text", "text": prompt }
                ]
            }]
        });

        log::info!("Analyzing image with model: {}", self.analysis_model);
        let value = self.invoke_json(&self.analysis_model, &payload).await?;
        let response: AnthropicResponse = serde_json::from_value(value)?;
        Ok(anthropic_text(response))
    }

    async fn generate(&self, request: ImageEditRequest<'_>) -> Result<Vec<ContentPart>> {
        let (width, height) = dimensions_for_aspect_ratio(request.aspect_ratio);
        let payload = json!({
            "taskType": "IMAGE_VARIATION",
            "imageVariationParams": {
                "text": request.prompt,
                "images": [request.image.to_base64()],
                "similarityStrength": 0.7
            },
            "imageGenerationConfig": {
                "numberOfImages": 1,
                "width": width,
                "height": height,
                "quality": "standard",
                "cfgScale": 8.0
            }
        });

        log::debug!("Generating variant with model: {}", self.image_model);
        let value = self.invoke_json(&self.image_model, &payload).await?;
        let response: CanvasResponse = serde_json::from_value(value)?;
        canvas_parts(response)
    }
}
