use super::{ContentPart, GenerativeModel, ImageEditRequest};
use crate::{
    config::GeminiConfig,
    error::{Result, VariantError},
    models::ImagePayload,
};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

pub struct GeminiClient {
    client: Client,
    api_key: String,
    api_base: String,
    analysis_model: String,
    image_model: String,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let api_key = config.api_key.ok_or_else(|| {
            VariantError::ConfigError("GEMINI_API_KEY is not configured".into())
        })?;

        let client = Client::builder()
            .build()
            .map_err(|e| VariantError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            analysis_model: config.analysis_model,
            image_model: config.image_model,
        })
    }

    fn endpoint_for_model(&self, model: &str) -> String {
        let model = model.trim();
        let model_path = if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{}", model)
        };
        format!("{}/{}:generateContent", self.api_base, model_path)
    }

    async fn call_generate(&self, model: &str, payload: Value) -> Result<GenerateContentResponse> {
        let response = self
            .client
            .post(self.endpoint_for_model(model))
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(VariantError::ResponseError(format!(
                "Gemini request failed ({}): {}",
                status, error_text
            )));
        }

        let body = response.text().await?;
        log::debug!("Gemini response from {}: {} bytes", model, body.len());
        Ok(serde_json::from_str(&body)?)
    }
}

fn user_content(prompt: &str, image: &ImagePayload) -> Value {
    json!([{
        "role": "user",
        "parts": [
            { "text": prompt },
            {
                "inlineData": {
                    "mimeType": image.mime_type,
                    "data": image.to_base64(),
                }
            }
        ]
    }])
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn describe(&self, prompt: &str, image: &ImagePayload) -> Result<String> {
        log::info!("Analyzing image with model: {}", self.analysis_model);
        let payload = json!({ "contents": user_content(prompt, image) });
        let response = self.call_generate(&self.analysis_model, payload).await?;
        Ok(response.text())
    }

    async fn generate(&self, request: ImageEditRequest<'_>) -> Result<Vec<ContentPart>> {
        let mut generation_config = json!({ "responseModalities": ["TEXT", "IMAGE"] });
        if let Some(aspect_ratio) = request.aspect_ratio {
            generation_config["imageConfig"] = json!({ "aspectRatio": aspect_ratio });
        }
        let payload = json!({
            "contents": user_content(request.prompt, request.image),
            "generationConfig": generation_config,
        });

        log::debug!("Generating variant with model: {}", self.image_model);
        let response = self.call_generate(&self.image_model, payload).await?;
        response.into_parts()
    }
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
    #[serde(rename = "inlineData", alias = "inline_data")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
struct InlineData {
    #[serde(rename = "mimeType", alias = "mime_type")]
    mime_type: Option<String>,
    #[serde(default)]
    data: String,
}

impl GenerateContentResponse {
    fn primary_parts(&self) -> &[Part] {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.as_slice())
            .unwrap_or(&[])
    }

    fn text(&self) -> String {
        self.primary_parts()
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect::<Vec<_>>()
            .join("")
    }

    fn into_parts(self) -> Result<Vec<ContentPart>> {
        let mut out = Vec::new();
        let parts = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts)
            .unwrap_or_default();

        let mut decode_error = None;
        for part in parts {
            if let Some(inline) = part.inline_data.filter(|i| !i.data.is_empty()) {
                match STANDARD.decode(inline.data.as_bytes()) {
                    Ok(data) => {
                        let mime_type = inline.mime_type.unwrap_or_else(|| "image/png".to_string());
                        out.push(ContentPart::InlineImage(ImagePayload::new(mime_type, data)));
                    }
                    Err(e) => {
                        log::warn!("⚠️  Skipping Gemini image part that failed to decode: {}", e);
                        decode_error = Some(e);
                    }
                }
            } else if let Some(text) = part.text {
                out.push(ContentPart::Text(text));
            }
        }

        // Only an error when nothing usable came back.
        let has_image = out.iter().any(|p| p.as_image().is_some());
        match decode_error {
            Some(e) if !has_image => Err(VariantError::ResponseError(format!(
                "Gemini image base64 decode failed: {}",
                e
            ))),
            _ => Ok(out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_fails_fast() {
        let err = GeminiClient::new(GeminiConfig::new()).err().unwrap();
        assert!(matches!(err, VariantError::ConfigError(_)));
    }

    #[test]
    fn test_endpoint_for_model() {
        let client = GeminiClient::new(GeminiConfig::new().with_api_key("k")).unwrap();
        assert_eq!(
            client.endpoint_for_model("models/gemini-x"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-x:generateContent"
        );
        assert!(client.endpoint_for_model("gemini-y").ends_with("/models/gemini-y:generateContent"));
    }

    #[test]
    fn test_response_parts_extract_inline_image() {
        let body = json!({
            "candidates": [{
                "content": { "parts": [
                    { "text": "Here you go" },
                    { "inlineData": { "mimeType": "image/png", "data": "AQID" } }
                ]}
            }]
        });
        let response: GenerateContentResponse = serde_json::from_value(body).unwrap();
        let parts = response.into_parts().unwrap();
        assert_eq!(parts.len(), 2);
        let image = parts[1].as_image().unwrap();
        assert_eq!(image.data, vec![1, 2, 3]);
        assert_eq!(image.mime_type, "image/png");
    }

    #[test]
    fn test_response_snake_case_inline_data() {
        let body = json!({
            "candidates": [{ "content": { "parts": [
                { "inline_data": { "mime_type": "image/jpeg", "data": "AQID" } }
            ]}}]
        });
        let response: GenerateContentResponse = serde_json::from_value(body).unwrap();
        let parts = response.into_parts().unwrap();
        assert_eq!(parts[0].as_image().unwrap().mime_type, "image/jpeg");
    }

    #[test]
    fn test_corrupt_part_does_not_hide_later_image() {
        let body = json!({
            "candidates": [{ "content": { "parts": [
                { "inlineData": { "mimeType": "image/png", "data": "!!!not-base64" } },
                { "inlineData": { "mimeType": "image/png", "data": "AQID" } }
            ]}}]
        });
        let response: GenerateContentResponse = serde_json::from_value(body).unwrap();
        let parts = response.into_parts().unwrap();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].as_image().unwrap().data, vec![1, 2, 3]);
    }

    #[test]
    fn test_only_corrupt_image_is_an_error() {
        let body = json!({
            "candidates": [{ "content": { "parts": [
                { "text": "here" },
                { "inlineData": { "mimeType": "image/png", "data": "!!!not-base64" } }
            ]}}]
        });
        let response: GenerateContentResponse = serde_json::from_value(body).unwrap();
        let err = response.into_parts().unwrap_err();
        assert!(matches!(err, VariantError::ResponseError(_)));
    }

    #[test]
    fn test_text_joins_parts() {
        let body = json!({
            "candidates": [{ "content": { "parts": [ { "text": "{\"a\":" }, { "text": "1}" } ]}}]
        });
        let response: GenerateContentResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.text(), "{\"a\":1}");
        assert!(GenerateContentResponse::default().text().is_empty());
    }
}
