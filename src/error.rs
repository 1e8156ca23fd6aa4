use thiserror::Error;

#[derive(Debug, Error)]
pub enum VariantError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("No valid options selected")]
    NoValidOptions,
    #[error("Response error: {0}")]
    ResponseError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("HTTP error: {0}")]
    HttpError(String),
    #[error("AWS error: {0}")]
    AwsError(String),
    #[error("AWS service error: {0}")]
    AwsServiceError(String),
}

impl VariantError {
    /// True for errors raised while validating a request, before any model call.
    pub fn is_validation(&self) -> bool {
        matches!(self, VariantError::NoValidOptions | VariantError::RequestError(_))
    }
}

impl From<serde_json::Error> for VariantError {
    fn from(err: serde_json::Error) -> Self {
        VariantError::SerializationError(err.to_string())
    }
}

impl From<reqwest::Error> for VariantError {
    fn from(err: reqwest::Error) -> Self {
        VariantError::HttpError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, VariantError>;
