use std::env;
use std::time::Duration;

pub const DEFAULT_CONCURRENCY: usize = 3;
pub const DEFAULT_TASK_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_ASPECT_RATIO: &str = "1:1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Gemini,
    Bedrock,
}

impl ProviderKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Some(ProviderKind::Gemini),
            "bedrock" | "aws" => Some(ProviderKind::Bedrock),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulingStrategy {
    /// Contiguous windows of `concurrency` tasks, each awaited in full.
    Windowed,
    /// Continuously refilled pool of `concurrency` slots.
    Pool,
}

impl SchedulingStrategy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "windowed" | "window" | "batch" => Some(SchedulingStrategy::Windowed),
            "pool" => Some(SchedulingStrategy::Pool),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub api_base: String,
    pub analysis_model: String,
    pub image_model: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            api_key: None,
            api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            analysis_model: "gemini-2.5-flash".to_string(),
            image_model: "gemini-2.5-flash-image".to_string(),
        }
    }
}

impl GeminiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        GeminiConfig {
            api_key: non_empty_env("GEMINI_API_KEY").or_else(|| non_empty_env("GOOGLE_API_KEY")),
            api_base: non_empty_env("GEMINI_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base),
            analysis_model: non_empty_env("GEMINI_ANALYSIS_MODEL").unwrap_or(defaults.analysis_model),
            image_model: non_empty_env("GEMINI_IMAGE_MODEL").unwrap_or(defaults.image_model),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_models(
        mut self,
        analysis_model: impl Into<String>,
        image_model: impl Into<String>,
    ) -> Self {
        self.analysis_model = analysis_model.into();
        self.image_model = image_model.into();
        self
    }
}

#[derive(Debug, Clone)]
pub struct BedrockConfig {
    pub region: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub analysis_model: String,
    pub image_model: String,
}

impl Default for BedrockConfig {
    fn default() -> Self {
        BedrockConfig {
            region: None,
            access_key: None,
            secret_key: None,
            analysis_model: "anthropic.claude-3-haiku-20240307-v1:0".to_string(),
            image_model: "amazon.nova-canvas-v1:0".to_string(),
        }
    }
}

impl BedrockConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        BedrockConfig {
            region: non_empty_env("AWS_REGION").or_else(|| non_empty_env("AWS_DEFAULT_REGION")),
            access_key: non_empty_env("AWS_ACCESS_KEY_ID"),
            secret_key: non_empty_env("AWS_SECRET_ACCESS_KEY"),
            analysis_model: non_empty_env("BEDROCK_ANALYSIS_MODEL").unwrap_or(defaults.analysis_model),
            image_model: non_empty_env("BEDROCK_IMAGE_MODEL").unwrap_or(defaults.image_model),
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct VariantConfig {
    pub provider: ProviderKind,
    pub gemini: GeminiConfig,
    pub bedrock: BedrockConfig,
    pub concurrency: usize,
    pub strategy: SchedulingStrategy,
    /// Per-task deadline; `None` waits indefinitely.
    pub task_timeout: Option<Duration>,
    pub default_aspect_ratio: String,
}

impl Default for VariantConfig {
    fn default() -> Self {
        VariantConfig {
            provider: ProviderKind::Gemini,
            gemini: GeminiConfig::default(),
            bedrock: BedrockConfig::default(),
            concurrency: DEFAULT_CONCURRENCY,
            strategy: SchedulingStrategy::Windowed,
            task_timeout: Some(Duration::from_secs(DEFAULT_TASK_TIMEOUT_SECS)),
            default_aspect_ratio: DEFAULT_ASPECT_RATIO.to_string(),
        }
    }
}

impl VariantConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();

        let provider = parsed_env("RVARIANT_PROVIDER", ProviderKind::parse).unwrap_or(defaults.provider);
        let strategy =
            parsed_env("RVARIANT_STRATEGY", SchedulingStrategy::parse).unwrap_or(defaults.strategy);
        let concurrency = parsed_env("RVARIANT_CONCURRENCY", |raw| {
            raw.trim().parse::<usize>().ok().filter(|n| *n > 0)
        })
        .unwrap_or(defaults.concurrency);
        let task_timeout = parsed_env("RVARIANT_TASK_TIMEOUT_SECS", |raw| {
            raw.trim().parse::<u64>().ok()
        })
        .map(|secs| (secs > 0).then(|| Duration::from_secs(secs)))
        .unwrap_or(defaults.task_timeout);

        VariantConfig {
            provider,
            gemini: GeminiConfig::from_env(),
            bedrock: BedrockConfig::from_env(),
            concurrency,
            strategy,
            task_timeout,
            default_aspect_ratio: non_empty_env("RVARIANT_ASPECT_RATIO")
                .unwrap_or(defaults.default_aspect_ratio),
        }
    }

    pub fn with_gemini(mut self, config: GeminiConfig) -> Self {
        self.provider = ProviderKind::Gemini;
        self.gemini = config;
        self
    }

    pub fn with_bedrock(mut self, config: BedrockConfig) -> Self {
        self.provider = ProviderKind::Bedrock;
        self.bedrock = config;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_strategy(mut self, strategy: SchedulingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_task_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.task_timeout = timeout;
        self
    }

    pub fn with_default_aspect_ratio(mut self, aspect_ratio: impl Into<String>) -> Self {
        self.default_aspect_ratio = aspect_ratio.into();
        self
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parsed_env<T>(key: &str, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
    let raw = non_empty_env(key)?;
    let parsed = parse(&raw);
    if parsed.is_none() {
        log::warn!("⚠️  Ignoring invalid {}={:?}, using default", key, raw);
    }
    parsed
}
