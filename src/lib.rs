//! Batch generation of image variants.
//!
//! One source image plus a selection of catalog options becomes
//! `selected × quantity` independent generation tasks, run against an
//! external model under a concurrency cap. Failed tasks are dropped from the
//! result list and reported separately.

pub mod aggregator;
pub mod analysis;
pub mod catalog;
pub mod config;
pub mod error;
pub mod executor;
pub mod expander;
pub mod generation;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod provider;

pub use catalog::OptionCatalog;
pub use config::{BedrockConfig, GeminiConfig, ProviderKind, SchedulingStrategy, VariantConfig};
pub use error::{Result, VariantError};
pub use executor::{BoundedExecutor, ExecutorSettings};
pub use models::*;
pub use orchestrator::VariantOrchestrator;
pub use provider::{ContentPart, GenerativeModel, ImageEditRequest};
pub use tokio_util::sync::CancellationToken;
