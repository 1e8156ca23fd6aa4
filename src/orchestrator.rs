//! Caller-facing entry point: expand, execute, aggregate.

use crate::{
    aggregator, analysis,
    catalog::OptionCatalog,
    config::VariantConfig,
    error::{Result, VariantError},
    executor::{BoundedExecutor, ExecutorSettings},
    expander,
    logger,
    models::{
        BatchReport, Direction, DirectionMeta, GenerateVariantsRequest, ImagePayload,
        MaterialAnalysis, VariantOption, VariantResult,
    },
    provider::{self, GenerativeModel},
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct VariantOrchestrator {
    catalog: Arc<OptionCatalog>,
    model: Arc<dyn GenerativeModel>,
    settings: ExecutorSettings,
    default_aspect_ratio: String,
}

impl VariantOrchestrator {
    /// Wire an orchestrator around an existing model client and catalog.
    pub fn new(
        catalog: Arc<OptionCatalog>,
        model: Arc<dyn GenerativeModel>,
        config: &VariantConfig,
    ) -> Result<Self> {
        if config.concurrency == 0 {
            return Err(VariantError::ConfigError(
                "concurrency must be at least 1".into(),
            ));
        }
        Ok(Self {
            catalog,
            model,
            settings: ExecutorSettings::from(config),
            default_aspect_ratio: config.default_aspect_ratio.clone(),
        })
    }

    /// Build the configured model client once and pair it with the built-in catalog.
    pub async fn from_config(config: VariantConfig) -> Result<Self> {
        let model = provider::connect(&config).await?;
        Self::new(OptionCatalog::shared(), model, &config)
    }

    pub fn catalog(&self) -> &OptionCatalog {
        &self.catalog
    }

    pub fn settings(&self) -> ExecutorSettings {
        self.settings
    }

    pub fn list_options(&self) -> &[Arc<VariantOption>] {
        self.catalog.list_options()
    }

    pub fn options_for_direction(&self, direction: Direction) -> &[Arc<VariantOption>] {
        self.catalog.options_for_direction(direction)
    }

    pub fn direction_metadata(&self, raw: &str) -> DirectionMeta {
        self.catalog.direction_metadata(raw)
    }

    pub async fn analyze(&self, image: &ImagePayload) -> MaterialAnalysis {
        let _timer = logger::timer("material analysis");
        analysis::analyze(self.model.as_ref(), image).await
    }

    /// Successful variants only. An empty list is a valid outcome.
    pub async fn generate_variants(&self, request: &GenerateVariantsRequest) -> Result<Vec<VariantResult>> {
        let report = self
            .generate_variants_with(request, &CancellationToken::new())
            .await?;
        Ok(report.into_results())
    }

    /// Full report, including failed tasks. Only request validation can fail.
    pub async fn generate_variants_with(
        &self,
        request: &GenerateVariantsRequest,
        cancel: &CancellationToken,
    ) -> Result<BatchReport> {
        if request.image.is_empty() {
            return Err(VariantError::RequestError("source image is empty".into()));
        }
        let tasks = expander::expand(&self.catalog, request)?;

        let batch_stamp = chrono::Utc::now().timestamp_millis();
        let aspect_ratio = request
            .aspect_ratio
            .as_deref()
            .unwrap_or(&self.default_aspect_ratio);

        log::info!(
            "🚀 Starting variant batch {}: {} task(s), cap {}, {:?}",
            batch_stamp,
            tasks.len(),
            self.settings.concurrency,
            self.settings.strategy
        );
        let _timer = logger::timer("variant batch");

        let executor = BoundedExecutor::new(self.model.as_ref(), self.settings);
        let outcomes = executor
            .run(tasks, &request.image, Some(aspect_ratio), cancel)
            .await;
        let report = aggregator::collect(outcomes, batch_stamp);

        if report.is_total_failure() {
            log::warn!(
                "⚠️  Variant batch {} produced no images ({} task(s) failed)",
                batch_stamp,
                report.failures.len()
            );
        } else {
            log::info!(
                "✅ Variant batch {} produced {}/{} image(s)",
                batch_stamp,
                report.results.len(),
                report.requested
            );
        }
        Ok(report)
    }
}
