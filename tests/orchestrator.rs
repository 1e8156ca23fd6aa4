use async_trait::async_trait;
use rvariant::{
    CancellationToken, ContentPart, FailureKind, GenerateVariantsRequest, GenerativeModel,
    ImageEditRequest, ImagePayload, OptionCatalog, SchedulingStrategy, VariantConfig,
    VariantError, VariantOrchestrator,
};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Fails calls by index or by option prompt, and tracks peak concurrency.
#[derive(Default)]
struct FlakyModel {
    failing_calls: HashSet<usize>,
    failing_prompts: Vec<String>,
    delay: Duration,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl FlakyModel {
    fn failing_calls(calls: &[usize]) -> Self {
        Self {
            failing_calls: calls.iter().copied().collect(),
            ..Default::default()
        }
    }

    fn failing_option(catalog: &OptionCatalog, id: &str) -> Self {
        Self {
            failing_prompts: vec![catalog.get(id).unwrap().prompt.clone()],
            ..Default::default()
        }
    }
}

#[async_trait]
impl GenerativeModel for FlakyModel {
    fn name(&self) -> &str {
        "flaky"
    }

    async fn describe(&self, _prompt: &str, _image: &ImagePayload) -> rvariant::Result<String> {
        Ok("```json\n{\"subject\":\"mug\",\"style\":\"photo\",\"colors\":[\"white\"],\"mood\":\"calm\",\"suggestedDirections\":[\"scene\"]}\n```".into())
    }

    async fn generate(&self, request: ImageEditRequest<'_>) -> rvariant::Result<Vec<ContentPart>> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing_calls.contains(&index)
            || self.failing_prompts.iter().any(|p| p == request.prompt)
        {
            return Err(VariantError::HttpError("upstream 500".into()));
        }
        Ok(vec![
            ContentPart::Text("done".into()),
            ContentPart::InlineImage(ImagePayload::new("image/png", vec![index as u8])),
        ])
    }
}

fn source() -> ImagePayload {
    ImagePayload::new("image/jpeg", vec![0xff, 0xd8, 0xff])
}

fn orchestrator(model: Arc<FlakyModel>, config: &VariantConfig) -> VariantOrchestrator {
    VariantOrchestrator::new(OptionCatalog::shared(), model, config).unwrap()
}

#[tokio::test(start_paused = true)]
async fn two_options_two_each_span_two_windows() {
    let model = Arc::new(FlakyModel {
        delay: Duration::from_millis(20),
        ..Default::default()
    });
    let orchestrator = orchestrator(model.clone(), &VariantConfig::default());
    let request = GenerateVariantsRequest::new(source())
        .with_options(["style-realistic", "scene-outdoor"])
        .with_quantity(2);

    let results = orchestrator.generate_variants(&request).await.unwrap();
    assert_eq!(results.len(), 4);
    assert_eq!(model.peak.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn failed_task_leaves_no_gap() {
    let model = Arc::new(FlakyModel::failing_calls(&[1]));
    let orchestrator = orchestrator(model.clone(), &VariantConfig::default());
    let selection = ["style-flat", "tone-soft", "comp-wide", "scene-minimal", "seasonal-autumn"];
    let request = GenerateVariantsRequest::new(source()).with_options(selection);

    let report = orchestrator
        .generate_variants_with(&request, &CancellationToken::new())
        .await
        .unwrap();

    let ids: Vec<&str> = report.results.iter().map(|r| r.option_id.as_str()).collect();
    assert_eq!(ids, ["style-flat", "comp-wide", "scene-minimal", "seasonal-autumn"]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].option_id, "tone-soft");
    assert_eq!(report.failures[0].kind, FailureKind::Transport);
}

#[tokio::test]
async fn results_only_reference_selected_options() {
    let catalog = OptionCatalog::shared();
    let model = Arc::new(FlakyModel::failing_option(&catalog, "tone-warm"));
    let config = VariantConfig::default().with_strategy(SchedulingStrategy::Pool);
    let orchestrator = orchestrator(model.clone(), &config);
    let request = GenerateVariantsRequest::new(source())
        .with_options(["tone-warm", "ghost-option", "comp-overhead"])
        .with_quantity(3);

    let results = orchestrator.generate_variants(&request).await.unwrap();
    assert_eq!(model.calls.load(Ordering::SeqCst), 6);
    assert_eq!(results.len(), 3);
    assert!(results.len() <= 2 * 3);
    assert!(results.iter().all(|r| r.option_id == "comp-overhead"));
    let prompt = &catalog.get("comp-overhead").unwrap().prompt;
    assert!(results.iter().all(|r| &r.prompt == prompt));
}

#[tokio::test]
async fn every_task_failing_is_still_ok() {
    let model = Arc::new(FlakyModel::failing_calls(&[0, 1, 2, 3]));
    let orchestrator = orchestrator(model, &VariantConfig::default());
    let request = GenerateVariantsRequest::new(source())
        .with_options(["seasonal-cny", "seasonal-winter"])
        .with_quantity(2);

    let results = orchestrator.generate_variants(&request).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn validation_errors_precede_any_call() {
    let model = Arc::new(FlakyModel::default());
    let orchestrator = orchestrator(model.clone(), &VariantConfig::default());

    let unknown = GenerateVariantsRequest::new(source()).with_option("no-such-option");
    let err = orchestrator.generate_variants(&unknown).await.unwrap_err();
    assert!(matches!(err, VariantError::NoValidOptions));
    assert_eq!(err.to_string(), "No valid options selected");

    let empty = GenerateVariantsRequest::new(source());
    assert!(orchestrator.generate_variants(&empty).await.unwrap_err().is_validation());

    let no_image = GenerateVariantsRequest::new(ImagePayload::new("image/png", vec![]))
        .with_option("tone-cool");
    assert!(orchestrator.generate_variants(&no_image).await.unwrap_err().is_validation());

    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn analysis_parses_embedded_json() {
    let orchestrator = orchestrator(Arc::new(FlakyModel::default()), &VariantConfig::default());
    let analysis = orchestrator.analyze(&source()).await;
    assert_eq!(analysis.subject, "mug");
    assert_eq!(analysis.suggested_directions, [rvariant::Direction::Scene]);
}

#[tokio::test]
async fn result_serializes_with_wire_names() {
    let orchestrator = orchestrator(Arc::new(FlakyModel::default()), &VariantConfig::default());
    let request = GenerateVariantsRequest::new(source())
        .with_option("comp-closeup")
        .with_aspect_ratio("4:3");
    let results = orchestrator.generate_variants(&request).await.unwrap();

    let json = serde_json::to_value(&results[0]).unwrap();
    assert_eq!(json["optionId"], "comp-closeup");
    assert_eq!(json["optionLabel"], "Close-up");
    assert_eq!(json["image"]["mimeType"], "image/png");
    assert!(json["id"].as_str().unwrap().starts_with("comp-closeup-0-"));
}
