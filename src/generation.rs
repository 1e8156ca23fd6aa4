use crate::{
    models::{FailureKind, GeneratedImage, GenerationTask, ImagePayload, TaskFailure, TaskOutcome},
    provider::{GenerativeModel, ImageEditRequest},
};

/// Run one task against the model. Errors stop here: they come back as a
/// `TaskFailure` and are logged, never raised.
pub async fn generate(
    model: &dyn GenerativeModel,
    task: &GenerationTask,
    image: &ImagePayload,
    aspect_ratio: Option<&str>,
) -> TaskOutcome {
    let prompt = task.option.prompt.as_str();
    let request = ImageEditRequest {
        prompt,
        image,
        aspect_ratio,
    };

    let parts = match model.generate(request).await {
        Ok(parts) => parts,
        Err(e) => {
            log::warn!("⚠️  Failed to generate variant {}: {}", task.label(), e);
            return Err(TaskFailure::new(FailureKind::Transport, e.to_string()));
        }
    };

    match parts.iter().find_map(|part| part.as_image()) {
        Some(produced) => {
            log::debug!("Variant {} produced {:?}", task.label(), produced);
            Ok(GeneratedImage {
                image: produced.clone(),
                prompt: prompt.to_string(),
            })
        }
        None => {
            log::warn!(
                "⚠️  Model returned no image for variant {} ({} part(s))",
                task.label(),
                parts.len()
            );
            Err(TaskFailure::new(
                FailureKind::NoImage,
                "response carried no inline image",
            ))
        }
    }
}
