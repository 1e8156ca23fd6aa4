use crate::{
    catalog::OptionCatalog,
    error::{Result, VariantError},
    models::{GenerateVariantsRequest, GenerationTask},
};
use std::sync::Arc;

/// Flatten a request into `selected × quantity` tasks, in selection order.
///
/// Unknown option ids are dropped; the call only fails when nothing resolves.
pub fn expand(catalog: &OptionCatalog, request: &GenerateVariantsRequest) -> Result<Vec<GenerationTask>> {
    if request.quantity == 0 {
        return Err(VariantError::RequestError(
            "quantity must be at least 1".into(),
        ));
    }

    let mut tasks = Vec::new();
    for id in &request.selected_options {
        let Some(option) = catalog.get(id) else {
            log::warn!("⚠️  Dropping unknown variant option: {}", id);
            continue;
        };
        for repeat_index in 0..request.quantity {
            tasks.push(GenerationTask {
                option: Arc::clone(option),
                repeat_index,
                position: tasks.len(),
            });
        }
    }

    if tasks.is_empty() {
        return Err(VariantError::NoValidOptions);
    }

    log::debug!(
        "Expanded {} selected option(s) x{} into {} task(s)",
        request.selected_options.len(),
        request.quantity,
        tasks.len()
    );
    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ImagePayload;

    fn request(ids: &[&str], quantity: u32) -> GenerateVariantsRequest {
        GenerateVariantsRequest::new(ImagePayload::new("image/png", vec![1]))
            .with_options(ids.iter().copied())
            .with_quantity(quantity)
    }

    #[test]
    fn test_expands_in_selection_order() {
        let catalog = OptionCatalog::builtin();
        let tasks = expand(&catalog, &request(&["tone-warm", "style-flat"], 2)).unwrap();
        let labels: Vec<String> = tasks.iter().map(GenerationTask::label).collect();
        assert_eq!(labels, ["tone-warm#0", "tone-warm#1", "style-flat#0", "style-flat#1"]);
        let positions: Vec<usize> = tasks.iter().map(|t| t.position).collect();
        assert_eq!(positions, [0, 1, 2, 3]);
    }

    #[test]
    fn test_unknown_ids_dropped_when_others_resolve() {
        let catalog = OptionCatalog::builtin();
        let tasks = expand(&catalog, &request(&["bogus", "scene-luxury"], 3)).unwrap();
        assert_eq!(tasks.len(), 3);
        assert!(tasks.iter().all(|t| t.option.id == "scene-luxury"));
    }

    #[test]
    fn test_nothing_resolvable_is_rejected() {
        let catalog = OptionCatalog::builtin();
        let err = expand(&catalog, &request(&["bogus"], 1)).unwrap_err();
        assert!(matches!(err, VariantError::NoValidOptions));
        let err = expand(&catalog, &request(&[], 2)).unwrap_err();
        assert!(matches!(err, VariantError::NoValidOptions));
    }

    #[test]
    fn test_zero_quantity_is_rejected() {
        let catalog = OptionCatalog::builtin();
        let err = expand(&catalog, &request(&["tone-cool"], 0)).unwrap_err();
        assert!(matches!(err, VariantError::RequestError(_)));
    }

    #[test]
    fn test_task_count_is_k_times_q() {
        let catalog = OptionCatalog::builtin();
        for k in 1..=4usize {
            for q in 1..=3u32 {
                let ids: Vec<&str> = catalog.list_options()[..k].iter().map(|o| o.id.as_str()).collect();
                let tasks = expand(&catalog, &request(&ids, q)).unwrap();
                assert_eq!(tasks.len(), k * q as usize);
            }
        }
    }
}
