use crate::models::{BatchReport, FailedTask, GenerationTask, TaskOutcome, VariantResult};

/// Turn executor outcomes into a report. Successful tasks become results in
/// dispatch order; failed tasks are listed separately and leave no gap.
pub fn collect(outcomes: Vec<(GenerationTask, TaskOutcome)>, batch_stamp: i64) -> BatchReport {
    let requested = outcomes.len();
    let mut results = Vec::new();
    let mut failures = Vec::new();

    for (task, outcome) in outcomes {
        match outcome {
            Ok(produced) => results.push(VariantResult {
                id: result_id(&task, batch_stamp),
                option_id: task.option.id.clone(),
                option_label: task.option.label.clone(),
                image: produced.image,
                prompt: produced.prompt,
            }),
            Err(failure) => failures.push(FailedTask {
                option_id: task.option.id.clone(),
                repeat_index: task.repeat_index,
                kind: failure.kind,
                reason: failure.reason,
            }),
        }
    }

    BatchReport {
        results,
        failures,
        requested,
    }
}

/// Unique within a batch: the dispatch position already is.
fn result_id(task: &GenerationTask, batch_stamp: i64) -> String {
    format!(
        "{}-{}-{}-{}",
        task.option.id, task.repeat_index, batch_stamp, task.position
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::OptionCatalog,
        models::{FailureKind, GeneratedImage, ImagePayload, TaskFailure},
    };
    use std::collections::HashSet;
    use std::sync::Arc;

    fn outcomes() -> Vec<(GenerationTask, TaskOutcome)> {
        let catalog = OptionCatalog::builtin();
        let mut out = Vec::new();
        for (position, id) in ["tone-warm", "tone-warm", "comp-low", "comp-low"].iter().enumerate() {
            let option = Arc::clone(catalog.get(id).unwrap());
            let task = GenerationTask {
                repeat_index: (position % 2) as u32,
                position,
                option: Arc::clone(&option),
            };
            let outcome = if position == 2 {
                Err(TaskFailure::new(FailureKind::NoImage, "nothing"))
            } else {
                Ok(GeneratedImage {
                    image: ImagePayload::new("image/png", vec![position as u8]),
                    prompt: option.prompt.clone(),
                })
            };
            out.push((task, outcome));
        }
        out
    }

    #[test]
    fn test_collect_keeps_dispatch_order_without_gaps() {
        let report = collect(outcomes(), 1_700_000_000_000);
        assert_eq!(report.requested, 4);
        assert_eq!(report.results.len(), 3);
        let data: Vec<u8> = report.results.iter().map(|r| r.image.data[0]).collect();
        assert_eq!(data, [0, 1, 3]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].option_id, "comp-low");
        assert_eq!(report.failures[0].repeat_index, 0);
        assert!(!report.is_total_failure());
    }

    #[test]
    fn test_ids_unique_and_descriptive() {
        let report = collect(outcomes(), 42);
        let ids: HashSet<&str> = report.results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), report.results.len());
        assert_eq!(report.results[0].id, "tone-warm-0-42-0");
        assert_eq!(report.results[0].option_label, "Warm tone");
    }

    #[test]
    fn test_empty_outcomes_are_valid() {
        let report = collect(Vec::new(), 0);
        assert!(report.results.is_empty());
        assert!(!report.is_total_failure());
    }
}
