//! Bounded execution of a task list.
//!
//! Never more than `concurrency` model calls are outstanding. Outcomes are
//! returned in dispatch order whatever the completion order was.

use crate::{
    config::{SchedulingStrategy, VariantConfig},
    generation,
    models::{FailureKind, GenerationTask, ImagePayload, TaskFailure, TaskOutcome},
    provider::GenerativeModel,
};
use futures::{future::join_all, stream, StreamExt};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorSettings {
    pub concurrency: usize,
    pub strategy: SchedulingStrategy,
    pub task_timeout: Option<Duration>,
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self::from(&VariantConfig::default())
    }
}

impl From<&VariantConfig> for ExecutorSettings {
    fn from(config: &VariantConfig) -> Self {
        Self {
            concurrency: config.concurrency,
            strategy: config.strategy,
            task_timeout: config.task_timeout,
        }
    }
}

pub struct BoundedExecutor<'a> {
    model: &'a dyn GenerativeModel,
    settings: ExecutorSettings,
}

impl<'a> BoundedExecutor<'a> {
    pub fn new(model: &'a dyn GenerativeModel, settings: ExecutorSettings) -> Self {
        Self { model, settings }
    }

    fn cap(&self) -> usize {
        self.settings.concurrency.max(1)
    }

    pub async fn run(
        &self,
        tasks: Vec<GenerationTask>,
        image: &ImagePayload,
        aspect_ratio: Option<&str>,
        cancel: &CancellationToken,
    ) -> Vec<(GenerationTask, TaskOutcome)> {
        let outcomes = match self.settings.strategy {
            SchedulingStrategy::Windowed => self.run_windowed(&tasks, image, aspect_ratio, cancel).await,
            SchedulingStrategy::Pool => self.run_pool(&tasks, image, aspect_ratio, cancel).await,
        };
        tasks.into_iter().zip(outcomes).collect()
    }

    async fn run_windowed(
        &self,
        tasks: &[GenerationTask],
        image: &ImagePayload,
        aspect_ratio: Option<&str>,
        cancel: &CancellationToken,
    ) -> Vec<TaskOutcome> {
        let cap = self.cap();
        let mut outcomes = Vec::with_capacity(tasks.len());

        for (window_index, window) in tasks.chunks(cap).enumerate() {
            log::debug!(
                "Dispatching window {} ({} task(s), cap {})",
                window_index,
                window.len(),
                cap
            );
            let window_outcomes = join_all(
                window
                    .iter()
                    .map(|task| self.run_one(task, image, aspect_ratio, cancel)),
            )
            .await;
            outcomes.extend(window_outcomes);
        }
        outcomes
    }

    async fn run_pool(
        &self,
        tasks: &[GenerationTask],
        image: &ImagePayload,
        aspect_ratio: Option<&str>,
        cancel: &CancellationToken,
    ) -> Vec<TaskOutcome> {
        // Unordered so a finished slot refills at once; order is restored below.
        let mut finished: Vec<(usize, TaskOutcome)> = stream::iter(tasks.iter().enumerate())
            .map(|(index, task)| async move {
                (index, self.run_one(task, image, aspect_ratio, cancel).await)
            })
            .buffer_unordered(self.cap())
            .collect()
            .await;
        finished.sort_by_key(|(index, _)| *index);
        finished.into_iter().map(|(_, outcome)| outcome).collect()
    }

    async fn run_one(
        &self,
        task: &GenerationTask,
        image: &ImagePayload,
        aspect_ratio: Option<&str>,
        cancel: &CancellationToken,
    ) -> TaskOutcome {
        if cancel.is_cancelled() {
            return Err(TaskFailure::new(
                FailureKind::Cancelled,
                "batch cancelled before task started",
            ));
        }

        let call = generation::generate(self.model, task, image, aspect_ratio);
        let bounded = async {
            match self.settings.task_timeout {
                Some(limit) => match tokio::time::timeout(limit, call).await {
                    Ok(outcome) => outcome,
                    Err(_) => {
                        log::warn!(
                            "⚠️  Variant {} timed out after {:?}",
                            task.label(),
                            limit
                        );
                        Err(TaskFailure::new(
                            FailureKind::Timeout,
                            format!("no answer within {:?}", limit),
                        ))
                    }
                },
                None => call.await,
            }
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                log::info!("Variant {} cancelled in flight", task.label());
                Err(TaskFailure::new(FailureKind::Cancelled, "batch cancelled while task was running"))
            }
            outcome = bounded => outcome,
        }
    }
}
