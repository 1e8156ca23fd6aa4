//! Scripted in-memory model for unit tests.

use super::{ContentPart, GenerativeModel, ImageEditRequest};
use crate::{
    error::{Result, VariantError},
    models::ImagePayload,
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// Behaviour is keyed by call order: the n-th `generate` call gets call index n.
#[derive(Default)]
pub struct ScriptedModel {
    failing: HashSet<usize>,
    text_only: HashSet<usize>,
    delays: HashMap<usize, Duration>,
    default_delay: Duration,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    starts: Mutex<Vec<(usize, Instant)>>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_call(mut self, index: usize) -> Self {
        self.failing.insert(index);
        self
    }

    pub fn text_only_call(mut self, index: usize) -> Self {
        self.text_only.insert(index);
        self
    }

    pub fn delay_call(mut self, index: usize, delay: Duration) -> Self {
        self.delays.insert(index, delay);
        self
    }

    pub fn with_default_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn start_of(&self, index: usize) -> Option<Instant> {
        self.starts
            .lock()
            .unwrap()
            .iter()
            .find(|(i, _)| *i == index)
            .map(|(_, at)| *at)
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn describe(&self, _prompt: &str, _image: &ImagePayload) -> Result<String> {
        Ok(String::new())
    }

    async fn generate(&self, _request: ImageEditRequest<'_>) -> Result<Vec<ContentPart>> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        self.starts.lock().unwrap().push((index, Instant::now()));

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        let delay = self.delays.get(&index).copied().unwrap_or(self.default_delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if self.failing.contains(&index) {
            return Err(VariantError::HttpError(format!("scripted failure #{}", index)));
        }
        if self.text_only.contains(&index) {
            return Ok(vec![ContentPart::Text("no image today".into())]);
        }
        Ok(vec![ContentPart::InlineImage(ImagePayload::new(
            "image/png",
            vec![(index as u8).wrapping_add(1)],
        ))])
    }
}
