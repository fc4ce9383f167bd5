//! Scripted stages for tests, available with the `test-util` feature.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

use async_trait::async_trait;

use super::{computation::ComputationStage, generation::GenerationService};
use crate::error::{PipelineError, Result};

/// A computation stage that returns canned stdout, or fails like a crashed process.
pub struct MockComputation {
    outcome: std::result::Result<String, String>,
    requests: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl MockComputation {
    pub fn succeeding(stdout: impl Into<String>) -> Self {
        Self::with_outcome(Ok(stdout.into()))
    }

    /// Fails with a non-zero exit carrying `stderr`.
    pub fn failing(stderr: impl Into<String>) -> Self {
        Self::with_outcome(Err(stderr.into()))
    }

    fn with_outcome(outcome: std::result::Result<String, String>) -> Self {
        Self {
            outcome,
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Serialized requests received so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ComputationStage for MockComputation {
    async fn run(&self, serialized_request: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(serialized_request.to_string());
        }

        match &self.outcome {
            Ok(stdout) => Ok(stdout.clone()),
            Err(stderr) => Err(PipelineError::ComputationProcess {
                status: "exit status: 1".to_string(),
                stderr: stderr.clone(),
            }),
        }
    }
}

/// A generation service that answers every prompt with the same text.
pub struct MockGeneration {
    outcome: std::result::Result<String, String>,
    prompts: Mutex<Vec<String>>,
}

impl MockGeneration {
    pub fn responding(text: impl Into<String>) -> Self {
        Self {
            outcome: Ok(text.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Fails every call with a service error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(message.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }

    pub fn calls(&self) -> usize {
        self.prompts().len()
    }
}

#[async_trait]
impl GenerationService for MockGeneration {
    async fn complete(&self, prompt: &str) -> Result<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        self.outcome
            .clone()
            .map_err(PipelineError::GenerationService)
    }
}
