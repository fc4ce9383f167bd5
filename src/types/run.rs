use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use super::itinerary::Itinerary;
use crate::core::stage::PipelineStage;

/// Wall-clock time spent in one completed stage.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StageTiming {
    pub stage: PipelineStage,
    pub duration: Duration,
}

/// Result of a successful pipeline invocation, with its intermediate artifacts.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineRun {
    /// Final document handed to the caller
    pub itinerary: Itinerary,
    /// Parsed stdout of the computation stage
    pub computation_output: Value,
    /// Instruction sent to the generative service
    pub prompt: String,
    /// Completed stages in execution order
    pub stages: Vec<StageTiming>,
    /// Total execution duration
    pub duration: Duration,
}

impl PipelineRun {
    pub fn into_itinerary(self) -> Itinerary {
        self.itinerary
    }

    pub fn stage_duration(&self, stage: PipelineStage) -> Option<Duration> {
        self.stages
            .iter()
            .find(|timing| timing.stage == stage)
            .map(|timing| timing.duration)
    }

    /// Generate a human-readable replay of the execution
    pub fn replay(&self) -> String {
        let mut lines = Vec::new();

        lines.push("=== Itinerary Pipeline Trace ===".to_string());
        lines.push(format!("Duration: {:.2}s", self.duration.as_secs_f64()));

        lines.push(String::new());
        lines.push("--- Stages ---".to_string());
        for (idx, timing) in self.stages.iter().enumerate() {
            lines.push(format!(
                "{}. {} ({} ms)",
                idx + 1,
                timing.stage,
                timing.duration.as_millis()
            ));
        }

        lines.push(String::new());
        lines.push("--- Computation Output ---".to_string());
        lines.push(self.computation_output.to_string());

        lines.push(String::new());
        lines.push("--- Itinerary ---".to_string());
        lines.push(self.itinerary.value().to_string());

        lines.join("\n")
    }
}
