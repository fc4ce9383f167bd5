use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use tracing::{debug, info, warn};

use crate::{
    config::PipelineConfig,
    contract::{parse_computation_output, parse_generation_output},
    core::stage::PipelineStage,
    error::Result,
    services::{
        build_enhancement_prompt, ChatCompletionService, ComputationStage, GenerationService,
        ProcessInvoker,
    },
    types::{Itinerary, PipelineRun, StageTiming, TripRequest},
};

/// Two-stage itinerary generator.
///
/// Holds no per-request state, so one instance can serve concurrent requests.
#[derive(Clone)]
pub struct Pipeline {
    computation: Arc<dyn ComputationStage>,
    generation: Arc<dyn GenerationService>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline").finish_non_exhaustive()
    }
}

impl Pipeline {
    pub fn new(
        computation: impl ComputationStage + 'static,
        generation: impl GenerationService + 'static,
    ) -> Self {
        Self::from_shared(Arc::new(computation), Arc::new(generation))
    }

    pub fn from_shared(
        computation: Arc<dyn ComputationStage>,
        generation: Arc<dyn GenerationService>,
    ) -> Self {
        Self {
            computation,
            generation,
        }
    }

    /// Child-process computation stage plus chat-completion generation stage.
    pub fn from_config(config: &PipelineConfig) -> Self {
        let invoker = ProcessInvoker::new(&config.interpreter, &config.program)
            .with_timeout(config.compute_timeout);

        let generation = ChatCompletionService::new(config.api_key.clone())
            .with_base_url(config.base_url.clone())
            .with_model(config.model.clone())
            .with_max_tokens(config.max_tokens)
            .with_timeout(config.generation_timeout)
            .with_json_mode(config.json_mode);

        Self::new(invoker, generation)
    }

    pub async fn generate_itinerary(&self, request: TripRequest) -> Result<Itinerary> {
        self.run_with_trace(request)
            .await
            .map(PipelineRun::into_itinerary)
    }

    /// Run every stage in order, keeping intermediate artifacts and timings.
    pub async fn run_with_trace(&self, request: TripRequest) -> Result<PipelineRun> {
        let started = Instant::now();
        match self.execute(request, started).await {
            Ok(run) => {
                info!(
                    target: "itinerary::pipeline",
                    duration_ms = run.duration.as_millis() as u64,
                    title = run.itinerary.title().unwrap_or_default(),
                    "itinerary generated"
                );
                Ok(run)
            }
            Err(err) => {
                let stage = err.stage().map(|stage| stage.as_str()).unwrap_or("setup");
                if err.is_client_error() {
                    debug!(target: "itinerary::pipeline", stage, error = %err, "request rejected");
                } else {
                    warn!(
                        target: "itinerary::pipeline",
                        stage,
                        code = err.error_code(),
                        error = %err,
                        "itinerary pipeline failed"
                    );
                }
                Err(err)
            }
        }
    }

    async fn execute(&self, request: TripRequest, started: Instant) -> Result<PipelineRun> {
        let mut tracker = StageTracker::new();

        let request = request.validate()?;
        let argument = request.to_argument()?;
        tracker.advance(PipelineStage::Computing);

        let raw_output = self.computation.run(&argument).await?;
        tracker.advance(PipelineStage::ParsingComputationOutput);

        let computation_output = parse_computation_output(&raw_output)?;
        tracker.advance(PipelineStage::Enhancing);

        let prompt = build_enhancement_prompt(&computation_output)?;
        let raw_response = self.generation.complete(&prompt).await?;
        tracker.advance(PipelineStage::ParsingEnhancementOutput);

        let itinerary = parse_generation_output(&raw_response)?;
        tracker.advance(PipelineStage::Done);

        Ok(PipelineRun {
            itinerary,
            computation_output,
            prompt,
            stages: tracker.finish(),
            duration: started.elapsed(),
        })
    }
}

/// Records how long each stage took as the run moves forward.
struct StageTracker {
    current: PipelineStage,
    entered: Instant,
    completed: Vec<StageTiming>,
}

impl StageTracker {
    fn new() -> Self {
        Self {
            current: PipelineStage::Validating,
            entered: Instant::now(),
            completed: Vec::with_capacity(PipelineStage::ORDER.len()),
        }
    }

    fn advance(&mut self, next: PipelineStage) {
        debug_assert_eq!(self.current.next(), Some(next));

        let duration: Duration = self.entered.elapsed();
        debug!(
            target: "itinerary::pipeline",
            from = self.current.as_str(),
            to = next.as_str(),
            elapsed_ms = duration.as_millis() as u64,
            "stage complete"
        );

        self.completed.push(StageTiming {
            stage: self.current,
            duration,
        });
        self.current = next;
        self.entered = Instant::now();
    }

    fn finish(self) -> Vec<StageTiming> {
        self.completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::PipelineError,
        services::{MockComputation, MockGeneration},
    };
    use serde_json::json;

    fn request() -> TripRequest {
        serde_json::from_value(json!({
            "start_date": "2025-03-01",
            "end_date": "2025-03-03",
            "preferences": {"Beach": 100},
            "pace": "Relaxing",
            "mandatory_locations": [],
            "num_travelers": 1
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_trace_records_each_completed_stage() {
        let pipeline = Pipeline::new(
            MockComputation::succeeding(r#"{"days":3}"#),
            MockGeneration::responding(r#"{"title":"Coast"}"#),
        );

        let run = pipeline.run_with_trace(request()).await.unwrap();
        let stages: Vec<_> = run.stages.iter().map(|timing| timing.stage).collect();
        assert_eq!(stages, PipelineStage::ORDER[..5].to_vec());
        assert_eq!(run.computation_output, json!({"days": 3}));
        assert_eq!(run.itinerary.title(), Some("Coast"));
    }

    #[tokio::test]
    async fn test_generation_not_called_after_computation_failure() {
        let computation = Arc::new(MockComputation::failing("Traceback: KeyError 'pace'"));
        let generation = Arc::new(MockGeneration::responding("{}"));
        let pipeline = Pipeline::from_shared(computation.clone(), generation.clone());

        let err = pipeline.generate_itinerary(request()).await.unwrap_err();
        assert!(matches!(err, PipelineError::ComputationProcess { .. }));
        assert!(err.to_string().contains("KeyError"));
        assert_eq!(computation.calls(), 1);
        assert_eq!(generation.calls(), 0);
    }

    #[tokio::test]
    async fn test_service_error_propagates() {
        let pipeline = Pipeline::new(
            MockComputation::succeeding("{}"),
            MockGeneration::failing("quota exceeded"),
        );

        let err = pipeline.generate_itinerary(request()).await.unwrap_err();
        assert!(matches!(err, PipelineError::GenerationService(_)));
        assert_eq!(err.stage(), Some(PipelineStage::Enhancing));
        assert!(err.to_string().contains("quota exceeded"));
    }
}
