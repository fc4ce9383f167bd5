//! itinerary-pipeline: two-stage travel itinerary generation
//!
//! A trip request is validated, handed to an external optimizer process whose
//! JSON output is then rewritten by an LLM into a narrative itinerary.
//! Both stages sit behind traits so either can be swapped or mocked.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use itinerary_pipeline::{Pipeline, PipelineConfig, TripRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PipelineConfig::from_env()?;
//!     let pipeline = Pipeline::from_config(&config);
//!
//!     let request: TripRequest = serde_json::from_str(
//!         r#"{"start_date":"2025-01-10","end_date":"2025-01-14",
//!             "preferences":{"Historical":60,"Nature":40},"pace":"Balanced",
//!             "mandatory_locations":[],"num_travelers":2}"#,
//!     )?;
//!
//!     let itinerary = pipeline.generate_itinerary(request).await?;
//!     println!("{}", serde_json::to_string_pretty(itinerary.value())?);
//!     Ok(())
//! }
//! ```

extern crate self as itinerary_pipeline;

pub mod config;
pub mod contract;
pub mod core;
pub mod error;
pub mod optimizer;
pub mod server;
pub mod services;
pub mod types;

pub use config::PipelineConfig;
pub use contract::{
    deserialize_contract, parse_computation_output, parse_generation_output,
    strip_markdown_fences, ContractHandle, ResponseContract,
};
pub use core::{Pipeline, PipelineStage};
pub use error::{PipelineError, Result};
pub use itinerary_macros::response_contract;
pub use services::{
    build_enhancement_prompt, ChatCompletionService, ComputationStage, GenerationService,
    ProcessInvoker,
};
pub use types::{
    EnhancedItinerary, Itinerary, PipelineRun, PlaceId, Preferences, StageTiming, TripRequest,
};

#[cfg(feature = "cli")]
pub mod cli;
