pub mod computation;
pub mod generation;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;
pub mod openai_client;
pub mod prompt;

pub use computation::{ComputationStage, ProcessInvoker};
pub use generation::{ChatCompletionService, GenerationService};
#[cfg(any(test, feature = "test-util"))]
pub use mock::{MockComputation, MockGeneration};
pub use prompt::build_enhancement_prompt;
