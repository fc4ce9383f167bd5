use serde_json::Value;
use tracing::debug;

use super::ResponseContract;
use crate::{
    error::{PipelineError, Result},
    types::itinerary::Itinerary,
};

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

/// Parse the computation stage's raw stdout.
pub fn parse_computation_output(raw: &str) -> Result<Value> {
    serde_json::from_str(raw).map_err(|err| {
        debug!(
            target: "itinerary::contract",
            bytes = raw.len(),
            error = %err,
            "computation stdout is not JSON"
        );
        PipelineError::ComputationContract(err.to_string())
    })
}

/// Remove a markdown code fence wrapped around a model response.
///
/// Only a leading ```` ```json ```` / ```` ``` ```` and a trailing ```` ``` ````
/// are removed; text between them is returned as-is apart from trimming.
pub fn strip_markdown_fences(text: &str) -> &str {
    let trimmed = text.trim();

    let body = trimmed
        .strip_prefix(JSON_FENCE)
        .or_else(|| trimmed.strip_prefix(FENCE))
        .unwrap_or(trimmed);
    let body = body.strip_suffix(FENCE).unwrap_or(body);

    body.trim()
}

/// Sanitize and parse the generative service's raw response.
pub fn parse_generation_output(raw: &str) -> Result<Itinerary> {
    let body = strip_markdown_fences(raw);
    serde_json::from_str::<Value>(body)
        .map(Itinerary::new)
        .map_err(|err| {
            debug!(
                target: "itinerary::contract",
                bytes = raw.len(),
                error = %err,
                "model response is not JSON"
            );
            PipelineError::GenerationContract(err.to_string())
        })
}

/// Deserialize a parsed document into a typed contract, reporting the failing path.
pub fn deserialize_contract<T>(payload: &Value) -> Result<T>
where
    T: ResponseContract,
{
    serde_path_to_error::deserialize(payload).map_err(|err| {
        let path = err.path().to_string();
        let location = if path.is_empty() || path == "." {
            "<root>".to_string()
        } else {
            path
        };
        PipelineError::GenerationContract(format!(
            "`{}` does not match at {}: {}",
            T::contract().name(),
            location,
            err.inner()
        ))
    })
}
