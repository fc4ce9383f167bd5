use std::time::Duration;

use thiserror::Error;

use crate::core::stage::PipelineStage;

/// Message returned to callers for any request missing required trip fields.
pub const MISSING_FIELDS_MESSAGE: &str = "Missing required fields in request";

/// Main error type for the itinerary pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required fields in request: {}", .missing.join(", "))]
    Validation { missing: Vec<String> },

    #[error("Failed to start computation process: {0}")]
    ComputationLaunch(String),

    #[error("Computation process failed ({status}): {stderr}")]
    ComputationProcess { status: String, stderr: String },

    #[error("Computation output is not valid JSON: {0}")]
    ComputationContract(String),

    #[error("Generation service error: {0}")]
    GenerationService(String),

    #[error("Generation response is not valid JSON: {0}")]
    GenerationContract(String),

    #[error("Timeout error: {stage} did not finish within {}s", .after.as_secs_f64())]
    Timeout {
        stage: PipelineStage,
        after: Duration,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, PipelineError>;

impl PipelineError {
    /// Whether the caller, not a collaborator, is at fault
    pub fn is_client_error(&self) -> bool {
        matches!(self, PipelineError::Validation { .. })
    }

    /// Stage the error was raised in, when it belongs to one
    pub fn stage(&self) -> Option<PipelineStage> {
        match self {
            PipelineError::Validation { .. } => Some(PipelineStage::Validating),
            PipelineError::ComputationLaunch(_) | PipelineError::ComputationProcess { .. } => {
                Some(PipelineStage::Computing)
            }
            PipelineError::ComputationContract(_) => Some(PipelineStage::ParsingComputationOutput),
            PipelineError::GenerationService(_) => Some(PipelineStage::Enhancing),
            PipelineError::GenerationContract(_) => Some(PipelineStage::ParsingEnhancementOutput),
            PipelineError::Timeout { stage, .. } => Some(*stage),
            PipelineError::Config(_) | PipelineError::Serialization(_) => None,
        }
    }

    /// Get the error code for structured responses
    pub fn error_code(&self) -> &'static str {
        match self {
            PipelineError::Config(_) => "CONFIG_ERROR",
            PipelineError::Validation { .. } => "VALIDATION_ERROR",
            PipelineError::ComputationLaunch(_) => "COMPUTATION_LAUNCH_ERROR",
            PipelineError::ComputationProcess { .. } => "COMPUTATION_PROCESS_ERROR",
            PipelineError::ComputationContract(_) => "COMPUTATION_CONTRACT_ERROR",
            PipelineError::GenerationService(_) => "GENERATION_SERVICE_ERROR",
            PipelineError::GenerationContract(_) => "GENERATION_CONTRACT_ERROR",
            PipelineError::Timeout { .. } => "TIMEOUT_ERROR",
            PipelineError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Convert to a structured error payload
    pub fn to_error_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
                "stage": self.stage().map(|stage| stage.as_str()),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_error_embeds_stderr() {
        let err = PipelineError::ComputationProcess {
            status: "exit status: 1".to_string(),
            stderr: "boom".to_string(),
        };
        assert!(err.to_string().contains("boom"));
        assert_eq!(err.error_code(), "COMPUTATION_PROCESS_ERROR");
        assert_eq!(err.stage(), Some(PipelineStage::Computing));
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_validation_error_lists_fields() {
        let err = PipelineError::Validation {
            missing: vec!["pace".to_string(), "end_date".to_string()],
        };
        assert!(err.is_client_error());
        assert_eq!(
            err.to_string(),
            "Missing required fields in request: pace, end_date"
        );
    }

    #[test]
    fn test_error_payload() {
        let err = PipelineError::Timeout {
            stage: PipelineStage::Enhancing,
            after: Duration::from_secs(30),
        };
        let payload = err.to_error_payload();
        assert_eq!(payload["error"]["code"], "TIMEOUT_ERROR");
        assert_eq!(payload["error"]["stage"], "enhancing");

        let config = PipelineError::Config("missing key".to_string()).to_error_payload();
        assert!(config["error"]["stage"].is_null());
    }
}
