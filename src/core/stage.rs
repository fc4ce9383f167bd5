use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a single invocation within the strictly sequential pipeline.
///
/// Stages only move forward; any of them may end the run with an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Validating,
    Computing,
    ParsingComputationOutput,
    Enhancing,
    ParsingEnhancementOutput,
    Done,
}

impl PipelineStage {
    /// Stages in the order a successful run passes through them.
    pub const ORDER: [PipelineStage; 6] = [
        PipelineStage::Validating,
        PipelineStage::Computing,
        PipelineStage::ParsingComputationOutput,
        PipelineStage::Enhancing,
        PipelineStage::ParsingEnhancementOutput,
        PipelineStage::Done,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Validating => "validating",
            PipelineStage::Computing => "computing",
            PipelineStage::ParsingComputationOutput => "parsing_computation_output",
            PipelineStage::Enhancing => "enhancing",
            PipelineStage::ParsingEnhancementOutput => "parsing_enhancement_output",
            PipelineStage::Done => "done",
        }
    }

    /// The stage that follows this one, `None` once `Done`.
    pub fn next(&self) -> Option<PipelineStage> {
        let idx = Self::ORDER.iter().position(|stage| stage == self)?;
        Self::ORDER.get(idx + 1).copied()
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stages_only_move_forward() {
        let mut stage = PipelineStage::Validating;
        let mut visited = vec![stage];
        while let Some(next) = stage.next() {
            stage = next;
            visited.push(stage);
        }
        assert_eq!(visited, PipelineStage::ORDER.to_vec());
        assert_eq!(PipelineStage::Done.next(), None);
    }

    #[test]
    fn test_stage_serializes_snake_case() {
        let value = serde_json::to_value(PipelineStage::ParsingComputationOutput).unwrap();
        assert_eq!(value, "parsing_computation_output");
        assert_eq!(
            PipelineStage::Enhancing.to_string(),
            PipelineStage::Enhancing.as_str()
        );
    }
}
