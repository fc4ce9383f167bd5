use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use super::place::{null_as_empty, PlaceId};
use crate::error::{PipelineError, Result};

/// Traveler preferences: category weights (percentages) or a free-text description.
///
/// Weights are held as the caller wrote them so they are forwarded unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Preferences {
    Weights(Map<String, Value>),
    Text(String),
}

impl Preferences {
    /// Weight for a location category, `0.0` when unweighted or not numeric.
    pub fn weight(&self, category: &str) -> f64 {
        match self {
            Preferences::Weights(weights) => weights
                .get(category)
                .and_then(Value::as_f64)
                .unwrap_or(0.0),
            Preferences::Text(_) => 0.0,
        }
    }

    fn is_blank(&self) -> bool {
        matches!(self, Preferences::Text(text) if text.is_empty())
    }
}

/// Trip constraints supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripRequest {
    /// ISO date (`YYYY-MM-DD`) the trip starts on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// ISO date (`YYYY-MM-DD`) of the last day of the trip
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferences: Option<Preferences>,
    /// `Fast-Paced`, `Balanced` or `Relaxing`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pace: Option<String>,
    /// Place names that must appear in the itinerary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mandatory_locations: Option<Vec<String>>,
    /// Place names that must not appear
    #[serde(default, deserialize_with = "null_as_empty")]
    pub excluded_locations: Vec<String>,
    /// Place ids to favour when ranking
    #[serde(default, deserialize_with = "null_as_empty")]
    pub specific_interests: Vec<PlaceId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_travelers: Option<u32>,
    /// Fields this crate does not interpret, passed through to the process
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TripRequest {
    /// Names of required fields that are absent or empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();

        if is_blank(self.start_date.as_deref()) {
            missing.push("start_date");
        }
        if is_blank(self.end_date.as_deref()) {
            missing.push("end_date");
        }
        if self.preferences.as_ref().map_or(true, Preferences::is_blank) {
            missing.push("preferences");
        }
        if is_blank(self.pace.as_deref()) {
            missing.push("pace");
        }
        // An empty list is still a supplied list.
        if self.mandatory_locations.is_none() {
            missing.push("mandatory_locations");
        }
        if self.num_travelers.unwrap_or(0) == 0 {
            missing.push("num_travelers");
        }

        missing
    }

    /// Check required fields, handing the request back untouched on success.
    pub fn validate(self) -> Result<Self> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            return Ok(self);
        }

        debug!(target: "itinerary::pipeline", ?missing, "trip request rejected");
        Err(PipelineError::Validation {
            missing: missing.into_iter().map(str::to_string).collect(),
        })
    }

    /// JSON form handed to the computation process as a single argument.
    ///
    /// Field order follows the struct, with unknown caller fields appended.
    /// Absent optional lists are written as `[]`.
    pub fn to_argument(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn mandatory(&self) -> &[String] {
        self.mandatory_locations.as_deref().unwrap_or_default()
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, str::is_empty)
}
