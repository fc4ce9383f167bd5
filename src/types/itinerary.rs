use itinerary_macros::response_contract;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    contract::{deserialize_contract, ResponseContract},
    error::Result,
};

/// Final itinerary document as parsed from the generative service.
///
/// The pipeline only guarantees that this is JSON; use
/// [`Itinerary::deserialize`] for a typed view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Itinerary {
    value: Value,
}

impl Itinerary {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn title(&self) -> Option<&str> {
        self.value.get("title").and_then(Value::as_str)
    }

    pub fn deserialize<T>(&self) -> Result<T>
    where
        T: ResponseContract,
    {
        deserialize_contract::<T>(&self.value)
    }
}

/// User-facing travel itinerary with a day-by-day plan and budget.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[response_contract]
pub struct EnhancedItinerary {
    /// Short, descriptive title for the trip
    pub title: String,
    /// Headline numbers for the whole trip
    pub trip_summary: TripSummary,
    /// One entry per day, in order
    pub daily_itineraries: Vec<DailyItinerary>,
    /// Cost estimate split by category
    pub budget_breakdown: BudgetBreakdown,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TripSummary {
    /// Number of days including the first and last
    pub trip_duration: f64,
    /// Pace the plan was built for
    pub pace: String,
    pub num_travelers: f64,
    /// Estimated spend for a single traveler
    pub budget_estimate_per_person: f64,
    pub total_group_budget: f64,
    pub total_locations: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DailyItinerary {
    /// 1-based day counter
    pub day: f64,
    /// Narrative overview of the day
    pub description: String,
    pub locations: Vec<ItineraryStop>,
    /// Human-readable distance, e.g. "85 km"
    pub total_travel_distance: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ItineraryStop {
    pub name: String,
    /// Category labels joined into one string
    pub types: String,
    pub rating: f64,
    /// Human-readable distance to the following stop
    pub distance_to_next: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BudgetBreakdown {
    pub transportation: f64,
    pub accommodation: f64,
    pub food: f64,
    pub activities: f64,
    pub total_per_person: f64,
    pub total_for_group: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "title": "Cultural Triangle in Five Days",
            "trip_summary": {
                "trip_duration": 5,
                "pace": "Balanced",
                "num_travelers": 2,
                "budget_estimate_per_person": 512.5,
                "total_group_budget": 1025.0,
                "total_locations": 3
            },
            "daily_itineraries": [{
                "day": 1,
                "description": "Climb the rock fortress at dawn.",
                "locations": [{
                    "name": "Sigiriya",
                    "types": "Historical, Nature",
                    "rating": 4.8,
                    "distance_to_next": "22 km"
                }],
                "total_travel_distance": "22 km"
            }],
            "budget_breakdown": {
                "transportation": 12.5,
                "accommodation": 250,
                "food": 150,
                "activities": 30,
                "total_per_person": 512.5,
                "total_for_group": 1025
            }
        })
    }

    #[test]
    fn test_typed_view() {
        let itinerary = Itinerary::new(sample());
        let typed: EnhancedItinerary = itinerary.deserialize().unwrap();
        assert_eq!(typed.title, "Cultural Triangle in Five Days");
        assert_eq!(typed.daily_itineraries[0].locations[0].name, "Sigiriya");
        assert_eq!(typed.budget_breakdown.total_for_group, 1025.0);
    }

    #[test]
    fn test_typed_view_reports_path() {
        let mut value = sample();
        value["daily_itineraries"][0]["locations"][0]["rating"] = json!("great");
        let err = Itinerary::new(value)
            .deserialize::<EnhancedItinerary>()
            .unwrap_err();
        assert!(matches!(err, PipelineError::GenerationContract(_)));
        let message = err.to_string();
        assert!(message.contains("EnhancedItinerary"));
        assert!(message.contains("daily_itineraries[0].locations[0].rating"));
    }

    #[test]
    fn test_contract_schema_carries_docs() {
        let handle = EnhancedItinerary::contract();
        assert_eq!(handle.name(), "EnhancedItinerary");
        let schema = handle.schema();
        assert_eq!(schema["title"], "EnhancedItinerary");
        assert_eq!(
            schema["properties"]["title"]["description"],
            "Short, descriptive title for the trip"
        );
        assert!(schema["definitions"]["DailyItinerary"].is_object());
    }

    #[test]
    fn test_itinerary_serializes_transparently() {
        let itinerary = Itinerary::new(json!({"title": "Test Trip"}));
        assert_eq!(
            serde_json::to_value(&itinerary).unwrap(),
            json!({"title": "Test Trip"})
        );
        assert_eq!(itinerary.title(), Some("Test Trip"));
    }
}
