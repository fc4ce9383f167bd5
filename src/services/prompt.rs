use serde_json::Value;

use crate::error::Result;

/// Shape the generative service is asked to reproduce, field for field.
const ITINERARY_TEMPLATE: &str = r#"{
  "title": "Descriptive trip title",
  "trip_summary": {
    "trip_duration": 5,
    "pace": "Balanced",
    "num_travelers": 2,
    "budget_estimate_per_person": 450.0,
    "total_group_budget": 900.0,
    "total_locations": 9
  },
  "daily_itineraries": [
    {
      "day": 1,
      "description": "Narrative overview of the day",
      "locations": [
        {
          "name": "Location name",
          "types": "Historical, Nature",
          "rating": 4.6,
          "distance_to_next": "35 km"
        }
      ],
      "total_travel_distance": "120 km"
    }
  ],
  "budget_breakdown": {
    "transportation": 60.0,
    "accommodation": 250.0,
    "food": 150.0,
    "activities": 90.0,
    "total_per_person": 450.0,
    "total_for_group": 900.0
  }
}"#;

/// Build the enhancement instruction around the computation stage's output.
///
/// The output is embedded pretty-printed and otherwise unchanged.
pub fn build_enhancement_prompt(computation_output: &Value) -> Result<String> {
    let context = serde_json::to_string_pretty(computation_output)?;

    Ok(format!(
        "You are a travel planner. Turn the optimized trip data below into a polished, \
user-facing itinerary.\n\
\n\
Optimized trip data:\n\
{context}\n\
\n\
Instructions:\n\
- Keep every location, its order and its day assignment from the data.\n\
- Write an engaging description for each day.\n\
- Express distances as text with units, e.g. \"35 km\".\n\
- Derive the budget figures from the data; totals for the group multiply the per-person total by the number of travelers.\n\
\n\
Respond with a single JSON object with exactly this structure:\n\
{ITINERARY_TEMPLATE}\n\
\n\
Return only the raw JSON object. Do not wrap it in markdown code fences (no ```json or ```) \
and do not add any text before or after it."
    ))
}
