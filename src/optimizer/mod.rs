//! Deterministic trip optimizer.
//!
//! Scores catalog places against the traveler's preferences, picks as many as
//! the pace allows, orders them with a distance-bounded nearest-neighbour walk
//! and prices the result. The `trip-optimizer` binary wraps [`plan_trip`] so it
//! can serve as the pipeline's computation stage.

pub mod catalog;
pub mod pace;
pub mod planner;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use catalog::{Catalog, CatalogData, Distance, Location};
pub use pace::Pace;
pub use planner::{in_season, plan_trip};

#[derive(Error, Debug)]
pub enum OptimizerError {
    #[error("Unknown pace: {0}")]
    UnknownPace(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Invalid date for {field}: {value}")]
    InvalidDate { field: &'static str, value: String },

    #[error("End date {end} is before start date {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Number of travelers must be at least 1")]
    NoTravelers,
}

/// The optimizer's output document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripPlan {
    pub trip_duration: usize,
    pub pace: Pace,
    pub num_travelers: u32,
    pub min_budget_per_person: f64,
    pub actual_budget_per_person: f64,
    pub total_group_budget: f64,
    pub total_locations: usize,
    pub itinerary: Vec<PlannedStop>,
    pub budget_breakdown_per_person: PlanBudget,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedStop {
    pub day: usize,
    pub place_id: String,
    pub name: String,
    pub types: Vec<String>,
    pub rating: f64,
    pub season: Vec<String>,
    /// Zero for the last stop of the trip
    pub distance_to_next_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanBudget {
    pub transportation: f64,
    pub accommodation: f64,
    pub food: f64,
    pub activities: f64,
    pub total: f64,
}
