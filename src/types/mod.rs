pub mod itinerary;
pub mod place;
pub mod run;
pub mod trip_request;

pub use itinerary::{
    BudgetBreakdown, DailyItinerary, EnhancedItinerary, Itinerary, ItineraryStop, TripSummary,
};
pub use place::PlaceId;
pub use run::{PipelineRun, StageTiming};
pub use trip_request::{Preferences, TripRequest};
