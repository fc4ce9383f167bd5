use std::{cmp::Ordering, collections::HashSet};

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use super::{
    catalog::{Catalog, Location},
    pace::Pace,
    OptimizerError, PlanBudget, PlannedStop, TripPlan,
};
use crate::types::TripRequest;

const FUEL_COST_PER_KM: f64 = 0.2;
const BASE_COST_PER_DAY: f64 = 50.0;
const ACCOMMODATION_PER_DAY: f64 = 50.0;
const FOOD_PER_DAY: f64 = 30.0;
const ACTIVITY_COST_PER_LOCATION: f64 = 10.0;
const IN_SEASON_BOOST: f64 = 2.0;
const INTEREST_BOOST: f64 = 1.5;

/// Build an optimized trip plan from a catalog and the traveler's constraints.
pub fn plan_trip(catalog: &Catalog, request: &TripRequest) -> Result<TripPlan, OptimizerError> {
    let start = parse_date("start_date", request.start_date.as_deref())?;
    let end = parse_date("end_date", request.end_date.as_deref())?;
    let days = (end - start).num_days() + 1;
    if days < 1 {
        return Err(OptimizerError::InvalidRange { start, end });
    }
    let duration = days as usize;

    let pace: Pace = request.pace.as_deref().unwrap_or("Balanced").parse()?;
    let num_travelers = request.num_travelers.unwrap_or(1);
    if num_travelers == 0 {
        return Err(OptimizerError::NoTravelers);
    }
    let travelers = f64::from(num_travelers);

    let min_budget =
        pace.distance_per_day_km() * FUEL_COST_PER_KM * duration as f64 / travelers
            + BASE_COST_PER_DAY * duration as f64;

    let selected = select_locations(catalog, request, pace, duration, start, end);
    let routed = route(catalog, selected, pace.distance_per_day_km() * duration as f64);
    let stops = assign_days(catalog, &routed, duration);

    let total_distance: f64 = stops
        .windows(2)
        .map(|pair| catalog.distance_or_zero(&pair[0].place_id, &pair[1].place_id))
        .sum();

    let transportation = total_distance * FUEL_COST_PER_KM / travelers;
    let accommodation = duration as f64 * ACCOMMODATION_PER_DAY;
    let food = duration as f64 * FOOD_PER_DAY;
    let activities = stops.len() as f64 * ACTIVITY_COST_PER_LOCATION;
    let actual_budget = if stops.is_empty() {
        0.0
    } else {
        (transportation + accommodation + food + activities) * pace.budget_multiplier()
    };

    debug!(
        target: "itinerary::optimizer",
        duration,
        %pace,
        stops = stops.len(),
        total_distance,
        "trip planned"
    );

    Ok(TripPlan {
        trip_duration: duration,
        pace,
        num_travelers,
        min_budget_per_person: min_budget,
        actual_budget_per_person: actual_budget,
        total_group_budget: actual_budget * travelers,
        total_locations: stops.len(),
        itinerary: stops,
        budget_breakdown_per_person: PlanBudget {
            transportation,
            accommodation,
            food,
            activities,
            total: actual_budget,
        },
    })
}

fn parse_date(field: &'static str, value: Option<&str>) -> Result<NaiveDate, OptimizerError> {
    let value = value.ok_or(OptimizerError::MissingField(field))?;
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| OptimizerError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

/// Whether the trip's first or last month falls in one of the place's seasons.
pub fn in_season(seasons: &[String], start: NaiveDate, end: NaiveDate) -> bool {
    let months = [start.month(), end.month()];
    let listed = |code: &str| seasons.iter().any(|season| season == code);

    let dec_apr = listed("DEC-APR") && months.iter().any(|&m| m >= 12 || m <= 4);
    let jun_sep = listed("JUN-SEP") && months.iter().any(|m| (6..=9).contains(m));

    dec_apr || jun_sep
}

fn select_locations<'a>(
    catalog: &'a Catalog,
    request: &TripRequest,
    pace: Pace,
    duration: usize,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<&'a Location> {
    let excluded: HashSet<&str> = request
        .excluded_locations
        .iter()
        .map(String::as_str)
        .collect();
    let mandatory_names: HashSet<&str> = request.mandatory().iter().map(String::as_str).collect();
    let interests: HashSet<String> = request
        .specific_interests
        .iter()
        .map(ToString::to_string)
        .collect();

    let (mandatory, pool): (Vec<&Location>, Vec<&Location>) = catalog
        .locations()
        .iter()
        .filter(|location| !excluded.contains(location.name.as_str()))
        .partition(|location| mandatory_names.contains(location.name.as_str()));

    let mut ranked: Vec<(&Location, f64)> = pool
        .into_iter()
        .map(|location| {
            let mut score: f64 = location
                .types
                .iter()
                .map(|category| {
                    let weight = request
                        .preferences
                        .as_ref()
                        .map_or(0.0, |preferences| preferences.weight(category));
                    location.rating * weight / 100.0
                })
                .sum();
            if in_season(&location.season, start, end) {
                score *= IN_SEASON_BOOST;
            }
            if interests.contains(&location.place_id) {
                score *= INTEREST_BOOST;
            }
            (location, score)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    let capacity = (ranked.len() + mandatory.len()).min(duration * pace.locations_per_day());
    let remaining_slots = capacity.saturating_sub(mandatory.len());

    mandatory
        .into_iter()
        .chain(ranked.into_iter().take(remaining_slots).map(|(location, _)| location))
        .collect()
}

/// Greedy nearest-neighbour ordering bounded by the trip's distance allowance.
///
/// Places with no known distance from the current stop are never reached.
fn route<'a>(catalog: &Catalog, locations: Vec<&'a Location>, allowance_km: f64) -> Vec<&'a Location> {
    let mut remaining = locations.into_iter();
    let Some(first) = remaining.next() else {
        return Vec::new();
    };
    let mut remaining: Vec<&Location> = remaining.collect();

    let mut ordered = vec![first];
    let mut current = first;
    let mut travelled = 0.0;

    while !remaining.is_empty() && travelled < allowance_km {
        let closest = remaining
            .iter()
            .enumerate()
            .filter_map(|(idx, candidate)| {
                catalog
                    .distance(&current.place_id, &candidate.place_id)
                    .map(|km| (idx, km))
            })
            .fold(None, |best: Option<(usize, f64)>, (idx, km)| match best {
                Some((_, best_km)) if best_km <= km => best,
                _ => Some((idx, km)),
            });

        let Some((idx, km)) = closest else {
            break;
        };

        travelled += km;
        if travelled > allowance_km {
            break;
        }
        current = remaining.remove(idx);
        ordered.push(current);
    }

    ordered
}

fn assign_days(catalog: &Catalog, locations: &[&Location], duration: usize) -> Vec<PlannedStop> {
    if locations.is_empty() {
        return Vec::new();
    }
    let per_day = locations.len().div_ceil(duration);

    locations
        .iter()
        .enumerate()
        .map(|(idx, location)| (idx / per_day + 1, idx, location))
        .filter(|(day, _, _)| *day <= duration)
        .map(|(day, idx, location)| PlannedStop {
            day,
            place_id: location.place_id.clone(),
            name: location.name.clone(),
            types: location.types.clone(),
            rating: location.rating,
            season: location.season.clone(),
            distance_to_next_km: locations
                .get(idx + 1)
                .map_or(0.0, |next| catalog.distance_or_zero(&location.place_id, &next.place_id)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimizer::catalog::CatalogData;
    use serde_json::json;

    fn catalog() -> Catalog {
        let data: CatalogData = serde_json::from_value(json!({
            "locations": [
                {"place_id": "A", "name": "Sigiriya", "type": ["Historical", "Nature"], "rating": 4.8, "season": ["DEC-APR"]},
                {"place_id": "B", "name": "Dambulla", "type": ["Historical"], "rating": 4.5, "season": ["DEC-APR"]},
                {"place_id": "C", "name": "Kandy", "type": ["Cultural"], "rating": 4.6, "season": ["JUN-SEP"]},
                {"place_id": "D", "name": "Ella", "type": ["Nature"], "rating": 4.7, "season": ["JUN-SEP"]},
                {"place_id": "E", "name": "Mirissa", "type": ["Beach"], "rating": 4.4, "season": ["DEC-APR"]}
            ],
            "distances": [
                {"place_id_from": "A", "place_id_to": "B", "distance_km": 20},
                {"place_id_from": "B", "place_id_to": "C", "distance_km": 70},
                {"place_id_from": "A", "place_id_to": "C", "distance_km": 90},
                {"place_id_from": "C", "place_id_to": "D", "distance_km": 140},
                {"place_id_from": "B", "place_id_to": "D", "distance_km": 200},
                {"place_id_from": "A", "place_id_to": "D", "distance_km": 230},
                {"place_id_from": "D", "place_id_to": "E", "distance_km": 150},
                {"place_id_from": "C", "place_id_to": "E", "distance_km": 240},
                {"place_id_from": "A", "place_id_to": "E", "distance_km": 330},
                {"place_id_from": "B", "place_id_to": "E", "distance_km": 310}
            ]
        }))
        .unwrap();
        Catalog::new(data)
    }

    fn request(body: serde_json::Value) -> TripRequest {
        serde_json::from_value(body).unwrap()
    }

    fn names(plan: &TripPlan) -> Vec<&str> {
        plan.itinerary.iter().map(|stop| stop.name.as_str()).collect()
    }

    #[test]
    fn test_ranked_route_with_days_and_budget() {
        let plan = plan_trip(
            &catalog(),
            &request(json!({
                "start_date": "2025-01-10",
                "end_date": "2025-01-11",
                "preferences": {"Historical": 60, "Nature": 40},
                "pace": "Relaxing",
                "mandatory_locations": [],
                "num_travelers": 2
            })),
        )
        .unwrap();

        assert_eq!(plan.trip_duration, 2);
        assert_eq!(names(&plan), vec!["Sigiriya", "Dambulla", "Kandy", "Ella"]);
        let days: Vec<usize> = plan.itinerary.iter().map(|stop| stop.day).collect();
        assert_eq!(days, vec![1, 1, 2, 2]);
        let legs: Vec<f64> = plan
            .itinerary
            .iter()
            .map(|stop| stop.distance_to_next_km)
            .collect();
        assert_eq!(legs, vec![20.0, 70.0, 140.0, 0.0]);

        assert_eq!(plan.min_budget_per_person, 130.0);
        assert_eq!(plan.budget_breakdown_per_person.transportation, 23.0);
        assert_eq!(plan.budget_breakdown_per_person.accommodation, 100.0);
        assert_eq!(plan.budget_breakdown_per_person.food, 60.0);
        assert_eq!(plan.budget_breakdown_per_person.activities, 40.0);
        assert_eq!(plan.actual_budget_per_person, 223.0);
        assert_eq!(plan.total_group_budget, 446.0);
        assert_eq!(plan.total_locations, 4);
    }

    #[test]
    fn test_mandatory_first_excluded_dropped_and_distance_cap() {
        let plan = plan_trip(
            &catalog(),
            &request(json!({
                "start_date": "2025-07-01",
                "end_date": "2025-07-01",
                "preferences": {"Nature": 100},
                "pace": "Balanced",
                "mandatory_locations": ["Mirissa"],
                "excluded_locations": ["Dambulla"],
                "num_travelers": 1
            })),
        )
        .unwrap();

        // Sigiriya is selected but lies beyond the 300 km allowance.
        assert_eq!(names(&plan), vec!["Mirissa", "Ella"]);
        assert!(plan.itinerary.iter().all(|stop| stop.day == 1));
        assert!((plan.actual_budget_per_person - 143.0).abs() < 1e-9);
    }

    #[test]
    fn test_specific_interest_boost_changes_selection() {
        let base = json!({
            "start_date": "2025-01-10",
            "end_date": "2025-01-10",
            "preferences": {"Historical": 30, "Nature": 70},
            "pace": "Relaxing",
            "mandatory_locations": [],
            "num_travelers": 1
        });

        let plain = plan_trip(&catalog(), &request(base.clone())).unwrap();
        assert_eq!(names(&plain), vec!["Sigiriya"]);

        let mut boosted = base;
        boosted["specific_interests"] = json!(["B"]);
        let boosted = plan_trip(&catalog(), &request(boosted)).unwrap();
        assert_eq!(names(&boosted), vec!["Sigiriya", "Dambulla"]);
    }

    #[test]
    fn test_numeric_interest_matches_numeric_catalog_id() {
        let data: CatalogData = serde_json::from_value(json!({
            "locations": [
                {"place_id": 1, "name": "Colombo", "type": ["City"], "rating": 14.0, "season": []},
                {"place_id": 2, "name": "Bentota", "type": ["Beach"], "rating": 13.5, "season": []}
            ],
            "distances": [{"place_id_from": 1, "place_id_to": 2, "distance_km": 60}]
        }))
        .unwrap();
        let body = json!({
            "start_date": "2025-03-01",
            "end_date": "2025-03-01",
            "preferences": {"City": 50, "Beach": 50},
            "pace": "Relaxing",
            "mandatory_locations": [],
            "specific_interests": [2]
        });

        let plan = plan_trip(&Catalog::new(data), &request(body)).unwrap();
        assert_eq!(names(&plan), vec!["Bentota", "Colombo"]);
    }

    #[test]
    fn test_season_windows() {
        let date = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
        let winter = vec!["DEC-APR".to_string()];
        let summer = vec!["JUN-SEP".to_string()];

        assert!(in_season(&winter, date("2024-12-20"), date("2024-12-28")));
        assert!(in_season(&winter, date("2025-04-28"), date("2025-05-03")));
        assert!(!in_season(&winter, date("2025-05-01"), date("2025-05-10")));
        assert!(in_season(&summer, date("2025-05-28"), date("2025-06-02")));
        assert!(!in_season(&summer, date("2025-10-01"), date("2025-11-01")));
        assert!(!in_season(&[], date("2025-01-01"), date("2025-01-02")));
    }

    #[test]
    fn test_invalid_inputs() {
        let mut body = json!({
            "start_date": "2025-01-10",
            "end_date": "2025-01-12",
            "preferences": {},
            "pace": "Leisurely",
            "mandatory_locations": [],
            "num_travelers": 1
        });
        assert!(matches!(
            plan_trip(&catalog(), &request(body.clone())),
            Err(OptimizerError::UnknownPace(pace)) if pace == "Leisurely"
        ));

        body["pace"] = json!("Balanced");
        body["end_date"] = json!("2025-01-01");
        assert!(matches!(
            plan_trip(&catalog(), &request(body.clone())),
            Err(OptimizerError::InvalidRange { .. })
        ));

        body["end_date"] = json!("12/01/2025");
        assert!(matches!(
            plan_trip(&catalog(), &request(body)),
            Err(OptimizerError::InvalidDate { field: "end_date", .. })
        ));
    }

    #[test]
    fn test_empty_catalog_yields_empty_plan() {
        let plan = plan_trip(
            &Catalog::new(CatalogData::default()),
            &request(json!({
                "start_date": "2025-02-01",
                "end_date": "2025-02-03",
                "preferences": "temples",
                "mandatory_locations": []
            })),
        )
        .unwrap();

        assert!(plan.itinerary.is_empty());
        assert_eq!(plan.pace, Pace::Balanced);
        assert_eq!(plan.num_travelers, 1);
        assert_eq!(plan.actual_budget_per_person, 0.0);
        assert_eq!(plan.budget_breakdown_per_person.accommodation, 150.0);
    }
}
