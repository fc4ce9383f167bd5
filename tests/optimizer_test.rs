use std::sync::Arc;

use serde_json::{json, Value};
use tokio_test::{assert_err, assert_ok};

use itinerary_pipeline::{
    optimizer::{plan_trip, Catalog, Pace},
    services::MockGeneration,
    ComputationStage, Pipeline, PipelineError, ProcessInvoker, TripRequest,
};

const CATALOG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/sample_catalog.json");
const OPTIMIZER: &str = env!("CARGO_BIN_EXE_trip-optimizer");

fn request() -> Value {
    json!({
        "start_date": "2025-01-10",
        "end_date": "2025-01-13",
        "preferences": {"Historical": 50, "Religious": 30, "Nature": 20},
        "pace": "Balanced",
        "mandatory_locations": ["Galle Fort"],
        "excluded_locations": ["Dambulla Cave Temple"],
        "num_travelers": 2
    })
}

#[test]
fn test_sample_catalog_plan() {
    let catalog = Catalog::from_path(CATALOG).unwrap();
    let request: TripRequest = serde_json::from_value(request()).unwrap();

    let plan = plan_trip(&catalog, &request).unwrap();

    assert_eq!(plan.trip_duration, 4);
    assert_eq!(plan.pace, Pace::Balanced);
    assert_eq!(plan.itinerary[0].name, "Galle Fort");
    assert!(plan
        .itinerary
        .iter()
        .all(|stop| stop.name != "Dambulla Cave Temple"));
    assert!(plan.itinerary.iter().all(|stop| (1..=4).contains(&stop.day)));
    assert!(plan.total_locations <= 12);
    assert_eq!(plan.total_locations, plan.itinerary.len());
    assert_eq!(
        plan.total_group_budget,
        plan.actual_budget_per_person * 2.0
    );

    let routed_km: f64 = plan
        .itinerary
        .iter()
        .map(|stop| stop.distance_to_next_km)
        .sum();
    assert!(routed_km <= 300.0 * 4.0);
    assert_eq!(plan.itinerary.last().unwrap().distance_to_next_km, 0.0);
}

#[tokio::test]
async fn test_binary_honours_process_contract() {
    let invoker = ProcessInvoker::new(OPTIMIZER, CATALOG);
    let argument = serde_json::to_string(&request()).unwrap();

    let stdout = assert_ok!(invoker.run(&argument).await);
    let plan: Value = serde_json::from_str(&stdout).unwrap();

    assert_eq!(plan["trip_duration"], 4);
    assert_eq!(plan["pace"], "Balanced");
    assert_eq!(plan["itinerary"][0]["name"], "Galle Fort");
    assert!(plan["itinerary"][0]["types"].is_array());
    assert!(plan["budget_breakdown_per_person"]["total"].is_number());
}

#[tokio::test]
async fn test_binary_reports_unknown_pace_on_stderr() {
    let invoker = ProcessInvoker::new(OPTIMIZER, CATALOG);
    let mut body = request();
    body["pace"] = json!("Leisurely");

    let err = assert_err!(invoker.run(&body.to_string()).await);
    match err {
        PipelineError::ComputationProcess { stderr, .. } => {
            assert!(stderr.contains("Unknown pace: Leisurely"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_pipeline_with_optimizer_binary() {
    let generation = Arc::new(MockGeneration::responding(
        json!({"title": "Forts and Temples", "daily_itineraries": []}).to_string(),
    ));
    let pipeline = Pipeline::from_shared(
        Arc::new(ProcessInvoker::new(OPTIMIZER, CATALOG)),
        generation.clone(),
    );
    let request: TripRequest = serde_json::from_value(request()).unwrap();

    let run = assert_ok!(pipeline.run_with_trace(request).await);

    assert_eq!(run.itinerary.title(), Some("Forts and Temples"));
    assert_eq!(run.computation_output["itinerary"][0]["name"], "Galle Fort");
    assert!(generation.prompts()[0].contains("Galle Fort"));
}
