//! Computation stage executable.
//!
//! Usage: `trip-optimizer <catalog.json> '<trip request json>'`
//!
//! Prints the trip plan as JSON on stdout. Any failure goes to stderr with a
//! non-zero exit status.

use std::process::ExitCode;

use anyhow::{bail, Context};
use itinerary_pipeline::{
    optimizer::{plan_trip, Catalog},
    TripRequest,
};

fn main() -> ExitCode {
    match run() {
        Ok(plan) => {
            println!("{plan}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("trip-optimizer: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<String> {
    let mut args = std::env::args().skip(1);
    let (Some(catalog_path), Some(raw_request)) = (args.next(), args.next()) else {
        bail!("usage: trip-optimizer <catalog.json> '<trip request json>'");
    };

    let catalog = Catalog::from_path(&catalog_path)?;
    let request: TripRequest =
        serde_json::from_str(&raw_request).context("trip request is not valid JSON")?;

    let plan = plan_trip(&catalog, &request)?;
    serde_json::to_string_pretty(&plan).context("cannot serialize trip plan")
}
