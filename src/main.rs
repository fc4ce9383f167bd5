use std::process::ExitCode;

#[cfg(feature = "cli")]
#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    itinerary_pipeline::cli::run().await
}

#[cfg(not(feature = "cli"))]
fn main() -> ExitCode {
    eprintln!("CLI feature not enabled. Build with --features cli");
    ExitCode::FAILURE
}
