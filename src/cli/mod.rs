use std::{
    env,
    io::{self, Read},
    net::SocketAddr,
    path::Path,
    process::ExitCode,
    sync::Arc,
};

use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::{
    server, EnhancedItinerary, Pipeline, PipelineConfig, PipelineError, ResponseContract,
    TripRequest,
};

const DEFAULT_LOG_FILTER: &str = "itinerary_pipeline=info,itinerary=info,tower_http=info";

/// Flags that override the matching environment variable.
const CONFIG_OVERRIDES: &[(&str, &str)] = &[
    ("program", "ITINERARY_PROGRAM"),
    ("interpreter", "ITINERARY_INTERPRETER"),
    ("model", "ITINERARY_MODEL"),
    ("base-url", "OPENAI_BASE_URL"),
    ("api-key", "OPENAI_API_KEY"),
];

/// CLI entry point for the itinerary tool
pub async fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(io::stderr)
        .init();

    let matches = command().get_matches();

    match matches.subcommand() {
        Some(("serve", sub)) => {
            let port = sub.get_one::<u16>("port").copied().unwrap_or(3000);
            let pipeline = Arc::new(Pipeline::from_config(&load_config(sub)?));
            let addr = SocketAddr::from(([0, 0, 0, 0], port));
            server::serve(addr, pipeline).await?;
        }
        Some(("generate", sub)) => {
            let pipeline = Pipeline::from_config(&load_config(sub)?);
            let source = sub
                .get_one::<String>("request")
                .map(String::as_str)
                .unwrap_or("-");
            let raw_request = read_request(source)?;

            match generate(&pipeline, &raw_request, sub.get_flag("trace")).await {
                Ok(itinerary) => println!("{itinerary}"),
                Err(payload) => {
                    eprintln!("{payload}");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Some(("schema", _)) => {
            let schema = EnhancedItinerary::contract().schema();
            println!("{}", serde_json::to_string_pretty(schema)?);
        }
        _ => unreachable!("subcommand is required"),
    }

    Ok(ExitCode::SUCCESS)
}

/// Run the pipeline once. `Ok` is the pretty itinerary, `Err` the pretty error payload.
async fn generate(pipeline: &Pipeline, raw_request: &str, trace: bool) -> Result<String, String> {
    match generate_itinerary(pipeline, raw_request, trace).await {
        Ok(itinerary) => {
            info!(target: "itinerary::pipeline", "itinerary written to stdout");
            Ok(itinerary)
        }
        Err(err) => {
            error!(target: "itinerary::pipeline", code = err.error_code(), "itinerary generation failed");
            let payload = err.to_error_payload();
            Err(serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string()))
        }
    }
}

async fn generate_itinerary(
    pipeline: &Pipeline,
    raw_request: &str,
    trace: bool,
) -> Result<String, PipelineError> {
    let request: TripRequest = serde_json::from_str(raw_request)?;
    let run = pipeline.run_with_trace(request).await?;
    if trace {
        eprintln!("{}", run.replay());
    }
    Ok(serde_json::to_string_pretty(run.itinerary.value())?)
}

fn command() -> Command {
    Command::new("itinerary")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Generate travel itineraries with a trip optimizer and an LLM")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            with_pipeline_args(Command::new("serve").about("Serve the HTTP API")).arg(
                Arg::new("port")
                    .short('p')
                    .long("port")
                    .env("PORT")
                    .value_name("PORT")
                    .value_parser(clap::value_parser!(u16))
                    .default_value("3000")
                    .help("Port to listen on"),
            ),
        )
        .subcommand(
            with_pipeline_args(
                Command::new("generate").about("Generate one itinerary from a trip request"),
            )
            .arg(
                Arg::new("request")
                    .value_name("REQUEST")
                    .help("Path to a trip request JSON file, or - for stdin")
                    .index(1),
            )
            .arg(
                Arg::new("trace")
                    .long("trace")
                    .action(ArgAction::SetTrue)
                    .help("Print stage timings to stderr"),
            ),
        )
        .subcommand(Command::new("schema").about("Print the JSON schema of the enhanced itinerary"))
}

fn with_pipeline_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("program")
                .long("program")
                .value_name("PATH")
                .help("Computation program (or set ITINERARY_PROGRAM)"),
        )
        .arg(
            Arg::new("interpreter")
                .long("interpreter")
                .value_name("PATH")
                .help("Executable that runs the program (or set ITINERARY_INTERPRETER)"),
        )
        .arg(
            Arg::new("model")
                .short('m')
                .long("model")
                .value_name("MODEL")
                .help("Chat completion model (or set ITINERARY_MODEL)"),
        )
        .arg(
            Arg::new("base-url")
                .short('u')
                .long("base-url")
                .value_name("URL")
                .help("API base URL (or set OPENAI_BASE_URL / OPENROUTER_BASE_URL)"),
        )
        .arg(
            Arg::new("api-key")
                .short('k')
                .long("api-key")
                .value_name("KEY")
                .help("API key (or set OPENAI_API_KEY)"),
        )
}

fn load_config(matches: &ArgMatches) -> crate::Result<PipelineConfig> {
    PipelineConfig::from_lookup(|key| {
        CONFIG_OVERRIDES
            .iter()
            .find(|(_, var)| *var == key)
            .and_then(|(arg, _)| matches.get_one::<String>(arg).cloned())
            .or_else(|| env::var(key).ok())
    })
}

fn read_request(source: &str) -> io::Result<String> {
    if source == "-" {
        let mut raw = String::new();
        io::stdin().read_to_string(&mut raw)?;
        Ok(raw)
    } else {
        std::fs::read_to_string(Path::new(source))
    }
}
