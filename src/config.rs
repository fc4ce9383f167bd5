//! Environment-driven pipeline configuration.
//!
//! | Variable | Default |
//! |---|---|
//! | `ITINERARY_INTERPRETER` | `python3` |
//! | `ITINERARY_PROGRAM` | required |
//! | `ITINERARY_COMPUTE_TIMEOUT_SECS` | unbounded |
//! | `OPENAI_API_KEY` | required |
//! | `OPENAI_BASE_URL` / `OPENROUTER_BASE_URL` | `https://openrouter.ai/api/v1` |
//! | `ITINERARY_MODEL` | `openai/gpt-4.1-mini` |
//! | `ITINERARY_GENERATION_TIMEOUT_SECS` | `120` |
//! | `ITINERARY_MAX_TOKENS` | unset |
//! | `ITINERARY_JSON_MODE` | `false` |
//!
//! A timeout of `0` means no bound.

use std::{path::PathBuf, str::FromStr, time::Duration};

use crate::{
    error::{PipelineError, Result},
    services::{
        generation::{DEFAULT_MODEL, DEFAULT_TIMEOUT},
        openai_client::DEFAULT_BASE_URL,
    },
};

pub const DEFAULT_INTERPRETER: &str = "python3";

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Executable that runs the computation program
    pub interpreter: PathBuf,
    /// Path handed to the interpreter as its first argument
    pub program: PathBuf,
    pub compute_timeout: Option<Duration>,
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub generation_timeout: Option<Duration>,
    pub max_tokens: Option<u32>,
    pub json_mode: bool,
}

impl PipelineConfig {
    pub fn new(program: impl Into<PathBuf>, api_key: impl Into<String>) -> Self {
        Self {
            interpreter: PathBuf::from(DEFAULT_INTERPRETER),
            program: program.into(),
            compute_timeout: None,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            generation_timeout: Some(DEFAULT_TIMEOUT),
            max_tokens: None,
            json_mode: false,
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let program = get("ITINERARY_PROGRAM").ok_or_else(|| {
            PipelineError::Config(
                "ITINERARY_PROGRAM must point at the computation program".to_string(),
            )
        })?;
        let api_key = get("OPENAI_API_KEY").ok_or_else(|| {
            PipelineError::Config(
                "OPENAI_API_KEY environment variable must be set".to_string(),
            )
        })?;

        let mut config = Self::new(program, api_key);

        if let Some(interpreter) = get("ITINERARY_INTERPRETER") {
            config.interpreter = PathBuf::from(interpreter);
        }
        if let Some(base_url) = get("OPENAI_BASE_URL").or_else(|| get("OPENROUTER_BASE_URL")) {
            config.base_url = base_url;
        }
        if let Some(model) = get("ITINERARY_MODEL") {
            config.model = model;
        }
        if let Some(raw) = get("ITINERARY_COMPUTE_TIMEOUT_SECS") {
            config.compute_timeout = parse_timeout("ITINERARY_COMPUTE_TIMEOUT_SECS", &raw)?;
        }
        if let Some(raw) = get("ITINERARY_GENERATION_TIMEOUT_SECS") {
            config.generation_timeout = parse_timeout("ITINERARY_GENERATION_TIMEOUT_SECS", &raw)?;
        }
        if let Some(raw) = get("ITINERARY_MAX_TOKENS") {
            config.max_tokens = Some(parse_value("ITINERARY_MAX_TOKENS", &raw)?);
        }
        if let Some(raw) = get("ITINERARY_JSON_MODE") {
            config.json_mode = parse_flag("ITINERARY_JSON_MODE", &raw)?;
        }

        Ok(config)
    }
}

pub(crate) fn parse_timeout(key: &str, raw: &str) -> Result<Option<Duration>> {
    let secs: u64 = parse_value(key, raw)?;
    Ok((secs > 0).then(|| Duration::from_secs(secs)))
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|err| PipelineError::Config(format!("invalid {key} value `{raw}`: {err}")))
}

fn parse_flag(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(PipelineError::Config(format!(
            "invalid {key} value `{raw}`: expected true or false"
        ))),
    }
}
