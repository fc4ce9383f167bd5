//! Document contracts between pipeline stages.
//!
//! At runtime the only contract is that each stage's text parses as JSON.
//! Typed shapes for the final document are opt-in: a struct marked
//! `#[response_contract]` gets a [`ContractHandle`] holding the name used in
//! error messages and the JSON schema printed by `itinerary schema`.

pub mod parse;

use schemars::schema::RootSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

pub use parse::{
    deserialize_contract, parse_computation_output, parse_generation_output,
    strip_markdown_fences,
};

/// Named document shape with its rendered JSON schema.
#[derive(Clone, Debug)]
pub struct ContractHandle {
    name: &'static str,
    schema: Value,
}

impl ContractHandle {
    /// Render `root`, letting an explicit `description` replace the doc comment.
    pub fn build(name: &'static str, description: Option<&'static str>, mut root: RootSchema) -> Self {
        if let Some(description) = description {
            root.schema.metadata().description = Some(description.to_string());
        }

        let schema = serde_json::to_value(&root).unwrap_or_else(|err| {
            warn!(target: "itinerary::contract", contract = name, error = %err, "schema not renderable");
            Value::Null
        });

        Self { name, schema }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn schema(&self) -> &Value {
        &self.schema
    }
}

/// Implemented by `#[response_contract]` structs.
pub trait ResponseContract: DeserializeOwned + Send + Sync + 'static {
    fn contract() -> &'static ContractHandle;
}
