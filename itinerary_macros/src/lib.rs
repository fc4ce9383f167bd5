//! Procedural macros for `itinerary-pipeline`.

mod contract_args;
mod response_contract;

use proc_macro::TokenStream;
use syn::{parse_macro_input, ItemStruct};

/// Marks a struct as a document shape the generative service is asked to produce.
///
/// Implements `itinerary_pipeline::contract::ResponseContract` with a cached
/// handle. Optional `name = "..."` (defaults to the struct ident) labels
/// deserialization errors; `description = "..."` replaces the doc comment in
/// the schema. The struct must also derive `JsonSchema` and `Deserialize`.
#[proc_macro_attribute]
pub fn response_contract(attr: TokenStream, item: TokenStream) -> TokenStream {
    let item = parse_macro_input!(item as ItemStruct);
    response_contract::expand(attr.into(), item)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
