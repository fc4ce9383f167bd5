use proc_macro2::TokenStream;
use quote::quote;
use syn::{spanned::Spanned, Fields, ItemStruct, LitStr};

use crate::contract_args::ContractArgs;

pub fn expand(attr: TokenStream, item: ItemStruct) -> syn::Result<TokenStream> {
    let args = ContractArgs::parse(attr)?;

    if !matches!(item.fields, Fields::Named(_)) {
        return Err(syn::Error::new(
            item.struct_token.span(),
            "`#[response_contract]` needs a struct with named fields",
        ));
    }
    if !item.generics.params.is_empty() {
        return Err(syn::Error::new(
            item.generics.span(),
            "`#[response_contract]` cannot be applied to generic structs",
        ));
    }

    let ident = &item.ident;
    let name = args
        .name
        .unwrap_or_else(|| LitStr::new(&ident.to_string(), ident.span()));
    let description = match args.description {
        Some(lit) => quote!(::core::option::Option::Some(#lit)),
        None => quote!(::core::option::Option::None),
    };

    Ok(quote! {
        #item

        impl itinerary_pipeline::contract::ResponseContract for #ident {
            fn contract() -> &'static itinerary_pipeline::contract::ContractHandle {
                static HANDLE: ::std::sync::OnceLock<itinerary_pipeline::contract::ContractHandle> =
                    ::std::sync::OnceLock::new();
                HANDLE.get_or_init(|| {
                    itinerary_pipeline::contract::ContractHandle::build(
                        #name,
                        #description,
                        schemars::schema_for!(Self),
                    )
                })
            }
        }
    })
}
