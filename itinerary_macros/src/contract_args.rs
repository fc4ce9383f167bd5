use proc_macro2::TokenStream;
use syn::{parse::Parser, LitStr};

/// `#[response_contract(name = "...", description = "...")]`
#[derive(Default)]
pub struct ContractArgs {
    pub name: Option<LitStr>,
    pub description: Option<LitStr>,
}

impl ContractArgs {
    pub fn parse(attr: TokenStream) -> syn::Result<Self> {
        let mut args = Self::default();

        let parser = syn::meta::parser(|meta| {
            let slot = if meta.path.is_ident("name") {
                &mut args.name
            } else if meta.path.is_ident("description") {
                &mut args.description
            } else {
                return Err(meta.error("expected `name` or `description`"));
            };

            if slot.is_some() {
                return Err(meta.error("argument given more than once"));
            }
            *slot = Some(meta.value()?.parse()?);
            Ok(())
        });
        parser.parse2(attr)?;

        Ok(args)
    }
}
