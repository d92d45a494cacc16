#![warn(missing_docs)]
#![crate_name = "linkpager_rs_derive"]
//! # linkpager-rs-derive
//!
//! This is a set of macros to derive the traits from linkpager-rs.

extern crate proc_macro;

use darling::FromDeriveInput;
use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

#[derive(FromDeriveInput)]
#[darling(attributes(list_resource))]
struct ListResourceAttributes {
    path: String,
    #[darling(default)]
    accept: Option<String>,
}

/// Checks that every `{` of a path template is closed and every placeholder has a name.
fn check_template(path: &str) -> Result<(), String> {
    let mut rest = path;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        let close = after
            .find('}')
            .ok_or_else(|| format!("unclosed placeholder in path template `{path}`"))?;
        let name = &after[..close];
        if name.is_empty() || name.contains('{') {
            return Err(format!("invalid placeholder in path template `{path}`"));
        }
        rest = &after[close + 1..];
    }
    if rest.contains('}') {
        return Err(format!("unmatched `}}` in path template `{path}`"));
    }
    Ok(())
}

/// Implements `ListResource` for a deserializable item type.
///
/// ## Example
/// ```ignore
/// use linkpager_rs::ListResource;
///
/// #[derive(ListResource, serde::Deserialize)]
/// #[list_resource(path = "repos/{owner}/{repo}/issues", accept = "application/vnd.github.full+json")]
/// pub struct Issue {
///     pub number: u64,
/// }
/// ```
#[proc_macro_derive(ListResource, attributes(list_resource))]
pub fn list_resource_derive(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    let name = &ast.ident;
    let ListResourceAttributes { path, accept } =
        match ListResourceAttributes::from_derive_input(&ast) {
            Ok(attributes) => attributes,
            Err(err) => return err.write_errors().into(),
        };

    if let Err(message) = check_template(&path) {
        return syn::Error::new_spanned(&ast.ident, message)
            .to_compile_error()
            .into();
    }

    let accept: proc_macro2::TokenStream = if let Some(accept) = accept {
        quote! {
            const ACCEPT: Option<&'static str> = Some(#accept);
        }
    } else {
        quote! {}
    };

    let gen: proc_macro2::TokenStream = quote! {
        impl linkpager_rs::ListResource for #name {
            const PATH: &'static str = #path;
            #accept
        }
    };

    gen.into()
}
