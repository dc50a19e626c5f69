//! Compile-time replacements for the annotation-driven metadata and code
//! generation that a reflective SPI runtime performs at discovery/load time.
//!
//! `#[derive(ExtensionMeta)]` turns `#[extension(...)]` attributes into an
//! `ExtensionMeta` impl, standing in for `@SPI`/`@Activate`/wrapper-by-ctor-shape
//! detection. `#[adaptive]` turns a contract trait into a façade that dispatches
//! each call by a URL parameter, standing in for runtime codegen + compilation.

mod adaptive;
mod meta;

use proc_macro::TokenStream;

#[proc_macro_derive(ExtensionMeta, attributes(extension))]
pub fn derive_extension_meta(input: TokenStream) -> TokenStream {
    meta::expand(input)
}

#[proc_macro_attribute]
pub fn adaptive(attr: TokenStream, item: TokenStream) -> TokenStream {
    adaptive::expand(attr, item)
}
