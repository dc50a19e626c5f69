use darling::{FromDeriveInput, util::Flag};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

#[derive(FromDeriveInput)]
#[darling(attributes(extension))]
struct ExtensionArgs {
    #[darling(default)]
    names: Option<String>,
    #[darling(default)]
    order: Option<i32>,
    #[darling(default)]
    adaptive: Flag,
    #[darling(default)]
    wrapper: Flag,
    #[darling(default)]
    matches: Option<String>,
    #[darling(default)]
    mismatches: Option<String>,
    #[darling(default)]
    groups: Option<String>,
    #[darling(default)]
    activate: Option<String>,
    #[darling(default)]
    on_class: Option<String>,
    #[darling(default)]
    before: Option<String>,
    #[darling(default)]
    after: Option<String>,
}

/// Splits a `", "`-separated list into trimmed, non-empty tokens. Mirrors the
/// source runtime's `/\s*,\s*/` alias split, performed here at macro-expansion
/// time instead of at registration time since the list is always a literal.
fn split_list(raw: &str) -> Vec<&str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty()).collect()
}

fn str_slice(items: &[&str]) -> TokenStream2 {
    quote! { &[ #(#items),* ] }
}

/// Parses `"k1:v1, k2"` into `[("k1", Some("v1")), ("k2", None)]`.
fn activate_pairs(raw: &str) -> TokenStream2 {
    let pairs: Vec<TokenStream2> = split_list(raw)
        .into_iter()
        .map(|token| match token.split_once(':') {
            Some((k, v)) => quote! { (#k, ::core::option::Option::Some(#v)) },
            None => quote! { (#token, ::core::option::Option::None) },
        })
        .collect();
    quote! { &[ #(#pairs),* ] }
}

pub fn expand(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let ident = input.ident.clone();

    let args = match ExtensionArgs::from_derive_input(&input) {
        Ok(args) => args,
        Err(err) => return err.write_errors().into(),
    };

    if args.adaptive.is_present() && args.wrapper.is_present() {
        return syn::Error::new_spanned(
            &ident,
            "an extension class cannot be both `adaptive` and `wrapper`",
        )
        .to_compile_error()
        .into();
    }

    let names: Vec<&str> = args.names.as_deref().map(split_list).unwrap_or_default();
    let names_tokens = str_slice(&names);

    let classification = if args.adaptive.is_present() {
        quote! { ::extld_manifest::Classification::Adaptive }
    } else if args.wrapper.is_present() {
        quote! { ::extld_manifest::Classification::Wrapper }
    } else {
        quote! { ::extld_manifest::Classification::Named }
    };

    let order = args.order.unwrap_or(0);

    let matches: Vec<&str> = args.matches.as_deref().map(split_list).unwrap_or_default();
    let matches_tokens = str_slice(&matches);

    let mismatches: Vec<&str> = args.mismatches.as_deref().map(split_list).unwrap_or_default();
    let mismatches_tokens = str_slice(&mismatches);

    let groups: Vec<&str> = args.groups.as_deref().map(split_list).unwrap_or_default();
    let groups_tokens = str_slice(&groups);

    let activate_tokens = args
        .activate
        .as_deref()
        .map(activate_pairs)
        .unwrap_or_else(|| quote! { &[] });

    let on_class: Vec<&str> = args.on_class.as_deref().map(split_list).unwrap_or_default();
    let on_class_tokens = str_slice(&on_class);

    let before: Vec<&str> = args.before.as_deref().map(split_list).unwrap_or_default();
    let before_tokens = str_slice(&before);

    let after: Vec<&str> = args.after.as_deref().map(split_list).unwrap_or_default();
    let after_tokens = str_slice(&after);

    let expanded = quote! {
        impl ::extld_manifest::ExtensionMeta for #ident {
            const NAMES: &'static [&'static str] = #names_tokens;
            const CLASSIFICATION: ::extld_manifest::Classification = #classification;
            const ORDER: i32 = #order;
            const MATCHES: &'static [&'static str] = #matches_tokens;
            const MISMATCHES: &'static [&'static str] = #mismatches_tokens;
            const GROUPS: &'static [&'static str] = #groups_tokens;
            const ACTIVATE_PAIRS: &'static [(&'static str, ::core::option::Option<&'static str>)] = #activate_tokens;
            const ON_CLASS: &'static [&'static str] = #on_class_tokens;
            const BEFORE: &'static [&'static str] = #before_tokens;
            const AFTER: &'static [&'static str] = #after_tokens;
        }
    };

    expanded.into()
}
