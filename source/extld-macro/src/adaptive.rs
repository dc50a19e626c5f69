use heck::ToLowerCamelCase;
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{Attribute, FnArg, ItemTrait, LitStr, TraitItem, TraitItemFn, Type, parse_macro_input};

/// Contract-level args: `#[adaptive(default = "d", scope = "application")]`.
#[derive(Default)]
struct ContractArgs {
    default: Option<String>,
    scope: String,
}

fn parse_contract_args(attr: TokenStream) -> syn::Result<ContractArgs> {
    let mut args = ContractArgs { default: None, scope: "self".to_string() };
    if attr.is_empty() {
        return Ok(args);
    }
    let parser = syn::meta::parser(|meta| {
        if meta.path.is_ident("default") {
            let value: LitStr = meta.value()?.parse()?;
            args.default = Some(value.value());
            Ok(())
        } else if meta.path.is_ident("scope") {
            let value: LitStr = meta.value()?.parse()?;
            args.scope = value.value();
            Ok(())
        } else {
            Err(meta.error("expected `default` or `scope`"))
        }
    });
    syn::parse::Parser::parse(parser, attr.into())?;
    Ok(args)
}

fn scope_tokens(scope: &str) -> syn::Result<TokenStream2> {
    let variant = match scope {
        "self" => quote! { Self_ },
        "framework" => quote! { Framework },
        "application" => quote! { Application },
        "module" => quote! { Module },
        other => {
            return Err(syn::Error::new(
                proc_macro2::Span::call_site(),
                format!("unknown scope `{other}`, expected self/framework/application/module"),
            ));
        }
    };
    Ok(quote! { ::extld_manifest::Scope::#variant })
}

/// Pulls `#[adaptive(keys = "k1,k2")]` off a method, returning the dispatch
/// keys (if present) and the attribute list with that marker stripped.
fn extract_method_keys(attrs: &[Attribute]) -> syn::Result<(Option<Vec<String>>, Vec<Attribute>)> {
    let mut keys = None;
    let mut kept = Vec::new();

    for attr in attrs {
        if attr.path().is_ident("adaptive") {
            let mut found: Option<String> = None;
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("keys") {
                    let value: LitStr = meta.value()?.parse()?;
                    found = Some(value.value());
                    Ok(())
                } else {
                    Err(meta.error("expected `keys`"))
                }
            })?;
            keys = Some(
                found
                    .unwrap_or_default()
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
            );
        } else {
            kept.push(attr.clone());
        }
    }

    Ok((keys, kept))
}

/// True when `ty` is (a reference to) a type whose last path segment is `Url`.
fn is_url_type(ty: &Type) -> bool {
    let inner = match ty {
        Type::Reference(r) => &*r.elem,
        other => other,
    };
    matches!(inner, Type::Path(p) if p.path.segments.last().is_some_and(|s| s.ident == "Url"))
}

/// Where a method's dispatch `Url` comes from: a parameter that is a `&Url`
/// directly, or a parameter whose type is assumed to implement
/// [`::extld_manifest::HasUrl`] (accessor fallback, spec.md §4.4 step 2's
/// second path — there is no single `&Url` parameter to read directly, so
/// reach for an accessor on the first argument instead).
enum UrlSource {
    Direct(proc_macro2::Ident),
    Accessor(proc_macro2::Ident),
}

fn find_url_arg(sig: &syn::Signature) -> Option<UrlSource> {
    for input in &sig.inputs {
        if let FnArg::Typed(pat_type) = input {
            if is_url_type(&pat_type.ty) {
                if let syn::Pat::Ident(pat_ident) = &*pat_type.pat {
                    return Some(UrlSource::Direct(pat_ident.ident.clone()));
                }
            }
        }
    }
    // No parameter is a `&Url` directly; fall back to the first non-receiver
    // parameter and assume it implements `HasUrl`. A wrong guess here is a
    // compile error at the generated `HasUrl::url(..)` call site, not here —
    // a macro has no type information to verify the bound during expansion.
    for input in &sig.inputs {
        if let FnArg::Typed(pat_type) = input {
            if let syn::Pat::Ident(pat_ident) = &*pat_type.pat {
                return Some(UrlSource::Accessor(pat_ident.ident.clone()));
            }
        }
    }
    None
}

fn forward_args(sig: &syn::Signature) -> Vec<proc_macro2::Ident> {
    sig.inputs
        .iter()
        .filter_map(|input| match input {
            FnArg::Typed(pat_type) => match &*pat_type.pat {
                syn::Pat::Ident(pat_ident) => Some(pat_ident.ident.clone()),
                _ => None,
            },
            FnArg::Receiver(_) => None,
        })
        .collect()
}

pub fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let contract_args = match parse_contract_args(attr) {
        Ok(args) => args,
        Err(err) => return err.to_compile_error().into(),
    };
    let scope = match scope_tokens(&contract_args.scope) {
        Ok(tokens) => tokens,
        Err(err) => return err.to_compile_error().into(),
    };

    let item_trait = parse_macro_input!(item as ItemTrait);
    let trait_ident = item_trait.ident.clone();
    let facade_ident = format_ident!("{}AdaptiveFacade", trait_ident);
    let contract_name = trait_ident.to_string().to_lower_camel_case();

    let default_name_tokens = match &contract_args.default {
        Some(name) => quote! { ::core::option::Option::Some(#name) },
        None => quote! { ::core::option::Option::None },
    };

    let mut method_impls = Vec::new();
    let mut new_items = Vec::new();
    let mut error = None;

    for trait_item in item_trait.items.iter() {
        match trait_item {
            TraitItem::Fn(method) => {
                let (keys, kept_attrs) = match extract_method_keys(&method.attrs) {
                    Ok(v) => v,
                    Err(err) => {
                        error = Some(err.to_compile_error());
                        break;
                    }
                };

                let mut stripped = method.clone();
                stripped.attrs = kept_attrs;
                new_items.push(TraitItem::Fn(stripped.clone()));

                method_impls.push(render_method(
                    &stripped,
                    keys,
                    &trait_ident,
                    &contract_name,
                    &default_name_tokens,
                ));
            }
            other => new_items.push(other.clone()),
        }
    }

    if let Some(err) = error {
        return err.into();
    }

    let mut clean_trait = item_trait.clone();
    clean_trait.items = new_items;

    let expanded = quote! {
        #clean_trait

        impl ::extld_manifest::ExtensionContract for dyn #trait_ident {
            const CONTRACT_NAME: &'static str = #contract_name;
            const DEFAULT_NAME: ::core::option::Option<&'static str> = #default_name_tokens;
            const SCOPE: ::extld_manifest::Scope = #scope;
        }

        /// Façade generated for [`#trait_ident`]: each method reads its dispatch
        /// name from a [`::extld_manifest::Url`] argument and forwards the call to
        /// the named extension resolved through the owning director.
        pub struct #facade_ident {
            director: ::std::sync::Arc<::extld::director::ScopeDirector>,
        }

        impl #facade_ident {
            pub fn new(director: ::std::sync::Arc<::extld::director::ScopeDirector>) -> Self {
                Self { director }
            }
        }

        impl #trait_ident for #facade_ident {
            #(#method_impls)*
        }
    };

    expanded.into()
}

fn render_method(
    method: &TraitItemFn,
    keys: Option<Vec<String>>,
    trait_ident: &proc_macro2::Ident,
    contract_name: &str,
    default_name_tokens: &TokenStream2,
) -> TokenStream2 {
    let sig = &method.sig;
    let name = &sig.ident;

    let Some(keys) = keys else {
        return quote! {
            #sig {
                ::core::result::Result::Err(
                    ::extld_manifest::ExtensionError::generator_failure(stringify!(#name))
                )
            }
        };
    };

    let Some(url_source) = find_url_arg(sig) else {
        return syn::Error::new_spanned(
            sig,
            format!(
                "#[adaptive] method `{}` needs a `&Url` parameter, or some \
                 other parameter implementing `::extld_manifest::HasUrl`, to dispatch on",
                name
            ),
        )
        .to_compile_error();
    };

    let url_expr = match url_source {
        UrlSource::Direct(ident) => quote! { #ident },
        UrlSource::Accessor(ident) => quote! { ::extld_manifest::HasUrl::url(#ident) },
    };

    let dispatch_keys: Vec<&str> = if keys.is_empty() {
        vec![contract_name]
    } else {
        keys.iter().map(String::as_str).collect()
    };

    let forwarded = forward_args(sig);

    quote! {
        #sig {
            let mut __name: ::core::option::Option<::std::string::String> = ::core::option::Option::None;
            for __key in [#(#dispatch_keys),*] {
                if let ::core::option::Option::Some(__v) = #url_expr.parameter(__key) {
                    __name = ::core::option::Option::Some(__v.to_string());
                    break;
                }
            }
            let __name = __name
                .or_else(|| #default_name_tokens.map(::std::string::String::from))
                .ok_or_else(|| ::extld_manifest::ExtensionError::generator_failure(stringify!(#name)))?;

            let __loader = self.director.loader::<dyn #trait_ident>()?;
            let __impl = __loader.get(&__name)?;
            __impl.#name(#(#forwarded),*)
        }
    }
}
