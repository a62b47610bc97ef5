//! # Vibefn Macros
//!
//! The `#[vibefn]` attribute turns a declared function into a wrapper whose
//! implementation is synthesized at runtime:
//!
//! 1. The declared body is discarded.
//! 2. The function's name, parameters, type annotations, and `///` doc
//!    comments become the interface descriptor.
//! 3. On call, the engine serves a body from the cache or fetches one from
//!    the generation backend, then executes it in the embedded Rhai runtime
//!    with the caller's arguments.
//!
//! # Example
//!
//! ```rust,ignore
//! use vibefn_macros::vibefn;
//!
//! #[vibefn(model = "gpt-4.1-mini", save_money = false)]
//! /// Sort the list in ascending order and print the sorted list.
//! fn sort(a: Vec<i64>) -> Vec<i64> {
//!     unimplemented!()
//! }
//!
//! let sorted = sort(vec![3, 1, 2]);
//! ```
//!
//! The generated wrapper references `vibefn_core` and `vibefn_ai`, so both
//! must be dependencies of the calling crate.

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::{parse_macro_input, Expr, ExprLit, FnArg, ItemFn, Lit, Meta, Pat, ReturnType, Token};

/// Recognized options: `model`, `mode` (`"serious"`/`"chaotic"`),
/// `save_money`, `debug`, `endpoint`, `cache_dir`, `provider`
/// (`"openai"`/`"ollama"`). No other options are recognized.
#[proc_macro_attribute]
pub fn vibefn(attr: TokenStream, item: TokenStream) -> TokenStream {
    let options = parse_macro_input!(attr with Punctuated::<Meta, Token![,]>::parse_terminated);
    let input = parse_macro_input!(item as ItemFn);

    match expand(&options, &input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

#[derive(Default)]
struct Options {
    model: Option<String>,
    mode: Option<String>,
    save_money: Option<bool>,
    debug: Option<bool>,
    endpoint: Option<String>,
    cache_dir: Option<String>,
    provider: Option<String>,
}

fn parse_options(metas: &Punctuated<Meta, Token![,]>) -> syn::Result<Options> {
    let mut opts = Options::default();

    for meta in metas {
        let key = meta
            .path()
            .get_ident()
            .map(|i| i.to_string())
            .unwrap_or_default();

        match meta {
            // bare flags: #[vibefn(debug)]
            Meta::Path(_) => match key.as_str() {
                "save_money" => opts.save_money = Some(true),
                "debug" => opts.debug = Some(true),
                _ => {
                    return Err(syn::Error::new_spanned(
                        meta,
                        format!("unrecognized vibefn option '{}'", key),
                    ))
                }
            },
            Meta::NameValue(nv) => {
                let lit = match &nv.value {
                    Expr::Lit(ExprLit { lit, .. }) => lit,
                    other => {
                        return Err(syn::Error::new_spanned(
                            other,
                            "vibefn options take literal values",
                        ))
                    }
                };
                match (key.as_str(), lit) {
                    ("model", Lit::Str(s)) => opts.model = Some(s.value()),
                    ("mode", Lit::Str(s)) => opts.mode = Some(s.value()),
                    ("endpoint", Lit::Str(s)) => opts.endpoint = Some(s.value()),
                    ("cache_dir", Lit::Str(s)) => opts.cache_dir = Some(s.value()),
                    ("provider", Lit::Str(s)) => opts.provider = Some(s.value()),
                    ("save_money", Lit::Bool(b)) => opts.save_money = Some(b.value),
                    ("debug", Lit::Bool(b)) => opts.debug = Some(b.value),
                    _ => {
                        return Err(syn::Error::new_spanned(
                            meta,
                            format!("unrecognized vibefn option '{}'", key),
                        ))
                    }
                }
            }
            Meta::List(_) => {
                return Err(syn::Error::new_spanned(
                    meta,
                    format!("unrecognized vibefn option '{}'", key),
                ))
            }
        }
    }

    Ok(opts)
}

fn expand(
    metas: &Punctuated<Meta, Token![,]>,
    input: &ItemFn,
) -> syn::Result<proc_macro2::TokenStream> {
    let opts = parse_options(metas)?;

    let attrs = &input.attrs;
    let vis = &input.vis;
    let sig = &input.sig;
    let name_str = sig.ident.to_string();

    // Parameters: idents plus stringified type annotations.
    let mut param_idents = Vec::new();
    let mut param_descriptors = Vec::new();
    for arg in &sig.inputs {
        match arg {
            FnArg::Receiver(r) => {
                return Err(syn::Error::new_spanned(
                    r,
                    "#[vibefn] does not support methods taking self",
                ))
            }
            FnArg::Typed(pat_type) => {
                let ident = match &*pat_type.pat {
                    Pat::Ident(pat_ident) => pat_ident.ident.clone(),
                    other => {
                        return Err(syn::Error::new_spanned(
                            other,
                            "#[vibefn] parameters must be plain identifiers",
                        ))
                    }
                };
                let ty = &pat_type.ty;
                let annotation = quote!(#ty).to_string();
                let name = ident.to_string();
                param_descriptors.push(quote! { .with_typed_param(#name, #annotation) });
                param_idents.push(ident);
            }
        }
    }

    let ret_setter = match &sig.output {
        ReturnType::Default => quote! {},
        ReturnType::Type(_, ty) => {
            let annotation = quote!(#ty).to_string();
            quote! { .with_return(#annotation) }
        }
    };

    // `///` doc comments become the docstring.
    let doc = attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(nv) => match &nv.value {
                Expr::Lit(ExprLit { lit: Lit::Str(s), .. }) => Some(s.value().trim().to_string()),
                _ => None,
            },
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n");

    // Decoration-time configuration.
    let mut config_expr = quote! { ::vibefn_core::VibeConfig::default() };
    if let Some(model) = &opts.model {
        config_expr = quote! { #config_expr.with_model(#model) };
    }
    if let Some(mode) = &opts.mode {
        let mode_path = match mode.as_str() {
            "serious" => quote! { ::vibefn_core::Mode::Serious },
            "chaotic" => quote! { ::vibefn_core::Mode::Chaotic },
            other => {
                return Err(syn::Error::new(
                    Span::call_site(),
                    format!("unknown mode '{}' (expected \"serious\" or \"chaotic\")", other),
                ))
            }
        };
        config_expr = quote! { #config_expr.with_mode(#mode_path) };
    }
    if let Some(save_money) = opts.save_money {
        config_expr = quote! { #config_expr.with_save_money(#save_money) };
    }
    if let Some(debug) = opts.debug {
        config_expr = quote! { #config_expr.with_debug(#debug) };
    }
    if let Some(endpoint) = &opts.endpoint {
        config_expr = quote! { #config_expr.with_endpoint(#endpoint) };
    }
    if let Some(cache_dir) = &opts.cache_dir {
        config_expr = quote! { #config_expr.with_cache_dir(#cache_dir) };
    }

    let provider_expr = match opts.provider.as_deref().unwrap_or("openai") {
        "openai" => quote! {
            {
                let mut provider_config = ::vibefn_core::ProviderConfig::from_env()
                    .expect("generation backend credentials are not configured")
                    .with_model(config.model.clone());
                if let Some(endpoint) = config.endpoint.clone() {
                    provider_config = provider_config.with_base_url(endpoint);
                }
                ::std::boxed::Box::new(
                    ::vibefn_ai::OpenAiProvider::new(provider_config)
                        .expect("failed to construct generation backend client"),
                ) as ::std::boxed::Box<dyn ::vibefn_core::BodyProvider>
            }
        },
        "ollama" => quote! {
            ::std::boxed::Box::new(::vibefn_ai::OllamaProvider::from_env())
                as ::std::boxed::Box<dyn ::vibefn_core::BodyProvider>
        },
        other => {
            return Err(syn::Error::new(
                Span::call_site(),
                format!("unknown provider '{}' (expected \"openai\" or \"ollama\")", other),
            ))
        }
    };

    let arg_conversions = param_idents.iter().map(|ident| {
        quote! {
            ::vibefn_core::rhai::serde::to_dynamic(&#ident)
                .expect("argument is not representable in the script runtime")
        }
    });

    let call = if sig.asyncness.is_some() {
        quote! { __vibefn_shared.0.invoke(&__vibefn_shared.1, __vibefn_args).await }
    } else {
        quote! { __vibefn_shared.0.invoke_blocking(&__vibefn_shared.1, __vibefn_args) }
    };

    let finish = match &sig.output {
        ReturnType::Default => quote! {
            let _ = #call.expect("synthesized implementation failed");
        },
        ReturnType::Type(..) => quote! {
            let __vibefn_result = #call.expect("synthesized implementation failed");
            ::vibefn_core::rhai::serde::from_dynamic(&__vibefn_result)
                .expect("synthesized result did not match the declared return type")
        },
    };

    // Engine and descriptor are built once, on first call, and reused.
    Ok(quote! {
        #(#attrs)*
        #vis #sig {
            static __VIBEFN: ::std::sync::OnceLock<(
                ::vibefn_core::VibeEngine<::std::boxed::Box<dyn ::vibefn_core::BodyProvider>>,
                ::vibefn_core::FnInterface,
            )> = ::std::sync::OnceLock::new();

            let __vibefn_shared = __VIBEFN.get_or_init(|| {
                let config = #config_expr;
                let provider = #provider_expr;
                let interface = ::vibefn_core::FnInterface::new(#name_str)
                    #(#param_descriptors)*
                    #ret_setter
                    .with_doc(#doc);
                let engine = ::vibefn_core::VibeEngine::with_config(provider, config)
                    .expect("failed to initialize vibefn engine");
                (engine, interface)
            });

            let __vibefn_args = ::std::vec![ #(#arg_conversions),* ];
            #finish
        }
    })
}
