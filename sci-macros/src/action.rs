//! The `#[action]` attribute.

use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{
    FnArg, Ident, ItemFn, LitStr, Pat, Token,
    ext::IdentExt,
    parse::{Parse, ParseStream},
    parse_macro_input,
};

/// Arguments for the `#[action]` macro.
pub(crate) struct ActionArgs {
    pub name: Option<String>,
}

impl Parse for ActionArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut name = None;

        while !input.is_empty() {
            let ident: Ident = input.parse()?;
            input.parse::<Token![=]>()?;

            match ident.to_string().as_str() {
                "name" => {
                    let lit: LitStr = input.parse()?;
                    name = Some(lit.value());
                }
                other => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unknown attribute: {}", other),
                    ));
                }
            }

            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(ActionArgs { name })
    }
}

/// Implementation of the `#[action]` macro.
pub fn action_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as ActionArgs);
    let input = parse_macro_input!(item as ItemFn);

    match expand(args, input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(args: ActionArgs, input: ItemFn) -> syn::Result<proc_macro2::TokenStream> {
    let fn_name = &input.sig.ident;
    let fn_vis = &input.vis;

    if !input.sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.sig.generics,
            "action functions cannot be generic",
        ));
    }

    let struct_name = match args.name {
        Some(ref custom_name) => Ident::new(custom_name, fn_name.span()),
        None => fn_name.clone(),
    };

    let mut names = Vec::new();
    let mut bindings = Vec::new();
    let mut idents = Vec::new();
    for arg in &input.sig.inputs {
        let FnArg::Typed(pat_type) = arg else {
            return Err(syn::Error::new_spanned(
                arg,
                "action functions cannot take `self`",
            ));
        };
        let Pat::Ident(pat_ident) = &*pat_type.pat else {
            return Err(syn::Error::new_spanned(
                &pat_type.pat,
                "action parameters must be plain identifiers",
            ));
        };

        let name = pat_ident.ident.unraw().to_string();
        let ty = &pat_type.ty;
        let local = format_ident!("__sci_{}", name);
        bindings.push(quote! {
            let #local: #ty = __args.extract::<#ty>(#name)?;
        });
        names.push(name);
        idents.push(local);
    }

    let mut inner = input.clone();
    inner.sig.ident = format_ident!("__sci_action");
    inner.vis = syn::Visibility::Inherited;
    inner.attrs.retain(|attr| !attr.path().is_ident("doc"));

    let call = if input.sig.asyncness.is_some() {
        quote! { __sci_action(#(#idents),*).await }
    } else {
        quote! { __sci_action(#(#idents),*) }
    };

    let docs: Vec<_> = input
        .attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .collect();

    Ok(quote! {
        #(#docs)*
        #[allow(non_camel_case_types)]
        #[derive(Clone, Copy, Debug, Default)]
        #fn_vis struct #struct_name;

        impl #struct_name {
            /// The parameter names this action is bound by.
            pub const PARAMETERS: &'static [&'static str] = &[#(#names),*];
        }

        impl ::sci::Invocable for #struct_name {
            fn parameters(&self) -> &[&'static str] {
                Self::PARAMETERS
            }

            async fn invoke(
                &self,
                __args: ::sci::Arguments,
            ) -> ::core::result::Result<::sci::Response, ::sci::BoxError> {
                #inner

                #(#bindings)*
                ::sci::IntoResponse::into_response(#call)
            }
        }

        impl ::core::convert::From<#struct_name> for ::sci::Action {
            fn from(action: #struct_name) -> Self {
                ::sci::Action::invocable(action)
            }
        }
    })
}
