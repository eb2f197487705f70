use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse::Parse, parse::ParseStream, parse_macro_input, punctuated::Punctuated, Ident,
    ItemStruct, LitInt, LitStr, Path, Token,
};

/// One marker: `Type::method` or `Type::method(order = N)`
struct MarkerItem {
    type_path: Path,
    method: Ident,
    order: Option<i32>,
}

impl Parse for MarkerItem {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut type_path: Path = input.parse()?;
        let method = match type_path.segments.pop() {
            Some(pair) if !type_path.segments.is_empty() => pair.into_value().ident,
            _ => {
                return Err(syn::Error::new_spanned(
                    &type_path,
                    "expected `Type::method`",
                ))
            }
        };
        // Drop the trailing `::` left behind by `pop`.
        if let Some(last) = type_path.segments.pop() {
            type_path.segments.push(last.into_value());
        }

        let mut order = None;
        if input.peek(syn::token::Paren) {
            let content;
            syn::parenthesized!(content in input);
            let key: Ident = content.parse()?;
            if key != "order" {
                return Err(syn::Error::new_spanned(key, "expected `order = <integer>`"));
            }
            content.parse::<Token![=]>()?;
            let negative = content.parse::<Option<Token![-]>>()?.is_some();
            let literal: LitInt = content.parse()?;
            let magnitude: i64 = literal.base10_parse()?;
            let value = if negative { -magnitude } else { magnitude };
            order = Some(i32::try_from(value).map_err(|_| {
                syn::Error::new_spanned(&literal, "order must fit in an i32")
            })?);
        }

        Ok(MarkerItem {
            type_path,
            method,
            order,
        })
    }
}

struct ModuleArgs {
    name: Option<LitStr>,
    file: Option<LitStr>,
    startup: Vec<MarkerItem>,
    exit: Vec<MarkerItem>,
}

impl Parse for ModuleArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut name = None;
        let mut file = None;
        let mut startup = Vec::new();
        let mut exit = Vec::new();

        while !input.is_empty() {
            let key: Ident = input.parse()?;
            input.parse::<Token![=]>()?;

            if key == "name" || key == "file" {
                let value: LitStr = input.parse()?;
                if value.value().trim().is_empty() {
                    return Err(syn::Error::new_spanned(
                        &value,
                        format!("module {} cannot be blank", key),
                    ));
                }
                if key == "name" {
                    name = Some(value);
                } else {
                    file = Some(value);
                }
            } else if key == "startup" || key == "exit" {
                // Parse array: [Type::method, Type::method(order = 1), ...]
                let content;
                syn::bracketed!(content in input);
                let items: Punctuated<MarkerItem, Token![,]> =
                    content.parse_terminated(MarkerItem::parse, Token![,])?;
                if key == "startup" {
                    startup.extend(items);
                } else {
                    exit.extend(items);
                }
            } else {
                return Err(syn::Error::new_spanned(
                    key,
                    "expected one of `name`, `file`, `startup`, `exit`",
                ));
            }

            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(ModuleArgs {
            name,
            file,
            startup,
            exit,
        })
    }
}

pub fn activation_module_attribute(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as ModuleArgs);
    let input = parse_macro_input!(item as ItemStruct);
    let expanded = generate_module_impl(&args, &input);

    TokenStream::from(expanded)
}

fn generate_module_impl(args: &ModuleArgs, input: &ItemStruct) -> TokenStream2 {
    let module_type = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let id = args
        .name
        .as_ref()
        .map(LitStr::value)
        .unwrap_or_else(|| module_type.to_string());
    let file = args.file.as_ref().map(LitStr::value).unwrap_or_else(|| id.clone());

    let marker = |item: &MarkerItem, phase: TokenStream2| {
        let type_path = &item.type_path;
        let method = item.method.to_string();
        let with_order = item.order.map(|order| quote!(.with_order(#order)));
        quote! {
            ::activator::activation::ActivationMarker::for_type::<#type_path>(#method, #phase)
                .map_err(|e| ::activator::error::ScanError::new(#id, e.to_string()))?
                #with_order
        }
    };

    let startup = args
        .startup
        .iter()
        .map(|item| marker(item, quote!(::activator::activation::Phase::Startup)));
    let exit = args
        .exit
        .iter()
        .map(|item| marker(item, quote!(::activator::activation::Phase::Exit)));

    quote! {
        #input

        impl #impl_generics ::activator::module::ActivationModule
            for #module_type #ty_generics #where_clause
        {
            fn id(&self) -> &::activator::module::ModuleId {
                static ID: ::std::sync::OnceLock<::activator::module::ModuleId> =
                    ::std::sync::OnceLock::new();
                ID.get_or_init(|| ::activator::module::ModuleId::new(#id))
            }

            fn name(&self) -> &str {
                #file
            }

            fn markers(
                &self,
            ) -> ::std::result::Result<
                ::std::vec::Vec<::activator::activation::ActivationMarker>,
                ::activator::error::ScanError,
            > {
                ::std::result::Result::Ok(::std::vec![
                    #(#startup,)*
                    #(#exit,)*
                ])
            }
        }
    }
}
