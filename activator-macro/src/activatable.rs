use darling::FromMeta;
use darling::ast::NestedMeta;
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse_macro_input, GenericArgument, ImplItem, ImplItemFn, ItemImpl, PathArguments, ReturnType,
    Type,
};

#[derive(Debug, Default, FromMeta)]
struct ActivatableArgs {
    #[darling(default)]
    name: Option<String>,
}

pub fn activatable_attribute(attr: TokenStream, item: TokenStream) -> TokenStream {
    let attr_args = match NestedMeta::parse_meta_list(attr.into()) {
        Ok(args) => args,
        Err(e) => return TokenStream::from(darling::Error::from(e).write_errors()),
    };
    let args = match ActivatableArgs::from_list(&attr_args) {
        Ok(args) => args,
        Err(e) => return TokenStream::from(e.write_errors()),
    };
    let input = parse_macro_input!(item as ItemImpl);

    let expanded = match generate_activatable_impl(&args, &input) {
        Ok(tokens) => tokens,
        Err(e) => e.to_compile_error(),
    };
    TokenStream::from(expanded)
}

fn generate_activatable_impl(
    args: &ActivatableArgs,
    input: &ItemImpl,
) -> syn::Result<TokenStream2> {
    if let Some((_, path, _)) = &input.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "#[activatable] must be placed on an inherent impl block",
        ));
    }

    let self_ty = &input.self_ty;
    let (impl_generics, _, where_clause) = input.generics.split_for_impl();

    let type_name = match &args.name {
        Some(name) if name.trim().is_empty() => {
            return Err(syn::Error::new_spanned(self_ty, "activatable type name cannot be blank"));
        }
        Some(name) => name.clone(),
        None => default_type_name(self_ty),
    };

    let entries = input
        .items
        .iter()
        .filter_map(|item| match item {
            ImplItem::Fn(method) if is_activation_method(method) => Some(&method.sig.ident),
            _ => None,
        })
        .map(|ident| {
            let name = ident.to_string();
            quote! {
                (
                    #name,
                    (|| ::activator::activation::IntoActivationResult::into_activation_result(
                        <#self_ty>::#ident()
                    )) as ::activator::activation::ActivationFn
                )
            }
        });

    Ok(quote! {
        #input

        impl #impl_generics ::activator::activation::Activatable for #self_ty #where_clause {
            fn type_ref() -> ::activator::activation::TypeRef {
                ::activator::activation::TypeRef::new(#type_name)
            }

            fn activation_methods(
            ) -> ::std::vec::Vec<(&'static str, ::activator::activation::ActivationFn)> {
                ::std::vec![#(#entries),*]
            }
        }
    })
}

/// Receiver-less, argument-less, synchronous, non-generic, returning `()` or a `Result`
fn is_activation_method(method: &ImplItemFn) -> bool {
    let sig = &method.sig;
    sig.inputs.is_empty()
        && sig.asyncness.is_none()
        && sig.generics.params.is_empty()
        && match &sig.output {
            ReturnType::Default => true,
            ReturnType::Type(_, ty) => returns_unit_or_result(ty),
        }
}

fn returns_unit_or_result(ty: &Type) -> bool {
    match ty {
        Type::Tuple(tuple) => tuple.elems.is_empty(),
        Type::Path(path) => path
            .path
            .segments
            .last()
            .is_some_and(|segment| {
                segment.ident == "Result" && ok_type_is_unit(&segment.arguments)
            }),
        Type::Paren(inner) => returns_unit_or_result(&inner.elem),
        _ => false,
    }
}

/// `Result<(), E>` and `anyhow::Result<()>`, not `Result<u32, E>`
fn ok_type_is_unit(arguments: &PathArguments) -> bool {
    match arguments {
        PathArguments::AngleBracketed(args) => matches!(
            args.args.first(),
            Some(GenericArgument::Type(Type::Tuple(tuple))) if tuple.elems.is_empty()
        ),
        _ => false,
    }
}

/// Last path segment of the implementing type, e.g. `Database` for `crate::db::Database`
fn default_type_name(ty: &Type) -> String {
    match ty {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string())
            .unwrap_or_else(|| quote!(#ty).to_string()),
        other => quote!(#other).to_string(),
    }
}
