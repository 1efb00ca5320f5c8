use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Fields, GenericArgument, PathArguments, Type, parse_macro_input};

pub fn derive_injectable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    generate_injectable_impl(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn generate_injectable_impl(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let body = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => {
                let injections = fields
                    .named
                    .iter()
                    .map(|field| {
                        let field_name = &field.ident;
                        let resolve = resolve_call(&field.ty)?;
                        Ok(quote! { #field_name: #resolve })
                    })
                    .collect::<syn::Result<Vec<_>>>()?;
                quote! { Self { #(#injections),* } }
            }
            Fields::Unit => quote! { Self },
            Fields::Unnamed(fields) => {
                return Err(syn::Error::new(
                    fields.span(),
                    "#[derive(Injectable)] only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new(
                input.span(),
                "#[derive(Injectable)] can only be applied to structs",
            ));
        }
    };

    Ok(quote! {
        impl #impl_generics ::roster::Injectable for #struct_name #ty_generics #where_clause {
            fn inject(container: &::roster::Container) -> ::roster::Result<Self> {
                Ok(#body)
            }
        }
    })
}

/// `container.resolve::<T>()?` for `Arc<T>`, `container.resolve_trait::<dyn Trait>()?`
/// for `Arc<dyn Trait>`.
fn resolve_call(ty: &Type) -> syn::Result<TokenStream2> {
    let inner = arc_inner(ty).ok_or_else(|| {
        syn::Error::new(
            ty.span(),
            "injected fields must be `Arc<T>` or `Arc<dyn Trait>`",
        )
    })?;

    Ok(match inner {
        Type::TraitObject(_) => quote! { container.resolve_trait::<#inner>()? },
        _ => quote! { container.resolve::<#inner>()? },
    })
}

fn arc_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Arc" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}
