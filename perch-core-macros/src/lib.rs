use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields};

/// Derive `perch_core::CaseIterable` for a fieldless enum.
///
/// Variants are listed in declaration order.
#[proc_macro_derive(CaseIterable)]
pub fn derive_case_iterable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = input.ident.clone();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let data = match input.data {
        Data::Enum(ref data) => data,
        Data::Struct(_) | Data::Union(_) => {
            return syn::Error::new_spanned(name, "CaseIterable derive only supports enums")
                .to_compile_error()
                .into();
        }
    };

    let mut cases = Vec::with_capacity(data.variants.len());
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return syn::Error::new_spanned(
                variant,
                "CaseIterable derive requires every variant to be fieldless",
            )
            .to_compile_error()
            .into();
        }
        let vident = &variant.ident;
        cases.push(quote! { #name::#vident });
    }

    quote! {
        impl #impl_generics ::perch_core::CaseIterable for #name #ty_generics #where_clause {
            const ALL_CASES: &'static [Self] = &[ #(#cases),* ];
        }
    }
    .into()
}
