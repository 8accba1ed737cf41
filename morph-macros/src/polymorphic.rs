use crate::field_utils::ensure_required_fields;
use proc_macro::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{Item, Type, parse_macro_input};

/// #[polymorphic] 宏实现
/// - 若缺失则追加字段：`entity_id: String`, `entity_type: String`（已存在则保留原位置）
/// - 自动实现 `::morph_domain::entity::PolymorphicRecord`
/// - 需与 `#[entity]` 搭配，并置于其之上
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        return syn::Error::new(
            proc_macro2::TokenStream::from(attr).span(),
            "#[polymorphic] takes no arguments",
        )
        .to_compile_error()
        .into();
    }

    let input = parse_macro_input!(item as Item);

    let mut st = match input {
        Item::Struct(s) => s,
        other => {
            return syn::Error::new(other.span(), "#[polymorphic] only on struct")
                .to_compile_error()
                .into();
        }
    };

    let vis = st.vis.clone();
    let fields_named = match &mut st.fields {
        syn::Fields::Named(f) => f,
        _ => {
            return syn::Error::new(st.span(), "only supports named-field struct")
                .to_compile_error()
                .into();
        }
    };

    let string_ty: Type = syn::parse_quote! { String };
    ensure_required_fields(
        fields_named,
        &[("entity_id", &string_ty), ("entity_type", &string_ty)],
        &vis,
        /*reposition_existing*/ false,
    );

    let ident = &st.ident;
    let (impl_generics, ty_generics, where_clause) = st.generics.split_for_impl();

    let expanded = quote! {
        #st

        impl #impl_generics ::morph_domain::entity::PolymorphicRecord for #ident #ty_generics #where_clause {
            fn entity_id(&self) -> &str { &self.entity_id }

            fn entity_type(&self) -> &str { &self.entity_type }

            fn attach(&mut self, entity_id: ::std::string::String, entity_type: &str) {
                self.entity_id = entity_id;
                self.entity_type = ::std::string::ToString::to_string(entity_type);
            }
        }
    };

    TokenStream::from(expanded)
}
