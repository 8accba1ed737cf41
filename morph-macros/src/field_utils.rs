use proc_macro2::Span;
use syn::{Field, FieldsNamed, Ident, Token, Type, Visibility, punctuated::Punctuated};

fn is_named(field: &Field, name: &str) -> bool {
    field.ident.as_ref().map(|i| i == name).unwrap_or(false)
}

/// 确保具名字段结构体包含所需字段
/// - required: (字段名, 字段类型) 列表，按给定顺序置于最前
/// - vis: 新增字段的可见性，与结构体保持一致
/// - reposition_existing: 若为 true，已存在的所需字段也会被移至最前（entity 需要）；
///   若为 false，仅在缺失时追加到最前，保留既有字段位置（polymorphic 需要）。
pub(crate) fn ensure_required_fields(
    fields_named: &mut FieldsNamed,
    required: &[(&str, &Type)],
    vis: &Visibility,
    reposition_existing: bool,
) {
    let old_named = fields_named.named.clone();
    let mut new_named: Punctuated<Field, Token![,]> = Punctuated::new();

    for (name, ty) in required.iter() {
        match old_named.iter().find(|f| is_named(f, name)) {
            Some(existing) if reposition_existing => new_named.push(existing.clone()),
            Some(_) => {}
            None => {
                let ident = Ident::new(name, Span::call_site());
                new_named.push(syn::parse_quote! { #vis #ident: #ty });
            }
        }
    }

    for f in old_named.into_iter() {
        let moved = reposition_existing && required.iter().any(|(n, _)| is_named(&f, n));
        if !moved {
            new_named.push(f);
        }
    }

    fields_named.named = new_named;
}
