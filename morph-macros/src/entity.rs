use crate::derive_utils::apply_derives;
use crate::field_utils::ensure_required_fields;
use proc_macro::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Item, LitStr, Result, Token, Type, parse::Parse, parse::ParseStream, parse_macro_input};

/// #[entity] 宏实现
/// - 若缺失则追加字段：`id: IdType`, `version: usize`，并置于字段最前（可见性与结构体一致）
/// - 自动实现 `::morph_domain::entity::Entity`（TYPE/new/id/version/stamp）
/// - 支持参数：`#[entity(id = IdType, type = "name", debug = true|false)]`；
///   - `id` 默认 `String`
///   - `type` 为判别名，默认取结构体名；一旦写入存储应保持稳定
///   - `debug` 默认 `true`（派生 Debug）。当为 `false` 时不派生 Debug，便于用户自定义实现。
/// - 多态关联属性需自行标注 `#[serde(skip)]`，避免随拥有者一同序列化
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as EntityAttrConfig);
    let input = parse_macro_input!(item as Item);

    let mut st = match input {
        Item::Struct(s) => s,
        other => {
            return syn::Error::new(other.span(), "#[entity] only on struct")
                .to_compile_error()
                .into();
        }
    };

    // 仅支持具名字段结构体
    let vis = st.vis.clone();
    let fields_named = match &mut st.fields {
        syn::Fields::Named(f) => f,
        _ => {
            return syn::Error::new(st.span(), "only supports named-field struct")
                .to_compile_error()
                .into();
        }
    };

    let id_type = cfg.id_ty.unwrap_or_else(|| syn::parse_quote! { String });
    let type_name = cfg
        .type_name
        .unwrap_or_else(|| LitStr::new(&st.ident.to_string(), st.ident.span()));

    let usize_ty: Type = syn::parse_quote! { usize };
    ensure_required_fields(
        fields_named,
        &[("id", &id_type), ("version", &usize_ty)],
        &vis,
        /*reposition_existing*/ true,
    );

    // 合并/规范 derive：默认添加 Debug（可通过 debug=false 关闭）、Default、Serialize、Deserialize
    let mut required: Vec<syn::Path> = vec![
        syn::parse_quote!(Default),
        syn::parse_quote!(serde::Serialize),
        syn::parse_quote!(serde::Deserialize),
    ];
    if cfg.derive_debug.unwrap_or(true) {
        required.insert(0, syn::parse_quote!(Debug));
    }
    apply_derives(&mut st.attrs, required);

    let ident = &st.ident;
    let (impl_generics, ty_generics, where_clause) = st.generics.split_for_impl();

    let expanded = quote! {
        #st

        impl #impl_generics ::morph_domain::entity::Entity for #ident #ty_generics #where_clause {
            const TYPE: &'static str = #type_name;

            type Id = #id_type;

            fn new(id: Self::Id, version: usize) -> Self {
                Self { id, version, ..Default::default() }
            }

            fn id(&self) -> &Self::Id { &self.id }

            fn version(&self) -> usize { self.version }

            fn stamp(&mut self, id: Self::Id, version: usize) {
                self.id = id;
                self.version = version;
            }
        }
    };

    TokenStream::from(expanded)
}

// -------- parsing --------

struct EntityAttrConfig {
    id_ty: Option<Type>,
    type_name: Option<LitStr>,
    derive_debug: Option<bool>,
}

impl Parse for EntityAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut cfg = Self {
            id_ty: None,
            type_name: None,
            derive_debug: None,
        };

        let elems: Punctuated<EntityAttrElem, Token![,]> =
            Punctuated::<EntityAttrElem, Token![,]>::parse_terminated(input)?;

        for elem in elems.into_iter() {
            match elem {
                EntityAttrElem::Id(ty) => {
                    if cfg.id_ty.is_some() {
                        return Err(syn::Error::new(ty.span(), "duplicate key 'id' in attribute"));
                    }
                    cfg.id_ty = Some(*ty);
                }
                EntityAttrElem::TypeName(lit) => {
                    if cfg.type_name.is_some() {
                        return Err(syn::Error::new(
                            lit.span(),
                            "duplicate key 'type' in attribute",
                        ));
                    }
                    if lit.value().is_empty() {
                        return Err(syn::Error::new(lit.span(), "'type' must not be empty"));
                    }
                    cfg.type_name = Some(lit);
                }
                EntityAttrElem::Debug(b) => {
                    if cfg.derive_debug.is_some() {
                        return Err(syn::Error::new(
                            proc_macro2::Span::call_site(),
                            "duplicate key 'debug' in attribute",
                        ));
                    }
                    cfg.derive_debug = Some(b);
                }
            }
        }

        Ok(cfg)
    }
}

enum EntityAttrElem {
    Id(Box<Type>),
    TypeName(LitStr),
    Debug(bool),
}

impl Parse for EntityAttrElem {
    fn parse(input: ParseStream) -> Result<Self> {
        // `type` 是关键字，需以 parse_any 读取
        let key = input.call(syn::Ident::parse_any)?;
        let _eq: Token![=] = input.parse()?;

        if key == "id" {
            let ty: Type = input.parse()?;
            Ok(EntityAttrElem::Id(Box::new(ty)))
        } else if key == "type" {
            let lit: LitStr = input.parse()?;
            Ok(EntityAttrElem::TypeName(lit))
        } else if key == "debug" {
            let lit: syn::LitBool = input.parse()?;
            Ok(EntityAttrElem::Debug(lit.value()))
        } else {
            Err(syn::Error::new(
                key.span(),
                "unknown key in attribute; expected 'id', 'type' or 'debug'",
            ))
        }
    }
}
