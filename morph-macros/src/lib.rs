//! 多态关联领域层的过程宏（morph-macros）
//!
//! - `#[entity]`：为拥有者/记录注入 `id`、`version` 并实现 `Entity`
//! - `#[polymorphic]`：为多态记录注入 `entity_id`、`entity_type` 并实现 `PolymorphicRecord`
//!
use proc_macro::TokenStream;

mod derive_utils;
mod entity;
mod field_utils;
mod polymorphic;

/// 实体宏
/// - 若缺失则追加字段：`id: IdType`, `version: usize`，并置于字段最前（可见性与结构体一致）
/// - 自动实现 `::morph_domain::entity::Entity`
/// - 参数：`#[entity(id = IdType, type = "name", debug = true|false)]`
#[proc_macro_attribute]
pub fn entity(attr: TokenStream, item: TokenStream) -> TokenStream {
    entity::expand(attr, item)
}

/// 多态记录宏
/// - 若缺失则追加字段：`entity_id: String`, `entity_type: String`
/// - 自动实现 `::morph_domain::entity::PolymorphicRecord`（需同时使用 `#[entity]`）
#[proc_macro_attribute]
pub fn polymorphic(attr: TokenStream, item: TokenStream) -> TokenStream {
    polymorphic::expand(attr, item)
}
