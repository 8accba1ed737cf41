use super::association::{Association, TypedAssociation};
use super::declaration::{Accessor, Declaration};
use crate::entity::{Entity, PolymorphicRecord};
use dashmap::DashMap;
use std::any::{Any, TypeId};
use std::sync::{Arc, LazyLock};

static GLOBAL: LazyLock<Arc<Registry>> = LazyLock::new(|| Arc::new(Registry::new()));

struct Entry {
    declaration: Declaration,
    // 实际类型为 Arc<dyn Association<O>>，O 由键中的 TypeId 决定
    association: Arc<dyn Any + Send + Sync>,
}

/// 多态关联声明注册表
/// - 以 (拥有者 TypeId, 属性名) 为键，重复声明时后写覆盖
/// - 读多写少：声明应在并发访问开始前完成
pub struct Registry {
    entries: DashMap<(TypeId, &'static str), Entry>,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 进程级共享注册表
    pub fn global() -> Arc<Registry> {
        Arc::clone(&GLOBAL)
    }

    /// 声明拥有者 `O` 的属性 `property` 解析到多态记录 `T`
    pub fn declare<O, T>(&self, property: &'static str, accessor: Accessor<O, T>) -> Declaration
    where
        O: Entity,
        T: PolymorphicRecord,
    {
        let typed: Arc<dyn Association<O>> = Arc::new(TypedAssociation::new(property, accessor));
        let declaration = typed.declaration().clone();

        let previous = self.entries.insert(
            (TypeId::of::<O>(), property),
            Entry {
                declaration: declaration.clone(),
                association: Arc::new(typed),
            },
        );

        tracing::debug!(
            owner = declaration.owner_type,
            property,
            target = declaration.target_type,
            cardinality = ?declaration.cardinality,
            replaced = previous.is_some(),
            "polymorphic association declared"
        );

        declaration
    }

    /// 读取拥有者的全部声明（按属性名排序），未声明时为空
    pub fn declarations<O>(&self) -> Vec<Declaration>
    where
        O: Entity,
    {
        let owner = TypeId::of::<O>();
        let mut out: Vec<_> = self
            .entries
            .iter()
            .filter(|e| e.key().0 == owner)
            .map(|e| e.value().declaration.clone())
            .collect();
        out.sort_by_key(|d| d.property);
        out
    }

    pub fn has_declarations<O>(&self) -> bool
    where
        O: Entity,
    {
        let owner = TypeId::of::<O>();
        self.entries.iter().any(|e| e.key().0 == owner)
    }

    pub(crate) fn associations<O>(&self) -> Vec<Arc<dyn Association<O>>>
    where
        O: Entity,
    {
        let owner = TypeId::of::<O>();
        let mut out: Vec<_> = self
            .entries
            .iter()
            .filter(|e| e.key().0 == owner)
            .filter_map(|e| {
                e.value()
                    .association
                    .downcast_ref::<Arc<dyn Association<O>>>()
                    .cloned()
            })
            .collect();
        out.sort_by_key(|a| a.declaration().property);
        out
    }
}

/// 在进程级注册表中声明多态关联
pub fn declare<O, T>(property: &'static str, accessor: Accessor<O, T>) -> Declaration
where
    O: Entity,
    T: PolymorphicRecord,
{
    GLOBAL.declare(property, accessor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polymorphic::Cardinality;
    use morph_macros::{entity, polymorphic};

    #[polymorphic]
    #[entity]
    #[derive(Clone)]
    struct Photo {
        url: String,
    }

    #[polymorphic]
    #[entity]
    #[derive(Clone)]
    struct Reaction {}

    #[entity]
    #[derive(Clone)]
    struct Album {
        #[serde(skip)]
        cover: Option<Photo>,
        #[serde(skip)]
        photos: Option<Vec<Photo>>,
        #[serde(skip)]
        reactions: Option<Vec<Reaction>>,
    }

    #[entity]
    #[derive(Clone)]
    struct Plain {}

    #[test]
    fn lookup_without_declarations_is_empty() {
        let registry = Registry::new();
        assert!(registry.declarations::<Plain>().is_empty());
        assert!(!registry.has_declarations::<Plain>());
        assert!(registry.associations::<Plain>().is_empty());
    }

    #[test]
    fn declarations_are_sorted_and_typed() {
        let registry = Registry::new();
        registry.declare::<Album, Photo>("photos", Accessor::Many(|a| &mut a.photos));
        registry.declare::<Album, Photo>("cover", Accessor::One(|a| &mut a.cover));

        let decls = registry.declarations::<Album>();
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].property, "cover");
        assert_eq!(decls[0].cardinality, Cardinality::One);
        assert_eq!(decls[1].property, "photos");
        assert_eq!(decls[1].cardinality, Cardinality::Many);
        assert!(decls.iter().all(|d| d.owner_type == "Album"));
        assert!(decls.iter().all(|d| d.target_type == "Photo"));

        assert_eq!(registry.associations::<Album>().len(), 2);
        assert!(!registry.has_declarations::<Plain>());
    }

    #[test]
    fn redeclaring_a_property_overwrites() {
        let registry = Registry::new();
        registry.declare::<Album, Photo>("photos", Accessor::Many(|a| &mut a.photos));
        let last =
            registry.declare::<Album, Reaction>("photos", Accessor::Many(|a| &mut a.reactions));

        let decls = registry.declarations::<Album>();
        assert_eq!(decls, vec![last]);
        assert_eq!(decls[0].target_type, "Reaction");
    }

    #[test]
    fn global_declare_is_visible_through_global_registry() {
        #[entity]
        #[derive(Clone)]
        struct Gallery {
            #[serde(skip)]
            photos: Option<Vec<Photo>>,
        }

        declare::<Gallery, Photo>("photos", Accessor::Many(|g| &mut g.photos));
        assert!(Registry::global().has_declarations::<Gallery>());
        assert!(!Registry::new().has_declarations::<Gallery>());
    }
}
