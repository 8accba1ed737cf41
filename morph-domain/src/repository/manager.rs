use super::Repository;
use crate::entity::Entity;
use dashmap::DashMap;
use std::any::{Any, TypeId};
use std::sync::Arc;

type ErasedRepository = Arc<dyn Any + Send + Sync>;

/// 仓储工厂：按实体类型提供仓储实例
/// - 通过 TypeId 注册不同实体对应的仓储
/// - 以类型擦除（Any）方式保存，取用时还原为 `Arc<dyn Repository<T>>`
pub struct RepositoryManager {
    repositories: DashMap<TypeId, (&'static str, ErasedRepository)>,
}

impl Default for RepositoryManager {
    fn default() -> Self {
        Self {
            repositories: DashMap::new(),
        }
    }
}

impl RepositoryManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册实体仓储；重复注册时覆盖先前的仓储
    pub fn register<T, R>(&self, repository: Arc<R>)
    where
        T: Entity,
        R: Repository<T> + 'static,
    {
        let typed: Arc<dyn Repository<T>> = repository;
        let erased: ErasedRepository = Arc::new(typed);
        let previous = self
            .repositories
            .insert(TypeId::of::<T>(), (T::TYPE, erased));

        tracing::debug!(
            entity = T::TYPE,
            replaced = previous.is_some(),
            "repository registered"
        );
    }

    /// 获取实体仓储，未注册时返回 None
    pub fn repository<T>(&self) -> Option<Arc<dyn Repository<T>>>
    where
        T: Entity,
    {
        self.repositories.get(&TypeId::of::<T>()).and_then(|entry| {
            // 键与值由同一泛型 T 写入，正常情况下 downcast 不会失败
            entry
                .value()
                .1
                .downcast_ref::<Arc<dyn Repository<T>>>()
                .cloned()
        })
    }

    pub fn contains<T>(&self) -> bool
    where
        T: Entity,
    {
        self.repositories.contains_key(&TypeId::of::<T>())
    }

    /// 获取已注册的实体判别名列表（只读视图）
    pub fn registered(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.repositories.iter().map(|e| e.value().0).collect();
        names.sort_unstable();
        names
    }
}
