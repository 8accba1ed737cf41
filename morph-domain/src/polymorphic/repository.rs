//! 多态仓储门面
//!
//! 包装拥有者类型的通用仓储，在其之上编排关联记录的读取与写入：
//! - 拥有者未声明任何多态关联时，直接委托内部仓储（零额外开销）；
//! - `find` 先完成拥有者读取，再水合关联属性；
//! - `save` 先取出关联值并完成拥有者保存，再按位置放回并持久化关联记录；
//! - `update` 无法逐实例维护关联，存在声明时显式失败。
//!
use super::declaration::Declaration;
use super::hydrator::Hydrator;
use super::persister::Persister;
use super::registry::Registry;
use crate::entity::Entity;
use crate::error::{DomainError, DomainResult as Result};
use crate::repository::{Criteria, Patch, Repository, RepositoryManager, SaveOptions, UpdateResult};
use async_trait::async_trait;
use std::marker::PhantomData;
use std::sync::Arc;

pub struct PolymorphicRepository<O, R> {
    inner: R,
    manager: Arc<RepositoryManager>,
    registry: Arc<Registry>,
    _owner: PhantomData<fn() -> O>,
}

impl<O, R> PolymorphicRepository<O, R>
where
    O: Entity,
    R: Repository<O>,
{
    /// 使用进程级注册表
    pub fn new(inner: R, manager: Arc<RepositoryManager>) -> Self {
        Self::with_registry(inner, manager, Registry::global())
    }

    pub fn with_registry(
        inner: R,
        manager: Arc<RepositoryManager>,
        registry: Arc<Registry>,
    ) -> Self {
        Self {
            inner,
            manager,
            registry,
            _owner: PhantomData,
        }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// 当前拥有者类型的关联声明
    pub fn declarations(&self) -> Vec<Declaration> {
        self.registry.declarations::<O>()
    }

    /// 对已加载的拥有者重新水合关联属性
    pub async fn hydrate(&self, entities: &mut [O]) -> Result<()> {
        Hydrator::new(&self.registry, &self.manager)
            .hydrate(entities)
            .await
    }
}

#[async_trait]
impl<O, R> Repository<O> for PolymorphicRepository<O, R>
where
    O: Entity,
    R: Repository<O>,
{
    async fn find(&self, criteria: &Criteria) -> Result<Vec<O>> {
        if !self.registry.has_declarations::<O>() {
            return self.inner.find(criteria).await;
        }

        let mut entities = self.inner.find(criteria).await?;
        self.hydrate(&mut entities).await?;

        Ok(entities)
    }

    async fn save(&self, mut entities: Vec<O>, options: SaveOptions) -> Result<Vec<O>> {
        if !self.registry.has_declarations::<O>() {
            return self.inner.save(entities, options).await;
        }

        let persister = Persister::new(&self.registry, &self.manager);
        let detached = persister.detach_all(&mut entities);

        let saved = self.inner.save(entities, options).await?;
        persister.reattach_all(saved, detached).await
    }

    async fn create(&self, draft: O) -> Result<O> {
        self.inner.create(draft).await
    }

    async fn update(&self, criteria: &Criteria, patch: Patch) -> Result<UpdateResult> {
        if self.registry.has_declarations::<O>() {
            tracing::debug!(owner = O::TYPE, "partial update refused");
            return Err(DomainError::UnsupportedOperation {
                operation: "update",
                owner: O::TYPE,
            });
        }

        self.inner.update(criteria, patch).await
    }
}
