//! 通用仓储协议（repository）
//!
//! 多态层所依赖的最小仓储契约，以及围绕它的装配构件：
//! - 按类型提供仓储实例的工厂（`RepositoryManager`）；
//! - 以实体序列化形态为准的等值查询条件（`Criteria`）；
//! - 基于内存的参考实现（`InMemoryRepository`，需开启 `inmemory` 特性）。
//!
//! 具体存储后端（如 Postgres）由上层实现 `Repository` 并注入。
//!
mod criteria;
#[cfg(feature = "inmemory")]
mod inmemory;
mod manager;

pub use criteria::Criteria;
#[cfg(feature = "inmemory")]
pub use inmemory::InMemoryRepository;
pub use manager::RepositoryManager;

use crate::entity::Entity;
use crate::error::{DomainError, DomainResult as Result};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

/// 部分更新载荷：字段名 -> 新值
pub type Patch = serde_json::Map<String, serde_json::Value>;

/// 保存选项
#[derive(Debug, Clone, Copy, PartialEq, Eq, bon::Builder)]
pub struct SaveOptions {
    /// 为 true 时整批校验通过后才写入；为 false 时逐条写入，遇错即停
    #[builder(default = true)]
    pub transaction: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self { transaction: true }
    }
}

/// 部分更新结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateResult {
    /// 受影响的记录数
    pub affected: usize,
}

#[async_trait]
pub trait Repository<T>: Send + Sync
where
    T: Entity,
{
    async fn find(&self, criteria: &Criteria) -> Result<Vec<T>>;

    async fn save(&self, entities: Vec<T>, options: SaveOptions) -> Result<Vec<T>>;

    /// 准备一个尚未保存的实例（不写入存储）
    async fn create(&self, draft: T) -> Result<T>;

    async fn update(&self, criteria: &Criteria, patch: Patch) -> Result<UpdateResult>;
}

#[async_trait]
impl<T, R> Repository<T> for Arc<R>
where
    T: Entity,
    R: Repository<T> + ?Sized,
{
    async fn find(&self, criteria: &Criteria) -> Result<Vec<T>> {
        (**self).find(criteria).await
    }

    async fn save(&self, entities: Vec<T>, options: SaveOptions) -> Result<Vec<T>> {
        (**self).save(entities, options).await
    }

    async fn create(&self, draft: T) -> Result<T> {
        (**self).create(draft).await
    }

    async fn update(&self, criteria: &Criteria, patch: Patch) -> Result<UpdateResult> {
        (**self).update(criteria, patch).await
    }
}

/// 单实体便捷操作
#[async_trait]
pub trait RepositoryExt<T>: Repository<T>
where
    T: Entity,
{
    async fn save_one(&self, entity: T) -> Result<T> {
        self.save(vec![entity], SaveOptions::default())
            .await?
            .pop()
            .ok_or_else(|| DomainError::Repository {
                reason: format!("save of [{}] returned no entity", T::TYPE),
            })
    }

    async fn find_one(&self, criteria: &Criteria) -> Result<Option<T>> {
        Ok(self.find(criteria).await?.into_iter().next())
    }

    async fn find_by_id(&self, id: &T::Id) -> Result<Option<T>>
    where
        T::Id: Serialize,
    {
        let criteria = Criteria::by_id(id)?;
        self.find_one(&criteria).await
    }
}

impl<T, R> RepositoryExt<T> for R
where
    T: Entity,
    R: Repository<T> + ?Sized,
{
}
