use super::association::Writeback;
use super::registry::Registry;
use crate::entity::Entity;
use crate::error::{DomainError, DomainResult as Result};
use crate::repository::RepositoryManager;
use futures_util::future::try_join_all;

/// 关联持久化器：在拥有者保存之后写入其多态属性中的记录
///
/// 记录被打上拥有者的 (`entity_id`, `entity_type`)，新实例经 `create` 后保存，
/// 保存结果写回属性以反映生成的标识。未设置的属性跳过。
/// 同一拥有者的全部声明、全部记录并发提交，彼此之间无顺序保证。
pub struct Persister<'a> {
    registry: &'a Registry,
    manager: &'a RepositoryManager,
}

impl<'a> Persister<'a> {
    pub fn new(registry: &'a Registry, manager: &'a RepositoryManager) -> Self {
        Self { registry, manager }
    }

    /// 要求拥有者已完成保存（标识已分配）
    #[tracing::instrument(level = "debug", skip_all, fields(owner = O::TYPE))]
    pub async fn persist<O>(&self, mut owner: O) -> Result<O>
    where
        O: Entity,
    {
        let associations = self.registry.associations::<O>();

        let mut pending = Vec::with_capacity(associations.len());
        for association in &associations {
            if let Some(task) = association.stage(self.manager, &mut owner)? {
                pending.push(task);
            }
        }

        if pending.is_empty() {
            return Ok(owner);
        }

        let properties = pending.len();
        for writeback in try_join_all(pending).await? {
            writeback(&mut owner);
        }

        tracing::debug!(properties, "polymorphic associations persisted");

        Ok(owner)
    }

    /// 在拥有者交给内部仓储之前取出全部关联值，与输入一一对应
    pub(crate) fn detach_all<O>(&self, owners: &mut [O]) -> Vec<Vec<Writeback<O>>>
    where
        O: Entity,
    {
        let associations = self.registry.associations::<O>();

        owners
            .iter_mut()
            .map(|owner| {
                associations
                    .iter()
                    .filter_map(|association| association.detach(owner))
                    .collect()
            })
            .collect()
    }

    /// 把取出的关联值按位置放回保存结果上，再持久化
    ///
    /// 内部仓储可能返回重新加载的实例（关联属性不参与序列化），因此不能依赖其保留关联值；
    /// 返回条数与输入不一致时无法对应，直接失败。
    pub(crate) async fn reattach_all<O>(
        &self,
        mut saved: Vec<O>,
        detached: Vec<Vec<Writeback<O>>>,
    ) -> Result<Vec<O>>
    where
        O: Entity,
    {
        if saved.len() != detached.len() {
            return Err(DomainError::Repository {
                reason: format!(
                    "save of [{}] returned {} entities for {} inputs",
                    O::TYPE,
                    saved.len(),
                    detached.len()
                ),
            });
        }

        for (owner, writebacks) in saved.iter_mut().zip(detached) {
            for writeback in writebacks {
                writeback(owner);
            }
        }

        self.persist_all(saved).await
    }

    /// 批量持久化，各拥有者之间并发且完成顺序不定；返回顺序与输入一致
    pub async fn persist_all<O>(&self, owners: Vec<O>) -> Result<Vec<O>>
    where
        O: Entity,
    {
        try_join_all(owners.into_iter().map(|owner| self.persist(owner))).await
    }
}
