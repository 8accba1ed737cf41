use super::registry::Registry;
use crate::entity::Entity;
use crate::error::{DomainError, DomainResult as Result};
use crate::repository::RepositoryManager;
use futures_util::future::try_join_all;

/// 关联水合器：为已读取的拥有者批量填充多态属性
///
/// 每个（声明 × 拥有者）发起一次独立查询并全部并发执行，不做去重；
/// 任一查询失败则整体失败，且不会对调用方的实体做任何写回。
/// 重复水合会重新查询并覆写属性，而非合并。
pub struct Hydrator<'a> {
    registry: &'a Registry,
    manager: &'a RepositoryManager,
}

impl<'a> Hydrator<'a> {
    pub fn new(registry: &'a Registry, manager: &'a RepositoryManager) -> Self {
        Self { registry, manager }
    }

    #[tracing::instrument(level = "debug", skip_all, fields(owner = O::TYPE))]
    pub async fn hydrate<O>(&self, entities: &mut [O]) -> Result<()>
    where
        O: Entity,
    {
        let associations = self.registry.associations::<O>();
        if associations.is_empty() || entities.is_empty() {
            return Ok(());
        }

        let mut pending = Vec::with_capacity(associations.len() * entities.len());
        for association in &associations {
            for (index, entity) in entities.iter().enumerate() {
                let task = association.fetch(self.manager, entity)?;
                pending.push(async move { Ok::<_, DomainError>((index, task.await?)) });
            }
        }

        let queries = pending.len();
        let writebacks = try_join_all(pending).await?;
        for (index, writeback) in writebacks {
            writeback(&mut entities[index]);
        }

        tracing::debug!(
            entities = entities.len(),
            declarations = associations.len(),
            queries,
            "polymorphic associations hydrated"
        );

        Ok(())
    }
}
