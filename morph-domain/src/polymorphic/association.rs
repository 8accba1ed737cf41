//! 类型擦除的关联处理
//!
//! 注册表按拥有者类型保存 `dyn Association<O>`，目标类型 `T` 被封装在
//! `TypedAssociation` 内部；读取/写入任务以 `'static` future 形式交给调用方并发执行，
//! 完成后返回写回闭包，由调用方统一作用到拥有者上。
//!
use super::declaration::{Accessor, Cardinality, Declaration};
use crate::entity::{Entity, PolymorphicRecord};
use crate::error::{DomainError, DomainResult as Result};
use crate::repository::{Criteria, Repository, RepositoryExt, RepositoryManager};
use futures_util::future::{BoxFuture, try_join_all};
use std::sync::Arc;

pub(crate) type Writeback<O> = Box<dyn FnOnce(&mut O) + Send>;

pub(crate) type Pending<O> = BoxFuture<'static, Result<Writeback<O>>>;

pub(crate) trait Association<O>: Send + Sync
where
    O: Entity,
{
    fn declaration(&self) -> &Declaration;

    /// 为单个拥有者构造关联记录的读取任务
    fn fetch(&self, manager: &RepositoryManager, owner: &O) -> Result<Pending<O>>;

    /// 取出拥有者上的关联值并构造写入任务；属性未设置时返回 None
    fn stage(&self, manager: &RepositoryManager, owner: &mut O) -> Result<Option<Pending<O>>>;

    /// 取出属性当前值，返回把它放回任意同类实例的写回闭包；未设置时返回 None
    fn detach(&self, owner: &mut O) -> Option<Writeback<O>>;
}

pub(crate) struct TypedAssociation<O, T> {
    declaration: Declaration,
    accessor: Accessor<O, T>,
}

impl<O, T> TypedAssociation<O, T>
where
    O: Entity,
    T: PolymorphicRecord,
{
    pub(crate) fn new(property: &'static str, accessor: Accessor<O, T>) -> Self {
        Self {
            declaration: Declaration::of(property, &accessor),
            accessor,
        }
    }

    fn resolve(&self, manager: &RepositoryManager) -> Result<Arc<dyn Repository<T>>> {
        manager
            .repository::<T>()
            .ok_or(DomainError::Configuration {
                target: T::TYPE,
                property: self.declaration.property,
                owner: O::TYPE,
            })
    }
}

impl<O, T> Association<O> for TypedAssociation<O, T>
where
    O: Entity,
    T: PolymorphicRecord,
{
    fn declaration(&self) -> &Declaration {
        &self.declaration
    }

    fn fetch(&self, manager: &RepositoryManager, owner: &O) -> Result<Pending<O>> {
        let repository = self.resolve(manager)?;
        let criteria = Criteria::owned_by(owner.id().to_string(), O::TYPE);
        let accessor = self.accessor;
        let property = self.declaration.property;

        Ok(Box::pin(async move {
            let records = repository.find(&criteria).await?;

            if accessor.cardinality() == Cardinality::One && records.len() > 1 {
                tracing::warn!(
                    owner = O::TYPE,
                    property,
                    matched = records.len(),
                    "single-valued association matched several records, keeping the first"
                );
            }

            let writeback: Writeback<O> =
                Box::new(move |owner: &mut O| accessor.assign(owner, records));
            Ok(writeback)
        }))
    }

    fn stage(&self, manager: &RepositoryManager, owner: &mut O) -> Result<Option<Pending<O>>> {
        if !self.accessor.is_set(owner) {
            return Ok(None);
        }

        let repository = self.resolve(manager)?;
        let records = self.accessor.take(owner).unwrap_or_default();
        let entity_id = owner.id().to_string();
        let accessor = self.accessor;

        Ok(Some(Box::pin(async move {
            let saved = try_join_all(records.into_iter().map(|mut record| {
                record.attach(entity_id.clone(), O::TYPE);
                let repository = Arc::clone(&repository);
                async move { upsert(&*repository, record).await }
            }))
            .await?;

            let writeback: Writeback<O> =
                Box::new(move |owner: &mut O| accessor.assign(owner, saved));
            Ok(writeback)
        })))
    }

    fn detach(&self, owner: &mut O) -> Option<Writeback<O>> {
        let records = self.accessor.take(owner)?;
        let accessor = self.accessor;

        Some(Box::new(move |owner: &mut O| accessor.assign(owner, records)))
    }
}

/// 新实例先经 `create` 准备，再统一保存
async fn upsert<T>(repository: &dyn Repository<T>, record: T) -> Result<T>
where
    T: Entity,
{
    let record = if record.is_new() {
        repository.create(record).await?
    } else {
        record
    };

    repository.save_one(record).await
}
