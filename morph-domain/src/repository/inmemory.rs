//! 基于内存的参考仓储
//!
//! 以实体的 JSON 序列化形态保存记录，按插入顺序返回查询结果；
//! 采用版本号做乐观并发控制，适用于测试、演示与原型验证。
//!
use super::{Criteria, Patch, Repository, SaveOptions, UpdateResult};
use crate::entity::Entity;
use crate::error::{DomainError, DomainResult as Result};
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::marker::PhantomData;
use tokio::sync::RwLock;

type IdGenerator<I> = Box<dyn Fn() -> I + Send + Sync>;

#[derive(Debug, Clone)]
struct Row {
    key: String,
    version: usize,
    document: Value,
}

pub struct InMemoryRepository<T>
where
    T: Entity,
{
    rows: RwLock<Vec<Row>>,
    next_id: IdGenerator<T::Id>,
    _entity: PhantomData<fn() -> T>,
}

impl<T> InMemoryRepository<T>
where
    T: Entity + Serialize + DeserializeOwned,
    T::Id: Default + PartialEq,
{
    /// `next_id` 为未携带标识（默认值）的草稿生成标识
    pub fn new(next_id: impl Fn() -> T::Id + Send + Sync + 'static) -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            next_id: Box::new(next_id),
            _entity: PhantomData,
        }
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    fn ensure_id(&self, entity: &mut T) {
        if *entity.id() == T::Id::default() {
            let version = entity.version();
            entity.stamp((self.next_id)(), version);
        }
    }

    fn write_all(&self, rows: &mut Vec<Row>, entities: Vec<T>) -> Result<Vec<T>> {
        entities
            .into_iter()
            .map(|entity| self.write_one(rows, entity))
            .collect()
    }

    fn write_one(&self, rows: &mut Vec<Row>, mut entity: T) -> Result<T> {
        self.ensure_id(&mut entity);

        let key = entity.id().to_string();
        let position = rows.iter().position(|r| r.key == key);
        let actual = position.map(|i| rows[i].version).unwrap_or(0);

        if entity.version() != actual {
            return Err(DomainError::VersionConflict {
                expected: entity.version(),
                actual,
            });
        }

        let id = entity.id().clone();
        entity.stamp(id, actual + 1);

        let row = Row {
            key,
            version: actual + 1,
            document: serde_json::to_value(&entity)?,
        };

        match position {
            Some(i) => rows[i] = row,
            None => rows.push(row),
        }

        Ok(entity)
    }
}

#[async_trait]
impl<T> Repository<T> for InMemoryRepository<T>
where
    T: Entity + Serialize + DeserializeOwned,
    T::Id: Default + PartialEq,
{
    async fn find(&self, criteria: &Criteria) -> Result<Vec<T>> {
        let rows = self.rows.read().await;

        rows.iter()
            .filter(|r| criteria.matches(&r.document))
            .map(|r| serde_json::from_value(r.document.clone()).map_err(DomainError::from))
            .collect()
    }

    async fn save(&self, entities: Vec<T>, options: SaveOptions) -> Result<Vec<T>> {
        let mut rows = self.rows.write().await;

        if !options.transaction {
            return self.write_all(&mut rows, entities);
        }

        let mut staged = rows.clone();
        let saved = self.write_all(&mut staged, entities)?;
        *rows = staged;

        Ok(saved)
    }

    async fn create(&self, mut draft: T) -> Result<T> {
        self.ensure_id(&mut draft);
        Ok(draft)
    }

    async fn update(&self, criteria: &Criteria, patch: Patch) -> Result<UpdateResult> {
        if patch.contains_key("id") || patch.contains_key("version") {
            return Err(DomainError::InvalidValue {
                reason: "identity and version cannot be patched".to_string(),
            });
        }

        let mut rows = self.rows.write().await;
        let mut staged = rows.clone();
        let mut affected = 0;

        for row in staged.iter_mut().filter(|r| criteria.matches(&r.document)) {
            let Some(object) = row.document.as_object_mut() else {
                continue;
            };

            for (field, value) in &patch {
                object.insert(field.clone(), value.clone());
            }

            row.version += 1;
            object.insert("version".to_string(), Value::from(row.version));

            // 确保补丁后的文档仍可还原为实体
            serde_json::from_value::<T>(row.document.clone())?;
            affected += 1;
        }

        *rows = staged;

        Ok(UpdateResult { affected })
    }
}
