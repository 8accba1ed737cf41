//! 查询条件
//!
//! 以实体的 serde 序列化形态为准的字段等值合取条件。
//!
use crate::entity::{ENTITY_ID_FIELD, ENTITY_TYPE_FIELD};
use crate::error::DomainResult as Result;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    conditions: Vec<(String, Value)>,
}

impl Criteria {
    /// 空条件，匹配全部记录
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个字段等值条件
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((field.into(), value.into()));
        self
    }

    /// 按主键 `id` 查询
    pub fn by_id<I>(id: &I) -> Result<Self>
    where
        I: Serialize + ?Sized,
    {
        Ok(Self::new().eq("id", serde_json::to_value(id)?))
    }

    /// 查询挂在指定拥有者下的多态记录
    pub fn owned_by(entity_id: impl Into<String>, entity_type: &str) -> Self {
        Self::new()
            .eq(ENTITY_ID_FIELD, entity_id.into())
            .eq(ENTITY_TYPE_FIELD, entity_type)
    }

    pub fn conditions(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.conditions.iter().map(|(f, v)| (f.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// 判断序列化后的文档是否满足全部条件（缺失字段视为不匹配）
    pub fn matches(&self, document: &Value) -> bool {
        self.conditions
            .iter()
            .all(|(field, expected)| document.get(field) == Some(expected))
    }
}
