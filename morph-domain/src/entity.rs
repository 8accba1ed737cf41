//! 实体（Entity）与多态记录（PolymorphicRecord）抽象
//!
//! 为拥有者实体提供统一的判别名、标识与版本；为多态记录额外提供
//! 指向拥有者的判别字段。
//!
use std::{fmt::Display, str::FromStr};

/// 具备判别名、唯一标识与版本的实体抽象
pub trait Entity: Send + Sync + 'static {
    /// 类型判别名，写入多态记录的 `entity_type`，应在重命名/重构后保持稳定
    const TYPE: &'static str;

    /// 实体标识类型，要求可解析、可显示与可克隆
    type Id: FromStr + Clone + Display + Send + Sync;

    /// 使用给定标识与版本创建实体
    fn new(id: Self::Id, version: usize) -> Self;

    /// 获取实体标识
    fn id(&self) -> &Self::Id;

    /// 获取当前版本（0 表示尚未持久化）
    fn version(&self) -> usize;

    /// 由存储写回标识与版本
    fn stamp(&mut self, id: Self::Id, version: usize);

    /// 是否为尚未持久化的新实例
    fn is_new(&self) -> bool {
        self.version() == 0
    }
}

/// 多态记录：通过 (`entity_id`, `entity_type`) 指向其拥有者
pub trait PolymorphicRecord: Entity {
    /// 拥有者标识（拥有者 `Id` 的 `Display` 形式）
    fn entity_id(&self) -> &str;

    /// 拥有者判别名
    fn entity_type(&self) -> &str;

    /// 将记录挂到指定拥有者
    fn attach(&mut self, entity_id: String, entity_type: &str);
}

/// 多态记录上拥有者标识字段名
pub const ENTITY_ID_FIELD: &str = "entity_id";

/// 多态记录上拥有者判别名字段名
pub const ENTITY_TYPE_FIELD: &str = "entity_type";
