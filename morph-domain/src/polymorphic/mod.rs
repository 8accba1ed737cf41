//! 多态关联（polymorphic）
//!
//! 拥有者实体声明的属性通过目标记录上的 (`entity_id`, `entity_type`) 解析，
//! 而非依赖固定外键。组成部分：
//! - 声明与访问器（`Declaration`/`Accessor`/`Cardinality`）；
//! - 进程级声明注册表与元数据读取（`Registry`）；
//! - 读取后填充关联属性的水合器（`Hydrator`）；
//! - 保存后写入关联记录的持久化器（`Persister`）；
//! - 组合以上构件的仓储门面（`PolymorphicRepository`）。
//!
//! 声明应在启动阶段（并发读写开始之前）一次性登记。
//!
mod association;
mod declaration;
mod hydrator;
mod persister;
mod registry;
mod repository;

pub use declaration::{Accessor, Cardinality, Declaration};
pub use hydrator::Hydrator;
pub use persister::Persister;
pub use registry::{Registry, declare};
pub use repository::PolymorphicRepository;
