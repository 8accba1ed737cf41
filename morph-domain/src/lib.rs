//! 多态关联领域层（morph-domain）
//!
//! 在通用实体仓储（find/save/create/update）之上叠加**多态关联**能力：
//! 拥有者实体声明一个属性，其目标记录不通过外键约束，而是借助记录上的
//! 判别字段（`entity_id`、`entity_type`）在运行时解析。
//!
//! - 实体与多态记录抽象（`entity`）
//! - 通用仓储协议、仓储工厂与查询条件（`repository`）
//! - 关联声明注册表、水合器、持久化器与多态仓储门面（`polymorphic`）
//!
//! 本 crate 不关心底层存储如何执行查询与事务，仅定义所需的最小仓储契约，
//! 并在其之上编排关联记录的读取与写入时机。
//!
//! 典型用法：
//! 1. 使用 `#[entity]` / `#[polymorphic]` 定义拥有者与多态记录；
//! 2. 在启动阶段通过 `polymorphic::declare` 登记关联属性；
//! 3. 将各类型的仓储注册到 `RepositoryManager`；
//! 4. 以 `PolymorphicRepository` 包装拥有者仓储，照常调用 `find/save`。
//!
pub mod entity;
pub mod error;
pub mod polymorphic;
pub mod repository;

// 允许在本 crate 内部通过 ::morph_domain 进行自引用，
// 以便过程宏在本 crate 的单元测试中也能解析到 ::morph_domain 路径。
extern crate self as morph_domain;
