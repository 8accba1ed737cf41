use crate::entity::{Entity, PolymorphicRecord};

/// 关联基数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    One,
    Many,
}

/// 拥有者上关联属性的类型化访问器
///
/// 属性为 `None` 表示未设置：持久化时跳过，水合时总会被覆写。
pub enum Accessor<O, T> {
    One(fn(&mut O) -> &mut Option<T>),
    Many(fn(&mut O) -> &mut Option<Vec<T>>),
}

impl<O, T> Clone for Accessor<O, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<O, T> Copy for Accessor<O, T> {}

impl<O, T> Accessor<O, T> {
    pub fn cardinality(&self) -> Cardinality {
        match self {
            Accessor::One(_) => Cardinality::One,
            Accessor::Many(_) => Cardinality::Many,
        }
    }

    pub(crate) fn is_set(&self, owner: &mut O) -> bool {
        match self {
            Accessor::One(field) => field(owner).is_some(),
            Accessor::Many(field) => field(owner).is_some(),
        }
    }

    /// 取出当前值并置为未设置；单值视作单元素序列
    pub(crate) fn take(&self, owner: &mut O) -> Option<Vec<T>> {
        match self {
            Accessor::One(field) => field(owner).take().map(|v| vec![v]),
            Accessor::Many(field) => field(owner).take(),
        }
    }

    /// 覆写属性：单值取首条（无结果则为 None），多值整体替换
    pub(crate) fn assign(&self, owner: &mut O, records: Vec<T>) {
        match self {
            Accessor::One(field) => *field(owner) = records.into_iter().next(),
            Accessor::Many(field) => *field(owner) = Some(records),
        }
    }
}

/// 关联声明的只读元数据视图
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Declaration {
    pub owner_type: &'static str,
    pub property: &'static str,
    pub target_type: &'static str,
    pub cardinality: Cardinality,
}

impl Declaration {
    pub(crate) fn of<O, T>(property: &'static str, accessor: &Accessor<O, T>) -> Self
    where
        O: Entity,
        T: PolymorphicRecord,
    {
        Self {
            owner_type: O::TYPE,
            property,
            target_type: T::TYPE,
            cardinality: accessor.cardinality(),
        }
    }
}
