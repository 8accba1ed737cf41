//! 领域层统一错误定义
//!
//! 聚焦多态关联的配置/操作错误，以及底层仓储可能抛出的最小必要集合。
//! 多态层对底层仓储错误原样透传，不做包装或重试。
//!
use thiserror::Error;

/// 统一错误类型（基础库最小必要集）
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DomainError {
    // --- 多态关联 ---
    #[error(
        "repository not found for type [{target}] using property [{property}] on parent entity [{owner}]"
    )]
    Configuration {
        target: &'static str,
        property: &'static str,
        owner: &'static str,
    },
    #[error("unsupported operation: {operation} on [{owner}] with polymorphic declarations")]
    UnsupportedOperation {
        operation: &'static str,
        owner: &'static str,
    },

    // --- 仓储/持久化 ---
    #[error("serialization error: {source}")]
    Serde {
        #[from]
        source: serde_json::Error,
    },
    #[error("repository error: {reason}")]
    Repository { reason: String },
    #[error("database error: {reason}")]
    Database { reason: String },
    #[error("version conflict: expected={expected}, actual={actual}")]
    VersionConflict { expected: usize, actual: usize },
    #[error("not found: {reason}")]
    NotFound { reason: String },
    #[error("invalid value: {reason}")]
    InvalidValue { reason: String },
}

/// 统一 Result 类型别名
pub type DomainResult<T> = Result<T, DomainError>;

// ---- Cross-crate conversions for infrastructure convenience ----
// 允许在基础设施层直接使用 `?` 将 sqlx 错误转换为 DomainError

#[cfg(feature = "infra-sqlx")]
impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DomainError::NotFound {
                reason: "row not found".to_string(),
            },
            other => DomainError::Database {
                reason: other.to_string(),
            },
        }
    }
}
