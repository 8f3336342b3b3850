//! 审计日志类型定义
//!
//! Audit actions are an enum, not free text, so every operation the service
//! performs has a stable identifier in the log.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// 审计操作类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuditAction {
    // ═══ 数据加载 ═══
    LoadStarted,
    LoadSucceeded,
    LoadFailed,

    // ═══ 查询 ═══
    OrdersQueried,
    OrderLookedUp,
    StatesQueried,
    ProductsQueried,
    OrderNumberComputed,

    // ═══ 订单变更 ═══
    OrderDrafted,
    OrderSubmitted,
    OrderSubmitRejected,
    OrderReplaced,
    OrderReplaceRejected,
    OrderRemoved,
    OrderRemoveNotFound,

    // ═══ 持久化 ═══
    OrdersSaved,
    OrdersSaveFailed,
    OrdersExported,
    OrdersExportFailed,
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Could not append audit entry to {path}: {source}")]
    Append {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
