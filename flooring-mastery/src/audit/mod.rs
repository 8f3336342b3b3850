//! 审计日志模块
//!
//! # 架构
//!
//! ```text
//! OrderService 操作
//!   └─ AuditSink::record(action, detail)
//!        ├─ FileAuditLog  → audit.txt (append)
//!        ├─ TracingAudit  → tracing target "audit"
//!        └─ NoopAudit
//! ```
//!
//! Audit is fire-and-forget: a sink error is logged and never turns into an
//! operation failure.

pub mod sink;
pub mod types;

pub use sink::{AuditSink, FileAuditLog, NoopAudit, TracingAudit};
pub use types::{AuditAction, AuditError};
