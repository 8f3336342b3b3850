//! Audit sinks
//!
//! The service reports each operation to an [`AuditSink`]. Sinks are
//! write-only and best effort: the caller logs a failed `record` and moves on.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

use super::types::{AuditAction, AuditError};

/// Timestamp layout of audit file lines (local time, nanoseconds)
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S:%9f";

pub trait AuditSink {
    fn record(&self, action: AuditAction, detail: &str) -> Result<(), AuditError>;
}

/// Appends one line per entry to a text file
///
/// ```text
/// 2021-08-06 14:03:22:118734000: OrderSubmitted: #18 on 2021-02-23
/// ```
///
/// The file is opened in append mode for each entry and closed right after.
#[derive(Debug, Clone)]
pub struct FileAuditLog {
    path: PathBuf,
}

impl FileAuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditSink for FileAuditLog {
    fn record(&self, action: AuditAction, detail: &str) -> Result<(), AuditError> {
        let append_err = |source| AuditError::Append {
            path: self.path.clone(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(append_err)?;
        writeln!(
            file,
            "{}: {action}: {detail}",
            Local::now().format(TIMESTAMP_FORMAT)
        )
        .map_err(append_err)
    }
}

/// Forwards entries to `tracing` under the `audit` target
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAudit;

impl AuditSink for TracingAudit {
    fn record(&self, action: AuditAction, detail: &str) -> Result<(), AuditError> {
        tracing::info!(target: "audit", action = %action, "{}", detail);
        Ok(())
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAudit;

impl AuditSink for NoopAudit {
    fn record(&self, _action: AuditAction, _detail: &str) -> Result<(), AuditError> {
        Ok(())
    }
}
