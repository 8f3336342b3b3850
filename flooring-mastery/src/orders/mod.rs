//! Order module
//!
//! - **record**: line codec for order and export files
//! - **storage**: date-partitioned in-memory index backed by one file per date
//! - **service**: business-facing operations, error mapping and audit
//!
//! # Architecture
//!
//! ```text
//! CLI → OrderService ─┬─ TaxRateProvider / ProductCatalog
//!                     ├─ AuditSink (best effort)
//!                     └─ OrderStorage → Orders/Orders_MMDDYYYY.txt
//!                                     → Backup/DataExport.txt
//! ```

pub mod record;
pub mod service;
pub mod storage;

pub use service::{OrderService, ServiceError, ServiceResult};
pub use storage::{LoadFailure, OrderStorage, StorageError, StorageResult, StoreOutcome};
