//! Flooring Mastery - 地板订单管理
//!
//! # 架构概述
//!
//! 订单按日期分区存放在 `Orders/Orders_MMDDYYYY.txt`，启动时全部载入内存，
//! 修改后整体写回。税率和产品来自只读的数据文件。
//!
//! # 模块结构
//!
//! ```text
//! flooring-mastery/src/
//! ├── core/          # 配置
//! ├── orders/        # 记录编解码、分区存储、订单服务
//! ├── catalog/       # 税率表、产品表
//! ├── audit/         # 审计日志
//! └── utils/         # 日志初始化
//! ```

pub mod audit;
pub mod catalog;
pub mod core;
pub mod orders;
pub mod utils;

use anyhow::Context;

// Re-export 公共类型
pub use audit::{AuditAction, AuditSink, FileAuditLog, TracingAudit};
pub use catalog::{ProductCatalog, ProductTable, TaxRateProvider, TaxTable};
pub use core::Config;
pub use orders::{OrderService, OrderStorage, ServiceError, StorageError};

// Re-export logger functions
pub use utils::logger::init_logger_with_file;

/// 设置环境: `.env`、配置、日志
pub fn setup_environment() -> anyhow::Result<Config> {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();
    init_logger_with_file(&config.log_level, config.log_dir.as_deref())?;
    Ok(config)
}

/// Wire the service from configured files
///
/// Catalog files must load; orders are not loaded here, call
/// [`OrderService::load_all`] and decide how to treat partial failures.
pub fn build_service(config: &Config) -> anyhow::Result<OrderService> {
    let taxes = TaxTable::load(&config.taxes_file)
        .with_context(|| format!("loading tax rates from {}", config.taxes_file.display()))?;
    let products = ProductTable::load(&config.products_file)
        .with_context(|| format!("loading products from {}", config.products_file.display()))?;
    tracing::info!(
        states = taxes.len(),
        products = products.len(),
        "Catalogs loaded"
    );

    let audit: Box<dyn AuditSink> = match &config.audit_file {
        Some(path) => Box::new(FileAuditLog::new(path)),
        None => Box::new(TracingAudit),
    };

    let storage = OrderStorage::new(&config.orders_dir, &config.export_file);
    Ok(OrderService::new(
        storage,
        Box::new(taxes),
        Box::new(products),
        audit,
    ))
}
