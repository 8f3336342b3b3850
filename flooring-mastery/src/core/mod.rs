//! 核心模块 - 应用配置
//!
//! - [`Config`] - 数据文件位置与日志设置

pub mod config;

pub use config::Config;
