use std::path::{Path, PathBuf};

/// `AUDIT_FILE` value that routes audit entries to the log instead of a file
const AUDIT_TO_LOG: &str = "-";

/// 应用配置 - 数据文件位置与日志设置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖 (也可写入 `.env`)：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | . | 工作目录 |
/// | ORDERS_DIR | Orders | 订单文件目录 |
/// | EXPORT_FILE | Backup/DataExport.txt | 导出文件 |
/// | TAXES_FILE | Data/Taxes.txt | 税率表 |
/// | PRODUCTS_FILE | Data/Products.txt | 产品表 |
/// | AUDIT_FILE | audit.txt | 审计日志，`-` 表示写入 tracing 日志 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (未设置) | 日志文件目录，未设置时只输出到控制台 |
///
/// 相对路径都相对于 `WORK_DIR` 解析。
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/flooring LOG_LEVEL=debug flooring-mastery list 2021-02-23
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// 工作目录
    pub work_dir: PathBuf,
    pub orders_dir: PathBuf,
    pub export_file: PathBuf,
    pub taxes_file: PathBuf,
    pub products_file: PathBuf,
    /// `None` sends audit entries to the `audit` tracing target
    pub audit_file: Option<PathBuf>,
    /// trace | debug | info | warn | error, or any `EnvFilter` directive
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 使用自定义工作目录，其余配置按默认值解析
    ///
    /// 常用于测试场景
    pub fn with_work_dir(work_dir: impl Into<PathBuf>) -> Self {
        let work_dir = work_dir.into();
        Self::from_lookup(|key| match key {
            "WORK_DIR" => Some(work_dir.to_string_lossy().into_owned()),
            _ => None,
        })
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let work_dir = PathBuf::from(lookup("WORK_DIR").unwrap_or_else(|| ".".into()));
        let path = |key: &str, default: &str| {
            resolve(&work_dir, lookup(key).unwrap_or_else(|| default.into()))
        };

        Self {
            orders_dir: path("ORDERS_DIR", "Orders"),
            export_file: path("EXPORT_FILE", "Backup/DataExport.txt"),
            taxes_file: path("TAXES_FILE", "Data/Taxes.txt"),
            products_file: path("PRODUCTS_FILE", "Data/Products.txt"),
            audit_file: match lookup("AUDIT_FILE").as_deref() {
                Some(AUDIT_TO_LOG) => None,
                Some(file) => Some(resolve(&work_dir, file.to_string())),
                None => Some(resolve(&work_dir, "audit.txt".to_string())),
            },
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_dir: lookup("LOG_DIR")
                .filter(|dir| !dir.is_empty())
                .map(|dir| resolve(&work_dir, dir)),
            work_dir,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn resolve(work_dir: &Path, value: String) -> PathBuf {
    let path = PathBuf::from(value);
    if path.is_absolute() {
        path
    } else {
        work_dir.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.work_dir, PathBuf::from("."));
        assert_eq!(config.orders_dir, PathBuf::from("./Orders"));
        assert_eq!(config.export_file, PathBuf::from("./Backup/DataExport.txt"));
        assert_eq!(config.taxes_file, PathBuf::from("./Data/Taxes.txt"));
        assert_eq!(config.products_file, PathBuf::from("./Data/Products.txt"));
        assert_eq!(config.audit_file, Some(PathBuf::from("./audit.txt")));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn test_relative_and_absolute_paths() {
        let config = config_from(&[
            ("WORK_DIR", "/srv/flooring"),
            ("ORDERS_DIR", "data/orders"),
            ("AUDIT_FILE", "/var/log/flooring/audit.txt"),
            ("LOG_DIR", "logs"),
            ("LOG_LEVEL", "debug"),
        ]);
        assert_eq!(config.orders_dir, PathBuf::from("/srv/flooring/data/orders"));
        assert_eq!(
            config.audit_file,
            Some(PathBuf::from("/var/log/flooring/audit.txt"))
        );
        assert_eq!(config.log_dir, Some(PathBuf::from("/srv/flooring/logs")));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_empty_log_dir_means_console_only() {
        let config = config_from(&[("LOG_DIR", "")]);
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn test_audit_to_log() {
        let config = config_from(&[("AUDIT_FILE", "-")]);
        assert_eq!(config.audit_file, None);
    }

    #[test]
    fn test_with_work_dir() {
        let config = Config::with_work_dir("/tmp/flooring");
        assert_eq!(config.work_dir, PathBuf::from("/tmp/flooring"));
        assert_eq!(config.orders_dir, PathBuf::from("/tmp/flooring/Orders"));
    }
}
