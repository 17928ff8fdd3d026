//! SeaORM 存储后端
//!
//! 支持 SQLite、MySQL/MariaDB、PostgreSQL。

mod connection;
mod count_cache;
pub mod converters;
mod records;
pub mod retry;
mod tables;
mod users;

use std::time::Duration;

use sea_orm::DatabaseConnection;
use tracing::{info, warn};

use crate::config::DatabaseConfig;
use crate::errors::{CrmError, Result};

pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use count_cache::CountCache;
pub use tables::{Linked, StoredRecord};

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite://")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
        || database_url == ":memory:"
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(CrmError::database_config(format!(
            "无法从 URL 推断数据库类型: {}. 支持的 URL 格式: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// 基于 SeaORM 的存储，为所有记录类型实现 `RecordStore`
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
    /// 分页 COUNT 缓存（TTL 30秒）
    count_cache: CountCache,
    retry: retry::RetryPolicy,
}

impl SeaOrmStorage {
    pub async fn new(
        database_url: &str,
        backend_name: &str,
        config: &DatabaseConfig,
    ) -> Result<Self> {
        if database_url.is_empty() {
            return Err(CrmError::database_config("database_url 未设置"));
        }

        let db = if backend_name == "sqlite" {
            connect_sqlite(database_url, config).await?
        } else {
            connect_generic(database_url, backend_name, config).await?
        };

        let storage = SeaOrmStorage {
            db,
            backend_name: backend_name.to_string(),
            count_cache: CountCache::new(Duration::from_secs(30), 100),
            retry: retry::RetryPolicy::from(config),
        };

        run_migrations(&storage.db).await?;

        info!(
            "{} storage initialized",
            storage.backend_name.to_uppercase()
        );
        Ok(storage)
    }

    pub fn backend_name(&self) -> &str {
        &self.backend_name
    }

    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// 清除分页 COUNT 缓存（数据变更时调用）
    pub fn invalidate_count_cache(&self) {
        self.count_cache.invalidate();
    }

    /// 健康检查用的连通性探测
    pub async fn ping(&self) -> Result<()> {
        self.db
            .ping()
            .await
            .map_err(|e| CrmError::database_connection(format!("数据库不可用: {}", e)))
    }

    /// 关闭连接池
    pub async fn close(&self) {
        if let Err(e) = self.db.clone().close().await {
            warn!("关闭数据库连接失败: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_backend_from_url() {
        assert_eq!(infer_backend_from_url("sqlite://crm.db?mode=rwc").unwrap(), "sqlite");
        assert_eq!(infer_backend_from_url("data/crm.db").unwrap(), "sqlite");
        assert_eq!(infer_backend_from_url(":memory:").unwrap(), "sqlite");
        assert_eq!(infer_backend_from_url("mariadb://u:p@h/crm").unwrap(), "mysql");
        assert_eq!(infer_backend_from_url("postgresql://h/crm").unwrap(), "postgres");
        assert!(matches!(
            infer_backend_from_url("redis://localhost"),
            Err(CrmError::DatabaseConfig(_))
        ));
    }
}
