use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::errors::{CrmError, Result};
use migration::{Migrator, MigratorTrait};

/// 连接 SQLite 数据库（自动建库，开启 WAL 和外键约束）
pub async fn connect_sqlite(database_url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
    use sea_orm::SqlxSqliteConnector;
    use sea_orm::sqlx::sqlite::{
        SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
    };
    use std::str::FromStr;

    let opt = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| CrmError::database_config(format!("SQLite URL 解析失败: {}", e)))?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_secs(5))
        .pragma("cache_size", "-64000")
        .pragma("temp_store", "memory");

    let pool = SqlitePoolOptions::new()
        .max_connections(config.pool_size.max(1))
        .acquire_timeout(Duration::from_secs(config.timeout))
        .connect_with(opt)
        .await
        .map_err(|e| {
            CrmError::database_connection(format!("无法连接到 SQLite 数据库: {}", e))
        })?;

    Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
}

/// 连接 MySQL/PostgreSQL
pub async fn connect_generic(
    database_url: &str,
    backend_name: &str,
    config: &DatabaseConfig,
) -> Result<DatabaseConnection> {
    let pool_size = config.pool_size;

    let mut opt = ConnectOptions::new(database_url.to_owned());
    opt.max_connections(pool_size)
        .min_connections(pool_size.min(5))
        .connect_timeout(Duration::from_secs(config.timeout))
        .acquire_timeout(Duration::from_secs(config.timeout))
        .idle_timeout(Duration::from_secs(300))
        .max_lifetime(Duration::from_secs(3600))
        .sqlx_logging(false);

    Database::connect(opt).await.map_err(|e| {
        CrmError::database_connection(format!(
            "无法连接到 {} 数据库: {}",
            backend_name.to_uppercase(),
            e
        ))
    })
}

/// 运行数据库迁移
pub async fn run_migrations(db: &DatabaseConnection) -> Result<()> {
    Migrator::up(db, None)
        .await
        .map_err(|e| CrmError::database_operation(format!("迁移失败: {}", e)))?;

    info!("Database migrations completed");
    Ok(())
}
