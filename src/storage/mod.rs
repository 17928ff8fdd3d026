use std::sync::Arc;

use async_trait::async_trait;

use crate::config::DatabaseConfig;
use crate::domain::Record;
use crate::errors::Result;

pub mod backend;
pub mod models;

pub use backend::{SeaOrmStorage, StoredRecord};
pub use models::{FilterKind, FilterSpec, ListQuery, Page, UserAccount, UserSummary};

/// 单一记录类型的持久化接口
///
/// 写入不做审计盖章，调用方（`Repository`）负责设置 created_by / updated_by；
/// 时间戳由存储层填写。
#[async_trait]
pub trait RecordStore<R: Record>: Send + Sync {
    /// 插入新记录，返回带 id 和时间戳的完整记录
    async fn insert(&self, record: R) -> Result<R>;

    /// 覆盖已有记录；created_by / created_at 保持库中的值
    async fn update(&self, id: i64, record: R) -> Result<R>;

    async fn get(&self, id: i64) -> Result<Option<R>>;

    /// 硬删除，记录不存在时返回 NotFound
    async fn delete(&self, id: i64) -> Result<()>;

    async fn list(&self, query: &ListQuery) -> Result<Page<R>>;

    /// 层级父节点（Contractor.parent / Contact.head），无层级的类型恒为 None
    async fn parent_of(&self, id: i64) -> Result<Option<i64>>;
}

pub struct StorageFactory;

impl StorageFactory {
    pub async fn create(config: &DatabaseConfig) -> Result<Arc<SeaOrmStorage>> {
        // 从 URL 自动推断数据库类型
        let backend_type = backend::infer_backend_from_url(&config.database_url)?;

        let storage = SeaOrmStorage::new(&config.database_url, &backend_type, config).await?;
        Ok(Arc::new(storage))
    }
}
