//! `RecordStore` 的通用实现

use async_trait::async_trait;
use chrono::{Duration, Utc};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QuerySelect, TransactionTrait};
use tracing::debug;

use super::tables::StoredRecord;
use super::SeaOrmStorage;
use crate::domain::{AuditStamp, EntityKind};
use crate::errors::{CrmError, Result};
use crate::storage::{ListQuery, Page, RecordStore};
use migration::entities::{contact, contractor};

fn missing_actor(kind: EntityKind, field: &str) -> CrmError {
    CrmError::integrity(format!(
        "{} write without {}: records must be saved through the repository",
        kind, field
    ))
}

impl SeaOrmStorage {
    /// 自引用层级中某节点的父节点
    pub async fn hierarchy_parent(&self, kind: EntityKind, id: i64) -> Result<Option<i64>> {
        let db = &self.db;
        let parent = match kind {
            EntityKind::Contractor => {
                self.retry.run("hierarchy_parent(contractor)", || async {
                    contractor::Entity::find()
                        .select_only()
                        .column(contractor::Column::ParentId)
                        .filter(contractor::Column::Id.eq(id))
                        .into_tuple::<Option<i64>>()
                        .one(db)
                        .await
                })
                .await?
            }
            EntityKind::Contact | EntityKind::PreliminaryContact => {
                self.retry.run("hierarchy_parent(contact)", || async {
                    contact::Entity::find()
                        .select_only()
                        .column(contact::Column::HeadId)
                        .filter(contact::Column::Id.eq(id))
                        .into_tuple::<Option<i64>>()
                        .one(db)
                        .await
                })
                .await?
            }
            _ => None,
        };
        Ok(parent.flatten())
    }
}

#[async_trait]
impl<R: StoredRecord> RecordStore<R> for SeaOrmStorage {
    async fn insert(&self, mut record: R) -> Result<R> {
        let now = Utc::now();
        let stamp = record.audit_mut();
        let created_by = stamp
            .created_by
            .ok_or_else(|| missing_actor(R::KIND, "created_by"))?;
        *stamp = AuditStamp {
            created_by: Some(created_by),
            created_at: Some(now),
            updated_by: Some(stamp.updated_by.unwrap_or(created_by)),
            updated_at: Some(now),
        };

        let txn = self.db.begin().await?;
        let id = record.insert_row(&txn).await?;
        record.save_links(&txn, id).await?;
        txn.commit().await?;

        self.invalidate_count_cache();
        debug!(kind = %R::KIND, id, "row inserted");

        RecordStore::<R>::get(self, id)
            .await?
            .ok_or_else(|| CrmError::not_found(format!("{} {} vanished after insert", R::KIND, id)))
    }

    async fn update(&self, id: i64, mut record: R) -> Result<R> {
        let existing = RecordStore::<R>::get(self, id)
            .await?
            .ok_or_else(|| CrmError::not_found(format!("{} {} does not exist", R::KIND, id)))?;
        let previous = existing.audit();

        // updated_at 严格递增，即使时钟精度不足或回拨
        let now = Utc::now();
        let updated_at = match previous.updated_at {
            Some(prev) if now <= prev => prev + Duration::milliseconds(1),
            _ => now,
        };
        let updated_by = record
            .audit()
            .updated_by
            .ok_or_else(|| missing_actor(R::KIND, "updated_by"))?;

        record.set_id(id);
        *record.audit_mut() = AuditStamp {
            created_by: previous.created_by,
            created_at: previous.created_at,
            updated_by: Some(updated_by),
            updated_at: Some(updated_at),
        };

        let txn = self.db.begin().await?;
        record.update_row(&txn).await?;
        record.save_links(&txn, id).await?;
        txn.commit().await?;

        self.invalidate_count_cache();
        debug!(kind = %R::KIND, id, "row updated");

        RecordStore::<R>::get(self, id)
            .await?
            .ok_or_else(|| CrmError::not_found(format!("{} {} vanished after update", R::KIND, id)))
    }

    async fn get(&self, id: i64) -> Result<Option<R>> {
        let db = &self.db;
        let record = self
            .retry
            .run(&format!("get({}/{})", R::KIND, id), || R::fetch(db, id))
            .await?;
        Ok(record)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let db = &self.db;
        let affected = self
            .retry
            .run(&format!("delete({}/{})", R::KIND, id), || R::delete_row(db, id))
            .await?;

        if affected == 0 {
            return Err(CrmError::not_found(format!("{} {} does not exist", R::KIND, id)));
        }

        self.invalidate_count_cache();
        debug!(kind = %R::KIND, id, "row deleted");
        Ok(())
    }

    async fn list(&self, query: &ListQuery) -> Result<Page<R>> {
        let condition = R::condition(query)?;
        let db = &self.db;
        let page = query.page.max(1);
        let page_size = query.page_size.max(1);

        let cache_key = query.count_key(R::KIND.slug());
        let total = if let Some(cached) = self.count_cache.get(&cache_key) {
            debug!("count cache hit: key={}, value={}", cache_key, cached);
            cached
        } else {
            let seen = self.count_cache.epoch();
            let count = self
                .retry
                .run("list(count)", || R::count(db, condition.clone()))
                .await?;
            if !self.count_cache.insert_if_current(cache_key, count, seen) {
                debug!("count for {} raced with a write, not cached", R::KIND);
            }
            count
        };

        let items = self
            .retry
            .run("list(page)", || {
                R::fetch_page(db, condition.clone(), page, page_size)
            })
            .await?;

        Ok(Page {
            items,
            total,
            page,
            page_size,
        })
    }

    async fn parent_of(&self, id: i64) -> Result<Option<i64>> {
        match R::HIERARCHY {
            Some(kind) => self.hierarchy_parent(kind, id).await,
            None => Ok(None),
        }
    }
}
