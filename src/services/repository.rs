//! 记录的通用业务逻辑
//!
//! HTTP 处理器和 CLI 共用。写操作的顺序固定：
//! 校验 → 层级检查 → 审计盖章 → 存储。

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{info, warn};

use crate::admin::ModelAdmin;
use crate::config::IntegrityConfig;
use crate::domain::{ActingUser, Record, Violation, ViolationCode};
use crate::errors::{CrmError, Result};
use crate::storage::{ListQuery, Page, RecordStore};

/// 层级向上查找的最大深度
const MAX_HIERARCHY_DEPTH: usize = 1024;

/// 列表分页参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub default_page_size: u64,
    pub max_page_size: u64,
}

impl Default for Paging {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 200,
        }
    }
}

pub struct Repository<R: Record> {
    store: Arc<dyn RecordStore<R>>,
    admin: Arc<ModelAdmin>,
    integrity: IntegrityConfig,
    paging: Paging,
}

impl<R: Record> Clone for Repository<R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            admin: Arc::clone(&self.admin),
            integrity: self.integrity,
            paging: self.paging,
        }
    }
}

impl<R: Record> Repository<R> {
    pub fn new(
        store: Arc<dyn RecordStore<R>>,
        admin: Arc<ModelAdmin>,
        integrity: IntegrityConfig,
    ) -> Self {
        Self {
            store,
            admin,
            integrity,
            paging: Paging::default(),
        }
    }

    pub fn with_paging(mut self, paging: Paging) -> Self {
        self.paging = paging;
        self
    }

    pub fn admin(&self) -> &ModelAdmin {
        &self.admin
    }

    /// 字段校验加上按策略开启的主指针成员检查
    ///
    /// 策略关闭时成员问题只记 warn 日志，不阻止保存。
    pub fn validate(&self, record: &R) -> Vec<Violation> {
        let mut violations = record.validate();
        let membership = record.membership_violations();
        if !membership.is_empty() {
            if self.integrity.enforce_primary_membership {
                violations.extend(membership);
            } else {
                for v in &membership {
                    warn!(
                        kind = %R::KIND,
                        field = %v.field,
                        "Primary pointer outside its collection (not enforced)"
                    );
                }
            }
        }
        violations
    }

    pub async fn create(&self, user: &ActingUser, mut record: R) -> Result<R> {
        record.clear_id();
        record.normalize();
        self.ensure_valid(&record)?;

        self.admin.save_model(user, &mut record);
        let saved = self.store.insert(record).await?;

        info!(
            kind = %R::KIND,
            id = saved.id(),
            user = %user.username,
            "Created {} '{}'",
            self.admin.verbose_name,
            saved.display()
        );
        Ok(saved)
    }

    pub async fn update(&self, user: &ActingUser, id: i64, mut record: R) -> Result<R> {
        if self.store.get(id).await?.is_none() {
            return Err(CrmError::not_found(format!("{} {} does not exist", R::KIND, id)));
        }

        record.set_id(id);
        record.normalize();
        self.ensure_valid(&record)?;
        self.check_hierarchy(id, &record).await?;

        self.admin.save_model(user, &mut record);
        let saved = self.store.update(id, record).await?;

        info!(
            kind = %R::KIND,
            id,
            user = %user.username,
            "Updated {} '{}'",
            self.admin.verbose_name,
            saved.display()
        );
        Ok(saved)
    }

    pub async fn get(&self, id: i64) -> Result<R> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| CrmError::not_found(format!("{} {} does not exist", R::KIND, id)))
    }

    pub async fn delete(&self, user: &ActingUser, id: i64) -> Result<()> {
        self.store.delete(id).await?;
        info!(kind = %R::KIND, id, user = %user.username, "Deleted {}", self.admin.verbose_name);
        Ok(())
    }

    /// 过滤器只接受管理配置中声明的名称，分页参数按配置收敛
    pub async fn list(&self, query: ListQuery) -> Result<Page<R>> {
        if let Some(name) = query
            .filters
            .keys()
            .find(|name| !self.admin.list_filter.contains(&name.as_str()))
        {
            return Err(CrmError::invalid_query(format!(
                "unknown filter '{}' for {}; supported: {}",
                name,
                R::KIND,
                self.admin.list_filter.join(", ")
            )));
        }
        let query = query.normalized(self.paging.default_page_size, self.paging.max_page_size);
        self.store.list(&query).await
    }

    fn ensure_valid(&self, record: &R) -> Result<()> {
        let violations = self.validate(record);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(CrmError::validation(violations))
        }
    }

    /// 把 `id` 的父节点改为 `record` 中的值后不能成环
    ///
    /// 新记录还没有被任何节点指向，不会成环，因此只在更新时检查。
    async fn check_hierarchy(&self, id: i64, record: &R) -> Result<()> {
        if R::HIERARCHY.is_none() || !self.integrity.enforce_acyclic_hierarchy {
            return Ok(());
        }
        let Some(parent) = record.hierarchy_parent() else {
            return Ok(());
        };

        let mut visited = HashSet::new();
        let mut current = Some(parent);
        while let Some(node) = current {
            if node == id {
                return Err(CrmError::validation(vec![Violation::new(
                    R::HIERARCHY_FIELD,
                    ViolationCode::Cycle,
                    format!("{} {} cannot be its own ancestor.", R::KIND, id),
                )]));
            }
            if !visited.insert(node) || visited.len() > MAX_HIERARCHY_DEPTH {
                // 已有的环或过深的链与本次修改无关
                warn!(kind = %R::KIND, id, node, "Hierarchy walk stopped early");
                break;
            }
            current = self.store.parent_of(node).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;

    use crate::domain::{Contractor, Named};

    /// 内存中的 Contractor 存储，只用于测试仓储逻辑
    #[derive(Default)]
    struct MemoryStore {
        rows: Mutex<BTreeMap<i64, Contractor>>,
    }

    #[async_trait]
    impl RecordStore<Contractor> for MemoryStore {
        async fn insert(&self, mut record: Contractor) -> Result<Contractor> {
            let mut rows = self.rows.lock().unwrap();
            let id = rows.keys().last().copied().unwrap_or(0) + 1;
            record.set_id(id);
            record.audit.created_at = Some(Utc::now());
            record.audit.updated_at = record.audit.created_at;
            rows.insert(id, record.clone());
            Ok(record)
        }

        async fn update(&self, id: i64, mut record: Contractor) -> Result<Contractor> {
            let mut rows = self.rows.lock().unwrap();
            let previous = rows
                .get(&id)
                .ok_or_else(|| CrmError::not_found("missing"))?;
            record.audit.created_by = previous.audit.created_by;
            record.audit.created_at = previous.audit.created_at;
            record.audit.updated_at = Some(Utc::now());
            rows.insert(id, record.clone());
            Ok(record)
        }

        async fn get(&self, id: i64) -> Result<Option<Contractor>> {
            Ok(self.rows.lock().unwrap().get(&id).cloned())
        }

        async fn delete(&self, id: i64) -> Result<()> {
            self.rows
                .lock()
                .unwrap()
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| CrmError::not_found("missing"))
        }

        async fn list(&self, query: &ListQuery) -> Result<Page<Contractor>> {
            let rows = self.rows.lock().unwrap();
            Ok(Page {
                items: rows.values().cloned().collect(),
                total: rows.len() as u64,
                page: query.page,
                page_size: query.page_size,
            })
        }

        async fn parent_of(&self, id: i64) -> Result<Option<i64>> {
            Ok(self.rows.lock().unwrap().get(&id).and_then(|c| c.parent))
        }
    }

    fn repository(integrity: IntegrityConfig) -> Repository<Contractor> {
        let admin = ModelAdmin::new::<Contractor>("contractor", "contractors");
        Repository::new(Arc::new(MemoryStore::default()), Arc::new(admin), integrity)
    }

    fn policy(enforce_primary_membership: bool) -> IntegrityConfig {
        IntegrityConfig {
            enforce_primary_membership,
            enforce_acyclic_hierarchy: true,
        }
    }

    fn acme(parent: Option<i64>) -> Contractor {
        Contractor {
            named: Named {
                name: "Acme".into(),
            },
            phone: "555-0100".into(),
            parent,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_stamps_acting_user_and_ignores_submitted_id() {
        let repo = repository(policy(false));
        let alice = ActingUser::new(1, "alice");
        let mut record = acme(None);
        record.set_id(500);
        record.audit.created_by = Some(42);

        let saved = repo.create(&alice, record).await.unwrap();
        assert_eq!(saved.id, Some(1));
        assert_eq!(saved.audit.created_by, Some(1));
        assert_eq!(saved.audit.updated_by, Some(1));
    }

    #[tokio::test]
    async fn test_update_keeps_creator_and_stamps_editor() {
        let repo = repository(policy(false));
        let alice = ActingUser::new(1, "alice");
        let bob = ActingUser::new(2, "bob");
        let saved = repo.create(&alice, acme(None)).await.unwrap();

        let mut edit = saved.clone();
        edit.phone = "555-0199".into();
        edit.audit.created_by = Some(2);
        let updated = repo.update(&bob, 1, edit).await.unwrap();
        assert_eq!(updated.audit.created_by, Some(1));
        assert_eq!(updated.audit.updated_by, Some(2));
        assert_eq!(updated.phone, "555-0199");
    }

    #[tokio::test]
    async fn test_invalid_record_is_rejected_before_storage() {
        let repo = repository(policy(false));
        let alice = ActingUser::new(1, "alice");
        let mut record = acme(None);
        record.phone.clear();

        let err = repo.create(&alice, record).await.unwrap_err();
        assert_eq!(err.violations()[0].field, "phone");
        assert_eq!(repo.list(ListQuery::default()).await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn test_update_missing_record_is_not_found() {
        let repo = repository(policy(false));
        let err = repo
            .update(&ActingUser::new(1, "alice"), 9, acme(None))
            .await
            .unwrap_err();
        assert!(matches!(err, CrmError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_primary_membership_follows_policy() {
        let mut record = acme(None);
        record.geo.primary_address = Some(99);

        assert!(repository(policy(false)).validate(&record).is_empty());

        let violations = repository(policy(true)).validate(&record);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, ViolationCode::NotMember);
    }

    #[tokio::test]
    async fn test_hierarchy_cycle_is_rejected_on_update() {
        let repo = repository(policy(false));
        let alice = ActingUser::new(1, "alice");
        repo.create(&alice, acme(None)).await.unwrap(); // 1
        repo.create(&alice, acme(Some(1))).await.unwrap(); // 2 -> 1
        repo.create(&alice, acme(Some(2))).await.unwrap(); // 3 -> 2

        let err = repo.update(&alice, 1, acme(Some(3))).await.unwrap_err();
        let violations = err.violations();
        assert_eq!(violations[0].field, "parent");
        assert_eq!(violations[0].code, ViolationCode::Cycle);

        let err = repo.update(&alice, 2, acme(Some(2))).await.unwrap_err();
        assert_eq!(err.violations()[0].code, ViolationCode::Cycle);

        // 重新挂到无关分支不受影响
        repo.update(&alice, 3, acme(Some(1))).await.unwrap();
    }

    #[tokio::test]
    async fn test_cycle_check_can_be_disabled() {
        let repo = repository(IntegrityConfig {
            enforce_primary_membership: false,
            enforce_acyclic_hierarchy: false,
        });
        let alice = ActingUser::new(1, "alice");
        repo.create(&alice, acme(None)).await.unwrap();
        repo.update(&alice, 1, acme(Some(1))).await.unwrap();
    }

    #[tokio::test]
    async fn test_list_rejects_filters_outside_admin_config() {
        let repo = repository(policy(false));
        let err = repo
            .list(ListQuery::default().with_filter("color", "red"))
            .await
            .unwrap_err();
        assert!(matches!(err, CrmError::InvalidQuery(_)));
    }

    #[tokio::test]
    async fn test_list_normalizes_paging() {
        let repo = repository(policy(false)).with_paging(Paging {
            default_page_size: 10,
            max_page_size: 50,
        });
        let page = repo
            .list(ListQuery {
                page: 0,
                page_size: 1000,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!((page.page, page.page_size), (1, 50));
    }
}
