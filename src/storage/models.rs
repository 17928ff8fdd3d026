use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 列表过滤器的取值类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    /// 字符串精确匹配（选项字段）
    Exact,
    /// 外键 id，`none` 表示未设置
    Id,
    /// 布尔值：true/false/1/0
    Flag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilterSpec {
    pub name: &'static str,
    pub kind: FilterKind,
}

/// OFFSET 在各后端都是有符号 64 位
const MAX_OFFSET: u64 = i64::MAX as u64;

/// 列表查询参数
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub search: Option<String>,
    pub filters: BTreeMap<String, String>,
    pub page: u64,
    pub page_size: u64,
}

impl ListQuery {
    /// 页大小限制在 1..=max，未指定时用默认值；页码至少为 1，
    /// 且 `(page - 1) * page_size` 不超过 SQL OFFSET 能表示的最大值
    pub fn normalized(mut self, default_page_size: u64, max_page_size: u64) -> Self {
        if self.page_size == 0 {
            self.page_size = default_page_size;
        }
        self.page_size = self.page_size.clamp(1, max_page_size.max(1));
        self.page = self.page.clamp(1, MAX_OFFSET / self.page_size + 1);
        self
    }

    /// 去掉首尾空白后的搜索词，空串视为未搜索
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn with_filter(mut self, name: &str, value: impl Into<String>) -> Self {
        self.filters.insert(name.to_string(), value.into());
        self
    }

    /// 计数缓存的 key
    pub(crate) fn count_key(&self, kind: &str) -> String {
        format!("count:{}:s={:?}:f={:?}", kind, self.search_term(), self.filters)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
}

/// 管理员账号（不含密码哈希的对外形态见 `UserSummary`）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&UserAccount> for UserSummary {
    fn from(user: &UserAccount) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_clamps_paging() {
        let q = ListQuery::default().normalized(20, 200);
        assert_eq!((q.page, q.page_size), (1, 20));

        let q = ListQuery {
            page: 3,
            page_size: 5000,
            ..Default::default()
        }
        .normalized(20, 200);
        assert_eq!((q.page, q.page_size), (3, 200));
    }

    #[test]
    fn test_search_term_ignores_blank() {
        let q = ListQuery {
            search: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(q.search_term(), None);
        let q = ListQuery {
            search: Some(" acme ".into()),
            ..Default::default()
        };
        assert_eq!(q.search_term(), Some("acme"));
    }

    #[test]
    fn test_huge_page_is_capped_to_representable_offset() {
        let q = ListQuery {
            page: u64::MAX,
            page_size: 200,
            ..Default::default()
        }
        .normalized(25, 200);
        assert_eq!(q.page_size, 200);
        assert!(q.page > 1);
        let offset = (q.page - 1).checked_mul(q.page_size).unwrap();
        assert!(offset <= i64::MAX as u64);

        let q = ListQuery {
            page: u64::MAX,
            page_size: 1,
            ..Default::default()
        }
        .normalized(25, 200);
        assert_eq!(q.page - 1, i64::MAX as u64);
    }

    #[test]
    fn test_count_key_depends_on_filters() {
        let a = ListQuery::default().with_filter("stage", "proposal");
        let b = ListQuery::default().with_filter("stage", "closed_won");
        assert_ne!(a.count_key("deals"), b.count_key("deals"));
        assert_ne!(a.count_key("deals"), a.count_key("tasks"));
    }
}
