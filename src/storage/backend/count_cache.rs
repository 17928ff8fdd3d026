//! 分页 COUNT 缓存
//!
//! 写操作递增世代号并清空缓存；COUNT 查询开始前记下世代号，
//! 回填时世代已变就丢弃结果，避免把写入前的旧总数放回缓存。

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use moka::sync::Cache;

#[derive(Clone)]
pub struct CountCache {
    entries: Cache<String, u64>,
    epoch: Arc<AtomicU64>,
}

impl CountCache {
    pub fn new(ttl: Duration, capacity: u64) -> Self {
        Self {
            entries: Cache::builder()
                .time_to_live(ttl)
                .max_capacity(capacity)
                .build(),
            epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn get(&self, key: &str) -> Option<u64> {
        self.entries.get(key)
    }

    /// 当前世代号，在执行 COUNT 之前读取
    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::Acquire)
    }

    /// 仅当 `seen` 之后没有发生写入时才缓存；返回是否写入
    pub fn insert_if_current(&self, key: String, count: u64, seen: u64) -> bool {
        if self.epoch() != seen {
            return false;
        }
        self.entries.insert(key, count);
        // insert 与并发的 invalidate 交错时再确认一次
        if self.epoch() != seen {
            self.entries.invalidate_all();
            return false;
        }
        true
    }

    pub fn invalidate(&self) {
        self.epoch.fetch_add(1, Ordering::AcqRel);
        self.entries.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> CountCache {
        CountCache::new(Duration::from_secs(30), 16)
    }

    #[test]
    fn test_insert_when_no_write_happened() {
        let cache = cache();
        let seen = cache.epoch();
        assert!(cache.insert_if_current("deal|".to_string(), 4, seen));
        assert_eq!(cache.get("deal|"), Some(4));
    }

    #[test]
    fn test_count_started_before_write_is_not_cached() {
        let cache = cache();
        let seen = cache.epoch();
        // COUNT 进行中发生了一次写入
        cache.invalidate();
        assert!(!cache.insert_if_current("deal|".to_string(), 4, seen));
        assert_eq!(cache.get("deal|"), None);

        let seen = cache.epoch();
        assert!(cache.insert_if_current("deal|".to_string(), 5, seen));
        assert_eq!(cache.get("deal|"), Some(5));
    }

    #[test]
    fn test_invalidate_clears_cached_counts() {
        let cache = cache();
        let seen = cache.epoch();
        cache.insert_if_current("task|".to_string(), 2, seen);
        cache.invalidate();
        assert_eq!(cache.get("task|"), None);
    }
}
