//! 读操作和单语句写操作的重试
//!
//! 只重试锁冲突和连接问题。事务内的写入不经过这里，约束失败也不会重试。

use std::future::Future;
use std::ops::Deref;
use std::time::Duration;

use rand::RngExt;
use sea_orm::DbErr;
use sea_orm::error::RuntimeErr;
use tracing::{debug, warn};

use crate::config::DatabaseConfig;

/// 数据库错误码：MySQL 死锁/锁等待超时，PostgreSQL 序列化失败/死锁，SQLite BUSY/LOCKED
const TRANSIENT_CODES: &[&str] = &["1213", "1205", "40001", "40P01", "5", "6"];

/// 驱动没有给出错误码时按消息匹配
const TRANSIENT_MESSAGES: &[&str] = &[
    "deadlock",
    "lock wait timeout",
    "database is locked",
    "database table is locked",
    "serialization failure",
];

/// 一次失败是否值得再试
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Transient,
    Permanent,
}

impl Failure {
    pub fn of(err: &DbErr) -> Self {
        let transient = match err {
            DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => true,
            DbErr::Exec(runtime) | DbErr::Query(runtime) => is_transient_runtime(runtime),
            _ => false,
        };
        if transient {
            Failure::Transient
        } else {
            Failure::Permanent
        }
    }
}

fn is_transient_runtime(err: &RuntimeErr) -> bool {
    match err {
        RuntimeErr::SqlxError(sqlx_err) => {
            if let Some(code) = sqlx_err
                .deref()
                .as_database_error()
                .and_then(|db_err| db_err.code())
            {
                return TRANSIENT_CODES.contains(&code.as_ref());
            }
            mentions_lock_conflict(&sqlx_err.to_string())
        }
        RuntimeErr::Internal(msg) => mentions_lock_conflict(msg),
        #[allow(unreachable_patterns)]
        _ => false,
    }
}

fn mentions_lock_conflict(message: &str) -> bool {
    let message = message.to_lowercase();
    TRANSIENT_MESSAGES.iter().any(|m| message.contains(m))
}

/// 重试次数与退避区间
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 首次失败后最多再试几次
    pub retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 3,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(2),
        }
    }
}

impl From<&DatabaseConfig> for RetryPolicy {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            retries: config.retry_count,
            base_delay: Duration::from_millis(config.retry_base_delay_ms),
            max_delay: Duration::from_millis(config.retry_max_delay_ms),
        }
    }
}

impl RetryPolicy {
    /// 第 `retry` 次重试前的等待：指数增长，封顶后再加最多 25% 的抖动
    pub fn delay_before(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        let capped = self.base_delay.saturating_mul(factor).min(self.max_delay);
        let jitter_ms = rand::rng().random_range(0..=capped.as_millis() as u64 / 4);
        capped + Duration::from_millis(jitter_ms)
    }

    /// 执行 `operation`，瞬时失败按策略重试
    pub async fn run<T, F, Fut>(&self, label: &str, mut operation: F) -> Result<T, DbErr>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, DbErr>>,
    {
        let mut retry = 0;
        loop {
            let err = match operation().await {
                Ok(value) => {
                    if retry > 0 {
                        debug!("{} succeeded after {} retries", label, retry);
                    }
                    return Ok(value);
                }
                Err(err) => err,
            };

            if Failure::of(&err) == Failure::Permanent || retry >= self.retries {
                return Err(err);
            }
            retry += 1;
            let delay = self.delay_before(retry);
            warn!(
                "{} hit a transient error ({}), retry {}/{} in {:?}",
                label, err, retry, self.retries, delay
            );
            tokio::time::sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::error::ConnAcquireErr;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast() -> RetryPolicy {
        RetryPolicy {
            retries: 2,
            base_delay: Duration::from_millis(5),
            max_delay: Duration::from_millis(20),
        }
    }

    #[test]
    fn test_failure_classification() {
        assert_eq!(
            Failure::of(&DbErr::ConnectionAcquire(ConnAcquireErr::Timeout)),
            Failure::Transient
        );
        assert_eq!(
            Failure::of(&DbErr::Query(RuntimeErr::Internal(
                "database is locked".to_string()
            ))),
            Failure::Transient
        );
        assert_eq!(
            Failure::of(&DbErr::Exec(RuntimeErr::Internal(
                "FOREIGN KEY constraint failed".to_string()
            ))),
            Failure::Permanent
        );
        assert_eq!(
            Failure::of(&DbErr::RecordNotFound("deal 7".to_string())),
            Failure::Permanent
        );
    }

    #[test]
    fn test_policy_from_database_config() {
        let db = DatabaseConfig {
            retry_count: 5,
            retry_base_delay_ms: 50,
            retry_max_delay_ms: 800,
            ..Default::default()
        };
        let policy = RetryPolicy::from(&db);
        assert_eq!(policy.retries, 5);
        assert_eq!(policy.base_delay, Duration::from_millis(50));
        assert_eq!(policy.max_delay, Duration::from_millis(800));
    }

    #[test]
    fn test_delay_grows_then_caps() {
        let policy = RetryPolicy::default();
        let ms = |retry| policy.delay_before(retry).as_millis();
        assert!((100..=125).contains(&ms(1)));
        assert!((400..=500).contains(&ms(3)));
        assert!((2000..=2500).contains(&ms(12)));
    }

    #[tokio::test]
    async fn test_transient_errors_are_retried_until_success() {
        let calls = AtomicU32::new(0);
        let result = fast()
            .run("count(deals)", || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(DbErr::ConnectionAcquire(ConnAcquireErr::Timeout))
                    } else {
                        Ok(3u64)
                    }
                }
            })
            .await;
        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_configured_retries() {
        let calls = AtomicU32::new(0);
        let result = fast()
            .run("count(deals)", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<u64, _>(DbErr::ConnectionAcquire(ConnAcquireErr::Timeout)) }
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_permanent_errors_fail_immediately() {
        let calls = AtomicU32::new(0);
        let result = fast()
            .run("delete(deals/1)", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    Err::<u64, _>(DbErr::Exec(RuntimeErr::Internal(
                        "FOREIGN KEY constraint failed".to_string(),
                    )))
                }
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
