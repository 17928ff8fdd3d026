use std::time::Duration;
use tokio::signal;
use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::storage::SeaOrmStorage;

/// 关闭超时时间（秒）
const SHUTDOWN_TIMEOUT_SECS: u64 = 30;

pub async fn listen_for_shutdown(storage: &SeaOrmStorage) {
    // 等待 Ctrl+C 信号
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Shutdown signal received, closing database...");
        }
        Err(e) => {
            warn!(
                "Failed to listen for Ctrl+C: {}. Proceeding with shutdown anyway.",
                e
            );
        }
    }

    match timeout(Duration::from_secs(SHUTDOWN_TIMEOUT_SECS), storage.close()).await {
        Ok(()) => {
            info!("All shutdown tasks completed successfully");
        }
        Err(_) => {
            error!(
                "Shutdown tasks timed out after {} seconds! Forcing exit.",
                SHUTDOWN_TIMEOUT_SECS
            );
            std::process::exit(1);
        }
    }
}
