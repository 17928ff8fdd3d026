//! Migrate command

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::storage::SeaOrmStorage;

/// 迁移在打开存储时已执行，这里只确认连接可用
pub async fn run_migrations(storage: &SeaOrmStorage) -> Result<(), CliError> {
    storage.ping().await?;
    println!(
        "{} Database schema is up to date ({})",
        "✓".green().bold(),
        storage.backend_name()
    );
    Ok(())
}
