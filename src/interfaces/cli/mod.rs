//! CLI interface module
//!
//! This module provides command-line interface functionality for crmdesk.

pub mod commands;

use std::fmt;

use crate::cli::{Commands, ConfigCommands, UserCommands};
use crate::config::get_config;
use crate::errors::CrmError;
use crate::storage::StorageFactory;
use commands::{config_generate, create_user, list_users, run_migrations};

#[derive(Debug)]
pub enum CliError {
    StorageError(String),
    InputError(String),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::StorageError(msg) => format!("Storage error: {}", msg),
            CliError::InputError(msg) => format!("Input error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::StorageError(msg) => {
                format!("{} {}", "Storage error:".red().bold(), msg.white())
            }
            CliError::InputError(msg) => {
                format!("{} {}", "Input error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<CrmError> for CliError {
    fn from(err: CrmError) -> Self {
        match err {
            CrmError::Validation(_) => CliError::InputError(err.message()),
            CrmError::DatabaseConfig(_)
            | CrmError::DatabaseConnection(_)
            | CrmError::DatabaseOperation(_)
            | CrmError::Integrity(_) => CliError::StorageError(err.message()),
            _ => CliError::CommandError(err.message()),
        }
    }
}

/// Run a CLI command from clap-parsed input
///
/// `Serve` 由 main 处理，不会到这里。
pub async fn run_cli_command(cmd: Commands) -> Result<(), CliError> {
    // Generate doesn't need DB connection
    if let Commands::Config {
        action: ConfigCommands::Generate { output_path, force },
    } = cmd
    {
        return config_generate(output_path, force);
    }

    // 打开存储时会自动执行迁移
    let config = get_config();
    let storage = StorageFactory::create(&config.database).await?;

    let result = match cmd {
        Commands::Migrate => run_migrations(&storage).await,
        Commands::User { action } => match action {
            UserCommands::Create {
                username,
                password,
                stdin,
            } => create_user(&storage, username, password, stdin).await,
            UserCommands::List => list_users(&storage).await,
        },
        Commands::Serve => Err(CliError::CommandError(
            "serve is not a CLI command".to_string(),
        )),
        Commands::Config { .. } => unreachable!("handled above"),
    };

    storage.close().await;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Violation, ViolationCode};

    #[test]
    fn test_crm_errors_map_to_cli_errors() {
        let err: CliError = CrmError::validation(vec![Violation::new(
            "username",
            ViolationCode::Required,
            "This field is required.",
        )])
        .into();
        assert!(matches!(err, CliError::InputError(_)));
        assert_eq!(
            err.format_simple(),
            "Input error: username: This field is required."
        );

        let err: CliError = CrmError::integrity("unique constraint violation").into();
        assert!(matches!(err, CliError::StorageError(_)));
    }
}
