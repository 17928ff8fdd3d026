//! CLI mode
//!
//! This module delegates to the actual CLI implementation.

use crate::cli::Commands;
use crate::interfaces::cli::{CliError, run_cli_command};

/// Run CLI mode
pub async fn run_cli(cmd: Commands) -> Result<(), CliError> {
    run_cli_command(cmd).await
}
