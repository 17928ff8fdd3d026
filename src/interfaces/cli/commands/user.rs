//! 管理员账号 CLI 命令

use std::io::{self, BufRead};

use colored::Colorize;

use crate::interfaces::cli::CliError;
use crate::services::auth;
use crate::storage::{SeaOrmStorage, UserSummary};

/// 从参数或 stdin 获取密码
fn get_password(password: Option<String>, stdin: bool) -> Result<String, CliError> {
    if stdin {
        let mut line = String::new();
        io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| CliError::InputError(format!("Failed to read from stdin: {}", e)))?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    } else {
        password.ok_or_else(|| {
            CliError::InputError("No password provided. Use --password or --stdin.".to_string())
        })
    }
}

pub async fn create_user(
    storage: &SeaOrmStorage,
    username: String,
    password: Option<String>,
    stdin: bool,
) -> Result<(), CliError> {
    let password = get_password(password, stdin)?;
    let user = auth::create_user(storage, &username, &password).await?;
    println!(
        "{} Admin user {} created (id {})",
        "✓".green().bold(),
        user.username.cyan(),
        user.id
    );
    Ok(())
}

fn format_user(user: &UserSummary) -> String {
    let status = if user.is_active {
        "active".green()
    } else {
        "inactive".red()
    };
    format!(
        "{:>5}  {}  {}  {}",
        user.id,
        user.username.cyan(),
        status,
        user.created_at
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string()
            .dimmed()
    )
}

pub async fn list_users(storage: &SeaOrmStorage) -> Result<(), CliError> {
    let users = storage.list_users().await?;
    if users.is_empty() {
        println!("{} No admin users found", "ℹ".bold().blue());
        return Ok(());
    }

    println!("{}", "Admin users:".bold().green());
    for account in &users {
        println!("  {}", format_user(&UserSummary::from(account)));
    }
    println!(
        "{} Total {} users",
        "ℹ".bold().blue(),
        users.len().to_string().green()
    );
    Ok(())
}
