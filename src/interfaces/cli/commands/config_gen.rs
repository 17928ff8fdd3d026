//! Generate config command

use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;

use crate::config::StaticConfig;
use crate::interfaces::cli::CliError;

/// Generate example configuration file
pub fn config_generate(output_path: Option<String>, force: bool) -> Result<(), CliError> {
    let path = output_path.unwrap_or_else(|| "config.example.toml".to_string());

    // 检查文件是否存在，非 --force 模式下交互确认
    if !force && Path::new(&path).exists() {
        print!(
            "{} {} {}",
            "File already exists:".yellow(),
            path.blue(),
            "Overwrite? [y/N] ".yellow()
        );
        io::stdout()
            .flush()
            .map_err(|e| CliError::InputError(e.to_string()))?;

        let mut input = String::new();
        io::stdin()
            .lock()
            .read_line(&mut input)
            .map_err(|e| CliError::InputError(e.to_string()))?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("{}", "Aborted.".red());
            return Ok(());
        }
    }

    StaticConfig::default()
        .save_to_file(&path)
        .map_err(|e| {
            CliError::CommandError(format!("Unable to write configuration file: {}", e))
        })?;

    println!(
        "{} {}",
        "Configuration file generated:".green(),
        path.blue()
    );
    println!(
        "  {}",
        "Set admin.jwt_secret before exposing the admin API".yellow()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_with_force_overwrites() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("crm.toml");
        std::fs::write(&path, "old").unwrap();

        config_generate(Some(path.to_string_lossy().into_owned()), true).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("[admin]"));
        assert!(content.contains("[media]"));
    }
}
