//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for crmdesk using clap's derive macros.

use clap::{Parser, Subcommand};

/// crmdesk - CRM backend with an admin API
#[derive(Parser)]
#[command(name = "crmdesk")]
#[command(version)]
#[command(about = "A small CRM backend with an admin API", long_about = None)]
pub struct Cli {
    /// Configuration file (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Apply pending database migrations and exit
    Migrate,

    /// Manage admin users
    User {
        #[command(subcommand)]
        action: UserCommands,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Admin user commands
#[derive(Subcommand)]
pub enum UserCommands {
    /// Create an admin user
    Create {
        username: String,

        /// Password (visible in shell history; prefer --stdin)
        #[arg(long, conflicts_with = "stdin")]
        password: Option<String>,

        /// Read password from stdin (for scripting)
        #[arg(long)]
        stdin: bool,
    },

    /// List admin users
    List,
}

/// Configuration management commands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Force overwrite without confirmation
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["crmdesk"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from(["crmdesk", "migrate", "-c", "/etc/crm.toml"]).unwrap();
        assert_eq!(cli.config.as_deref(), Some("/etc/crm.toml"));
        assert!(matches!(cli.command, Some(Commands::Migrate)));
    }

    #[test]
    fn test_user_create_args() {
        let cli =
            Cli::try_parse_from(["crmdesk", "user", "create", "alice", "--password", "s3cret-pw"])
                .unwrap();
        match cli.command {
            Some(Commands::User {
                action:
                    UserCommands::Create {
                        username,
                        password,
                        stdin,
                    },
            }) => {
                assert_eq!(username, "alice");
                assert_eq!(password.as_deref(), Some("s3cret-pw"));
                assert!(!stdin);
            }
            _ => panic!("expected user create"),
        }

        assert!(
            Cli::try_parse_from(["crmdesk", "user", "create", "bob", "--password", "x", "--stdin"])
                .is_err()
        );
    }
}
