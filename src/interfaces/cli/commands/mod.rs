//! CLI command implementations
//!
//! This module re-exports all CLI command functions.

mod config_gen;
mod migrate;
mod user;

pub use config_gen::config_generate;
pub use migrate::run_migrations;
pub use user::{create_user, list_users};
