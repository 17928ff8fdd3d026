//! 用户界面（当前只有 CLI）

pub mod cli;
