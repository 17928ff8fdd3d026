//! crmdesk - a small CRM backend
//!
//! Contractors, contacts, marketing campaigns, deals, circulations, projects
//! and the activities around them (calls, meetings, tasks, notes, documents),
//! managed through a JWT-protected admin API.
//!
//! # Architecture
//! - `domain`: record types, choice sets and validation rules
//! - `admin`: per-type presentation config and audit stamping
//! - `storage`: SeaORM persistence for every record type
//! - `services`: repositories, authentication and attachments
//! - `api`: HTTP services and middleware
//! - `interfaces`: command-line interface
//! - `config`: Configuration management
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: logging setup

pub mod admin;
pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod interfaces;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
