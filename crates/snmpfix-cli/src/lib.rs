//! # snmpfix-cli
//!
//! Command-line interface for the snmpfix remediation pipeline.
//!
//! ## Features
//!
//! - **run**: export, classify, build a template, upload and deploy it
//! - **audit**: classify configuration files or an encrypted export offline
//! - **devices**: list devices selected by the configured filters
//! - **Multiple output formats**: Pretty tables, JSON, CSV, YAML

pub mod cli;
pub mod config;
pub mod output;

pub use cli::run;
