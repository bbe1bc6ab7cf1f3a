//! HTTP client for the Cisco DNA Center (Catalyst Center) API.
//!
//! This crate provides [`DnacClient`], which covers the inventory, configuration
//! archive, task, file and template-programmer endpoints, and implements the
//! capability traits from `snmpfix-core` on top of them.

#![doc(html_root_url = "https://docs.rs/snmpfix-client/0.3.0")]

mod capability;
mod client;
mod config;
pub mod api;

pub use client::{DnacClient, DnacClientBuilder};
pub use config::*;
pub use snmpfix_core::{Result, SnmpFixError};
