//! Core types and traits for snmpfix.
//!
//! This crate provides the foundational pieces shared across the workspace:
//!
//! - **Types**: Devices, filters, templates and controller job payloads
//! - **Capabilities**: Async traits for the controller operations the
//!   remediation pipeline depends on
//! - **Secrets**: [`ArchiveSecret`], the per-run archive password
//! - **Errors**: Comprehensive error handling with [`SnmpFixError`]
//!
//! # Example
//!
//! ```rust,ignore
//! use snmpfix_core::{Device, DeviceFilter, Result};
//!
//! fn pick_switches(devices: Vec<Device>) -> Result<Vec<Device>> {
//!     let filter = DeviceFilter::default().family("Switches and Hubs");
//!     Ok(devices.into_iter().filter(|d| filter.matches(d)).collect())
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/snmpfix-core/0.3.0")]

pub mod capability;
mod error;
mod secret;
pub mod types;

pub use capability::{ArchiveExport, Controller, DeviceInventory, Provisioning, TemplateUpload};
pub use error::{Result, SnmpFixError};
pub use secret::ArchiveSecret;
pub use types::*;
