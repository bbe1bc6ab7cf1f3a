//! SNMP compliance detection and remediation.
//!
//! Everything in this crate is synchronous and free of controller I/O:
//!
//! - [`archive`]: decrypt a configuration export into per-device text
//! - [`parser`]: recognize `snmp-server host` statements
//! - [`classify`]: judge one device's configuration against a [`CompliancePolicy`]
//! - [`aggregate`]: partition a device set into a [`RemediationSet`]
//! - [`template`]: render the remediation as a device-targeted template

#![doc(html_root_url = "https://docs.rs/snmpfix-compliance/0.3.0")]

pub mod aggregate;
pub mod archive;
pub mod classify;
mod error;
pub mod parser;
mod policy;
pub mod template;

pub use aggregate::{aggregate, aggregate_configs, DeviceRemediation, RemediationSet};
pub use archive::{decrypt, DecryptedConfigs};
pub use classify::{classify, ComplianceVerdict};
pub use error::{ComplianceError, ComplianceResult};
pub use parser::SnmpHostLine;
pub use policy::CompliancePolicy;
pub use template::{synthesize, Synthesis};
