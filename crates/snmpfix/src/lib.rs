//! Detect and remediate non-compliant SNMP host configuration on devices
//! managed by Cisco DNA Center.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use snmpfix::{CompliancePolicy, DnacClient, Remediator, RunConfig, Synthesis};
//!
//! #[tokio::main]
//! async fn main() -> snmpfix::Result<()> {
//!     let client = DnacClient::builder("https://dnac.example.net")
//!         .credentials("admin", "password")
//!         .connect()
//!         .await?;
//!
//!     let policy = CompliancePolicy::new(
//!         "10.0.0.5",
//!         "rightcommunity",
//!         "snmp-server host 10.0.0.5 version 2c rightcommunity",
//!     );
//!     let config = RunConfig::new(policy, "Remediation", "snmp-fix");
//!     let remediator = Remediator::new(client, config)?;
//!
//!     let plan = remediator.plan().await?;
//!     if let Synthesis::Ready(template) = &plan.synthesis {
//!         let id = remediator.upload(template).await?;
//!         remediator.deploy(&id, template).await?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `default` - Uses rustls for TLS
//! - `rustls` - Use rustls for TLS (recommended)
//! - `native-tls` - Use system native TLS

#![doc(html_root_url = "https://docs.rs/snmpfix/0.3.0")]

mod pipeline;
mod report;

pub use pipeline::{ArchiveFailure, CollectedConfigs, Plan, Remediator, RunConfig};
pub use report::{DeviceReport, DeviceStatus, RunReport};

// Re-export core types
pub use snmpfix_core::*;

// Re-export the client
pub use snmpfix_client::{DnacClient, DnacClientBuilder, PollConfig};

// Re-export compliance
pub use snmpfix_compliance as compliance;
pub use snmpfix_compliance::{
    classify, decrypt, synthesize, CompliancePolicy, ComplianceVerdict, DecryptedConfigs,
    DeviceRemediation, RemediationSet, Synthesis,
};

// Re-export runtime for convenience
pub use tokio;
pub use serde;
pub use serde_json;
