//! snmpfix - SNMP host compliance for Cisco DNA Center
//!
//! Finds devices whose `snmp-server host` statements drift from the reference
//! receiver and pushes a remediation template to them.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    snmpfix_cli::run().await
}
