//! Configuration archive endpoints.

use crate::DnacClient;
use snmpfix_core::{ApiResponse, ArchiveSecret, ExportRequest, Result, SnmpFixError, TaskHandle};

/// Configuration archive endpoints
pub struct ArchiveApi<'a> {
    client: &'a DnacClient,
}

impl<'a> ArchiveApi<'a> {
    pub(crate) const fn new(client: &'a DnacClient) -> Self {
        Self { client }
    }

    /// Start an export of the devices' configurations, encrypted with `secret`.
    ///
    /// The returned task resolves to a file holding the password protected
    /// archive.
    pub async fn export<S: AsRef<str> + Sync>(
        &self,
        device_ids: &[S],
        secret: &ArchiveSecret,
    ) -> Result<TaskHandle> {
        if device_ids.is_empty() {
            return Err(SnmpFixError::Config(
                "at least one device is required for a configuration export".into(),
            ));
        }

        let request = ExportRequest {
            device_id: device_ids.iter().map(AsRef::as_ref).collect(),
            password: secret.expose(),
        };
        let reply: ApiResponse<TaskHandle> = self
            .client
            .post("/dna/intent/api/v1/network-device-archive/cleartext", &request)
            .await?;
        Ok(reply.response)
    }
}
