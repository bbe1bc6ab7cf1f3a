//! File download endpoints.

use crate::DnacClient;
use snmpfix_core::Result;

/// File service endpoints
pub struct FileApi<'a> {
    client: &'a DnacClient,
}

impl<'a> FileApi<'a> {
    pub(crate) const fn new(client: &'a DnacClient) -> Self {
        Self { client }
    }

    /// Download a file produced by a controller task
    pub async fn download(&self, file_id: &str) -> Result<Vec<u8>> {
        self.client
            .get_bytes(&format!("/dna/intent/api/v1/file/{file_id}"))
            .await
    }
}
