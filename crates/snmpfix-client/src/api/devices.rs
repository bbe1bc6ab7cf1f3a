//! Network device inventory endpoints.

use crate::DnacClient;
use snmpfix_core::{ApiResponse, Device, DeviceDetail, DeviceFilter, LocationFilter, Result};
use tracing::debug;

/// Network device inventory endpoints
pub struct DevicesApi<'a> {
    client: &'a DnacClient,
}

impl<'a> DevicesApi<'a> {
    pub(crate) const fn new(client: &'a DnacClient) -> Self {
        Self { client }
    }

    /// List devices matching `filter`.
    ///
    /// The filter is sent to the controller and applied again locally, so the
    /// result honours every set criterion even if the controller ignores one.
    pub async fn list(&self, filter: &DeviceFilter) -> Result<Vec<Device>> {
        let reply: ApiResponse<Vec<Device>> = self
            .client
            .get_with_query("/dna/intent/api/v1/network-device", &filter.query_pairs())
            .await?;
        let total = reply.response.len();
        let devices: Vec<Device> = reply
            .response
            .into_iter()
            .filter(|d| filter.matches(d))
            .collect();
        debug!(returned = total, matched = devices.len(), "device list");
        Ok(devices)
    }

    /// Get the detail record of a device by its identifier
    pub async fn detail(&self, device_id: &str) -> Result<DeviceDetail> {
        let params = [
            ("identifier", "uuid".to_string()),
            ("searchBy", device_id.to_string()),
        ];
        let reply: ApiResponse<DeviceDetail> = self
            .client
            .get_with_query("/dna/intent/api/v1/network-device-detail", &params)
            .await?;
        Ok(reply.response)
    }

    /// List devices matching `filter` that sit in one of `locations`.
    ///
    /// Locations are only available from the detail record, so a restricted
    /// location filter costs one extra request per device.
    pub async fn list_in(
        &self,
        filter: &DeviceFilter,
        locations: &LocationFilter,
    ) -> Result<Vec<Device>> {
        let devices = self.list(filter).await?;
        if locations.is_unrestricted() {
            return Ok(devices);
        }

        let mut kept = Vec::with_capacity(devices.len());
        for device in devices {
            let detail = self.detail(&device.id).await?;
            if locations.allows(detail.location.as_deref())
                || locations.allows(detail.location_name.as_deref())
            {
                kept.push(device);
            } else {
                debug!(device = %device.display_name(), location = ?detail.location, "outside location filter");
            }
        }
        Ok(kept)
    }
}
