use serde::{Deserialize, Deserializer, Serialize};

/// Network device as reported by the controller inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Controller-assigned unique identifier
    pub id: String,

    /// Device hostname
    #[serde(default)]
    pub hostname: Option<String>,

    /// Management IP address; empty when the controller has none on record
    #[serde(default, deserialize_with = "null_as_empty")]
    pub management_ip_address: String,

    /// Product family (e.g. "Switches and Hubs")
    #[serde(default)]
    pub family: Option<String>,

    /// Product series (e.g. "Cisco Catalyst 9300 Series Switches")
    #[serde(default)]
    pub series: Option<String>,

    /// Platform identifier (e.g. "C9300-48U")
    #[serde(default)]
    pub platform_id: Option<String>,

    /// Software type (e.g. "IOS-XE")
    #[serde(default)]
    pub software_type: Option<String>,

    /// Software version
    #[serde(default)]
    pub software_version: Option<String>,
}

impl Device {
    /// Create a device with only the identifying fields set
    #[must_use]
    pub fn new(id: impl Into<String>, management_ip_address: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            hostname: None,
            management_ip_address: management_ip_address.into(),
            family: None,
            series: None,
            platform_id: None,
            software_type: None,
            software_version: None,
        }
    }

    /// Set the hostname
    #[must_use]
    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    /// Set product family and series
    #[must_use]
    pub fn with_type(mut self, family: impl Into<String>, series: impl Into<String>) -> Self {
        self.family = Some(family.into());
        self.series = Some(series.into());
        self
    }

    /// Set the platform identifier
    #[must_use]
    pub fn with_platform(mut self, platform_id: impl Into<String>) -> Self {
        self.platform_id = Some(platform_id.into());
        self
    }

    /// Returns true if the controller reported a management address
    #[must_use]
    pub fn has_address(&self) -> bool {
        !self.management_ip_address.trim().is_empty()
    }

    /// Hostname if known, otherwise the management address
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.hostname
            .as_deref()
            .unwrap_or(&self.management_ip_address)
    }

    /// Product family/series pair used when creating templates
    #[must_use]
    pub fn device_type(&self) -> DeviceType {
        DeviceType {
            product_family: self.family.clone().unwrap_or_default(),
            product_series: self.series.clone().unwrap_or_default(),
        }
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Product family/series pair a template applies to
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceType {
    /// Product family
    pub product_family: String,

    /// Product series
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub product_series: String,
}

/// Inventory filter. Unset fields do not restrict; set fields are ANDed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceFilter {
    /// Exact hostname
    pub hostname: Option<String>,

    /// Exact management IP address
    pub management_ip_address: Option<String>,

    /// Accepted product families
    pub family: Vec<String>,

    /// Accepted product series
    pub series: Vec<String>,

    /// Accepted platform identifiers
    pub platform_id: Vec<String>,
}

impl DeviceFilter {
    /// Restrict to an exact hostname
    #[must_use]
    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    /// Restrict to an exact management address
    #[must_use]
    pub fn management_ip_address(mut self, ip: impl Into<String>) -> Self {
        self.management_ip_address = Some(ip.into());
        self
    }

    /// Accept an additional product family
    #[must_use]
    pub fn family(mut self, family: impl Into<String>) -> Self {
        self.family.push(family.into());
        self
    }

    /// Accept an additional product series
    #[must_use]
    pub fn series(mut self, series: impl Into<String>) -> Self {
        self.series.push(series.into());
        self
    }

    /// Accept an additional platform identifier
    #[must_use]
    pub fn platform_id(mut self, platform_id: impl Into<String>) -> Self {
        self.platform_id.push(platform_id.into());
        self
    }

    /// Returns true if no criteria are set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hostname.is_none()
            && self.management_ip_address.is_none()
            && self.family.is_empty()
            && self.series.is_empty()
            && self.platform_id.is_empty()
    }

    /// Returns true if the device satisfies every set criterion
    #[must_use]
    pub fn matches(&self, device: &Device) -> bool {
        exact(self.hostname.as_deref(), device.hostname.as_deref())
            && exact(
                self.management_ip_address.as_deref(),
                Some(device.management_ip_address.as_str()),
            )
            && member(&self.family, device.family.as_deref())
            && member(&self.series, device.series.as_deref())
            && member(&self.platform_id, device.platform_id.as_deref())
    }

    /// Controller query parameters; set-valued fields repeat their key
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(hostname) = &self.hostname {
            pairs.push(("hostname", hostname.clone()));
        }
        if let Some(ip) = &self.management_ip_address {
            pairs.push(("managementIpAddress", ip.clone()));
        }
        pairs.extend(self.family.iter().map(|v| ("family", v.clone())));
        pairs.extend(self.series.iter().map(|v| ("series", v.clone())));
        pairs.extend(self.platform_id.iter().map(|v| ("platformId", v.clone())));
        pairs
    }
}

fn exact(wanted: Option<&str>, actual: Option<&str>) -> bool {
    wanted.map_or(true, |w| actual == Some(w))
}

fn member(accepted: &[String], actual: Option<&str>) -> bool {
    accepted.is_empty() || actual.is_some_and(|a| accepted.iter().any(|v| v == a))
}

/// Site restriction applied on top of [`DeviceFilter`].
///
/// An empty list means no restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationFilter(pub Vec<String>);

impl LocationFilter {
    /// Returns true if every location is accepted
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if a device at `location` passes the filter
    #[must_use]
    pub fn allows(&self, location: Option<&str>) -> bool {
        self.is_unrestricted() || location.is_some_and(|l| self.0.iter().any(|s| s == l))
    }
}

impl From<Vec<String>> for LocationFilter {
    fn from(sites: Vec<String>) -> Self {
        Self(sites)
    }
}

/// Subset of the controller's device detail record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDetail {
    /// Site the device is assigned to
    #[serde(default)]
    pub location: Option<String>,

    /// Site name hierarchy
    #[serde(default)]
    pub location_name: Option<String>,

    /// Management IP address
    #[serde(default)]
    pub management_ip_addr: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn switch() -> Device {
        Device::new("uuid-1", "10.1.1.1")
            .with_hostname("sw1")
            .with_type("Switches and Hubs", "Cisco Catalyst 9300 Series Switches")
            .with_platform("C9300-48U")
    }

    #[test]
    fn test_null_management_address() {
        let devices: Vec<Device> = serde_json::from_str(
            r#"[
                {"id": "a", "managementIpAddress": null, "hostname": null},
                {"id": "b", "managementIpAddress": "10.1.0.2", "hostname": "sw2"}
            ]"#,
        )
        .unwrap();
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].management_ip_address, "");
        assert!(!devices[0].has_address());
        assert!(devices[1].has_address());
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = DeviceFilter::default();
        assert!(filter.is_empty());
        assert!(filter.matches(&switch()));
        assert!(filter.matches(&Device::new("x", "")));
    }

    #[test]
    fn test_filter_fields_are_anded() {
        let filter = DeviceFilter::default()
            .hostname("sw1")
            .family("Switches and Hubs");
        assert!(filter.matches(&switch()));

        let filter = filter.platform_id("C9200L-24T");
        assert!(!filter.matches(&switch()));
    }

    #[test]
    fn test_set_fields_accept_any_member() {
        let filter = DeviceFilter::default()
            .family("Routers")
            .family("Switches and Hubs");
        assert!(filter.matches(&switch()));
        assert!(!filter.matches(&Device::new("r1", "10.2.2.2").with_type("Wireless Controller", "")));
    }

    #[test]
    fn test_set_field_rejects_missing_attribute() {
        let filter = DeviceFilter::default().series("Cisco Catalyst 9300 Series Switches");
        assert!(!filter.matches(&Device::new("x", "10.0.0.1")));
    }

    #[test]
    fn test_query_pairs_repeat_set_fields() {
        let filter = DeviceFilter::default()
            .management_ip_address("10.1.1.1")
            .family("Routers")
            .family("Switches and Hubs");
        assert_eq!(
            filter.query_pairs(),
            vec![
                ("managementIpAddress", "10.1.1.1".to_string()),
                ("family", "Routers".to_string()),
                ("family", "Switches and Hubs".to_string()),
            ]
        );
    }

    #[test]
    fn test_location_filter() {
        let any = LocationFilter::default();
        assert!(any.allows(None));
        assert!(any.allows(Some("Global/US/Austin")));

        let austin = LocationFilter::from(vec!["Global/US/Austin".to_string()]);
        assert!(austin.allows(Some("Global/US/Austin")));
        assert!(!austin.allows(Some("Global/US/Dallas")));
        assert!(!austin.allows(None));
    }

    #[test]
    fn test_device_deserializes_from_inventory_record() {
        let json = r#"{
            "id": "b9c2-11",
            "hostname": "edge-01",
            "managementIpAddress": "192.0.2.10",
            "family": "Routers",
            "series": "Cisco ISR 4000 Series",
            "platformId": "ISR4331/K9",
            "softwareType": "IOS-XE",
            "reachabilityStatus": "Reachable"
        }"#;
        let device: Device = serde_json::from_str(json).unwrap();
        assert_eq!(device.id, "b9c2-11");
        assert_eq!(device.management_ip_address, "192.0.2.10");
        assert_eq!(device.platform_id.as_deref(), Some("ISR4331/K9"));
        assert_eq!(device.display_name(), "edge-01");
    }
}
