use super::{Device, DeviceType};
use serde::{Deserialize, Serialize};

/// Scripting language of a provisioning template
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TemplateLanguage {
    /// Apache Velocity
    #[default]
    Velocity,
    /// Jinja2
    Jinja,
}

impl std::fmt::Display for TemplateLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Velocity => write!(f, "VELOCITY"),
            Self::Jinja => write!(f, "JINJA"),
        }
    }
}

/// Software type every generated template targets
pub const DEFAULT_SOFTWARE_TYPE: &str = "IOS-XE";

/// Provisioning template ready for upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    /// Template name, unique within its project
    pub name: String,

    /// Rendered template content
    pub body: String,

    /// Template language
    #[serde(default)]
    pub language: TemplateLanguage,

    /// Software type the template applies to
    pub software_type: String,

    /// Product family/series of the targeted devices
    #[serde(default)]
    pub device_types: Vec<DeviceType>,

    /// Devices the template should be deployed to
    #[serde(default)]
    pub targets: Vec<Device>,
}

impl Template {
    /// Number of devices the template targets
    #[must_use]
    pub fn target_count(&self) -> usize {
        self.targets.len()
    }
}

/// Controller identifier of an uploaded template
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(pub String);

impl TemplateId {
    /// Borrow the raw identifier
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TemplateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TemplateId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for TemplateId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}
