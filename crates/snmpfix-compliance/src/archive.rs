//! Configuration export decryption.
//!
//! An export holds one folder per device, named after the device's management
//! address, containing that device's running configuration in a file ending in
//! `RUNNINGCONFIG.cfg`. Other entries are ignored.

use crate::error::{ComplianceError, ComplianceResult};
use snmpfix_core::{ArchiveSecret, ConfigurationArchive, Device};
use std::collections::BTreeMap;
use std::io::{Cursor, Read};
use std::path::Path;
use tracing::{debug, warn};
use zip::result::ZipError;
use zip::ZipArchive;

/// Suffix of running-configuration files inside an export
pub const RUNNING_CONFIG_SUFFIX: &str = "RUNNINGCONFIG.cfg";

/// Plaintext configurations keyed by management address
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecryptedConfigs {
    configs: BTreeMap<String, String>,
}

impl DecryptedConfigs {
    /// Add or replace the configuration for `key`
    pub fn insert(&mut self, key: impl Into<String>, text: String) {
        self.configs.insert(key.into(), text);
    }

    /// Configuration text stored under `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.configs.get(key).map(String::as_str)
    }

    /// Configuration text retrieved for `device`, if any
    #[must_use]
    pub fn for_device(&self, device: &Device) -> Option<&str> {
        if !device.has_address() {
            return None;
        }
        self.get(&device.management_ip_address)
    }

    /// Take over every configuration of `other`
    pub fn merge(&mut self, other: Self) {
        self.configs.extend(other.configs);
    }

    /// Keys in order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.configs.keys().map(String::as_str)
    }

    /// Iterate `(key, text)` pairs in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.configs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of configurations
    #[must_use]
    pub fn len(&self) -> usize {
        self.configs.len()
    }

    /// Returns true if no configuration was found
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}

/// Decrypt an export into per-device running configurations.
///
/// A package that cannot be read is a [`ComplianceError::Format`]; a wrong
/// secret or an encrypted entry that fails integrity checks while reading is a
/// [`ComplianceError::Decryption`]. Either error discards this archive only.
pub fn decrypt(
    archive: &ConfigurationArchive,
    secret: &ArchiveSecret,
) -> ComplianceResult<DecryptedConfigs> {
    let mut zip = ZipArchive::new(Cursor::new(archive.as_bytes()))
        .map_err(|e| ComplianceError::Format(e.to_string()))?;
    let mut configs = DecryptedConfigs::default();

    for index in 0..zip.len() {
        let mut entry = match zip.by_index_decrypt(index, secret.expose().as_bytes()) {
            Ok(entry) => entry,
            Err(ZipError::InvalidPassword) => {
                return Err(ComplianceError::Decryption(
                    "archive secret was rejected".into(),
                ))
            }
            Err(e) => return Err(ComplianceError::Format(e.to_string())),
        };

        if entry.is_dir() {
            continue;
        }
        let name = entry.name().to_string();
        let Some(path) = entry.enclosed_name() else {
            warn!(entry = %name, "skipping archive entry with unsafe path");
            continue;
        };
        if !name.ends_with(RUNNING_CONFIG_SUFFIX) {
            debug!(entry = %name, "skipping non running-config entry");
            continue;
        }
        let Some(key) = device_key(&path) else {
            warn!(entry = %name, "running config is not inside a device folder");
            continue;
        };

        let mut bytes = Vec::new();
        entry
            .read_to_end(&mut bytes)
            .map_err(|e| ComplianceError::Decryption(format!("{name}: {e}")))?;

        if configs.get(&key).is_some() {
            warn!(device = %key, entry = %name, "duplicate running config, keeping the first");
            continue;
        }
        configs.insert(key, String::from_utf8_lossy(&bytes).into_owned());
    }

    debug!(devices = configs.len(), "archive decrypted");
    Ok(configs)
}

/// Name of the folder directly containing a config file
fn device_key(path: &Path) -> Option<String> {
    let folder = path.parent()?.file_name()?;
    Some(folder.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::{AesMode, CompressionMethod, ZipWriter};

    const SECRET: &str = "Zq7xT2mB9kLw4PaR!";

    fn pack(entries: &[(&str, &str)], password: &str) -> ConfigurationArchive {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .with_aes_encryption(AesMode::Aes256, password);
        for (name, text) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(text.as_bytes()).unwrap();
        }
        ConfigurationArchive::new(writer.finish().unwrap().into_inner())
    }

    #[test]
    fn test_decrypt_running_configs() {
        let archive = pack(
            &[
                ("10.1.0.1/sw1_RUNNINGCONFIG.cfg", "hostname sw1\n"),
                ("10.1.0.1/sw1_STARTUPCONFIG.cfg", "hostname old\n"),
                ("10.1.0.2/sw2_RUNNINGCONFIG.cfg", "hostname sw2\n"),
            ],
            SECRET,
        );
        let configs = decrypt(&archive, &ArchiveSecret::from_string(SECRET)).unwrap();

        assert_eq!(configs.len(), 2);
        assert_eq!(configs.get("10.1.0.1"), Some("hostname sw1\n"));
        assert_eq!(configs.get("10.1.0.2"), Some("hostname sw2\n"));
        assert_eq!(
            configs.for_device(&Device::new("uuid", "10.1.0.2")),
            Some("hostname sw2\n")
        );
    }

    #[test]
    fn test_nested_export_folder() {
        let archive = pack(
            &[("Export_Configs/10.1.0.7/r7_RUNNINGCONFIG.cfg", "hostname r7\n")],
            SECRET,
        );
        let configs = decrypt(&archive, &ArchiveSecret::from_string(SECRET)).unwrap();
        assert_eq!(configs.keys().collect::<Vec<_>>(), vec!["10.1.0.7"]);
    }

    #[test]
    fn test_absent_device_is_absent() {
        let archive = pack(&[("10.1.0.1/sw1_RUNNINGCONFIG.cfg", "x")], SECRET);
        let configs = decrypt(&archive, &ArchiveSecret::from_string(SECRET)).unwrap();
        assert_eq!(configs.for_device(&Device::new("other", "10.1.0.99")), None);
    }

    #[test]
    fn test_wrong_secret() {
        let archive = pack(&[("10.1.0.1/sw1_RUNNINGCONFIG.cfg", "x")], SECRET);
        let err = decrypt(&archive, &ArchiveSecret::from_string("not-the-secret!")).unwrap_err();
        assert!(matches!(err, ComplianceError::Decryption(_)), "{err:?}");
    }

    #[test]
    fn test_malformed_archive() {
        let archive = ConfigurationArchive::new(b"definitely not a zip file".to_vec());
        let err = decrypt(&archive, &ArchiveSecret::from_string(SECRET)).unwrap_err();
        assert!(matches!(err, ComplianceError::Format(_)), "{err:?}");
    }

    #[test]
    fn test_non_utf8_is_replaced() {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().with_aes_encryption(AesMode::Aes256, SECRET);
        writer.start_file("10.1.0.1/sw1_RUNNINGCONFIG.cfg", options).unwrap();
        writer.write_all(b"banner \xff\xfe\nhostname sw1\n").unwrap();
        let archive = ConfigurationArchive::new(writer.finish().unwrap().into_inner());

        let configs = decrypt(&archive, &ArchiveSecret::from_string(SECRET)).unwrap();
        assert!(configs.get("10.1.0.1").unwrap().contains("hostname sw1"));
    }

    #[test]
    fn test_zipcrypto_entries() {
        use zip::unstable::write::FileOptionsExt;

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().with_deprecated_encryption(SECRET.as_bytes());
        writer.start_file("10.1.0.4/sw4_RUNNINGCONFIG.cfg", options).unwrap();
        writer.write_all(b"hostname sw4\n").unwrap();
        let archive = ConfigurationArchive::new(writer.finish().unwrap().into_inner());

        let configs = decrypt(&archive, &ArchiveSecret::from_string(SECRET)).unwrap();
        assert_eq!(configs.get("10.1.0.4"), Some("hostname sw4\n"));

        let err = decrypt(&archive, &ArchiveSecret::from_string("not-the-secret!")).unwrap_err();
        assert!(matches!(err, ComplianceError::Decryption(_)), "{err:?}");
    }

    #[test]
    fn test_unaddressed_device_has_no_config() {
        let mut configs = DecryptedConfigs::default();
        configs.insert("", "hostname ghost\n".into());
        assert_eq!(configs.for_device(&Device::new("n", "")), None);
    }

    #[test]
    fn test_merge_batches() {
        let mut a = DecryptedConfigs::default();
        a.insert("10.1.0.1", "one".into());
        let mut b = DecryptedConfigs::default();
        b.insert("10.1.0.2", "two".into());
        a.merge(b);
        assert_eq!(a.len(), 2);
    }
}
