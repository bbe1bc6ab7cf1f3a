/// Encrypted configuration export as downloaded from the controller.
///
/// The bytes are opaque until handed to the archive decryptor together with
/// the secret the export was requested with.
#[derive(Clone, PartialEq, Eq)]
pub struct ConfigurationArchive(Vec<u8>);

impl ConfigurationArchive {
    /// Wrap downloaded archive bytes
    #[must_use]
    pub const fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Borrow the raw bytes
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Size of the archive in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the archive holds no bytes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for ConfigurationArchive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ConfigurationArchive({} bytes)", self.0.len())
    }
}

impl From<Vec<u8>> for ConfigurationArchive {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}
