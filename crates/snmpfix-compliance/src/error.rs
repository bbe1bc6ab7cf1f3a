use thiserror::Error;

/// Result type alias for compliance operations
pub type ComplianceResult<T> = std::result::Result<T, ComplianceError>;

/// Errors from archive decryption and policy checks
#[derive(Error, Debug)]
pub enum ComplianceError {
    /// Archive is not a readable package
    #[error("malformed archive: {0}")]
    Format(String),

    /// Wrong secret or corrupted encrypted payload
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// Reference policy is unusable
    #[error("invalid compliance policy: {0}")]
    Policy(String),
}

impl From<ComplianceError> for snmpfix_core::SnmpFixError {
    fn from(err: ComplianceError) -> Self {
        match err {
            ComplianceError::Format(msg) => Self::Format(msg),
            ComplianceError::Decryption(msg) => Self::Decryption(msg),
            ComplianceError::Policy(msg) => Self::Config(msg),
        }
    }
}
