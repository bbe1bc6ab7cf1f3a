use thiserror::Error;

/// Result type alias for snmpfix operations
pub type Result<T> = std::result::Result<T, SnmpFixError>;

/// Errors that can occur while auditing or remediating devices
#[derive(Error, Debug)]
pub enum SnmpFixError {
    /// Authentication failed - bad credentials or expired token
    #[error("authentication failed: check controller username and password")]
    Unauthorized,

    /// Resource not found
    #[error("resource not found: {resource}")]
    NotFound {
        /// Description of the resource that wasn't found
        resource: String,
    },

    /// Controller returned an error response
    #[error("API error ({code}): {message}")]
    Api {
        /// HTTP status code
        code: u16,
        /// Error message from the controller
        message: String,
    },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// A controller job did not finish in time
    #[error("timed out after {0} seconds waiting for the controller")]
    Timeout(u64),

    /// Connection failed
    #[error("connection failed: {0}")]
    Connection(String),

    /// JSON parsing/serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid URL
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Configuration archive is not a readable package
    #[error("malformed configuration archive: {0}")]
    Format(String),

    /// Configuration archive could not be decrypted
    #[error("failed to decrypt configuration archive: {0}")]
    Decryption(String),

    /// A template with the same name already exists in the project
    #[error("template '{template}' already exists in project '{project}'")]
    TemplateNameConflict {
        /// Template project name
        project: String,
        /// Conflicting template name
        template: String,
    },

    /// Template project does not exist on the controller
    #[error("template project not found: {0}")]
    ProjectNotFound(String),

    /// A controller task finished with an error
    #[error("task {task_id} failed: {reason}")]
    TaskFailed {
        /// Controller task identifier
        task_id: String,
        /// Failure reason reported by the controller
        reason: String,
    },

    /// Template deployment ended in failure
    #[error("deployment {deployment_id} failed: {detail}")]
    DeploymentFailed {
        /// Deployment identifier
        deployment_id: String,
        /// Status detail reported by the controller
        detail: String,
    },

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Generic internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl SnmpFixError {
    /// Returns true if the error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Connection(_))
    }

    /// Returns true if the error is due to authentication
    #[must_use]
    pub const fn is_auth_error(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Returns true if the error is confined to a single configuration archive
    #[must_use]
    pub const fn is_archive_error(&self) -> bool {
        matches!(self, Self::Format(_) | Self::Decryption(_))
    }

    /// Returns the HTTP status code if this is an API error
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::NotFound { .. } => Some(404),
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}
