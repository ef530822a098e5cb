use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AurwatchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error at '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    StdIoError(#[from] std::io::Error),

    #[error("Config file not found at: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Remote resource fetch error (HTTP, network, etc.)
    #[error("Failed to fetch remote resource: {0}")]
    RemoteFetchError(String),

    /// AUR answered with an RPC version we do not speak
    #[error("Unexpected AUR RPC version {found} (expected {expected})")]
    ProtocolMismatch { expected: u32, found: u32 },

    #[error("Package '{0}' not found upstream")]
    PackageNotFound(String),

    /// Upstream returned a different package base than requested
    #[error("Requested '{requested}' but upstream returned package base '{returned}'")]
    PackageBaseMismatch { requested: String, returned: String },

    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    #[error("System command '{command}' failed: {reason}")]
    SystemCommandFailed { command: String, reason: String },

    #[error("Notification delivery failed: {0}")]
    NotifyError(String),

    /// Lock acquisition failed (another daemon owns the state root)
    #[error("Lock acquisition failed: {0}")]
    LockError(String),

    /// Path resolution or validation error
    #[error("Path error: {0}")]
    PathError(String),

    #[error("Refusing to run as root (use --allow-root to override)")]
    RunningAsRoot,

    #[error("Operation interrupted by user")]
    Interrupted,

    #[error("{0}")]
    Other(String),
}

impl AurwatchError {
    /// Process exit code for this error at the CLI boundary.
    pub fn exit_code(&self) -> i32 {
        match self {
            AurwatchError::RunningAsRoot => 2,
            AurwatchError::Interrupted => 130,
            _ => 1,
        }
    }

    /// Whether this is an error kind the operator already gets a precise
    /// message for. Everything else is summarized unless verbose.
    pub fn is_expected(&self) -> bool {
        !matches!(
            self,
            AurwatchError::StdIoError(_) | AurwatchError::JsonError(_) | AurwatchError::Other(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, AurwatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct_for_startup_failures() {
        assert_eq!(AurwatchError::RunningAsRoot.exit_code(), 2);
        assert_eq!(AurwatchError::Interrupted.exit_code(), 130);
        assert_eq!(AurwatchError::Other("x".into()).exit_code(), 1);
    }

    #[test]
    fn protocol_mismatch_message_names_both_versions() {
        let err = AurwatchError::ProtocolMismatch {
            expected: 5,
            found: 4,
        };
        assert_eq!(err.to_string(), "Unexpected AUR RPC version 4 (expected 5)");
    }
}
