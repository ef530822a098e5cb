//! Central project identity contract.
//!
//! This module is the single source of truth for runtime identity values.

pub const BINARY_NAME: &str = "aurwatch";
pub const STABLE_PROJECT_ID: &str = "aurwatch";
pub const CONFIG_DIR_NAME: &str = "aurwatch";
pub const ENV_PREFIX: &str = "AURWATCH";
pub const CONFIG_FILE_BASENAME: &str = "aurwatch.kdl";
pub const DEFAULT_AUR_URL: &str = "https://aur.archlinux.org";

pub fn env_key(suffix: &str) -> String {
    format!("{}_{}", ENV_PREFIX, suffix)
}

pub fn user_agent() -> String {
    format!("{}/{}", BINARY_NAME, env!("CARGO_PKG_VERSION"))
}

/// Subject prefix used on every outgoing notification.
pub fn mail_subject_prefix() -> String {
    let host = hostname::get()
        .map(|h| h.to_string_lossy().into_owned())
        .unwrap_or_else(|_| "unknown".to_string());
    format!("[{}@{}]", BINARY_NAME, host)
}
