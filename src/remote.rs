//! Upstream package repository access (AUR).

pub mod aur;
pub mod source;
pub mod types;

pub use aur::{AurClient, parse_info_response};
pub use types::Snapshot;
