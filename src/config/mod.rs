pub mod error_reporter;
pub mod kdl;
pub mod loader;
pub mod types;

pub use loader::{ConfigReloader, load_config};
pub use types::{
    BuildStrategy, Config, FailurePolicy, FetchErrorPolicy, PackageConfig, Settings, SmtpSettings,
};
