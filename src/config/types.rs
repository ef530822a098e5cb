use crate::project_identity;
use crate::utils::paths;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CHECK_INTERVAL_SECS: i64 = 86_400;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_RETRY_DELAY_SECS: i64 = 3_600;
pub const DEFAULT_BUILD_COMMAND: &str = "makepkg --syncdeps --noconfirm --cleanbuild";
pub const DEFAULT_CONTAINER_IMAGE: &str = "archlinux:base-devel";
pub const DEFAULT_CONTAINER_RUNTIME: &str = "docker";
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// What a failed metadata fetch does to the package's cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchErrorPolicy {
    /// Propagate the error out of `check`.
    #[default]
    Abort,
    /// Log it and try again after `retry-delay`.
    Retry,
}

/// Which watermark a failed build writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Failed builds write `lastsuccess`, exactly like successful ones.
    /// The version is never retried until it changes upstream.
    #[default]
    Legacy,
    /// Failed builds write `lastfailed`; `lastsuccess` only moves on success.
    TrackFailures,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BuildStrategy {
    /// Run the build command on the host, inside the extracted sources.
    #[default]
    Direct,
    /// Run the build command in a throwaway container with the sources mounted.
    Container { image: String },
}

impl BuildStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            BuildStrategy::Direct => "direct",
            BuildStrategy::Container { .. } => "container",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub from: String,
    pub user: Option<String>,
    pub password: Option<String>,
}

/// Process-wide settings from the `settings { }` block.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub state_dir: PathBuf,
    pub aur_url: String,
    pub timeout_secs: u64,
    pub fetch_errors: FetchErrorPolicy,
    pub retry_delay_secs: i64,
    pub failure_policy: FailurePolicy,
    /// Default notification target for packages without their own
    pub notify: Option<String>,
    pub smtp: Option<SmtpSettings>,
    pub container_runtime: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            state_dir: paths::default_state_dir()
                .unwrap_or_else(|_| PathBuf::from("/var/lib").join(project_identity::STABLE_PROJECT_ID)),
            aur_url: project_identity::DEFAULT_AUR_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            fetch_errors: FetchErrorPolicy::default(),
            retry_delay_secs: DEFAULT_RETRY_DELAY_SECS,
            failure_policy: FailurePolicy::default(),
            notify: None,
            smtp: None,
            container_runtime: DEFAULT_CONTAINER_RUNTIME.to_string(),
        }
    }
}

/// One `package "<name>" { }` block.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageConfig {
    pub name: String,
    /// Expected upstream maintainer; unset means "orphaned is expected"
    pub maintainer: Option<String>,
    pub interval_secs: i64,
    /// Raw text, validated lazily so a typo only disables forced rebuilds
    pub force_interval: Option<String>,
    pub build: String,
    pub commit: Option<String>,
    pub notify: Option<String>,
    pub timeout_secs: Option<u64>,
    pub strategy: BuildStrategy,
}

impl PackageConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            maintainer: None,
            interval_secs: DEFAULT_CHECK_INTERVAL_SECS,
            force_interval: None,
            build: DEFAULT_BUILD_COMMAND.to_string(),
            commit: None,
            notify: None,
            timeout_secs: None,
            strategy: BuildStrategy::Direct,
        }
    }

    pub fn notify_target<'a>(&'a self, settings: &'a Settings) -> Option<&'a str> {
        self.notify.as_deref().or(settings.notify.as_deref())
    }

    pub fn fetch_timeout(&self, settings: &Settings) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(settings.timeout_secs))
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    pub settings: Settings,
    pub packages: Vec<PackageConfig>,
}

impl Config {
    pub fn package(&self, name: &str) -> Option<&PackageConfig> {
        self.packages.iter().find(|p| p.name == name)
    }
}
