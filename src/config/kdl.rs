//! KDL configuration parser
//!
//! Maps an `aurwatch.kdl` document onto [`Config`]:
//!
//! ```kdl
//! settings {
//!     state-dir "/var/lib/aurwatch"
//!     failure-policy "track-failures"
//! }
//!
//! package "yay" {
//!     maintainer "jguer"
//!     interval 3600
//!     build "makepkg -s --noconfirm"
//! }
//! ```

use crate::config::error_reporter::format_error_report;
use crate::config::types::{
    BuildStrategy, Config, DEFAULT_CONTAINER_IMAGE, DEFAULT_SMTP_PORT, FailurePolicy,
    FetchErrorPolicy, PackageConfig, Settings, SmtpSettings,
};
use crate::error::{AurwatchError, Result};
use crate::utils::paths;
use kdl::{KdlDocument, KdlEntry, KdlNode};
use std::collections::HashSet;
use std::path::PathBuf;

pub fn parse_config(content: &str) -> Result<Config> {
    parse_config_with_path(content, None)
}

/// Parse with the file path included in syntax error reports.
pub fn parse_config_with_path(content: &str, file_path: Option<&str>) -> Result<Config> {
    let doc: KdlDocument = content.parse().map_err(|e: kdl::KdlError| {
        AurwatchError::ConfigError(format_error_report(content, file_path, &e))
    })?;

    let mut config = Config::default();
    let mut seen = HashSet::new();

    for node in doc.nodes() {
        match node.name().value() {
            "settings" => parse_settings(node, &mut config.settings)?,
            "package" => {
                let package = parse_package(node)?;
                if !seen.insert(package.name.clone()) {
                    return Err(AurwatchError::ConfigError(format!(
                        "Package '{}' is declared more than once",
                        package.name
                    )));
                }
                config.packages.push(package);
            }
            _ => {}
        }
    }

    if let Some(pkg) = config
        .packages
        .iter()
        .find(|p| matches!(p.strategy, BuildStrategy::Container { .. }))
        && config.settings.container_runtime.trim().is_empty()
    {
        return Err(AurwatchError::ConfigError(format!(
            "Package '{}' uses the container strategy but 'container-runtime' is empty",
            pkg.name
        )));
    }

    Ok(config)
}

fn parse_settings(node: &KdlNode, settings: &mut Settings) -> Result<()> {
    let Some(children) = node.children() else {
        return Ok(());
    };

    for child in children.nodes() {
        let key = child.name().value();
        match key {
            "state-dir" => {
                let raw = required_string(child, "settings")?;
                settings.state_dir = paths::expand_home(&PathBuf::from(raw))?;
            }
            "aur-url" => {
                settings.aur_url = required_string(child, "settings")?
                    .trim_end_matches('/')
                    .to_string();
            }
            "timeout" => settings.timeout_secs = required_positive(child, "settings")? as u64,
            "retry-delay" => settings.retry_delay_secs = required_positive(child, "settings")?,
            "fetch-errors" => {
                settings.fetch_errors = match required_string(child, "settings")?.as_str() {
                    "abort" => FetchErrorPolicy::Abort,
                    "retry" => FetchErrorPolicy::Retry,
                    other => return Err(invalid_choice("settings", key, other, &["abort", "retry"])),
                }
            }
            "failure-policy" => {
                settings.failure_policy = match required_string(child, "settings")?.as_str() {
                    "legacy" => FailurePolicy::Legacy,
                    "track-failures" => FailurePolicy::TrackFailures,
                    other => {
                        return Err(invalid_choice(
                            "settings",
                            key,
                            other,
                            &["legacy", "track-failures"],
                        ));
                    }
                }
            }
            "notify" => settings.notify = Some(required_string(child, "settings")?),
            "container-runtime" => settings.container_runtime = required_string(child, "settings")?,
            "smtp" => settings.smtp = Some(parse_smtp(child)?),
            _ => {}
        }
    }

    Ok(())
}

fn parse_smtp(node: &KdlNode) -> Result<SmtpSettings> {
    let mut host = None;
    let mut from = None;
    let mut smtp = SmtpSettings {
        host: String::new(),
        port: DEFAULT_SMTP_PORT,
        from: String::new(),
        user: None,
        password: None,
    };

    if let Some(children) = node.children() {
        for child in children.nodes() {
            match child.name().value() {
                "host" => host = Some(required_string(child, "smtp")?),
                "from" => from = Some(required_string(child, "smtp")?),
                "user" => smtp.user = Some(required_string(child, "smtp")?),
                "password" => smtp.password = Some(required_string(child, "smtp")?),
                "port" => {
                    let port = required_positive(child, "smtp")?;
                    smtp.port = u16::try_from(port).map_err(|_| {
                        AurwatchError::ConfigError(format!("smtp: port {} is out of range", port))
                    })?;
                }
                _ => {}
            }
        }
    }

    smtp.host = host.ok_or_else(|| AurwatchError::ConfigError("smtp: 'host' is required".into()))?;
    smtp.from = from.ok_or_else(|| AurwatchError::ConfigError("smtp: 'from' is required".into()))?;
    Ok(smtp)
}

fn parse_package(node: &KdlNode) -> Result<PackageConfig> {
    let name = positional(node)
        .next()
        .and_then(|e| e.value().as_string())
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| {
            AurwatchError::ConfigError("package node needs a name: package \"<name>\" { ... }".into())
        })?
        .to_string();

    let mut package = PackageConfig::new(name.clone());
    let mut image = None;
    let mut strategy_name = None;
    let context = format!("package '{}'", name);

    if let Some(children) = node.children() {
        for child in children.nodes() {
            let key = child.name().value();
            match key {
                "maintainer" => package.maintainer = Some(required_string(child, &context)?),
                "interval" => package.interval_secs = required_positive(child, &context)?,
                "force-interval" => package.force_interval = first_text(child),
                "build" => package.build = required_string(child, &context)?,
                "commit" => package.commit = Some(required_string(child, &context)?),
                "notify" => package.notify = Some(required_string(child, &context)?),
                "timeout" => package.timeout_secs = Some(required_positive(child, &context)? as u64),
                "strategy" => strategy_name = Some(required_string(child, &context)?),
                "image" => image = Some(required_string(child, &context)?),
                other => {
                    return Err(AurwatchError::ConfigError(format!(
                        "{}: unknown key '{}'",
                        context, other
                    )));
                }
            }
        }
    }

    package.strategy = match strategy_name.as_deref() {
        None | Some("direct") => BuildStrategy::Direct,
        Some("container") => BuildStrategy::Container {
            image: image.unwrap_or_else(|| DEFAULT_CONTAINER_IMAGE.to_string()),
        },
        Some(other) => return Err(invalid_choice(&context, "strategy", other, &["direct", "container"])),
    };

    if package.build.trim().is_empty() {
        return Err(AurwatchError::ConfigError(format!(
            "{}: 'build' cannot be empty",
            context
        )));
    }

    Ok(package)
}

fn positional(node: &KdlNode) -> impl Iterator<Item = &KdlEntry> {
    node.entries().iter().filter(|e| e.name().is_none())
}

fn required_string(node: &KdlNode, context: &str) -> Result<String> {
    positional(node)
        .next()
        .and_then(|e| e.value().as_string())
        .map(str::to_string)
        .ok_or_else(|| {
            AurwatchError::ConfigError(format!(
                "{}: '{}' expects a string value",
                context,
                node.name().value()
            ))
        })
}

fn required_positive(node: &KdlNode, context: &str) -> Result<i64> {
    positional(node)
        .next()
        .and_then(|e| e.value().as_integer())
        .and_then(|v| i64::try_from(v).ok())
        .filter(|v| *v > 0)
        .ok_or_else(|| {
            AurwatchError::ConfigError(format!(
                "{}: '{}' expects a positive integer",
                context,
                node.name().value()
            ))
        })
}

/// First positional value as text, whatever its KDL type.
fn first_text(node: &KdlNode) -> Option<String> {
    let value = positional(node).next()?.value();
    if let Some(s) = value.as_string() {
        return Some(s.to_string());
    }
    if let Some(i) = value.as_integer() {
        return Some(i.to_string());
    }
    if let Some(f) = value.as_float() {
        return Some(f.to_string());
    }
    value.as_bool().map(|b| b.to_string())
}

fn invalid_choice(context: &str, key: &str, value: &str, valid: &[&str]) -> AurwatchError {
    AurwatchError::ConfigError(format!(
        "{}: invalid value for '{}': '{}'. Valid: {}",
        context,
        key,
        value,
        valid.join(", ")
    ))
}
