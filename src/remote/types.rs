use serde::Deserialize;

pub const AUR_RPC_VERSION: u32 = 5;

/// One fetch's view of an upstream package, valid for a single decision cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub package_base: String,
    pub version: String,
    /// Upstream modification time (Unix seconds); the version watermark
    pub last_modified: i64,
    /// `None` for orphaned packages
    pub maintainer: Option<String>,
    /// Path of the source snapshot, relative to the AUR base URL
    pub url_path: String,
}

/// Envelope of `/rpc/?v=5&type=info`.
#[derive(Debug, Deserialize)]
pub(super) struct RpcResponse {
    pub(super) version: u32,
    #[serde(rename = "type")]
    pub(super) kind: String,
    #[serde(default)]
    pub(super) results: Vec<RpcPackage>,
    #[serde(default)]
    pub(super) error: Option<String>,
}

/// The subset of an RPC result we consume; other fields are ignored.
#[derive(Debug, Deserialize)]
pub(super) struct RpcPackage {
    #[serde(rename = "PackageBase")]
    pub(super) package_base: String,
    #[serde(rename = "Version")]
    pub(super) version: String,
    #[serde(rename = "LastModified")]
    pub(super) last_modified: i64,
    #[serde(rename = "Maintainer", default)]
    pub(super) maintainer: Option<String>,
    #[serde(rename = "URLPath")]
    pub(super) url_path: String,
}

impl From<RpcPackage> for Snapshot {
    fn from(pkg: RpcPackage) -> Self {
        Snapshot {
            package_base: pkg.package_base,
            version: pkg.version,
            last_modified: pkg.last_modified,
            maintainer: pkg.maintainer.filter(|m| !m.trim().is_empty()),
            url_path: pkg.url_path,
        }
    }
}
