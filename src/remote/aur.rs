use crate::error::{AurwatchError, Result};
use crate::project_identity;
use crate::remote::source::extract_snapshot;
use crate::remote::types::{AUR_RPC_VERSION, RpcResponse, Snapshot};
use crate::traits::{MetadataFetcher, SourceFetcher};
use reqwest::blocking::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Source downloads are bigger than RPC answers; give them more room.
const SOURCE_TIMEOUT_SECS: u64 = 120;

/// Blocking client for the AUR RPC interface and snapshot tarballs.
pub struct AurClient {
    base_url: String,
    client: Client,
}

impl AurClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(project_identity::user_agent())
            .build()
            .map_err(|e| AurwatchError::RemoteFetchError(format!("HTTP client setup: {}", e)))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn info_url(&self) -> String {
        format!("{}/rpc/", self.base_url)
    }

    fn get_text(&self, url: &str, query: &[(&str, &str)], timeout: Duration) -> Result<String> {
        let response = self
            .client
            .get(url)
            .query(query)
            .timeout(timeout)
            .send()
            .map_err(|e| AurwatchError::RemoteFetchError(format!("{}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(AurwatchError::RemoteFetchError(format!(
                "{}: HTTP {}",
                url,
                response.status()
            )));
        }

        response
            .text()
            .map_err(|e| AurwatchError::RemoteFetchError(format!("{}: {}", url, e)))
    }
}

impl MetadataFetcher for AurClient {
    fn fetch(&self, name: &str, timeout: Duration) -> Result<Snapshot> {
        debug!(package = name, "querying AUR metadata");
        let body = self.get_text(
            &self.info_url(),
            &[("v", "5"), ("type", "info"), ("arg[]", name)],
            timeout,
        )?;
        parse_info_response(name, &body)
    }
}

impl SourceFetcher for AurClient {
    fn fetch_sources(&self, snapshot: &Snapshot, dest: &Path) -> Result<PathBuf> {
        let url = format!("{}{}", self.base_url, snapshot.url_path);
        debug!(package = %snapshot.package_base, url = %url, "downloading source snapshot");

        let response = self
            .client
            .get(&url)
            .timeout(Duration::from_secs(SOURCE_TIMEOUT_SECS))
            .send()
            .map_err(|e| AurwatchError::RemoteFetchError(format!("{}: {}", url, e)))?;
        if !response.status().is_success() {
            return Err(AurwatchError::RemoteFetchError(format!(
                "{}: HTTP {}",
                url,
                response.status()
            )));
        }

        extract_snapshot(response, dest, &snapshot.package_base)
    }
}

/// Validate an RPC `info` answer for `name` and reduce it to a [`Snapshot`].
pub fn parse_info_response(name: &str, body: &str) -> Result<Snapshot> {
    let response: RpcResponse = serde_json::from_str(body)
        .map_err(|e| AurwatchError::RemoteFetchError(format!("Malformed AUR response: {}", e)))?;

    if response.version != AUR_RPC_VERSION {
        return Err(AurwatchError::ProtocolMismatch {
            expected: AUR_RPC_VERSION,
            found: response.version,
        });
    }

    if response.kind == "error" {
        return Err(AurwatchError::RemoteFetchError(
            response
                .error
                .unwrap_or_else(|| "AUR returned an unspecified error".to_string()),
        ));
    }

    let Some(package) = response.results.into_iter().next() else {
        return Err(AurwatchError::PackageNotFound(name.to_string()));
    };

    if package.package_base != name {
        return Err(AurwatchError::PackageBaseMismatch {
            requested: name.to_string(),
            returned: package.package_base,
        });
    }

    Ok(Snapshot::from(package))
}
