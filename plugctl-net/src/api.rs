// plugctl-net/src/api.rs
use std::sync::Arc;

use plugctl_common::config::Config;
use plugctl_common::error::{PlugError, Result};
use plugctl_common::model::{current_platform, CatalogPlugin, CatalogVersion, RemotePluginInfo};
use reqwest::{Client, StatusCode};
use tracing::{debug, error};

use crate::http::build_http_client;

/// Client for the remote plugin repository.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    repo_url: String,
    platform: String,
}

impl CatalogClient {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: build_http_client()?,
            repo_url: config.repo_url().to_string(),
            platform: current_platform(),
        })
    }

    pub fn repo_url(&self) -> &str {
        &self.repo_url
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    pub fn http_client(&self) -> &Client {
        &self.client
    }

    /// Fetches the full catalog entry for `plugin_name`.
    pub async fn fetch_plugin(&self, plugin_name: &str) -> Result<CatalogPlugin> {
        let url = format!("{}/repo/{}", self.repo_url, plugin_name);
        debug!("Fetching plugin metadata from repository: {}", url);
        let response = self.client.get(&url).send().await.map_err(|e| {
            error!("HTTP request failed for {}: {}", url, e);
            PlugError::Http(Arc::new(e))
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(PlugError::NotFound(format!(
                "Plugin '{plugin_name}' not found in repository {}",
                self.repo_url
            )));
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("(Failed to read response body: {e})"));
            debug!("Response body for failed request to {}: {}", url, body);
            return Err(PlugError::Api(format!("HTTP status {status} from {url}")));
        }

        let body = response.text().await?;
        parse_catalog_plugin(plugin_name, &body)
    }

    /// Newest catalog version of `plugin_name` that has a build for this platform.
    pub async fn latest_version(&self, plugin_name: &str) -> Result<RemotePluginInfo> {
        let plugin = self.fetch_plugin(plugin_name).await?;
        let version = select_version(&plugin, "", &self.platform)?;
        Ok(RemotePluginInfo {
            name: plugin_name.to_string(),
            version: version.version.clone(),
        })
    }

    /// Where the archive for `version` can be downloaded from.
    pub fn download_url(&self, plugin_name: &str, version: &CatalogVersion) -> String {
        match version.url.as_deref().filter(|u| !u.is_empty()) {
            Some(url) => url.to_string(),
            None => format!(
                "{}/{}/versions/{}/download",
                self.repo_url, plugin_name, version.version
            ),
        }
    }
}

pub fn parse_catalog_plugin(plugin_name: &str, body: &str) -> Result<CatalogPlugin> {
    if body.trim().is_empty() {
        return Err(PlugError::Api(format!(
            "Empty response body received for plugin '{plugin_name}'"
        )));
    }
    serde_json::from_str(body).map_err(|e| {
        error!("Failed to parse repository entry for '{}': {}", plugin_name, e);
        PlugError::Json(Arc::new(e))
    })
}

/// Picks the requested version, or the latest supported one when `requested` is empty.
pub fn select_version<'a>(
    plugin: &'a CatalogPlugin,
    requested: &str,
    platform: &str,
) -> Result<&'a CatalogVersion> {
    if requested.is_empty() {
        return plugin.latest_supported_version(platform).ok_or_else(|| {
            PlugError::NotFound(format!(
                "Plugin '{}' has no version available for {platform}",
                plugin.id
            ))
        });
    }

    let version = plugin.find_version(requested).ok_or_else(|| {
        PlugError::NotFound(format!(
            "Version {requested} of plugin '{}' not found in repository",
            plugin.id
        ))
    })?;
    if !version.supports_platform(platform) {
        return Err(PlugError::NotFound(format!(
            "Version {requested} of plugin '{}' is not available for {platform}",
            plugin.id
        )));
    }
    Ok(version)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::testing::{serve, Routes};

    const BODY: &str = r#"{
        "id": "grafana-piechart-panel",
        "versions": [
            { "version": "1.6.0", "arch": { "darwin-amd64": {} } },
            { "version": "1.5.0", "url": "https://mirror.example.com/piechart-1.5.0.zip" },
            { "version": "1.4.0" }
        ]
    }"#;

    fn client() -> CatalogClient {
        let config =
            Config::new(PathBuf::from("/tmp/plugins"), "https://grafana.com/api/plugins").unwrap();
        CatalogClient::new(&config).unwrap()
    }

    #[test]
    fn empty_body_is_an_api_error() {
        assert!(matches!(
            parse_catalog_plugin("x", "  "),
            Err(PlugError::Api(_))
        ));
    }

    #[test]
    fn malformed_body_is_a_json_error() {
        assert!(matches!(
            parse_catalog_plugin("x", "{ not json"),
            Err(PlugError::Json(_))
        ));
    }

    #[test]
    fn select_latest_skips_unsupported_platform() {
        let plugin = parse_catalog_plugin("grafana-piechart-panel", BODY).unwrap();
        let v = select_version(&plugin, "", "linux-amd64").unwrap();
        assert_eq!(v.version, "1.5.0");
    }

    #[test]
    fn select_explicit_version() {
        let plugin = parse_catalog_plugin("grafana-piechart-panel", BODY).unwrap();
        assert_eq!(
            select_version(&plugin, "1.4.0", "linux-amd64").unwrap().version,
            "1.4.0"
        );
        assert!(matches!(
            select_version(&plugin, "9.9.9", "linux-amd64"),
            Err(PlugError::NotFound(_))
        ));
        assert!(matches!(
            select_version(&plugin, "1.6.0", "linux-amd64"),
            Err(PlugError::NotFound(_))
        ));
    }

    #[test]
    fn download_url_prefers_explicit_url() {
        let plugin = parse_catalog_plugin("grafana-piechart-panel", BODY).unwrap();
        let c = client();
        assert_eq!(
            c.download_url("grafana-piechart-panel", &plugin.versions[1]),
            "https://mirror.example.com/piechart-1.5.0.zip"
        );
        assert_eq!(
            c.download_url("grafana-piechart-panel", &plugin.versions[2]),
            "https://grafana.com/api/plugins/grafana-piechart-panel/versions/1.4.0/download"
        );
    }

    async fn served_client(routes: Routes) -> CatalogClient {
        let base = serve(routes).await;
        let config =
            Config::new(PathBuf::from("/tmp/plugins"), format!("{base}/api/plugins")).unwrap();
        CatalogClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn fetch_plugin_reads_catalog_entry() {
        let c = served_client(
            Routes::new().with("/api/plugins/repo/grafana-piechart-panel", 200, BODY),
        )
        .await;
        let plugin = c.fetch_plugin("grafana-piechart-panel").await.unwrap();
        assert_eq!(plugin.id, "grafana-piechart-panel");
        assert_eq!(plugin.versions.len(), 3);
    }

    #[tokio::test]
    async fn latest_version_uses_this_platform() {
        let body = r#"{"id":"clock","versions":[{"version":"2.0.0","arch":{"no-such-os":{}}},{"version":"1.9.1"}]}"#;
        let c = served_client(Routes::new().with("/api/plugins/repo/clock", 200, body)).await;
        let remote = c.latest_version("clock").await.unwrap();
        assert_eq!(remote.name, "clock");
        assert_eq!(remote.version, "1.9.1");
    }

    #[tokio::test]
    async fn missing_plugin_is_not_found() {
        let c = served_client(Routes::new()).await;
        assert!(matches!(
            c.fetch_plugin("nope").await,
            Err(PlugError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn server_error_is_an_api_error() {
        let c = served_client(Routes::new().with("/api/plugins/repo/clock", 500, "oops")).await;
        assert!(matches!(c.fetch_plugin("clock").await, Err(PlugError::Api(_))));
    }
}
