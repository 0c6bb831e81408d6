// plugctl-common/src/model/plugin.rs
use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A plugin as found on disk under the plugins directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledPluginInfo {
    pub name: String,
    pub version: String,
    pub path: PathBuf,
}

/// The newest catalog entry of a plugin that can run on this machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemotePluginInfo {
    pub name: String,
    pub version: String,
}

/// Subset of `plugin.json` that plugctl cares about.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PluginManifest {
    #[serde(default)]
    pub info: Option<ManifestInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManifestInfo {
    #[serde(default)]
    pub version: Option<String>,
}

impl PluginManifest {
    pub fn version(&self) -> Option<&str> {
        self.info
            .as_ref()
            .and_then(|i| i.version.as_deref())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }
}

/// Response body of `GET <repo>/repo/<plugin>`.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogPlugin {
    pub id: String,
    #[serde(default)]
    pub versions: Vec<CatalogVersion>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogVersion {
    pub version: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub arch: HashMap<String, ArchMeta>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArchMeta {
    #[serde(default)]
    pub md5: Option<String>,
}

impl CatalogVersion {
    /// A version without per-platform builds runs everywhere.
    pub fn supports_platform(&self, platform: &str) -> bool {
        self.arch.is_empty() || self.arch.contains_key(platform)
    }

    /// MD5 digest published for the `platform` build, if any.
    pub fn md5_for(&self, platform: &str) -> Option<&str> {
        self.arch
            .get(platform)
            .and_then(|a| a.md5.as_deref())
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }
}

impl CatalogPlugin {
    /// The repository lists versions newest first; the first one usable here wins.
    pub fn latest_supported_version(&self, platform: &str) -> Option<&CatalogVersion> {
        self.versions.iter().find(|v| v.supports_platform(platform))
    }

    pub fn find_version(&self, version: &str) -> Option<&CatalogVersion> {
        self.versions.iter().find(|v| v.version == version)
    }
}

/// Platform key in the `<os>-<arch>` form the plugin repository uses.
pub fn current_platform() -> String {
    platform_key(std::env::consts::OS, std::env::consts::ARCH)
}

pub fn platform_key(os: &str, arch: &str) -> String {
    let os = match os {
        "macos" => "darwin",
        other => other,
    };
    let arch = match arch {
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        "x86" => "386",
        other => other,
    };
    format!("{os}-{arch}")
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"{
        "id": "grafana-clock-panel",
        "category": "panel",
        "versions": [
            { "version": "2.1.0", "arch": { "windows-amd64": { "md5": "a" } } },
            { "version": "2.0.0", "arch": { "linux-amd64": { "md5": "b" } } },
            { "version": "1.0.3" }
        ]
    }"#;

    #[test]
    fn picks_first_version_built_for_platform() {
        let plugin: CatalogPlugin = serde_json::from_str(CATALOG).unwrap();
        let latest = plugin.latest_supported_version("linux-amd64").unwrap();
        assert_eq!(latest.version, "2.0.0");
        let latest = plugin.latest_supported_version("windows-amd64").unwrap();
        assert_eq!(latest.version, "2.1.0");
        let latest = plugin.latest_supported_version("darwin-arm64").unwrap();
        assert_eq!(latest.version, "1.0.3");
    }

    #[test]
    fn digest_is_looked_up_per_platform() {
        let plugin: CatalogPlugin = serde_json::from_str(CATALOG).unwrap();
        assert_eq!(plugin.versions[1].md5_for("linux-amd64"), Some("b"));
        assert_eq!(plugin.versions[1].md5_for("windows-amd64"), None);
        assert_eq!(plugin.versions[2].md5_for("linux-amd64"), None);
    }

    #[test]
    fn empty_catalog_has_no_latest() {
        let plugin: CatalogPlugin =
            serde_json::from_str(r#"{ "id": "empty", "versions": [] }"#).unwrap();
        assert!(plugin.latest_supported_version("linux-amd64").is_none());
    }

    #[test]
    fn platform_names_follow_repository_convention() {
        assert_eq!(platform_key("macos", "aarch64"), "darwin-arm64");
        assert_eq!(platform_key("linux", "x86_64"), "linux-amd64");
        assert_eq!(platform_key("windows", "x86"), "windows-386");
    }

    #[test]
    fn manifest_version_ignores_blank() {
        let manifest: PluginManifest =
            serde_json::from_str(r#"{ "id": "x", "info": { "version": "  " } }"#).unwrap();
        assert_eq!(manifest.version(), None);
        let manifest: PluginManifest =
            serde_json::from_str(r#"{ "id": "x", "info": { "version": "1.4.2" } }"#).unwrap();
        assert_eq!(manifest.version(), Some("1.4.2"));
    }
}
