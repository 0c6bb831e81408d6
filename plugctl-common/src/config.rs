// plugctl-common/src/config.rs
use std::env;
use std::path::{Path, PathBuf};

use tracing::debug;
use url::Url;

use super::error::{PlugError, Result};

const DEFAULT_PLUGINS_DIR: &str = "/var/lib/grafana/plugins";
const DEFAULT_REPO_URL: &str = "https://grafana.com/api/plugins";

pub const PLUGINS_DIR_ENV: &str = "PLUGCTL_PLUGINS_DIR";
pub const REPO_ENV: &str = "PLUGCTL_REPO";

#[derive(Debug, Clone)]
pub struct Config {
    pub plugins_dir: PathBuf,
    pub repo_url: String,
}

impl Config {
    /// Loads from the environment, letting explicit values (from command-line flags) win.
    pub fn load_with_overrides(
        plugins_dir: Option<PathBuf>,
        repo_url: Option<String>,
    ) -> Result<Self> {
        debug!("Loading plugctl configuration");

        let plugins_dir = plugins_dir.unwrap_or_else(|| {
            let from_env = env::var(PLUGINS_DIR_ENV).ok().filter(|s| !s.is_empty());
            PathBuf::from(from_env.unwrap_or_else(|| {
                debug!(
                    "{} not set or empty, falling back to default: {}",
                    PLUGINS_DIR_ENV, DEFAULT_PLUGINS_DIR
                );
                DEFAULT_PLUGINS_DIR.to_string()
            }))
        });

        let repo_url = repo_url
            .or_else(|| env::var(REPO_ENV).ok().filter(|s| !s.is_empty()))
            .unwrap_or_else(|| DEFAULT_REPO_URL.to_string());

        Self::new(plugins_dir, repo_url)
    }

    /// Builds a config from explicit values, validating the repository URL.
    pub fn new(plugins_dir: PathBuf, repo_url: impl Into<String>) -> Result<Self> {
        let repo_url = normalize_repo_url(&repo_url.into())?;
        debug!(
            "Effective plugins dir: {}, repository: {}",
            plugins_dir.display(),
            repo_url
        );
        Ok(Self {
            plugins_dir,
            repo_url,
        })
    }

    pub fn plugins_dir(&self) -> &Path {
        &self.plugins_dir
    }

    pub fn repo_url(&self) -> &str {
        &self.repo_url
    }

    pub fn plugin_path(&self, plugin_name: &str) -> PathBuf {
        self.plugins_dir.join(plugin_name)
    }
}

fn normalize_repo_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed)
        .map_err(|e| PlugError::Config(format!("Invalid repository URL '{raw}': {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        other => Err(PlugError::Config(format!(
            "Invalid repository URL scheme for '{raw}': must be http or https, got '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_stripped_from_repo() {
        let config = Config::new(PathBuf::from("/tmp/plugins"), "https://example.com/api/plugins/")
            .unwrap();
        assert_eq!(config.repo_url(), "https://example.com/api/plugins");
    }

    #[test]
    fn non_http_repo_is_rejected() {
        let err = Config::new(PathBuf::from("/tmp/plugins"), "ftp://example.com/plugins")
            .unwrap_err();
        assert!(matches!(err, PlugError::Config(_)));
    }

    #[test]
    fn explicit_values_win_over_environment() {
        let config = Config::load_with_overrides(
            Some(PathBuf::from("/b")),
            Some("https://example.com/plugins".to_string()),
        )
        .unwrap();
        assert_eq!(config.plugins_dir(), Path::new("/b"));
        assert_eq!(config.repo_url(), "https://example.com/plugins");
        assert_eq!(config.plugin_path("clock"), PathBuf::from("/b/clock"));
    }
}
