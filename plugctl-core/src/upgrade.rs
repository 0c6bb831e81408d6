// plugctl-core/src/upgrade.rs
//! Upgrades a single installed plugin to the newest version the repository offers.
//!
//! The orchestration only sequences its collaborators: read the installed version, fetch the
//! remote one, compare, then either remove and reinstall or report that nothing changed.
//! Collaborator errors are returned exactly as produced. Removal is not undone when the
//! following install fails, leaving the plugin uninstalled.

use std::path::Path;

use async_trait::async_trait;
use plugctl_common::error::Result;
use plugctl_common::model::{InstalledPluginInfo, RemotePluginInfo};
use plugctl_net::CatalogClient;
use tracing::debug;

use crate::version::should_upgrade;
use crate::{install, installed, uninstall};

pub trait LocalPluginReader: Send + Sync {
    fn read(&self, plugins_dir: &Path, plugin_name: &str) -> Result<InstalledPluginInfo>;
}

#[async_trait]
pub trait RemoteCatalogClient: Send + Sync {
    async fn get_plugin(&self, plugin_name: &str) -> Result<RemotePluginInfo>;
}

pub trait PluginRemover: Send + Sync {
    fn remove(&self, plugins_dir: &Path, plugin_name: &str) -> Result<()>;
}

#[async_trait]
pub trait PluginInstaller: Send + Sync {
    /// An empty `version` means "latest".
    async fn install(&self, plugin_name: &str, version: &str, plugins_dir: &Path) -> Result<()>;
}

pub trait OutputSink: Send + Sync {
    fn info(&self, message: &str);
}

pub struct UpgradeOrchestrator<'a> {
    reader: &'a dyn LocalPluginReader,
    catalog: &'a dyn RemoteCatalogClient,
    remover: &'a dyn PluginRemover,
    installer: &'a dyn PluginInstaller,
    output: &'a dyn OutputSink,
}

impl<'a> UpgradeOrchestrator<'a> {
    pub fn new(
        reader: &'a dyn LocalPluginReader,
        catalog: &'a dyn RemoteCatalogClient,
        remover: &'a dyn PluginRemover,
        installer: &'a dyn PluginInstaller,
        output: &'a dyn OutputSink,
    ) -> Self {
        Self {
            reader,
            catalog,
            remover,
            installer,
            output,
        }
    }

    pub async fn upgrade(&self, plugin_name: &str, plugins_dir: &Path) -> Result<()> {
        let local = self.reader.read(plugins_dir, plugin_name)?;
        let remote = self.catalog.get_plugin(plugin_name).await?;
        debug!(
            "{}: installed {}, repository {}",
            plugin_name, local.version, remote.version
        );

        if should_upgrade(&local.version, &remote.version) {
            debug!(
                "Upgrading {} from {} to {}",
                plugin_name, local.version, remote.version
            );
            self.remover.remove(plugins_dir, plugin_name)?;
            return self.installer.install(plugin_name, "", plugins_dir).await;
        }

        self.output.info(&format!("{plugin_name} is up to date"));
        Ok(())
    }
}

/// Reads and removes plugins directly on the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsPluginStore;

impl LocalPluginReader for FsPluginStore {
    fn read(&self, plugins_dir: &Path, plugin_name: &str) -> Result<InstalledPluginInfo> {
        installed::read_installed_plugin(plugins_dir, plugin_name)
    }
}

impl PluginRemover for FsPluginStore {
    fn remove(&self, plugins_dir: &Path, plugin_name: &str) -> Result<()> {
        uninstall::remove_installed_plugin(plugins_dir, plugin_name)
    }
}

#[async_trait]
impl RemoteCatalogClient for CatalogClient {
    async fn get_plugin(&self, plugin_name: &str) -> Result<RemotePluginInfo> {
        self.latest_version(plugin_name).await
    }
}

/// Installs from the repository behind a [`CatalogClient`] and reports the result.
pub struct RepositoryInstaller<'a> {
    client: &'a CatalogClient,
    output: &'a dyn OutputSink,
}

impl<'a> RepositoryInstaller<'a> {
    pub fn new(client: &'a CatalogClient, output: &'a dyn OutputSink) -> Self {
        Self { client, output }
    }
}

#[async_trait]
impl PluginInstaller for RepositoryInstaller<'_> {
    async fn install(&self, plugin_name: &str, version: &str, plugins_dir: &Path) -> Result<()> {
        let installed =
            install::install_plugin(self.client, plugins_dir, plugin_name, version).await?;
        self.output.info(&format!(
            "Installed {} @ {} successfully",
            installed.name, installed.version
        ));
        Ok(())
    }
}
