use clap::Args;
use plugctl_common::config::Config;
use plugctl_common::error::Result;
use plugctl_core::{FsPluginStore, RepositoryInstaller, UpgradeOrchestrator};
use plugctl_net::CatalogClient;

use crate::ui::TerminalOutput;

/// Upgrade an installed plugin to the latest version in the repository
#[derive(Args, Debug)]
pub struct UpgradeArgs {
    /// The plugin to upgrade
    #[arg()]
    pub name: String,
}

impl UpgradeArgs {
    pub async fn run(&self, config: &Config) -> Result<()> {
        let client = CatalogClient::new(config)?;
        let store = FsPluginStore;
        let output = TerminalOutput;
        let installer = RepositoryInstaller::new(&client, &output);

        UpgradeOrchestrator::new(&store, &client, &store, &installer, &output)
            .upgrade(&self.name, config.plugins_dir())
            .await
    }
}
