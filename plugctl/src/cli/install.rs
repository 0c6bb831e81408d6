use clap::Args;
use plugctl_common::config::Config;
use plugctl_common::error::Result;
use plugctl_core::{PluginInstaller, RepositoryInstaller};
use plugctl_net::CatalogClient;

use crate::ui::TerminalOutput;

/// Install a plugin from the repository
#[derive(Args, Debug)]
pub struct InstallArgs {
    /// The plugin to install
    #[arg()]
    pub name: String,

    /// Exact version to install; the latest for this platform when omitted
    #[arg(id = "plugin_version", value_name = "VERSION")]
    pub version: Option<String>,
}

impl InstallArgs {
    pub async fn run(&self, config: &Config) -> Result<()> {
        let client = CatalogClient::new(config)?;
        let output = TerminalOutput;
        RepositoryInstaller::new(&client, &output)
            .install(
                &self.name,
                self.version.as_deref().unwrap_or(""),
                config.plugins_dir(),
            )
            .await
    }
}
