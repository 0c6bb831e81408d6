use clap::Args;
use colored::Colorize;
use plugctl_common::config::Config;
use plugctl_common::error::{PlugError, Result};
use plugctl_core::{should_upgrade, FsPluginStore, LocalPluginReader, RemoteCatalogClient};
use plugctl_net::CatalogClient;

/// Show installed and latest available versions of a plugin
#[derive(Args, Debug)]
pub struct Info {
    /// The plugin to inspect
    #[arg()]
    pub name: String,
}

impl Info {
    pub async fn run(&self, config: &Config) -> Result<()> {
        let installed = match FsPluginStore.read(config.plugins_dir(), &self.name) {
            Ok(info) => Some(info),
            Err(PlugError::NotInstalled(_)) => None,
            Err(e) => return Err(e),
        };
        let client = CatalogClient::new(config)?;
        let remote = client.get_plugin(&self.name).await?;

        println!("{}", self.name.bold());
        println!("  {:<10} {}", "repository", config.repo_url());
        println!("  {:<10} {} ({})", "latest", remote.version, client.platform());
        match installed {
            Some(local) => {
                println!("  {:<10} {}", "installed", local.version);
                println!("  {:<10} {}", "path", local.path.display());
                if should_upgrade(&local.version, &remote.version) {
                    println!(
                        "{} upgrade available: {} -> {}",
                        "==>".bold().blue(),
                        local.version.yellow(),
                        remote.version.green()
                    );
                } else {
                    println!("{} {} is up to date", "✔".green(), self.name);
                }
            }
            None => println!("  {:<10} {}", "installed", "no".dimmed()),
        }
        Ok(())
    }
}
