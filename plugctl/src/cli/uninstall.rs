use std::fmt;
use std::path::Path;

use clap::Args;
use colored::Colorize;
use plugctl_common::config::Config;
use plugctl_common::error::Result;
use plugctl_core::installed::validate_plugin_name;
use plugctl_core::{FsPluginStore, PluginRemover};
use tracing::{debug, warn};

/// Remove an installed plugin
#[derive(Args, Debug)]
pub struct Uninstall {
    /// The plugin to remove
    #[arg()]
    pub name: String,
}

impl Uninstall {
    pub async fn run(&self, config: &Config) -> Result<()> {
        validate_plugin_name(&self.name)?;
        let plugin_path = config.plugin_path(&self.name);
        let footprint = PluginFootprint::measure(&plugin_path);
        debug!(
            "Removing {} ({}) from {}",
            self.name,
            footprint,
            plugin_path.display()
        );

        FsPluginStore.remove(config.plugins_dir(), &self.name)?;
        println!("{} Removed {} ({})", "✔".green(), self.name.green(), footprint);
        Ok(())
    }
}

/// What removing a plugin frees on disk.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct PluginFootprint {
    /// The plugin directory is itself a link; only the link goes away.
    linked: bool,
    files: usize,
    links: usize,
    bytes: u64,
}

impl PluginFootprint {
    fn measure(plugin_path: &Path) -> Self {
        let mut footprint = Self::default();
        if plugin_path
            .symlink_metadata()
            .is_ok_and(|m| m.file_type().is_symlink())
        {
            footprint.linked = true;
            return footprint;
        }

        for entry in walkdir::WalkDir::new(plugin_path) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Error traversing {}: {}", plugin_path.display(), e);
                    continue;
                }
            };
            let file_type = entry.file_type();
            if file_type.is_symlink() {
                footprint.links += 1;
            } else if file_type.is_file() {
                match entry.metadata() {
                    Ok(metadata) => {
                        footprint.files += 1;
                        footprint.bytes += metadata.len();
                    }
                    Err(e) => warn!("Could not stat {}: {}", entry.path().display(), e),
                }
            }
        }
        footprint
    }
}

impl fmt::Display for PluginFootprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.linked {
            return write!(f, "symlink only");
        }
        write!(f, "{} files", self.files)?;
        if self.links > 0 {
            write!(f, ", {} links", self.links)?;
        }
        write!(f, ", {}", human_bytes(self.bytes))
    }
}

fn human_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{bytes}B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1}{}", UNITS[unit])
}
