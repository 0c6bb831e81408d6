// plugctl-core/src/installed.rs
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use plugctl_common::error::{PlugError, Result};
use plugctl_common::model::{InstalledPluginInfo, PluginManifest};
use tracing::{debug, warn};

const MANIFEST_FILENAME: &str = "plugin.json";

/// Rejects names that would escape the plugins directory.
pub fn validate_plugin_name(name: &str) -> Result<()> {
    if name.is_empty()
        || name.contains('/')
        || name.contains('\\')
        || name.contains("..")
        || Path::new(name).is_absolute()
    {
        return Err(PlugError::ValidationError(format!(
            "Invalid plugin name '{name}' contains disallowed characters"
        )));
    }
    Ok(())
}

/// Candidate manifest locations, in lookup order.
pub(crate) fn manifest_candidates(plugin_dir: &Path) -> [PathBuf; 2] {
    [
        plugin_dir.join(MANIFEST_FILENAME),
        plugin_dir.join("dist").join(MANIFEST_FILENAME),
    ]
}

/// Reads the installed plugin `plugin_name` from `plugins_dir`.
///
/// The version comes from `info.version` in `plugin.json`, or `dist/plugin.json` for plugins
/// that ship their build output in a `dist` folder.
pub fn read_installed_plugin(plugins_dir: &Path, plugin_name: &str) -> Result<InstalledPluginInfo> {
    validate_plugin_name(plugin_name)?;
    let plugin_dir = plugins_dir.join(plugin_name);
    debug!("Reading installed plugin from {}", plugin_dir.display());

    if !plugin_dir.is_dir() {
        debug!("Plugin directory {} does not exist", plugin_dir.display());
        return Err(PlugError::NotInstalled(plugin_name.to_string()));
    }

    for manifest_path in manifest_candidates(&plugin_dir) {
        let contents = match fs::read_to_string(&manifest_path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => {
                warn!("Failed to read {}: {}", manifest_path.display(), e);
                return Err(PlugError::PluginMetadata(format!(
                    "Could not read {}: {e}",
                    manifest_path.display()
                )));
            }
        };

        let manifest: PluginManifest = serde_json::from_str(&contents).map_err(|e| {
            PlugError::PluginMetadata(format!(
                "Could not parse {}: {e}",
                manifest_path.display()
            ))
        })?;
        let version = manifest.version().ok_or_else(|| {
            PlugError::PluginMetadata(format!(
                "{} has no info.version",
                manifest_path.display()
            ))
        })?;

        debug!(
            "Found plugin {} version {} ({})",
            plugin_name,
            version,
            manifest_path.display()
        );
        return Ok(InstalledPluginInfo {
            name: plugin_name.to_string(),
            version: version.to_string(),
            path: plugin_dir,
        });
    }

    debug!(
        "No {} or dist/{} in {}",
        MANIFEST_FILENAME,
        MANIFEST_FILENAME,
        plugin_dir.display()
    );
    Err(PlugError::NotInstalled(plugin_name.to_string()))
}
