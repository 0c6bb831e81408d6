// plugctl-core/src/uninstall.rs
use std::path::Path;
use std::{fs, io};

use plugctl_common::error::{PlugError, Result};
use tracing::{debug, error};

use crate::installed::validate_plugin_name;

/// Removes `<plugins_dir>/<plugin_name>`.
///
/// A symlinked plugin has only its link removed, never the link target.
pub fn remove_installed_plugin(plugins_dir: &Path, plugin_name: &str) -> Result<()> {
    validate_plugin_name(plugin_name)
        .map_err(|e| PlugError::Removal(format!("Refusing to remove '{plugin_name}': {e}")))?;
    let path = plugins_dir.join(plugin_name);

    let metadata = match path.symlink_metadata() {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(PlugError::Removal(format!(
                "Plugin '{plugin_name}' is not installed in {}",
                plugins_dir.display()
            )));
        }
        Err(e) => {
            return Err(PlugError::Removal(format!(
                "Failed to inspect {}: {e}",
                path.display()
            )));
        }
    };

    let is_real_dir = metadata.file_type().is_dir();
    debug!(
        "Removing plugin {} ({}) at {}",
        plugin_name,
        if is_real_dir { "directory" } else { "link or file" },
        path.display()
    );

    let result = if is_real_dir {
        fs::remove_dir_all(&path)
    } else {
        fs::remove_file(&path)
    };

    result.map_err(|e| {
        error!("Failed to remove {}: {}", path.display(), e);
        PlugError::Removal(format!("Failed to remove {}: {e}", path.display()))
    })?;
    debug!("Removed {}", path.display());
    Ok(())
}
