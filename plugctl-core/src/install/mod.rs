// plugctl-core/src/install/mod.rs
pub mod extract;

use std::fs;
use std::path::{Path, PathBuf};

use plugctl_common::error::{PlugError, Result};
use plugctl_common::model::InstalledPluginInfo;
use plugctl_net::api::select_version;
use plugctl_net::{download_to_path, CatalogClient};
use tracing::{debug, error, info};

use crate::installed::{manifest_candidates, validate_plugin_name};

/// Downloads `plugin_name` from the repository and unpacks it under `plugins_dir`.
///
/// An empty `version` installs the newest version built for this platform. The archive is
/// downloaded and unpacked inside a hidden staging directory in `plugins_dir`, then renamed
/// into place, so a failed install never leaves a half-written plugin directory behind.
pub async fn install_plugin(
    client: &CatalogClient,
    plugins_dir: &Path,
    plugin_name: &str,
    version: &str,
) -> Result<InstalledPluginInfo> {
    validate_plugin_name(plugin_name)?;
    let target = plugins_dir.join(plugin_name);
    if target.symlink_metadata().is_ok() {
        return Err(PlugError::InstallError(format!(
            "Plugin '{plugin_name}' is already installed at {}",
            target.display()
        )));
    }

    let plugin = client.fetch_plugin(plugin_name).await?;
    let selected = select_version(&plugin, version, client.platform())?;
    let url = client.download_url(plugin_name, selected);
    info!("Installing {} @ {}", plugin_name, selected.version);
    debug!("from: {}", url);
    debug!("into: {}", plugins_dir.display());

    fs::create_dir_all(plugins_dir).map_err(|e| {
        PlugError::InstallError(format!(
            "Failed to create plugins directory {}: {e}",
            plugins_dir.display()
        ))
    })?;
    let staging = tempfile::Builder::new()
        .prefix(".plugctl-")
        .tempdir_in(plugins_dir)
        .map_err(|e| {
            PlugError::InstallError(format!(
                "Failed to create staging directory in {}: {e}",
                plugins_dir.display()
            ))
        })?;

    let archive_path = staging
        .path()
        .join(format!("{plugin_name}-{}.zip", selected.version));
    let expected_md5 = selected.md5_for(client.platform());
    download_to_path(
        client.http_client(),
        plugin_name,
        &url,
        expected_md5,
        &archive_path,
    )
    .await?;

    let unpack_dir = staging.path().join(plugin_name);
    unpack_blocking(archive_path, unpack_dir.clone()).await?;
    ensure_plugin_manifest(plugin_name, &unpack_dir)?;

    fs::rename(&unpack_dir, &target).map_err(|e| {
        error!(
            "Failed to move {} into {}: {}",
            unpack_dir.display(),
            target.display(),
            e
        );
        PlugError::InstallError(format!(
            "Failed to move plugin into {}: {e}",
            target.display()
        ))
    })?;
    debug!("Installed {} into {}", plugin_name, target.display());

    Ok(InstalledPluginInfo {
        name: plugin_name.to_string(),
        version: selected.version.clone(),
        path: target,
    })
}

/// An archive only counts as a plugin if it ships `plugin.json` at its root or under `dist/`.
fn ensure_plugin_manifest(plugin_name: &str, unpack_dir: &Path) -> Result<()> {
    if manifest_candidates(unpack_dir).iter().any(|p| p.is_file()) {
        return Ok(());
    }
    error!(
        "Archive for {} has no plugin.json in {}",
        plugin_name,
        unpack_dir.display()
    );
    Err(PlugError::InstallError(format!(
        "Archive for plugin '{plugin_name}' does not contain a plugin.json"
    )))
}

async fn unpack_blocking(archive_path: PathBuf, target_dir: PathBuf) -> Result<()> {
    tokio::task::spawn_blocking(move || extract::extract_plugin_zip(&archive_path, &target_dir))
        .await
        .map_err(|e| PlugError::Generic(format!("JoinError in ZIP extraction: {e}")))?
}
