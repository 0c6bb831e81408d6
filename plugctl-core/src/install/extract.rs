// Path: plugctl-core/src/install/extract.rs
use std::collections::HashSet;
use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};

use plugctl_common::error::{PlugError, Result};
use tracing::{debug, error};
use zip::read::ZipArchive;

/// Returns the single top-level directory shared by every entry, if there is one.
///
/// Repository archives usually wrap the plugin in a folder named after the build
/// (`grafana-clock-panel-4f1c2a9/`), which has to be stripped on extraction.
pub(crate) fn infer_zip_root<R: io::Read + io::Seek>(
    archive: &mut ZipArchive<R>,
) -> Result<Option<PathBuf>> {
    let mut roots = HashSet::new();
    let mut has_nested_entry = false;

    for i in 0..archive.len() {
        let entry = archive
            .by_index(i)
            .map_err(|e| PlugError::InstallError(format!("Failed to read ZIP entry: {e}")))?;
        let Some(path) = entry.enclosed_name() else {
            continue;
        };
        let mut components = path.components();
        if let Some(first) = components.next() {
            roots.insert(first.as_os_str().to_os_string());
            if components.next().is_some() || entry.is_dir() {
                has_nested_entry = true;
            }
        }
        if roots.len() > 1 {
            return Ok(None);
        }
    }

    if has_nested_entry && roots.len() == 1 {
        Ok(roots.into_iter().next().map(PathBuf::from))
    } else {
        Ok(None)
    }
}

/// Joins `relative` onto `target_dir` after dropping `strip` leading components, refusing
/// anything that is not a plain relative path.
fn safe_target_path(target_dir: &Path, relative: &Path, strip: usize) -> Result<Option<PathBuf>> {
    let mut out = target_dir.to_path_buf();
    let mut pushed = false;
    for comp in relative.components().skip(strip) {
        match comp {
            Component::Normal(p) => {
                out.push(p);
                pushed = true;
            }
            Component::CurDir => {}
            other => {
                return Err(PlugError::InstallError(format!(
                    "Unsafe path component {:?} in archive entry {}",
                    other,
                    relative.display()
                )));
            }
        }
    }
    Ok(pushed.then_some(out))
}

/// Extracts a plugin ZIP archive into `target_dir`, stripping a common root folder.
pub fn extract_plugin_zip(archive_path: &Path, target_dir: &Path) -> Result<()> {
    debug!(
        "Extracting plugin archive {} into {}",
        archive_path.display(),
        target_dir.display()
    );
    let file = File::open(archive_path).map_err(|e| {
        PlugError::InstallError(format!(
            "Failed to open archive {}: {e}",
            archive_path.display()
        ))
    })?;
    let mut archive = ZipArchive::new(file).map_err(|e| {
        PlugError::InstallError(format!(
            "Failed to open ZIP {}: {e}",
            archive_path.display()
        ))
    })?;

    let strip = usize::from(infer_zip_root(&mut archive)?.is_some());
    fs::create_dir_all(target_dir)?;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| PlugError::InstallError(format!("Failed to access ZIP entry: {e}")))?;
        let relative = entry.enclosed_name().ok_or_else(|| {
            error!("Rejecting unsafe ZIP entry path '{}'", entry.name());
            PlugError::InstallError(format!("Unsafe ZIP entry path '{}'", entry.name()))
        })?;
        let Some(out_path) = safe_target_path(target_dir, &relative, strip)? else {
            continue;
        };

        if entry.is_dir() {
            fs::create_dir_all(&out_path)?;
            continue;
        }
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out_file = File::create(&out_path).map_err(|e| {
            PlugError::InstallError(format!("Failed to create {}: {e}", out_path.display()))
        })?;
        io::copy(&mut entry, &mut out_file).map_err(|e| {
            PlugError::InstallError(format!("Failed to write {}: {e}", out_path.display()))
        })?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode().filter(|m| m & 0o777 != 0) {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&out_path, fs::Permissions::from_mode(mode & 0o777))?;
        }
    }
    debug!("Extraction of {} complete", archive_path.display());
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::Write;

    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    use super::*;

    pub(crate) fn write_zip(path: &Path, entries: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let mut zip = ZipWriter::new(file);
        for (name, body) in entries {
            if name.ends_with('/') {
                zip.add_directory(*name, SimpleFileOptions::default()).unwrap();
            } else {
                zip.start_file(*name, SimpleFileOptions::default()).unwrap();
                zip.write_all(body.as_bytes()).unwrap();
            }
        }
        zip.finish().unwrap();
    }

    #[test]
    fn strips_single_build_folder() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("clock.zip");
        write_zip(
            &archive,
            &[
                ("clock-4f1c2a9/", ""),
                ("clock-4f1c2a9/plugin.json", r#"{"info":{"version":"1.2.0"}}"#),
                ("clock-4f1c2a9/img/logo.svg", "<svg/>"),
            ],
        );
        let target = tmp.path().join("out");
        extract_plugin_zip(&archive, &target).unwrap();
        assert!(target.join("plugin.json").is_file());
        assert!(target.join("img/logo.svg").is_file());
        assert!(!target.join("clock-4f1c2a9").exists());
    }

    #[test]
    fn flat_archive_is_kept_as_is() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("flat.zip");
        write_zip(
            &archive,
            &[("plugin.json", "{}"), ("module.js", "export {}")],
        );
        let target = tmp.path().join("out");
        extract_plugin_zip(&archive, &target).unwrap();
        assert!(target.join("plugin.json").is_file());
        assert!(target.join("module.js").is_file());
    }

    #[test]
    fn parent_components_are_refused() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("out");
        let err = safe_target_path(&target, Path::new("../evil"), 0).unwrap_err();
        assert!(matches!(err, PlugError::InstallError(_)));
        assert_eq!(
            safe_target_path(&target, Path::new("root/a.txt"), 1).unwrap(),
            Some(target.join("a.txt"))
        );
        assert_eq!(safe_target_path(&target, Path::new("root"), 1).unwrap(), None);
    }
}
