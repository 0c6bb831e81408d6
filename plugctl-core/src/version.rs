// plugctl-core/src/version.rs
use semver::Version;
use tracing::debug;

/// Parses a plugin version, tolerating a leading `v` and missing minor/patch parts
/// (`"v2"` reads as `2.0.0`, `"1.4"` as `1.4.0`).
pub fn parse_version(raw: &str) -> Option<Version> {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(v) = Version::parse(trimmed) {
        return Some(v);
    }

    // Pad the numeric core before any pre-release/build suffix.
    let split_at = trimmed.find(['-', '+']).unwrap_or(trimmed.len());
    let (core, suffix) = trimmed.split_at(split_at);
    let padded = match core.split('.').count() {
        1 => format!("{core}.0.0{suffix}"),
        2 => format!("{core}.0{suffix}"),
        _ => return None,
    };
    Version::parse(&padded).ok()
}

/// True only when `remote` is strictly newer than `local`. Either side failing to parse
/// means no upgrade.
pub fn should_upgrade(local: &str, remote: &str) -> bool {
    let Some(local_version) = parse_version(local) else {
        debug!("Installed version '{}' is not a valid version; not upgrading", local);
        return false;
    };
    let Some(remote_version) = parse_version(remote) else {
        debug!("Remote version '{}' is not a valid version; not upgrading", remote);
        return false;
    };
    local_version < remote_version
}
