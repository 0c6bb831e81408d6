// plugctl-net/src/validation.rs
use std::fs::File;
use std::io;
use std::path::Path;

use md5::{Digest, Md5};
use plugctl_common::error::{PlugError, Result};
use url::Url;

/// Validates a download URL, ensuring it uses an HTTP(S) scheme.
pub fn validate_url(url_str: &str) -> Result<()> {
    let url = Url::parse(url_str)
        .map_err(|e| PlugError::ValidationError(format!("Failed to parse URL '{url_str}': {e}")))?;
    match url.scheme() {
        "https" | "http" => Ok(()),
        scheme => Err(PlugError::ValidationError(format!(
            "Invalid URL scheme for '{url_str}': Must be http or https, but got '{scheme}'"
        ))),
    }
}

/// Hex-encoded MD5 digest of the file at `path`.
pub fn file_md5(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Md5::new();
    let bytes_copied = io::copy(&mut file, &mut hasher)?;
    let actual = hex::encode(hasher.finalize());
    tracing::debug!("Calculated MD5: {} ({} bytes read)", actual, bytes_copied);
    Ok(actual)
}

/// Compares the MD5 digest the repository publishes for an archive with the file on disk.
pub fn verify_md5(path: &Path, expected: &str) -> Result<()> {
    tracing::debug!("Verifying checksum for: {}", path.display());
    let actual = file_md5(path)?;
    tracing::debug!("Expected MD5:   {}", expected);
    if actual.eq_ignore_ascii_case(expected.trim()) {
        Ok(())
    } else {
        Err(PlugError::ChecksumError(format!(
            "Checksum mismatch for {}: expected {}, got {}",
            path.display(),
            expected,
            actual
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https() {
        assert!(validate_url("https://grafana.com/api/plugins/x/versions/1.0.0/download").is_ok());
        assert!(validate_url("http://localhost:3000/plugins").is_ok());
    }

    #[test]
    fn rejects_other_schemes_and_garbage() {
        assert!(matches!(
            validate_url("file:///etc/passwd"),
            Err(PlugError::ValidationError(_))
        ));
        assert!(validate_url("not a url").is_err());
    }

    #[test]
    fn md5_matches_known_digest() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("a.zip");
        std::fs::write(&path, b"hello").unwrap();
        assert_eq!(file_md5(&path).unwrap(), "5d41402abc4b2a76b9719d911017c592");
        verify_md5(&path, "5D41402ABC4B2A76B9719D911017C592").unwrap();
    }

    #[test]
    fn md5_mismatch_is_a_checksum_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("a.zip");
        std::fs::write(&path, b"hello").unwrap();
        assert!(matches!(
            verify_md5(&path, "00000000000000000000000000000000"),
            Err(PlugError::ChecksumError(_))
        ));
    }
}
