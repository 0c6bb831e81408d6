use std::fs;
use std::path::Path;
use std::time::Duration;

use futures::StreamExt;
use plugctl_common::error::{PlugError, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, StatusCode};
use tokio::fs::File as TokioFile;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error};

use crate::validation::{validate_url, verify_md5};

const DOWNLOAD_TIMEOUT_SECS: u64 = 300;
const CONNECT_TIMEOUT_SECS: u64 = 30;
const USER_AGENT_STRING: &str = concat!("plugctl/", env!("CARGO_PKG_VERSION"), " (Rust)");

pub fn build_http_client() -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_STRING));
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    Client::builder()
        .timeout(Duration::from_secs(DOWNLOAD_TIMEOUT_SECS))
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .default_headers(headers)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| PlugError::HttpError(format!("Failed to build HTTP client: {e}")))
}

/// Streams `url` into `final_path`, going through a hidden `.download` sibling so a partial
/// or corrupt transfer never shows up under the final name.
///
/// When `expected_md5` is given the downloaded bytes must hash to it, otherwise the temporary
/// file is discarded and a `DownloadError` is returned.
pub async fn download_to_path(
    client: &Client,
    name: &str,
    url: &str,
    expected_md5: Option<&str>,
    final_path: &Path,
) -> Result<()> {
    validate_url(url)?;

    let temp_filename = format!(
        ".{}.download",
        final_path.file_name().unwrap_or_default().to_string_lossy()
    );
    let temp_path = final_path.with_file_name(temp_filename);
    debug!("Downloading {} to temporary path: {}", url, temp_path.display());
    if temp_path.exists() {
        if let Err(e) = fs::remove_file(&temp_path) {
            tracing::warn!(
                "Could not remove existing temporary file {}: {}",
                temp_path.display(),
                e
            );
        }
    }

    let response = client.get(url).send().await.map_err(|e| {
        debug!("HTTP request failed for {url}: {e}");
        PlugError::HttpError(format!("HTTP request failed for {url}: {e}"))
    })?;
    let status = response.status();
    debug!("Received HTTP status: {} for {}", status, url);

    if !status.is_success() {
        let body_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read response body".to_string());
        error!("HTTP error {} for URL {}: {}", status, url, body_text);
        return match status {
            StatusCode::NOT_FOUND => Err(PlugError::DownloadError(
                name.to_string(),
                url.to_string(),
                "Resource not found (404)".to_string(),
            )),
            StatusCode::FORBIDDEN => Err(PlugError::DownloadError(
                name.to_string(),
                url.to_string(),
                "Access forbidden (403)".to_string(),
            )),
            _ => Err(PlugError::HttpError(format!(
                "HTTP error {status} for URL {url}: {body_text}"
            ))),
        };
    }

    let mut temp_file = TokioFile::create(&temp_path).await.map_err(|e| {
        PlugError::DownloadError(
            name.to_string(),
            url.to_string(),
            format!("Failed to create temp file {}: {e}", temp_path.display()),
        )
    })?;

    let mut stream = response.bytes_stream();
    let mut written: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| {
            PlugError::DownloadError(
                name.to_string(),
                url.to_string(),
                format!("Failed to read response body: {e}"),
            )
        })?;
        temp_file.write_all(&chunk).await.map_err(|e| {
            PlugError::DownloadError(
                name.to_string(),
                url.to_string(),
                format!("Failed to write to {}: {e}", temp_path.display()),
            )
        })?;
        written += chunk.len() as u64;
    }
    temp_file.flush().await?;
    drop(temp_file);
    debug!("Wrote {} bytes to {}", written, temp_path.display());

    match expected_md5.filter(|d| !d.trim().is_empty()) {
        Some(expected) => {
            if let Err(e) = verify_md5(&temp_path, expected) {
                error!("Checksum verification failed for {}: {}", name, e);
                let _ = fs::remove_file(&temp_path);
                return Err(PlugError::DownloadError(
                    name.to_string(),
                    url.to_string(),
                    e.to_string(),
                ));
            }
            debug!("Checksum verified for {}", name);
        }
        None => debug!("No checksum published for {}, skipping verification", name),
    }

    fs::rename(&temp_path, final_path).map_err(|e| {
        PlugError::DownloadError(
            name.to_string(),
            url.to_string(),
            format!(
                "Failed to move temp file {} to {}: {e}",
                temp_path.display(),
                final_path.display()
            ),
        )
    })?;
    debug!("Moved download to final location: {}", final_path.display());
    Ok(())
}
