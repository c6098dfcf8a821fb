//! Fetching rendered chart images.

use reqwest::Client;

use crate::core::{Result, error::ChartErrorKind};

/// GET the chart URL and return the complete body.
pub async fn download_image(client: &Client, url: &str) -> Result<Vec<u8>> {
    let download_error = |reason: String| ChartErrorKind::DownloadError {
        url: url.to_string(),
        reason,
    };

    tracing::debug!("Downloading chart image from {url}");

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| download_error(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(download_error(format!("HTTP {status}")).into());
    }

    if let Some(content_type) = response.headers().get(reqwest::header::CONTENT_TYPE) {
        tracing::debug!("Chart content type: {:?}", content_type);
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| download_error(e.to_string()))?;

    Ok(bytes.to_vec())
}
