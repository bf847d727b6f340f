//! Media file fetching with skip logic.

use std::path::{Path, PathBuf};

use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{header, Client};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::download::retry::RetryPolicy;
use crate::error::{Error, Result};
use crate::media::DownloadTarget;

/// Minimum file size to show progress bar (20 MB).
const PROGRESS_THRESHOLD: u64 = 20 * 1024 * 1024;

/// Outcome of fetching one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    /// Destination already complete; no bytes transferred.
    Skipped,

    /// File written (or overwritten) from the remote.
    Downloaded,
}

/// Downloads targets into a flat directory.
///
/// Owns the long-lived HTTP client so the connection pool and the retry
/// budget are shared by every fetch across the whole run.
pub struct Fetcher {
    http: Client,
    download_dir: PathBuf,
    retry: RetryPolicy,
}

impl Fetcher {
    pub fn new(http: Client, download_dir: PathBuf) -> Self {
        Self {
            http,
            download_dir,
            retry: RetryPolicy::default(),
        }
    }

    /// Replace the retry policy (shorter delays in tests).
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Fetch one target, skipping work already on disk.
    ///
    /// An existing destination is skipped outright unless the target asks
    /// for size verification, in which case the remote content length must
    /// match the local byte size exactly; any mismatch or unreadable length
    /// triggers a re-download that overwrites the file.
    pub async fn fetch(&self, target: &DownloadTarget) -> Result<FetchStatus> {
        let path = self.download_dir.join(&target.filename);
        tracing::trace!(file = %target.filename, "checking file");

        if let Ok(metadata) = tokio::fs::metadata(&path).await {
            if !target.verify_size {
                tracing::trace!(file = %target.filename, "skipped: already exists");
                return Ok(FetchStatus::Skipped);
            }

            let local_size = metadata.len();
            match self.remote_length(&target.source_url).await? {
                Some(remote_size) if remote_size > 0 && remote_size == local_size => {
                    tracing::trace!(file = %target.filename, "skipped: size matches");
                    return Ok(FetchStatus::Skipped);
                }
                remote_size => {
                    tracing::info!(
                        file = %target.filename,
                        local_size,
                        ?remote_size,
                        "re-downloading: size mismatch"
                    );
                }
            }
        }

        self.download(&target.source_url, &path).await?;
        tracing::trace!(file = %target.filename, "downloaded");
        Ok(FetchStatus::Downloaded)
    }

    /// Probe the remote content length with a HEAD request.
    ///
    /// A transport failure or error status is an error (the caller must not
    /// silently skip); a missing or malformed header is `None`.
    async fn remote_length(&self, url: &str) -> Result<Option<u64>> {
        let response = self.retry.execute(self.http.head(url)).await?;

        if !response.status().is_success() {
            return Err(Error::Download(format!(
                "size probe for {} failed: HTTP {}",
                url,
                response.status()
            )));
        }

        Ok(response
            .headers()
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok()))
    }

    /// Stream a URL to disk in chunks.
    async fn download(&self, url: &str, path: &Path) -> Result<()> {
        let response = self.retry.execute(self.http.get(url)).await?;

        if !response.status().is_success() {
            return Err(Error::Download(format!(
                "{} returned HTTP {}",
                url,
                response.status()
            )));
        }

        let content_length = response
            .headers()
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        let progress = content_length
            .filter(|&length| length > PROGRESS_THRESHOLD)
            .map(|length| {
                let bar = ProgressBar::new(length);
                bar.set_style(
                    ProgressStyle::default_bar()
                        .template("{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                        .unwrap()
                        .progress_chars("#>-"),
                );
                bar
            });

        if let Err(e) = stream_to_file(response, path, progress.as_ref()).await {
            // Leave no partial file behind; the next run retries from scratch.
            let _ = tokio::fs::remove_file(path).await;
            if let Some(bar) = progress {
                bar.finish_and_clear();
            }
            return Err(e);
        }

        if let Some(bar) = progress {
            bar.finish_and_clear();
        }
        Ok(())
    }
}

/// Stream the response body into a freshly created file, flushing before the
/// handle is dropped.
async fn stream_to_file(
    response: reqwest::Response,
    path: &Path,
    progress: Option<&ProgressBar>,
) -> Result<()> {
    let mut file = File::create(path).await?;
    let mut stream = response.bytes_stream();
    let mut written: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| Error::Download(format!("stream error: {}", e)))?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;

        if let Some(bar) = progress {
            bar.set_position(written);
        }
    }

    file.flush().await?;
    Ok(())
}
