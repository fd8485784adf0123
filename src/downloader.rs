//! Streaming HTTP download with throttled progress reporting.

use std::path::Path;
use std::time::Duration;

use futures_util::TryStreamExt;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_util::io::StreamReader;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{Error, Result, require_non_blank};

/// Size of a single body read.
pub const CHUNK_SIZE: usize = 8 * 1024;

/// Progress is reported after this many reads, and once more at end of stream.
pub const PROGRESS_EVERY: u64 = 10;

/// Progress of a single download.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadProgress {
    /// From `Content-Length`; unknown for chunked responses.
    pub total_size: Option<u64>,
    pub bytes_read: u64,
}

impl DownloadProgress {
    /// Percentage rounded to two decimals, when the total size is known.
    pub fn percentage(&self) -> Option<f64> {
        match self.total_size {
            Some(total) if total > 0 => {
                let percent = self.bytes_read as f64 / total as f64 * 100.0;
                Some((percent * 100.0).round() / 100.0)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Downloader {
    client: reqwest::Client,
}

impl Downloader {
    pub fn new(connect_timeout: Duration, read_timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("epguide-rename/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(connect_timeout)
            .read_timeout(read_timeout)
            .build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Fetch `url` into `destination`, overwriting it.
    ///
    /// On any failure, including a non-success status or cancellation, no file is left
    /// at `destination`. Nothing is retried.
    pub async fn download<F>(
        &self,
        url: &str,
        destination: &Path,
        cancel: &CancellationToken,
        mut on_progress: F,
    ) -> Result<DownloadProgress>
    where
        F: FnMut(DownloadProgress),
    {
        require_non_blank(url, "download URL")?;
        info!("Downloading {} -> {:?}", url, destination);

        let response = tokio::select! {
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            response = self.client.get(url).send() => response,
        };
        let response = match response {
            Ok(response) => response,
            Err(e) => {
                discard(destination).await;
                return Err(e.into());
            }
        };

        let status = response.status();
        if !status.is_success() {
            discard(destination).await;
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status,
            });
        }

        let total_size = response.content_length();
        debug!("Response size: {:?}", total_size);

        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let file = File::create(destination).await?;
        match stream_body(response, file, total_size, cancel, &mut on_progress).await {
            Ok(progress) => {
                info!("Downloaded {} bytes to {:?}", progress.bytes_read, destination);
                Ok(progress)
            }
            Err(e) => {
                warn!("Download of {} failed: {}", url, e);
                discard(destination).await;
                Err(e)
            }
        }
    }
}

async fn stream_body<F>(
    response: reqwest::Response,
    mut file: File,
    total_size: Option<u64>,
    cancel: &CancellationToken,
    on_progress: &mut F,
) -> Result<DownloadProgress>
where
    F: FnMut(DownloadProgress),
{
    let body = response.bytes_stream().map_err(std::io::Error::other);
    let mut reader = Box::pin(StreamReader::new(body));
    let mut buffer = vec![0u8; CHUNK_SIZE];
    let mut progress = DownloadProgress {
        total_size,
        bytes_read: 0,
    };
    let mut reads: u64 = 0;

    loop {
        let read = tokio::select! {
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            read = reader.read(&mut buffer) => read?,
        };
        if read == 0 {
            break;
        }

        file.write_all(&buffer[..read]).await?;
        progress.bytes_read += read as u64;
        reads += 1;

        if reads % PROGRESS_EVERY == 0 {
            on_progress(progress);
        }
    }

    file.flush().await?;
    on_progress(progress);
    Ok(progress)
}

async fn discard(destination: &Path) {
    if let Err(e) = tokio::fs::remove_file(destination).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!("Could not remove {:?}: {}", destination, e);
        }
    }
}
