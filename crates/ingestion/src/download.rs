//! Dataset downloader - single GET, streamed to disk

use std::path::Path;
use std::time::Duration;

use metrics::counter;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument, warn};

use crate::error::{IngestionError, Result};
use crate::location::partial_path;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP dataset downloader
///
/// The body is written to `<dest>.part` chunk by chunk and renamed to `dest`
/// only once complete, so a failed download never looks like a present file.
pub struct Downloader {
    client: reqwest::Client,
}

impl Downloader {
    /// Create a downloader with default timeouts
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| IngestionError::download("", e))?;
        Ok(Self { client })
    }

    /// Create a downloader around an existing client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Download `url` into `dest`, creating parent directories
    ///
    /// Returns the number of bytes written.
    #[instrument(name = "dataset_download", skip(self, dest), fields(dest = %dest.display()))]
    pub async fn download(&self, url: &str, dest: &Path) -> Result<u64> {
        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| IngestionError::io(parent, e))?;
        }

        let part = partial_path(dest);
        match self.fetch_to(url, &part).await {
            Ok(bytes) => {
                tokio::fs::rename(&part, dest)
                    .await
                    .map_err(|e| IngestionError::io(dest, e))?;
                counter!("csv_relay_download_bytes_total").increment(bytes);
                info!(url, bytes, "Dataset downloaded");
                Ok(bytes)
            }
            Err(e) => {
                if let Err(cleanup) = tokio::fs::remove_file(&part).await {
                    debug!(error = %cleanup, "No partial download to clean up");
                }
                counter!("csv_relay_download_failures_total").increment(1);
                warn!(url, error = %e, "Dataset download failed");
                Err(e)
            }
        }
    }

    async fn fetch_to(&self, url: &str, part: &Path) -> Result<u64> {
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| IngestionError::download(url, e))?;

        let mut file = tokio::fs::File::create(part)
            .await
            .map_err(|e| IngestionError::io(part, e))?;

        let mut written: u64 = 0;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| IngestionError::download(url, e))?
        {
            file.write_all(&chunk)
                .await
                .map_err(|e| IngestionError::io(part, e))?;
            written += chunk.len() as u64;
        }

        file.flush().await.map_err(|e| IngestionError::io(part, e))?;
        Ok(written)
    }
}

#[cfg(test)]
pub(crate) mod test_server {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response on a random local port
    pub async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });

        format!("http://{addr}/fire_incidents.csv")
    }
}
