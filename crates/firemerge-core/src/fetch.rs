//! Download of FIRMS CSV feeds into the configured directory

use crate::error::{FireError, Result};
use std::path::{Path, PathBuf};

/// Result of downloading a batch of feeds
#[derive(Debug, Default)]
pub struct DownloadSummary {
    /// Files written, in request order
    pub saved: Vec<PathBuf>,

    /// URLs that were skipped, with the reason
    pub skipped: Vec<(String, String)>,
}

impl DownloadSummary {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Fetches feed URLs and stores each body under the last path segment of
/// the final (post-redirect) URL.
pub struct FeedDownloader {
    client: reqwest::Client,
    output_directory: PathBuf,
}

impl FeedDownloader {
    pub fn new(output_directory: impl Into<PathBuf>) -> Self {
        Self {
            client: reqwest::Client::new(),
            output_directory: output_directory.into(),
        }
    }

    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    /// Download every URL in order.
    ///
    /// Failures never abort the batch: a bad status or transport error is
    /// logged as a warning, a failed write as an error, and the URL is
    /// recorded in [`DownloadSummary::skipped`].
    pub async fn download_all(&self, urls: &[String]) -> DownloadSummary {
        let mut summary = DownloadSummary::default();

        for url in urls {
            match self.download_one(url).await {
                Ok(path) => {
                    tracing::info!(url = %url, path = %path.display(), "Downloaded feed");
                    summary.saved.push(path);
                }
                Err(e @ FireError::Io(_)) => {
                    tracing::error!(
                        directory = %self.output_directory.display(),
                        "Could not write feed from {}: {}",
                        url,
                        e
                    );
                    summary.skipped.push((url.clone(), e.to_string()));
                }
                Err(e) => {
                    tracing::warn!("Skipping feed: {}", e);
                    summary.skipped.push((url.clone(), e.to_string()));
                }
            }
        }

        summary
    }

    async fn download_one(&self, url: &str) -> Result<PathBuf> {
        let response = self.client.get(url).send().await.map_err(|e| FireError::Http {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        if !response.status().is_success() {
            return Err(FireError::Http {
                url: url.to_string(),
                reason: format!("server returned {}", response.status()),
            });
        }

        let file_name = file_name_for_url(response.url()).ok_or_else(|| FireError::Http {
            url: url.to_string(),
            reason: "URL has no file name".to_string(),
        })?;

        let body = response.bytes().await.map_err(|e| FireError::Http {
            url: url.to_string(),
            reason: format!("failed to read body: {}", e),
        })?;

        let path = self.output_directory.join(file_name);
        tokio::fs::write(&path, &body).await?;
        Ok(path)
    }
}

/// Last non-empty path segment of a URL.
pub fn file_name_for_url(url: &reqwest::Url) -> Option<String> {
    url.path_segments()?.filter(|s| !s.is_empty()).last().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_name(url: &str) -> Option<String> {
        file_name_for_url(&reqwest::Url::parse(url).unwrap())
    }

    #[test]
    fn test_file_name_for_url() {
        assert_eq!(
            file_name("https://firms.modaps.eosdis.nasa.gov/data/active_fire/SUOMI_VIIRS_C2_Global_24h.csv"),
            Some("SUOMI_VIIRS_C2_Global_24h.csv".to_string())
        );
        assert_eq!(file_name("https://example.org/feeds/a.csv?key=abc#top"), Some("a.csv".to_string()));
        assert_eq!(file_name("https://example.org/feeds/"), Some("feeds".to_string()));
        assert_eq!(file_name("https://example.org"), None);
        assert_eq!(file_name("https://example.org/"), None);
        assert_eq!(file_name("data:text/csv,1,2"), None);
    }

    #[tokio::test]
    async fn test_unreachable_url_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let downloader = FeedDownloader::new(dir.path());

        // Port 1 on loopback refuses connections
        let urls = vec!["http://127.0.0.1:1/feed.csv".to_string()];
        let summary = downloader.download_all(&urls).await;

        assert!(summary.saved.is_empty());
        assert_eq!(summary.skipped.len(), 1);
        assert_eq!(summary.skipped[0].0, urls[0]);
        assert!(!summary.is_complete());
    }

    #[tokio::test]
    async fn test_empty_url_list() {
        let dir = tempfile::tempdir().unwrap();
        let summary = FeedDownloader::new(dir.path()).download_all(&[]).await;
        assert!(summary.is_complete());
        assert!(summary.saved.is_empty());
    }
}
