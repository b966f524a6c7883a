//! HTTP fetch helpers for articles and images.
//!
//! All network I/O is blocking and sequential; each call carries its own
//! timeout and failures are reported through the shared error type.

use std::path::Path;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use url::Url;
use wikideck_core::{Error, Result};

/// Browser-like user agent; Wikipedia serves reduced markup to unknown bots.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0";

/// Timeout for the article fetch.
const ARTICLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for each image download.
const IMAGE_TIMEOUT: Duration = Duration::from_secs(12);

/// Build the shared blocking HTTP client.
pub fn build_client() -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));

    Client::builder()
        .default_headers(headers)
        .timeout(ARTICLE_TIMEOUT)
        .build()
        .map_err(|e| Error::FetchFailure {
            url: String::new(),
            reason: format!("failed to build http client: {}", e),
        })
}

/// Fetch the raw article markup. A failure here is fatal to the run.
pub fn fetch_article(client: &Client, url: &Url) -> Result<String> {
    let resp = client
        .get(url.clone())
        .send()
        .map_err(|e| Error::FetchFailure {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    if !resp.status().is_success() {
        return Err(Error::FetchFailure {
            url: url.to_string(),
            reason: format!("http status {}", resp.status()),
        });
    }

    resp.text().map_err(|e| Error::FetchFailure {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

/// Downloads section images and probes their intrinsic dimensions.
///
/// A trait so segmentation can run against a stub in tests; the pipeline
/// uses [`HttpImageFetcher`].
pub trait ImageFetcher {
    /// Download `url` to `dest` and return `(width_px, height_px)`.
    fn download(&self, url: &Url, dest: &Path) -> Result<(u32, u32)>;
}

/// Blocking HTTP downloader with a per-request timeout.
pub struct HttpImageFetcher {
    client: Client,
}

impl HttpImageFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl ImageFetcher for HttpImageFetcher {
    fn download(&self, url: &Url, dest: &Path) -> Result<(u32, u32)> {
        let resp = self
            .client
            .get(url.clone())
            .timeout(IMAGE_TIMEOUT)
            .send()
            .map_err(|e| Error::FetchFailure {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        if !resp.status().is_success() {
            return Err(Error::FetchFailure {
                url: url.to_string(),
                reason: format!("http status {}", resp.status()),
            });
        }

        let bytes = resp.bytes().map_err(|e| Error::FetchFailure {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        std::fs::write(dest, &bytes)?;

        // Vector formats (SVG) and truncated files cannot be probed; the
        // caller treats this like a failed download and skips the image.
        let (w, h) = image::image_dimensions(dest).map_err(|e| Error::FetchFailure {
            url: url.to_string(),
            reason: format!("unreadable image dimensions: {}", e),
        })?;

        Ok((w, h))
    }
}
