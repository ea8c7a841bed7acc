mod consts;
mod error;
mod parsing;
mod result;
mod selectors;

use reqwest::{header, Client};
use scraper::Html;

use std::time::Duration;

pub use crate::consts::REFERER;
pub use crate::error::Error;
use crate::error::Result;
pub use crate::parsing::*;
pub use crate::result::*;

/// HTTP client for gallery pages and images.
/// Every request carries the gallery referer and fails after `timeout`. No retry happens here.
#[derive(Debug, Clone)]
pub struct YupooClient {
    client: reqwest::Client,
}

impl YupooClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::REFERER, header::HeaderValue::from_static(REFERER));

        let client = Client::builder().default_headers(headers).timeout(timeout).build()?;

        Ok(YupooClient { client })
    }

    /// Album anchors of a listing page, in page order.
    pub async fn listing(&self, url: &str) -> Result<Vec<AlbumEntry>> {
        let html = self.fetch_text(url).await?;
        parse_listing(&Html::parse_document(&html))
    }

    /// Absolute image URLs of an album page.
    pub async fn album(&self, url: &str) -> Result<Vec<String>> {
        let html = self.fetch_text(url).await?;
        parse_album_images(&Html::parse_document(&html))
    }

    /// Raw bytes of one image.
    pub async fn image(&self, url: &str) -> Result<Vec<u8>> {
        let mut response = self.fetch(url).await?;
        let content_length = response.content_length();

        let mut buffer = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            buffer.extend_from_slice(&chunk);
        }

        if content_length.is_some_and(|len| len != buffer.len() as u64) || buffer.is_empty() {
            return Err(Error::IncompleteDownload(url.to_string()));
        }
        Ok(buffer)
    }
}

impl YupooClient {
    async fn fetch(&self, url: &str) -> Result<reqwest::Response> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response)
    }

    async fn fetch_text(&self, url: &str) -> Result<String> {
        let html = self.fetch(url).await?.text().await?;
        tracing::debug!("Fetched {} ({} bytes)", url, html.len());
        Ok(html)
    }
}
