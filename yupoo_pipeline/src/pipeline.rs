use std::collections::HashSet;
use std::path::Path;

use yupoo_client::YupooClient;
use yupoo_download::{download_album, page_dir, AlbumDownloadReport};
use yupoo_util::{normalize_page_delimiter, parse_page_number, sanitize_title};

use crate::config::Config;
use crate::control::PipelineControl;
use crate::error::{Error, Result, Stage};
use crate::stage;

/// Reported after each album is done.
#[derive(Debug, Clone)]
pub struct AlbumProgress<'a> {
    /// Albums done so far, including this one
    pub completed: usize,
    pub total: usize,
    pub index: usize,
    pub title: &'a str,
    pub report: &'a AlbumDownloadReport,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub page: u32,
    pub total: usize,
    pub completed: usize,
    /// Stopped before every album was processed
    pub cancelled: bool,
    pub images_saved: usize,
    pub images_skipped: usize,
    pub images_failed: usize,
}

/// Runs listing, album extraction and image download for every album of a listing page,
/// one album at a time.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: Config,
    client: YupooClient,
}

impl Pipeline {
    pub fn new(config: Config) -> Result<Self> {
        let client = YupooClient::new(config.timeout())?;
        Ok(Pipeline { config, client })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn run<F>(
        &self,
        listing_url: &str,
        download_root: impl AsRef<Path>,
        control: &PipelineControl,
        mut on_progress: F,
    ) -> Result<RunSummary>
    where
        F: FnMut(&AlbumProgress<'_>),
    {
        // 1. Validate input before any network activity
        let listing_url = if self.config.normalize_page_delimiter {
            normalize_page_delimiter(listing_url)
        } else {
            listing_url.to_string()
        };
        let page = parse_page_number(&listing_url).map_err(Error::InvalidUrl)?;
        let root = download_root.as_ref();
        if !root.is_dir() {
            return Err(Error::InvalidFolder(root.display().to_string()));
        }
        let page_dir = page_dir(root, page);

        // 2. List albums, the only retried stage
        let titles = stage::extract_listing(&self.client, &listing_url, &page_dir, &self.config.retry_policy())
            .await
            .map_err(|source| Error::Listing { source })?;
        let total = titles.len();
        let mut summary = RunSummary {
            page,
            total,
            ..Default::default()
        };

        // 3. Extract and download albums in listing order
        let mut folders = AlbumFolders::default();
        for (index, title) in titles.iter().enumerate() {
            if !control.checkpoint().await {
                tracing::info!("Download stopped before album {}/{}", index + 1, total);
                summary.cancelled = true;
                break;
            }

            tracing::info!("Processing album {}/{}: {}", index + 1, total, title);
            stage::extract_album(&self.client, &listing_url, &page_dir, index)
                .await
                .map_err(|source| Error::Album {
                    index,
                    stage: Stage::AlbumExtraction,
                    source,
                })?;

            let folder = folders.assign(title, index);
            let report = download_album(&self.client, &page_dir, index, &folder, self.config.download_options())
                .await
                .map_err(|e| Error::Album {
                    index,
                    stage: Stage::ImageDownload,
                    source: e.into(),
                })?;

            summary.completed += 1;
            summary.images_saved += report.saved;
            summary.images_skipped += report.skipped;
            summary.images_failed += report.failures.len();
            on_progress(&AlbumProgress {
                completed: summary.completed,
                total,
                index,
                title,
                report: &report,
            });
        }

        tracing::info!(
            "Page {} done. {}/{} albums, {} images saved, {} skipped, {} failed",
            page,
            summary.completed,
            total,
            summary.images_saved,
            summary.images_skipped,
            summary.images_failed
        );
        Ok(summary)
    }
}

/// Sanitized title, or a name derived from the index when it is not a usable folder name.
fn album_folder_name(title: &str, index: usize) -> String {
    let name = sanitize_title(title);
    match name.as_str() {
        "" | "." | ".." => format!("album_{}", index),
        _ => name,
    }
}

/// Folder names handed out in one run. Albums whose titles end up with the same folder name
/// get a numeric suffix, so every album index has its own folder.
/// Names are compared case-insensitively.
#[derive(Debug, Default)]
struct AlbumFolders {
    used: HashSet<String>,
}

impl AlbumFolders {
    fn assign(&mut self, title: &str, index: usize) -> String {
        let base = album_folder_name(title, index);
        let mut name = base.clone();
        let mut n = 1;
        while !self.used.insert(name.to_lowercase()) {
            n += 1;
            name = format!("{}_{}", base, n);
        }
        name
    }
}
