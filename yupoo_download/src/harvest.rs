use futures::stream::StreamExt;

use std::path::{Path, PathBuf};

use yupoo_client::YupooClient;
use yupoo_util::is_http_url;

use crate::error::Result;
use crate::manifest::{album_manifest_path, AlbumManifest};
use crate::{DownloadTask, NamingScheme, TITLE_MARKER_FILE};

#[derive(Debug, Clone, Copy)]
pub struct DownloadOptions {
    pub max_workers: usize,
    pub naming: NamingScheme,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutcome {
    Saved(PathBuf),
    /// The target file already existed
    Skipped(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDownloadFailure {
    pub url: String,
    pub error: String,
}

#[derive(Debug, Clone, Default)]
pub struct AlbumDownloadReport {
    pub total: usize,
    pub saved: usize,
    pub skipped: usize,
    pub failures: Vec<ImageDownloadFailure>,
}

/// Download every image listed in the manifest of album `index` into `page_dir/title`.
///
/// Failed images are logged and reported, they never fail the batch.
/// Only reading the manifest and creating the folder can fail.
pub async fn download_album(
    client: &YupooClient,
    page_dir: &Path,
    index: usize,
    title: &str,
    options: DownloadOptions,
) -> Result<AlbumDownloadReport> {
    // 1. Read the manifest, dropping rows that are not image URLs
    let manifest = AlbumManifest::read(album_manifest_path(page_dir, index))?;
    let folder = page_dir.join(title);
    let tasks = manifest
        .urls
        .into_iter()
        .filter(|url| is_http_url(url))
        .enumerate()
        .map(|(i, url)| DownloadTask {
            url,
            folder: folder.clone(),
            title: title.to_string(),
            position: i + 1,
        })
        .collect::<Vec<_>>();

    // 2. Create the album folder
    tokio::fs::create_dir_all(&folder).await?;

    let mut report = AlbumDownloadReport {
        total: tasks.len(),
        ..Default::default()
    };
    if tasks.is_empty() {
        tracing::info!("Album {} has no images to download", index);
        return Ok(report);
    }

    // 3. Download images with at most `max_workers` in flight
    tracing::info!("Album {} download started. Downloading {} images", index, tasks.len());
    let naming = options.naming;
    let futures = tasks.iter().map(move |task| async move {
        let result = download_image(client, task, naming).await;
        if let Err(e) = &result {
            tracing::error!("Failed to download image {}: {}", task.url, e);
        }
        (task, result)
    });
    let results = futures::stream::iter(futures)
        .buffer_unordered(options.max_workers.max(1))
        .collect::<Vec<_>>()
        .await;

    // 4. Collect outcomes
    for (task, result) in results {
        match result {
            Ok(ImageOutcome::Saved(path)) => {
                tracing::debug!("Downloaded image: {}", path.display());
                report.saved += 1;
            }
            Ok(ImageOutcome::Skipped(path)) => {
                tracing::debug!("Skipped existing image: {}", path.display());
                report.skipped += 1;
            }
            Err(e) => report.failures.push(ImageDownloadFailure {
                url: task.url.clone(),
                error: e.to_string(),
            }),
        }
    }

    if report.failures.is_empty() {
        tracing::info!(
            "Album {} download done. Saved {} images, skipped {} existing",
            index,
            report.saved,
            report.skipped
        );
    } else {
        tracing::warn!(
            "Album {} download done. Saved {} images, skipped {} existing, failed to download {} images",
            index,
            report.saved,
            report.skipped,
            report.failures.len()
        );
    }
    Ok(report)
}

/// Download one image, return where it is on disk.
pub async fn download_image(client: &YupooClient, task: &DownloadTask, naming: NamingScheme) -> Result<ImageOutcome> {
    match naming {
        NamingScheme::Positional => {
            // 1. An earlier run already saved this image
            let dest = task.folder.join(task.filename(task.position));
            if tokio::fs::try_exists(&dest).await? {
                return Ok(ImageOutcome::Skipped(dest));
            }

            // 2. Fetch and save
            let bytes = client.image(&task.url).await?;
            save_image(task, &dest, &bytes).await?;
            Ok(ImageOutcome::Saved(dest))
        }
        NamingScheme::DirectoryCount => {
            // 1. Fetch first, the name depends on the folder at save time
            let bytes = client.image(&task.url).await?;

            // 2. Not synchronized with sibling workers
            let n = count_entries(&task.folder).await? + 1;
            let dest = task.folder.join(task.filename(n));
            if tokio::fs::try_exists(&dest).await? {
                return Ok(ImageOutcome::Skipped(dest));
            }
            save_image(task, &dest, &bytes).await?;
            Ok(ImageOutcome::Saved(dest))
        }
    }
}

async fn save_image(task: &DownloadTask, dest: &Path, bytes: &[u8]) -> Result<()> {
    tokio::fs::write(dest, bytes).await?;
    tokio::fs::write(task.folder.join(TITLE_MARKER_FILE), &task.title).await?;
    Ok(())
}

async fn count_entries(dir: &Path) -> Result<usize> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut count = 0;
    while entries.next_entry().await?.is_some() {
        count += 1;
    }
    Ok(count)
}
