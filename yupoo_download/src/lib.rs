mod error;
mod harvest;
mod manifest;

pub use error::Error;
pub use harvest::*;
pub use manifest::*;

use serde::Deserialize;

use std::path::PathBuf;

pub const TITLE_MARKER_FILE: &str = "title.txt";

/// How downloaded images of an album are numbered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingScheme {
    /// `n` is the 1-based position of the URL in the album manifest.
    /// A re-run skips every image whose file already exists, without fetching it.
    #[default]
    Positional,
    /// `n` is the number of entries in the folder plus one, evaluated after each fetch.
    /// Concurrent workers race on the count, so names may collide or leave gaps.
    DirectoryCount,
}

/// A task to download one image of an album into the album folder.
#[derive(Debug, Clone)]
pub struct DownloadTask {
    pub url: String,
    pub folder: PathBuf,
    pub title: String,
    /// 1-based position in the album manifest
    pub position: usize,
}

impl DownloadTask {
    pub fn filename(&self, n: usize) -> String {
        format!("{}_{}.jpg", self.title, n)
    }
}
