use serde::Deserialize;

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const LISTING_MANIFEST_FILE: &str = "bf3_strona.csv";
pub const ALBUM_MANIFEST_FILE: &str = "TESTY.csv";
const LINKS_HEADER: &str = "LINKS";

fn open_writer(path: &Path) -> Result<csv::Writer<std::fs::File>> {
    let writer = csv::WriterBuilder::new()
        .flexible(true)
        .terminator(csv::Terminator::CRLF)
        .from_path(path)?;
    Ok(writer)
}

pub fn page_dir(root: impl AsRef<Path>, page: u32) -> PathBuf {
    root.as_ref().join(format!("page{}", page))
}

pub fn listing_manifest_path(page_dir: impl AsRef<Path>) -> PathBuf {
    page_dir.as_ref().join(LISTING_MANIFEST_FILE)
}

pub fn album_manifest_path(page_dir: impl AsRef<Path>, index: usize) -> PathBuf {
    page_dir.as_ref().join(format!("{}_{}", index, ALBUM_MANIFEST_FILE))
}

/// Relative album links of one listing page. The row index is the album index.
/// Titles are not stored here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingManifest {
    pub links: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ListingRow {
    #[serde(rename = "LINKS")]
    link: String,
}

impl ListingManifest {
    pub fn new(links: Vec<String>) -> Self {
        ListingManifest { links }
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = open_writer(path.as_ref())?;
        writer.write_record([LINKS_HEADER])?;
        for link in &self.links {
            writer.write_record([link])?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)?;
        let links = reader
            .deserialize::<ListingRow>()
            .map(|row| row.map(|row| row.link))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(ListingManifest { links })
    }

    pub fn link(&self, index: usize) -> Result<&str> {
        self.links.get(index).map(String::as_str).ok_or(Error::IndexOutOfRange {
            index,
            len: self.links.len(),
        })
    }
}

/// Image URLs of one album. The first row of the file holds the album index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumManifest {
    pub index: usize,
    pub urls: Vec<String>,
}

impl AlbumManifest {
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = open_writer(path.as_ref())?;
        writer.write_record([self.index.to_string()])?;
        for url in &self.urls {
            writer.write_record([url])?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Rows are returned as stored. Callers filter out anything that is not an image URL.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)?;

        let mut records = reader.records();
        let index = records
            .next()
            .transpose()?
            .and_then(|record| record.get(0)?.trim().parse::<usize>().ok())
            .ok_or(Error::InvalidManifest(path.to_string_lossy().to_string()))?;

        let mut urls = Vec::new();
        for record in records {
            if let Some(url) = record?.get(0) {
                urls.push(url.to_string());
            }
        }
        Ok(AlbumManifest { index, urls })
    }
}
