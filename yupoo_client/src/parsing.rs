use scraper::{ElementRef, Html};

use yupoo_util::absolutize_image_src;

use crate::error::{Error, Result};
use crate::result::AlbumEntry;

pub fn parse_listing(doc: &Html) -> Result<Vec<AlbumEntry>> {
    use super::selectors::listing::*;

    fn parse_album(e: ElementRef) -> Result<AlbumEntry> {
        let link = e
            .value()
            .attr("href")
            .ok_or(Error::InvalidHTML("album link".to_string()))?;
        let title = e
            .value()
            .attr("title")
            .ok_or(Error::InvalidHTML(format!("title of album {}", link)))?;
        Ok(AlbumEntry {
            link: link.to_string(),
            title: title.to_string(),
        })
    }

    doc.select(&ALBUM).map(parse_album).collect()
}

/// Absolute image URLs of an album page, landscape images first, then portrait ones.
pub fn parse_album_images(doc: &Html) -> Result<Vec<String>> {
    use super::selectors::album::*;

    fn parse_src(e: ElementRef) -> Result<String> {
        let src = e
            .value()
            .attr("data-src")
            .ok_or(Error::InvalidHTML("lazy image source".to_string()))?;
        Ok(absolutize_image_src(src))
    }

    doc.select(&LANDSCAPE_IMAGE)
        .chain(doc.select(&PORTRAIT_IMAGE))
        .map(parse_src)
        .collect()
}
