/// One album anchor found on a listing page, in page order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumEntry {
    /// Relative link, e.g. `/albums/123456?uid=1`
    pub link: String,
    pub title: String,
}
