use thiserror::Error;

use url::Url;

#[derive(Debug, Clone, Error)]
pub enum ParsingError {
    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("No `pag=<n>` parameter in {0}")]
    MissingPageNumber(String),
    #[error("Page number out of range: {0}")]
    InvalidPageNumber(String),
}

type Result<T> = std::result::Result<T, ParsingError>;

const PAGE_KEY: &str = "pag=";
const FORBIDDEN_TITLE_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Rewrite the first `?pag=` into `&pag=`.
/// Some listings only return the full result set when `pag` is passed with `&`.
pub fn normalize_page_delimiter(url: &str) -> String {
    url.replacen("?pag=", "&pag=", 1)
}

/// Parse the page number from the first `?pag=<n>` or `&pag=<n>` of a listing URL.
pub fn parse_page_number(url: &str) -> Result<u32> {
    let digits = url
        .match_indices(PAGE_KEY)
        .filter(|(i, _)| *i > 0 && matches!(url.as_bytes()[*i - 1], b'?' | b'&'))
        .map(|(i, key)| {
            let rest = &url[i + key.len()..];
            let end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
            &rest[..end]
        })
        .find(|digits| !digits.is_empty())
        .ok_or_else(|| ParsingError::MissingPageNumber(url.to_string()))?;
    // Only ASCII digits are left, so this fails on overflow only
    digits
        .parse::<u32>()
        .map_err(|_| ParsingError::InvalidPageNumber(digits.to_string()))
}

pub fn resolve_page_number(url: &str, normalize: bool) -> Result<u32> {
    if normalize {
        parse_page_number(&normalize_page_delimiter(url))
    } else {
        parse_page_number(url)
    }
}

/// Resolve a relative album link against the origin of the listing URL.
/// Listing and album pages are assumed to live on the same gallery host.
pub fn resolve_album_url(listing_url: &str, link: &str) -> Result<String> {
    let base = Url::parse(listing_url)?;
    if base.host_str().is_none() {
        return Err(ParsingError::InvalidUrl(listing_url.to_string()));
    }
    Ok(base.join(link)?.to_string())
}

/// Image sources on album pages are scheme-relative (`//photo.yupoo.com/...`).
pub fn absolutize_image_src(src: &str) -> String {
    if is_http_url(src) {
        src.to_string()
    } else {
        format!("https:{}", src)
    }
}

pub fn is_http_url(s: &str) -> bool {
    Url::parse(s)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .unwrap_or(false)
}

/// Make an album title usable as a folder name.
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| if FORBIDDEN_TITLE_CHARS.contains(&c) { '-' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}
