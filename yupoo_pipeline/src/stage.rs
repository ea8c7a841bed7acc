//! The two extraction stages. Each one leaves a manifest in the page directory for the next stage.

use std::path::Path;

use yupoo_client::YupooClient;
use yupoo_download::{album_manifest_path, listing_manifest_path, AlbumManifest, ListingManifest};
use yupoo_util::resolve_album_url;

use crate::error::StageError;
use crate::retry::RetryPolicy;

pub type StageResult<T> = std::result::Result<T, StageError>;

/// Fetch the listing page and write its album links to the listing manifest.
/// Return the album titles in listing order, they are not persisted.
pub async fn extract_listing(
    client: &YupooClient,
    listing_url: &str,
    page_dir: &Path,
    retry: &RetryPolicy,
) -> StageResult<Vec<String>> {
    tokio::fs::create_dir_all(page_dir).await?;

    let albums = retry.run(|| client.listing(listing_url)).await?;
    let (links, titles): (Vec<_>, Vec<_>) = albums.into_iter().map(|album| (album.link, album.title)).unzip();
    tracing::info!("Found {} albums on {}", links.len(), listing_url);

    ListingManifest::new(links).write(listing_manifest_path(page_dir))?;
    Ok(titles)
}

/// Fetch the page of album `index` and write its image URLs to the album manifest.
pub async fn extract_album(
    client: &YupooClient,
    listing_url: &str,
    page_dir: &Path,
    index: usize,
) -> StageResult<AlbumManifest> {
    let listing = ListingManifest::read(listing_manifest_path(page_dir))?;
    let url = resolve_album_url(listing_url, listing.link(index)?)?;

    let urls = client.album(&url).await?;
    tracing::info!("Found {} images in album {} ({})", urls.len(), index, url);

    let manifest = AlbumManifest { index, urls };
    manifest.write(album_manifest_path(page_dir, index))?;
    Ok(manifest)
}

#[cfg(test)]
mod test {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use std::time::Duration;

    use crate::error::ErrorKind;

    use super::*;

    fn client() -> YupooClient {
        YupooClient::new(Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_listing_is_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/albums"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/albums"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<a class="album__main" href="/albums/7?uid=1" title="Shoes A"></a>"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let page_dir = dir.path().join("page1");
        let retry = RetryPolicy::new(3, Duration::from_millis(10));
        let url = format!("{}/albums?pag=1", server.uri());

        let titles = extract_listing(&client(), &url, &page_dir, &retry).await.unwrap();
        assert_eq!(titles, vec!["Shoes A".to_string()]);
        assert_eq!(
            ListingManifest::read(listing_manifest_path(&page_dir)).unwrap().links,
            vec!["/albums/7?uid=1".to_string()]
        );
    }

    #[tokio::test]
    async fn test_listing_fails_after_retries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(2)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let retry = RetryPolicy::new(2, Duration::from_millis(10));
        let url = format!("{}/albums?pag=1", server.uri());

        let err = extract_listing(&client(), &url, dir.path(), &retry).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Fetch);
        assert!(!listing_manifest_path(dir.path()).exists());
    }

    #[tokio::test]
    async fn test_listing_rerun_rewrites_same_manifest() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/albums"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<a class="album__main" href="/albums/7?uid=1" title="Shoes A"></a>
                   <a class="album__main" href="/albums/8?uid=1" title="Bags, B"></a>"#,
            ))
            .expect(2)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let retry = RetryPolicy::new(1, Duration::from_millis(10));
        let url = format!("{}/albums?pag=1", server.uri());

        extract_listing(&client(), &url, dir.path(), &retry).await.unwrap();
        let first = std::fs::read(listing_manifest_path(dir.path())).unwrap();
        let titles = extract_listing(&client(), &url, dir.path(), &retry).await.unwrap();
        let second = std::fs::read(listing_manifest_path(dir.path())).unwrap();

        assert_eq!(first, second);
        assert_eq!(first, b"LINKS\r\n/albums/7?uid=1\r\n/albums/8?uid=1\r\n");
        assert_eq!(titles, vec!["Shoes A".to_string(), "Bags, B".to_string()]);
    }

    #[tokio::test]
    async fn test_album_index_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        ListingManifest::new(vec!["/albums/1".to_string(), "/albums/2".to_string()])
            .write(listing_manifest_path(dir.path()))
            .unwrap();

        let err = extract_album(&client(), "https://x.yupoo.com/albums?pag=1", dir.path(), 5)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Index);
    }

    #[tokio::test]
    async fn test_extract_album() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/albums/2"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<img class="image__portrait" data-src="//photo.yupoo.com/s/p/medium.jpg">
                   <img class="image__landscape" data-src="//photo.yupoo.com/s/l/medium.jpg">"#,
            ))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        ListingManifest::new(vec!["/albums/1".to_string(), "/albums/2".to_string()])
            .write(listing_manifest_path(dir.path()))
            .unwrap();

        let url = format!("{}/albums?pag=1", server.uri());
        let manifest = extract_album(&client(), &url, dir.path(), 1).await.unwrap();
        assert_eq!(
            manifest.urls,
            vec![
                "https://photo.yupoo.com/s/l/medium.jpg".to_string(),
                "https://photo.yupoo.com/s/p/medium.jpg".to_string(),
            ]
        );
        assert_eq!(AlbumManifest::read(album_manifest_path(dir.path(), 1)).unwrap(), manifest);
    }
}
