pub mod listing {
    use lazy_static::lazy_static;
    use scraper::Selector;

    lazy_static! {
        pub static ref ALBUM: Selector = Selector::parse("a.album__main").unwrap();
    }
}

pub mod album {
    use lazy_static::lazy_static;
    use scraper::Selector;

    lazy_static! {
        pub static ref LANDSCAPE_IMAGE: Selector = Selector::parse(".image__landscape").unwrap();
        pub static ref PORTRAIT_IMAGE: Selector = Selector::parse(".image__portrait").unwrap();
    }
}
