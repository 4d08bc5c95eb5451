mod common;

use common::{listing_page, FakeTransport};
use futures::io::AsyncReadExt;
use soundrain::{Page, RequestKind, SoundrainError, Track};

const LISTING: &str = "https://soundcloud.com/someone/tracks?page=1";

#[test_log::test(tokio::test)]
async fn invalid_url_never_reaches_transport() {
    let transport = FakeTransport::new();
    let fetcher = transport.fetcher();

    for url in [
        "https://example.com/someone",
        "https://soundcloud.com/",
        "soundcloud.com/someone",
    ] {
        match fetcher.fetch(url).await {
            Err(SoundrainError::InvalidUrl(bad)) => assert_eq!(bad, url),
            other => panic!("expected InvalidUrl for {url}, got {other:?}"),
        }
    }

    assert!(transport.requests().is_empty());
}

#[test_log::test(tokio::test)]
async fn non_200_is_unexpected_status() {
    let transport = FakeTransport::new();
    transport.respond(LISTING, 404, "not found");

    match transport.fetcher().fetch(LISTING).await {
        Err(SoundrainError::UnexpectedStatus { status, url }) => {
            assert_eq!(status, 404);
            assert_eq!(url, LISTING);
        }
        other => panic!("expected UnexpectedStatus, got {other:?}"),
    }
    // No retry
    assert_eq!(transport.requests(), vec![LISTING.to_string()]);
}

#[test_log::test(tokio::test)]
async fn fetch_returns_body_bytes() {
    let transport = FakeTransport::new();
    transport.respond(LISTING, 200, "<html>hello</html>");

    let body = transport.fetcher().fetch(LISTING).await.unwrap();
    assert_eq!(body, b"<html>hello</html>");
    assert_eq!(transport.requests_of_kind(RequestKind::Page), vec![LISTING.to_string()]);
}

#[test_log::test(tokio::test)]
async fn page_fetch_parses_tracks() {
    let transport = FakeTransport::new();
    transport.respond(
        LISTING,
        200,
        listing_page(&[r#"{"title":"One","streamUrl":"http://cdn/1"}"#], Some(4)),
    );

    let page = Page::fetch(&transport.fetcher(), LISTING).await.unwrap();
    assert_eq!(page.url, LISTING);
    assert_eq!(page.tracks.len(), 1);
    assert_eq!(page.tracks[0].title, "One");
    assert_eq!(page.last_page().unwrap(), 4);
}

#[test_log::test(tokio::test)]
async fn page_fetch_fails_on_bad_payload() {
    let transport = FakeTransport::new();
    transport.respond(LISTING, 200, listing_page(&["not json"], None));

    let result = Page::fetch(&transport.fetcher(), LISTING).await;
    assert!(matches!(result, Err(SoundrainError::MalformedPageData(_))));
}

#[test_log::test(tokio::test)]
async fn stream_urls_skip_site_shape_check() {
    let transport = FakeTransport::new();
    transport.respond("http://cdn.example/stream/1", 200, vec![1u8, 2, 3]);

    let mut body = transport
        .fetcher()
        .open_stream("http://cdn.example/stream/1")
        .await
        .unwrap();
    let mut bytes = Vec::new();
    body.read_to_end(&mut bytes).await.unwrap();

    assert_eq!(bytes, vec![1, 2, 3]);
    assert_eq!(
        transport.requests_of_kind(RequestKind::Stream),
        vec!["http://cdn.example/stream/1".to_string()]
    );
}

#[test_log::test(tokio::test)]
async fn stream_status_is_checked() {
    let transport = FakeTransport::new();
    transport.respond("http://cdn.example/stream/1", 403, "denied");

    let result = transport.fetcher().open_stream("http://cdn.example/stream/1").await;
    assert!(matches!(
        result,
        Err(SoundrainError::UnexpectedStatus { status: 403, .. })
    ));
}

#[test_log::test(tokio::test)]
async fn track_from_single_track_page() {
    let url = "https://soundcloud.com/someone/a-track";
    let transport = FakeTransport::new();
    transport.respond(
        url,
        200,
        listing_page(&[r#"{"title":"A &amp; B","streamUrl":"http://cdn/ab"}"#], None),
    );

    let track = Track::from_url(&transport.fetcher(), url).await.unwrap();
    assert_eq!(track.title, "A & B");
    assert_eq!(track.stream_url.as_deref(), Some("http://cdn/ab"));
}

#[test_log::test(tokio::test)]
async fn track_from_empty_page_is_malformed() {
    let url = "https://soundcloud.com/someone/gone";
    let transport = FakeTransport::new();
    transport.respond(url, 200, listing_page(&[], None));

    let result = Track::from_url(&transport.fetcher(), url).await;
    assert!(matches!(result, Err(SoundrainError::MalformedPageData(_))));
}

#[test_log::test(tokio::test)]
async fn user_root_page_url_reaches_transport() {
    let url = "https://soundcloud.com/someone?page=1";
    let transport = FakeTransport::new();
    transport.respond(url, 200, listing_page(&[], None));

    let page = Page::fetch(&transport.fetcher(), url).await.unwrap();

    assert!(page.tracks.is_empty());
    assert_eq!(transport.requests(), vec![url.to_string()]);
}
