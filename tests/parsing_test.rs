mod common;

use common::{listing_page, track_div};
use scraper::Html;
use soundrain::{SoundCloudParser, SoundrainError, Track};

#[test]
fn extracts_tracks_in_page_order() {
    let html = listing_page(
        &[
            r#"{"title":"Foo &amp; Bar","streamUrl":"http://x/1","id":17}"#,
            r#"{"title":"Baz","streamUrl":"http://x/2"}"#,
        ],
        None,
    );
    let document = Html::parse_document(&html);

    let tracks = SoundCloudParser::new().extract_tracks(&document).unwrap();

    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0].title_orig, "Foo &amp; Bar");
    assert_eq!(tracks[0].title, "Foo & Bar");
    assert_eq!(tracks[0].stream_url.as_deref(), Some("http://x/1"));
    assert_eq!(tracks[0].get("id"), Some(&serde_json::json!(17)));
    assert_eq!(tracks[1].title, "Baz");
    assert_eq!(tracks[1].stream_url.as_deref(), Some("http://x/2"));
}

#[test]
fn titles_are_decoded_then_sanitized() {
    let html = listing_page(
        &[r#"{"title":"AC/DC: Live &raquo; <Best> | 100% *","streamUrl":"http://x/1"}"#],
        None,
    );
    let document = Html::parse_document(&html);

    let tracks = SoundCloudParser::new().extract_tracks(&document).unwrap();

    assert_eq!(tracks[0].title, "ACDC Live \u{bb} Best  100 ");
    for c in ['|', '/', '\\', '?', '%', '*', ':', '>', '<'] {
        assert!(!tracks[0].title.contains(c), "title still contains {c:?}");
    }
}

#[test]
fn page_without_tracks_yields_nothing() {
    let document = Html::parse_document(&listing_page(&[], None));
    let tracks = SoundCloudParser::new().extract_tracks(&document).unwrap();
    assert!(tracks.is_empty());
}

#[test]
fn container_without_script_is_skipped() {
    let html = format!(
        r#"<html><body><div data-sc-track="1"><span>no script</span></div>{}</body></html>"#,
        track_div(r#"{"title":"Only","streamUrl":"http://x/1"}"#)
    );
    let document = Html::parse_document(&html);

    let tracks = SoundCloudParser::new().extract_tracks(&document).unwrap();
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].title, "Only");
}

#[test]
fn script_without_payload_is_malformed() {
    let html = r#"<html><body><div data-sc-track="1"><script>var nothing = 1;</script></div></body></html>"#;
    let document = Html::parse_document(html);

    let result = SoundCloudParser::new().extract_tracks(&document);
    assert!(matches!(result, Err(SoundrainError::MalformedPageData(_))));
}

#[test]
fn invalid_json_payload_is_malformed() {
    let document = Html::parse_document(&listing_page(&[r#"{"title": oops}"#], None));
    let result = SoundCloudParser::new().extract_tracks(&document);
    assert!(matches!(result, Err(SoundrainError::MalformedPageData(_))));

    let document = Html::parse_document(&listing_page(&[r#"{"streamUrl":"http://x/1"}"#], None));
    let result = SoundCloudParser::new().extract_tracks(&document);
    assert!(matches!(result, Err(SoundrainError::MalformedPageData(_))));
}

#[test]
fn last_page_defaults_to_one_without_next_link() {
    let document = Html::parse_document(&listing_page(&[], None));
    assert_eq!(SoundCloudParser::new().last_page_number(&document).unwrap(), 1);
}

#[test]
fn last_page_is_link_before_next() {
    let document = Html::parse_document(&listing_page(&[], Some(3)));
    assert_eq!(SoundCloudParser::new().last_page_number(&document).unwrap(), 3);

    let document = Html::parse_document(&listing_page(&[], Some(12)));
    assert_eq!(SoundCloudParser::new().last_page_number(&document).unwrap(), 12);
}

#[test]
fn non_numeric_last_page_is_malformed() {
    let html = r#"<html><body><div class="pagination"><a href="?page=1">first</a><a class="next_page" href="?page=2">Next</a></div></body></html>"#;
    let document = Html::parse_document(html);

    let result = SoundCloudParser::new().last_page_number(&document);
    assert!(matches!(result, Err(SoundrainError::MalformedPageData(_))));
}

#[test]
fn next_link_without_predecessor_is_malformed() {
    let html = r#"<html><body><div class="pagination"><a class="next_page" href="?page=2">Next</a></div></body></html>"#;
    let document = Html::parse_document(html);

    let result = SoundCloudParser::new().last_page_number(&document);
    assert!(matches!(result, Err(SoundrainError::MalformedPageData(_))));
}

#[test]
fn track_keeps_unknown_fields() {
    let track =
        Track::from_payload(r#"{"title":"T","streamUrl":"http://x/1","user":{"username":"dj"}}"#)
            .unwrap();
    assert_eq!(track.get("user").and_then(|u| u.get("username")), Some(&serde_json::json!("dj")));
    assert_eq!(track.file_name(), "T.mp3");
    assert!(track.get("title").is_none());
}
