use crate::entities::{decode_entities, sanitize_title};
use crate::parsing::SoundCloudParser;
use crate::{PageFetcher, Result, SoundrainError};
use scraper::Html;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One audio item as described by the site's embedded track data.
///
/// `title` is the filesystem-safe form of `title_orig`; every key the pipeline
/// does not inspect is kept verbatim in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Track {
    pub title: String,
    pub title_orig: String,
    #[serde(rename = "streamUrl", skip_serializing_if = "Option::is_none")]
    pub stream_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize)]
struct TrackPayload {
    title: String,
    #[serde(rename = "streamUrl", default)]
    stream_url: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Track {
    /// Build a track from the JSON object embedded in a page script.
    pub fn from_payload(payload: &str) -> Result<Self> {
        let parsed: TrackPayload = serde_json::from_str(payload).map_err(|e| {
            SoundrainError::MalformedPageData(format!("Invalid track payload: {e}"))
        })?;

        Ok(Self::new(parsed.title, parsed.stream_url, parsed.extra))
    }

    /// Build a track from its original title; the sanitized title is derived here.
    pub fn new(title_orig: String, stream_url: Option<String>, extra: Map<String, Value>) -> Self {
        Self {
            title: sanitize_title(&decode_entities(&title_orig)),
            title_orig,
            stream_url,
            extra,
        }
    }

    /// Fetch a single-track page and take the track it describes.
    pub async fn from_url(fetcher: &PageFetcher, url: &str) -> Result<Self> {
        Page::fetch(fetcher, url)
            .await?
            .tracks
            .into_iter()
            .next()
            .ok_or_else(|| SoundrainError::MalformedPageData(format!("No track found on {url}")))
    }

    /// Look up a site-supplied field that has no named counterpart.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// Name of the file this track is saved as.
    pub fn file_name(&self) -> String {
        format!("{}.mp3", self.title)
    }
}

/// One fetched listing page and the tracks embedded in it.
#[derive(Debug)]
pub struct Page {
    pub url: String,
    pub document: Html,
    pub tracks: Vec<Track>,
}

impl Page {
    /// Fetch and parse a page. Fails as a whole if the URL, the request or the
    /// embedded track data is bad.
    pub async fn fetch(fetcher: &PageFetcher, url: &str) -> Result<Self> {
        let document = fetcher.fetch_document(url).await?;
        let tracks = SoundCloudParser::new().extract_tracks(&document)?;
        log::debug!("Found {} tracks on {url}", tracks.len());

        Ok(Self {
            url: url.to_string(),
            document,
            tracks,
        })
    }

    /// Number of subpages of this listing.
    pub fn last_page(&self) -> Result<u32> {
        SoundCloudParser::new().last_page_number(&self.document)
    }
}
