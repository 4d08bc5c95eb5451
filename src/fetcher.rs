use crate::config::debug_save_responses_enabled;
use crate::target::validate_url;
use crate::transport::{ByteStream, RequestKind, Transport};
use crate::{Result, SoundrainError};
use futures::io::AsyncReadExt;
use scraper::Html;
use std::fs;
use std::path::Path;

/// Fetches SoundCloud pages and audio streams through an injected [`Transport`].
///
/// Page URLs are checked against the site's URL shape before any request is
/// made. Anything other than `200 OK` is an error; nothing is retried.
///
/// # Examples
///
/// ```rust,no_run
/// use soundrain::{PageFetcher, Result};
///
/// #[tokio::main]
/// async fn main() -> Result<()> {
///     let fetcher = PageFetcher::native();
///     let document = fetcher.fetch_document("https://soundcloud.com/someone/tracks").await?;
///     println!("{}", document.root_element().html().len());
///     Ok(())
/// }
/// ```
pub struct PageFetcher {
    transport: Box<dyn Transport>,
    debug_save_responses: bool,
}

impl PageFetcher {
    /// Create a fetcher over any [`Transport`].
    ///
    /// Debug dumping of fetched pages follows the
    /// [`DEBUG_SAVE_RESPONSES_ENV`](crate::config::DEBUG_SAVE_RESPONSES_ENV) variable.
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            debug_save_responses: debug_save_responses_enabled(),
        }
    }

    /// Create a fetcher over the native HTTP client.
    #[cfg(feature = "curl")]
    pub fn native() -> Self {
        Self::new(Box::new(crate::transport::HttpClientTransport::native()))
    }

    pub fn with_debug_save_responses(mut self, enabled: bool) -> Self {
        self.debug_save_responses = enabled;
        self
    }

    /// Fetch the raw bytes of a SoundCloud page.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        validate_url(url)?;

        log::debug!("Fetching page: {url}");
        let response = self.transport.get(url, RequestKind::Page).await?;
        check_status(url, response.status)?;

        let mut body = Vec::new();
        let mut reader = response.body;
        reader
            .read_to_end(&mut body)
            .await
            .map_err(|e| SoundrainError::Http(format!("Failed to read body of {url}: {e}")))?;

        log::debug!("Fetched {} bytes from {url}", body.len());
        if self.debug_save_responses {
            self.save_debug_response(url, response.status, &body);
        }

        Ok(body)
    }

    /// Fetch a SoundCloud page and parse it as HTML.
    pub async fn fetch_document(&self, url: &str) -> Result<Html> {
        let body = self.fetch(url).await?;
        Ok(Html::parse_document(&String::from_utf8_lossy(&body)))
    }

    /// Open the body of an audio stream for reading.
    ///
    /// Stream URLs point at the site's CDN, so no URL shape check is applied.
    pub async fn open_stream(&self, url: &str) -> Result<ByteStream> {
        log::debug!("Opening stream: {url}");
        let response = self.transport.get(url, RequestKind::Stream).await?;
        check_status(url, response.status)?;
        Ok(response.body)
    }

    /// Save response to debug directory (optional debug feature)
    fn save_debug_response(&self, url: &str, status_code: u16, body: &[u8]) {
        if let Err(e) = try_save_debug_response(url, status_code, body) {
            log::warn!("Failed to save debug response: {e}");
        }
    }
}

fn check_status(url: &str, status: u16) -> Result<()> {
    if status == 200 {
        Ok(())
    } else {
        log::debug!("Unexpected status {status} for {url}");
        Err(SoundrainError::UnexpectedStatus {
            status,
            url: url.to_string(),
        })
    }
}

fn try_save_debug_response(url: &str, status_code: u16, body: &[u8]) -> Result<()> {
    let debug_dir = Path::new("debug_responses");
    fs::create_dir_all(debug_dir)?;

    let url_path = url.split_once("://").map_or(url, |(_, rest)| rest);
    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S_%3f");
    let safe_path = url_path.replace(['/', '?', '&', '=', '%', '+', ':'], "_");

    let file_path = debug_dir.join(format!("{timestamp}_{safe_path}_status{status_code}.html"));
    fs::write(&file_path, body)?;

    log::debug!("Saved HTTP response to {file_path:?} (status: {status_code}, url: {url})");
    Ok(())
}
