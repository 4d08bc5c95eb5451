use crate::headers;
use crate::{Result, SoundrainError};
use async_trait::async_trait;
use futures::io::{AsyncRead, Cursor};
use http_client::{HttpClient, Request};
use http_types::{Method, Url};

/// Redirect hops followed before giving up.
const MAX_REDIRECTS: u32 = 5;

/// Response body handed back by a [`Transport`].
pub type ByteStream = Box<dyn AsyncRead + Unpin + Send>;

/// What a request is for. Listing pages are requested as HTML, audio streams
/// accept any content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Page,
    Stream,
}

/// Status and body of a completed GET request.
pub struct TransportResponse {
    pub status: u16,
    pub body: ByteStream,
}

impl TransportResponse {
    pub fn new(status: u16, body: ByteStream) -> Self {
        Self { status, body }
    }

    /// Build a response from an in-memory body.
    pub fn from_bytes(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self::new(status, Box::new(Cursor::new(body.into())))
    }
}

impl std::fmt::Debug for TransportResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportResponse")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// The network seam of the pipeline.
///
/// [`PageFetcher`](crate::PageFetcher) talks to the network only through this
/// trait, so tests can substitute an in-memory transport and count the requests
/// it receives.
///
/// # Mocking Support
///
/// When the `mock` feature is enabled, this crate provides `MockTransport`
/// generated by the `mockall` library.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait(?Send)]
pub trait Transport {
    /// Issue a GET request and return the final (post-redirect) response,
    /// whatever its status.
    async fn get(&self, url: &str, kind: RequestKind) -> Result<TransportResponse>;
}

/// [`Transport`] backed by any [`HttpClient`] implementation.
pub struct HttpClientTransport {
    client: Box<dyn HttpClient>,
}

impl HttpClientTransport {
    pub fn new(client: Box<dyn HttpClient>) -> Self {
        Self { client }
    }

    /// Transport over the platform's native HTTP client.
    #[cfg(feature = "curl")]
    pub fn native() -> Self {
        Self::new(Box::new(http_client::native::NativeClient::new()))
    }
}

#[async_trait(?Send)]
impl Transport for HttpClientTransport {
    async fn get(&self, url: &str, kind: RequestKind) -> Result<TransportResponse> {
        let mut current =
            Url::parse(url).map_err(|_| SoundrainError::InvalidUrl(url.to_string()))?;

        for _ in 0..=MAX_REDIRECTS {
            let mut request = Request::new(Method::Get, current.clone());
            headers::add_get_headers(&mut request, kind == RequestKind::Page);

            let mut response = self
                .client
                .send(request)
                .await
                .map_err(|e| SoundrainError::Http(e.to_string()))?;

            // Handle redirects manually
            if response.status().is_redirection() {
                if let Some(location) = response.header("location").and_then(|h| h.get(0)) {
                    let next = current.join(location.as_str()).map_err(|e| {
                        SoundrainError::Http(format!("Bad redirect target '{location}': {e}"))
                    })?;
                    log::debug!("Following redirect from {current} to {next}");
                    current = next;
                    continue;
                }
            }

            let status: u16 = response.status().into();
            log::debug!("GET {current} -> {status}");
            return Ok(TransportResponse::new(status, Box::new(response.take_body())));
        }

        Err(SoundrainError::Http(format!("Too many redirects for {url}")))
    }
}
