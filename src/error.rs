use std::path::PathBuf;
use thiserror::Error;

/// Error types for soundrain operations.
///
/// Every stage of the pipeline (URL validation, page fetching, track extraction,
/// pagination and file output) reports its failures through this enum. Nothing in
/// the pipeline retries or swallows an error: the first one ends the run.
///
/// # Error Handling Examples
///
/// ```rust,no_run
/// use soundrain::{PageFetcher, SoundrainError};
///
/// #[tokio::main]
/// async fn main() {
///     let fetcher = PageFetcher::native();
///
///     match fetcher.fetch("https://soundcloud.com/some-user").await {
///         Ok(bytes) => println!("Fetched {} bytes", bytes.len()),
///         Err(SoundrainError::InvalidUrl(url)) => eprintln!("Not a SoundCloud URL: {url}"),
///         Err(SoundrainError::UnexpectedStatus { status, .. }) => {
///             eprintln!("Server answered with {status}");
///         }
///         Err(e) => eprintln!("Other error: {e}"),
///     }
/// }
/// ```
#[derive(Error, Debug)]
pub enum SoundrainError {
    /// The URL does not have the shape `http(s)://(www.)soundcloud.com/<path>`.
    ///
    /// Raised before any request is issued.
    #[error("Not a valid SoundCloud URL: {0:?}")]
    InvalidUrl(String),

    /// The server answered with something other than `200 OK`.
    #[error("Unexpected HTTP status {status} for {url}")]
    UnexpectedStatus {
        /// The status code that was returned
        status: u16,
        /// The URL that was requested
        url: String,
    },

    /// The page does not contain the embedded track data or pagination markup
    /// in the expected shape.
    ///
    /// This usually means the site changed its HTML structure.
    #[error("Malformed page data: {0}")]
    MalformedPageData(String),

    /// HTTP/network related errors.
    ///
    /// Connection failures, DNS errors, interrupted bodies and redirect loops.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The requested output directory does not exist.
    #[error("Output directory does not exist: {}", .0.display())]
    MissingOutputDir(PathBuf),

    /// File system I/O errors while writing tracks or creating directories.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
