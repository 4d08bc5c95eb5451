//! # Download Events
//!
//! Progress of a download run is published on a broadcast channel so that a
//! front end can render it without the downloader knowing how.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::sync::broadcast;

/// Events emitted by the [`Downloader`](crate::Downloader) while it works.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DownloadEvent {
    /// A listing page was fetched and parsed.
    PageFetched {
        timestamp: DateTime<Utc>,
        url: String,
        /// Number of tracks found on the page
        track_count: usize,
    },
    /// A track's stream is about to be downloaded.
    TrackStarted {
        timestamp: DateTime<Utc>,
        title: String,
        /// Final destination of the track
        path: PathBuf,
    },
    /// More of a track's stream was written to disk.
    TrackProgress {
        title: String,
        /// Bytes written so far
        bytes: u64,
    },
    /// A track was fully written and moved into place.
    TrackCompleted {
        timestamp: DateTime<Utc>,
        title: String,
        path: PathBuf,
        bytes: u64,
    },
    /// A track failed; the run stops after this event.
    TrackFailed {
        timestamp: DateTime<Utc>,
        title: String,
        error: String,
    },
}

/// A handle for receiving download events.
///
/// # Examples
///
/// ```rust,no_run
/// use soundrain::{DownloadEvent, Downloader, PageFetcher};
/// use tokio::sync::broadcast::error::RecvError;
///
/// #[tokio::main]
/// async fn main() {
///     let downloader = Downloader::new(PageFetcher::native());
///     let mut events = downloader.subscribe();
///
///     tokio::spawn(async move {
///         loop {
///             match events.recv().await {
///                 Ok(DownloadEvent::TrackCompleted { title, bytes, .. }) => {
///                     println!("{title}: {bytes} bytes");
///                 }
///                 Ok(_) => {}
///                 Err(RecvError::Lagged(skipped)) => {
///                     println!("{skipped} events skipped");
///                 }
///                 Err(RecvError::Closed) => break,
///             }
///         }
///     });
/// }
/// ```
pub type DownloadEventReceiver = broadcast::Receiver<DownloadEvent>;

/// A handle for sending download events.
pub type DownloadEventSender = broadcast::Sender<DownloadEvent>;
