pub mod config;
pub mod downloader;
pub mod entities;
pub mod error;
pub mod events;
pub mod fetcher;
pub mod headers;
pub mod parsing;
pub mod plan;
pub mod target;
pub mod track;
pub mod transport;

pub use config::DownloadConfig;
pub use downloader::{Downloader, RunSummary};
pub use error::SoundrainError;
pub use events::{DownloadEvent, DownloadEventReceiver, DownloadEventSender};
pub use fetcher::PageFetcher;
pub use parsing::SoundCloudParser;
pub use plan::{build_urls, UrlPlan};
pub use target::ListingTarget;
pub use track::{Page, Track};
#[cfg(feature = "mock")]
pub use transport::MockTransport;
pub use transport::{HttpClientTransport, RequestKind, Transport, TransportResponse};

// Re-export scraper types for testing
pub use scraper::Html;

pub type Result<T> = std::result::Result<T, SoundrainError>;
