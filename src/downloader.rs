use crate::events::{DownloadEvent, DownloadEventReceiver, DownloadEventSender};
use crate::{
    DownloadConfig, ListingTarget, Page, PageFetcher, Result, SoundrainError, Track, UrlPlan,
};
use chrono::Utc;
use futures::io::AsyncReadExt;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::sync::broadcast;

const CHUNK_SIZE: usize = 64 * 1024;
const EVENT_CAPACITY: usize = 256;

/// Totals for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub pages: usize,
    pub tracks: usize,
    pub bytes: u64,
}

/// Walks URL plans page by page and streams every track to disk.
///
/// Everything happens sequentially: one request in flight and one file open
/// at a time. The first error ends the run. A track's file is written under a
/// `.part` name and only renamed into place once the whole stream is on disk.
pub struct Downloader {
    fetcher: PageFetcher,
    events: DownloadEventSender,
}

impl Downloader {
    pub fn new(fetcher: PageFetcher) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { fetcher, events }
    }

    /// Subscribe to progress events of this downloader.
    pub fn subscribe(&self) -> DownloadEventReceiver {
        self.events.subscribe()
    }

    /// Build the URL plan of every target before anything is downloaded.
    pub async fn plan(
        &self,
        targets: &[ListingTarget],
        config: &DownloadConfig,
    ) -> Result<Vec<UrlPlan>> {
        let mut plans = Vec::with_capacity(targets.len());
        for target in targets {
            let plan = UrlPlan::build(&self.fetcher, target, config).await?;
            log::info!("{} -> {} page(s)", target.path, plan.urls.len());
            plans.push(plan);
        }
        Ok(plans)
    }

    /// Plan and download every target.
    pub async fn download_all(
        &self,
        targets: &[ListingTarget],
        config: &DownloadConfig,
    ) -> Result<RunSummary> {
        let plans = self.plan(targets, config).await?;
        self.run(&plans).await
    }

    /// Download every page of every plan, in order.
    pub async fn run(&self, plans: &[UrlPlan]) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        for plan in plans {
            for url in &plan.urls {
                let (tracks, bytes) = self.download_page(url, &plan.output_dir).await?;
                summary.pages += 1;
                summary.tracks += tracks;
                summary.bytes += bytes;
            }
        }

        log::info!(
            "Downloaded {} tracks ({} bytes) from {} pages",
            summary.tracks,
            summary.bytes,
            summary.pages
        );
        Ok(summary)
    }

    /// Fetch one listing page and download its tracks into `dir`.
    ///
    /// Returns the number of tracks and bytes written.
    pub async fn download_page(&self, url: &str, dir: &Path) -> Result<(usize, u64)> {
        let page = Page::fetch(&self.fetcher, url).await?;
        self.emit(DownloadEvent::PageFetched {
            timestamp: Utc::now(),
            url: page.url.clone(),
            track_count: page.tracks.len(),
        });

        let mut bytes = 0;
        for track in &page.tracks {
            bytes += self.download_track(track, dir).await?;
        }
        Ok((page.tracks.len(), bytes))
    }

    /// Download the track described by a single-track page.
    pub async fn download_track_url(&self, url: &str, dir: &Path) -> Result<u64> {
        let track = Track::from_url(&self.fetcher, url).await?;
        self.download_track(&track, dir).await
    }

    /// Stream one track to `<dir>/<title>.mp3`.
    pub async fn download_track(&self, track: &Track, dir: &Path) -> Result<u64> {
        let stream_url = track.stream_url.as_deref().ok_or_else(|| {
            SoundrainError::MalformedPageData(format!(
                "Track '{}' has no streamUrl",
                track.title_orig
            ))
        })?;

        let destination = dir.join(track.file_name());
        log::info!("Downloading '{}' to {}", track.title, destination.display());
        self.emit(DownloadEvent::TrackStarted {
            timestamp: Utc::now(),
            title: track.title.clone(),
            path: destination.clone(),
        });

        match self.write_stream(track, stream_url, &destination).await {
            Ok(bytes) => {
                self.emit(DownloadEvent::TrackCompleted {
                    timestamp: Utc::now(),
                    title: track.title.clone(),
                    path: destination,
                    bytes,
                });
                Ok(bytes)
            }
            Err(e) => {
                log::warn!("Failed to download '{}': {e}", track.title);
                self.emit(DownloadEvent::TrackFailed {
                    timestamp: Utc::now(),
                    title: track.title.clone(),
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    async fn write_stream(
        &self,
        track: &Track,
        stream_url: &str,
        destination: &Path,
    ) -> Result<u64> {
        let mut body = self.fetcher.open_stream(stream_url).await?;
        let partial = part_path(destination);

        let result = async {
            let mut file = File::create(&partial).await?;
            let mut buf = vec![0u8; CHUNK_SIZE];
            let mut written = 0u64;

            loop {
                let n = body.read(&mut buf).await.map_err(|e| {
                    SoundrainError::Http(format!("Failed to read stream {stream_url}: {e}"))
                })?;
                if n == 0 {
                    break;
                }
                file.write_all(&buf[..n]).await?;
                written += n as u64;
                self.emit(DownloadEvent::TrackProgress {
                    title: track.title.clone(),
                    bytes: written,
                });
            }

            file.flush().await?;
            file.sync_all().await?;
            drop(file);

            tokio::fs::rename(&partial, destination).await?;
            Ok::<u64, SoundrainError>(written)
        }
        .await;

        if result.is_err() {
            if let Err(remove_err) = tokio::fs::remove_file(&partial).await {
                if remove_err.kind() != std::io::ErrorKind::NotFound {
                    log::warn!(
                        "Failed to remove partial file {}: {remove_err}",
                        partial.display()
                    );
                }
            }
        }
        result
    }

    fn emit(&self, event: DownloadEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

fn part_path(destination: &Path) -> PathBuf {
    let mut name = destination.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}
