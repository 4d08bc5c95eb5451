use clap::Parser;
use soundrain::{DownloadConfig, DownloadEvent, Downloader, ListingTarget, PageFetcher};
use std::io::Write;
use std::path::PathBuf;
use tokio::sync::broadcast::error::RecvError;

/// Grabs sounds from SoundCloud listing pages
#[derive(Parser)]
#[command(name = "soundrain", about = "Grabs sounds", long_about = None)]
struct Cli {
    /// Download tracks from all pages of the given URLs
    #[arg(short, long)]
    all: bool,

    /// Save files to this directory instead of the current working directory
    #[arg(short, long, value_name = "PATH", value_parser = existing_dir)]
    output: Option<PathBuf>,

    /// Create sub-directories for every URL given
    #[arg(short, long)]
    create_dir: bool,

    /// Show detailed debug information
    #[arg(short, long)]
    verbose: bool,

    /// SoundCloud user, set or track URLs
    #[arg(value_name = "URL", required = true, value_parser = soundcloud_url)]
    urls: Vec<ListingTarget>,
}

fn soundcloud_url(link: &str) -> Result<ListingTarget, String> {
    ListingTarget::parse(link).map_err(|_| format!("'{link}' is not a valid SoundCloud link."))
}

fn existing_dir(path: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path);
    if path.is_dir() {
        Ok(path)
    } else {
        Err(format!("Directory {} does not exist!", path.display()))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let output = match args.output {
        Some(path) => path,
        None => std::env::current_dir()?,
    };
    let config = DownloadConfig::new(output)?
        .with_all_pages(args.all)
        .with_create_dirs(args.create_dir);
    log::debug!("Running with {config:?}");

    let downloader = Downloader::new(PageFetcher::native());
    let mut events = downloader.subscribe();

    // Render progress while the download runs
    let progress = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(DownloadEvent::TrackStarted { title, .. }) => {
                    eprint!("{title}: 0 KiB");
                }
                Ok(DownloadEvent::TrackProgress { title, bytes }) => {
                    eprint!("\r{title}: {} KiB", bytes / 1024);
                    let _ = std::io::stderr().flush();
                }
                Ok(DownloadEvent::TrackCompleted { title, bytes, .. }) => {
                    eprintln!("\r{title}: {} KiB done", bytes / 1024);
                }
                Ok(DownloadEvent::TrackFailed { title, error, .. }) => {
                    eprintln!("\r{title}: failed ({error})");
                }
                Ok(DownloadEvent::PageFetched { .. }) => {}
                Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => break,
            }
        }
    });

    let result = downloader.download_all(&args.urls, &config).await;
    drop(downloader);
    let _ = progress.await;

    match result {
        Ok(summary) => {
            println!(
                "Downloaded {} tracks from {} pages",
                summary.tracks, summary.pages
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("Download failed: {e}");
            std::process::exit(1);
        }
    }
}
