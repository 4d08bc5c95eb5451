use crate::target::{listing_url, page_url};
use crate::{DownloadConfig, ListingTarget, Page, PageFetcher, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Resolve the concrete page URLs to download for a listing path.
///
/// The listing is fetched once to learn its last page number. With
/// `fetch_all` every page from 1 to the last is returned in ascending order;
/// otherwise only `requested_page`.
pub async fn build_urls(
    fetcher: &PageFetcher,
    base_path: &str,
    requested_page: u32,
    fetch_all: bool,
) -> Result<Vec<String>> {
    let url = listing_url(base_path);
    let last_page = Page::fetch(fetcher, &url).await?.last_page()?;
    log::debug!("Listing {url} has {last_page} pages");

    let urls = if fetch_all {
        (1..=last_page).map(|page| page_url(&url, page)).collect()
    } else {
        vec![page_url(&url, requested_page)]
    };

    Ok(urls)
}

/// Directory tracks of `path` are written to.
///
/// With `create_dirs`, the path segments of the listing are mirrored below
/// `root` and created if missing.
pub fn output_dir_for(root: &Path, path: &str, create_dirs: bool) -> Result<PathBuf> {
    if !create_dirs {
        return Ok(root.to_path_buf());
    }

    let dir = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .fold(root.to_path_buf(), |dir, segment| dir.join(segment));
    if !dir.is_dir() {
        log::debug!("Creating output directory {}", dir.display());
        fs::create_dir_all(&dir)?;
    }

    Ok(dir)
}

/// Everything needed to download one user-supplied listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlPlan {
    pub path: String,
    pub requested_page: u32,
    pub urls: Vec<String>,
    pub output_dir: PathBuf,
}

impl UrlPlan {
    /// Resolve page URLs and the output directory for `target`.
    pub async fn build(
        fetcher: &PageFetcher,
        target: &ListingTarget,
        config: &DownloadConfig,
    ) -> Result<Self> {
        let urls = build_urls(fetcher, &target.path, target.page, config.all_pages).await?;
        let output_dir = output_dir_for(&config.output_root, &target.path, config.create_dirs)?;

        Ok(Self {
            path: target.path.clone(),
            requested_page: target.page,
            urls,
            output_dir,
        })
    }
}
