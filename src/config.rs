use crate::{Result, SoundrainError};
use std::path::{Path, PathBuf};

/// Environment variable that makes the fetcher dump every fetched page to
/// `debug_responses/`.
pub const DEBUG_SAVE_RESPONSES_ENV: &str = "SOUNDRAIN_DEBUG_SAVE_RESPONSES";

/// Whether fetched pages should be saved for debugging.
pub fn debug_save_responses_enabled() -> bool {
    std::env::var(DEBUG_SAVE_RESPONSES_ENV).is_ok()
}

/// Options for one download run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadConfig {
    /// Directory files are written to. Must exist.
    pub output_root: PathBuf,
    /// Download every subpage instead of only the requested one.
    pub all_pages: bool,
    /// Mirror each listing's path segments as subdirectories of `output_root`.
    pub create_dirs: bool,
}

impl DownloadConfig {
    /// Create a config writing into `output_root`, which must already exist.
    pub fn new(output_root: impl AsRef<Path>) -> Result<Self> {
        let output_root = output_root.as_ref();
        if !output_root.is_dir() {
            return Err(SoundrainError::MissingOutputDir(output_root.to_path_buf()));
        }

        Ok(Self {
            output_root: output_root.to_path_buf(),
            all_pages: false,
            create_dirs: false,
        })
    }

    pub fn with_all_pages(mut self, all_pages: bool) -> Self {
        self.all_pages = all_pages;
        self
    }

    pub fn with_create_dirs(mut self, create_dirs: bool) -> Self {
        self.create_dirs = create_dirs;
        self
    }
}
