//! SoundCloud URL shapes and listing targets.

use crate::{Result, SoundrainError};
use http_types::Url;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

/// Scheme and host listing URLs are built under.
pub const SITE_BASE_URL: &str = "https://soundcloud.com";

static SITE_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^https?://(?:www\.)?soundcloud\.com/[\w-]+(?:[/?#].*)?$").unwrap());

/// Whether `url` looks like a SoundCloud user or track URL.
pub fn is_site_url(url: &str) -> bool {
    SITE_URL_RE.is_match(url)
}

/// Check the URL shape, failing with [`SoundrainError::InvalidUrl`].
pub fn validate_url(url: &str) -> Result<()> {
    if is_site_url(url) {
        Ok(())
    } else {
        Err(SoundrainError::InvalidUrl(url.to_string()))
    }
}

/// Full listing URL for a site path such as `/someone/tracks`.
pub fn listing_url(path: &str) -> String {
    format!("{SITE_BASE_URL}{path}")
}

/// URL of one subpage of a listing.
pub fn page_url(listing_url: &str, page: u32) -> String {
    format!("{listing_url}?page={page}")
}

/// A user-supplied listing URL reduced to what the URL plan needs: the path on
/// the site and the page number it asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingTarget {
    pub path: String,
    pub page: u32,
}

impl ListingTarget {
    /// Parse a user-supplied URL.
    ///
    /// The page comes from a `page=<n>` query parameter and defaults to 1.
    ///
    /// ```
    /// use soundrain::ListingTarget;
    ///
    /// let target = ListingTarget::parse("https://soundcloud.com/someone/tracks?page=3").unwrap();
    /// assert_eq!(target.path, "/someone/tracks");
    /// assert_eq!(target.page, 3);
    /// ```
    pub fn parse(url: &str) -> Result<Self> {
        validate_url(url)?;
        let parsed = Url::parse(url).map_err(|_| SoundrainError::InvalidUrl(url.to_string()))?;

        let page = parsed
            .query_pairs()
            .find(|(key, _)| key == "page")
            .and_then(|(_, value)| value.parse::<u32>().ok())
            .filter(|page| *page > 0)
            .unwrap_or(1);

        Ok(Self {
            path: parsed.path().to_string(),
            page,
        })
    }

    /// Listing URL of this target, without any page suffix.
    pub fn url(&self) -> String {
        listing_url(&self.path)
    }
}

impl FromStr for ListingTarget {
    type Err = SoundrainError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ListingTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", page_url(&self.url(), self.page))
    }
}
