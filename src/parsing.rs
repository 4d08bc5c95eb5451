//! HTML parsing for SoundCloud listing pages.
//!
//! Listing pages embed each track as a `div[data-sc-track]` holding a script
//! whose first parenthesized argument is the track's JSON object. Subpages are
//! linked from a `div.pagination` block whose last numbered link precedes the
//! "next page" link.

use crate::{Result, SoundrainError, Track};
use scraper::{ElementRef, Html, Selector};

/// Stateless parser for SoundCloud listing pages.
#[derive(Debug, Clone, Default)]
pub struct SoundCloudParser;

impl SoundCloudParser {
    /// Create a new parser instance.
    pub fn new() -> Self {
        Self
    }

    /// Extract every embedded track from the document, in page order.
    ///
    /// Any script whose payload cannot be isolated or decoded fails the whole
    /// page.
    pub fn extract_tracks(&self, document: &Html) -> Result<Vec<Track>> {
        let container_selector = Selector::parse("div[data-sc-track]").unwrap();

        let mut tracks = Vec::new();
        for container in document.select(&container_selector) {
            let Some(script) = first_child_element(&container, "script") else {
                log::debug!("Skipping track container without a script element");
                continue;
            };

            let script_text = script.text().collect::<String>();
            let payload = extract_payload(&script_text).ok_or_else(|| {
                SoundrainError::MalformedPageData(format!(
                    "No parenthesized payload in track script: {}",
                    script_text.trim()
                ))
            })?;

            let track = Track::from_payload(payload)?;
            log::debug!("Parsed track '{}'", track.title);
            tracks.push(track);
        }

        log::debug!("Extracted {} tracks", tracks.len());
        Ok(tracks)
    }

    /// Number of the last subpage, or 1 when there is no "next page" link.
    pub fn last_page_number(&self, document: &Html) -> Result<u32> {
        let next_selector = Selector::parse("div.pagination > a.next_page").unwrap();

        let Some(next_link) = document.select(&next_selector).next() else {
            return Ok(1);
        };

        let last_link = next_link
            .prev_siblings()
            .find_map(ElementRef::wrap)
            .ok_or_else(|| {
                SoundrainError::MalformedPageData(
                    "Pagination has no link before the next page link".to_string(),
                )
            })?;

        let text = last_link.text().collect::<String>();
        text.trim()
            .parse::<u32>()
            .ok()
            .filter(|page| *page > 0)
            .ok_or_else(|| {
                SoundrainError::MalformedPageData(format!(
                    "Last page link is not a page number: {:?}",
                    text.trim()
                ))
            })
    }
}

fn first_child_element<'a>(parent: &ElementRef<'a>, name: &str) -> Option<ElementRef<'a>> {
    parent
        .children()
        .filter_map(ElementRef::wrap)
        .find(|child| child.value().name() == name)
}

/// Contents of the first top-level parenthesized span of a script, without the
/// parentheses.
///
/// Parentheses inside quoted strings do not count towards nesting.
pub fn extract_payload(script: &str) -> Option<&str> {
    let start = script.find('(')?;
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (offset, c) in script[start..].char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '"' | '\'' => quote = Some(c),
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&script[start + 1..start + offset]);
                }
            }
            _ => {}
        }
    }

    None
}
