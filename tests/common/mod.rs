#![allow(dead_code)]

use async_trait::async_trait;
use futures::io::AsyncRead;
use soundrain::{PageFetcher, RequestKind, Result, SoundrainError, Transport, TransportResponse};
use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

enum Route {
    Body(u16, Vec<u8>),
    BrokenStream(Vec<u8>),
}

#[derive(Default)]
struct FakeState {
    routes: HashMap<String, Route>,
    requests: Vec<(String, RequestKind)>,
}

/// In-memory transport that answers from a fixed route table and records
/// every request it receives.
#[derive(Clone, Default)]
pub struct FakeTransport {
    state: Rc<RefCell<FakeState>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, url: &str, status: u16, body: impl Into<Vec<u8>>) -> &Self {
        self.state
            .borrow_mut()
            .routes
            .insert(url.to_string(), Route::Body(status, body.into()));
        self
    }

    /// Answer `200 OK` but fail after sending `prefix`.
    pub fn respond_broken(&self, url: &str, prefix: impl Into<Vec<u8>>) -> &Self {
        self.state
            .borrow_mut()
            .routes
            .insert(url.to_string(), Route::BrokenStream(prefix.into()));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.state
            .borrow()
            .requests
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }

    pub fn requests_of_kind(&self, kind: RequestKind) -> Vec<String> {
        self.state
            .borrow()
            .requests
            .iter()
            .filter(|(_, k)| *k == kind)
            .map(|(url, _)| url.clone())
            .collect()
    }

    pub fn fetcher(&self) -> PageFetcher {
        PageFetcher::new(Box::new(self.clone())).with_debug_save_responses(false)
    }
}

#[async_trait(?Send)]
impl Transport for FakeTransport {
    async fn get(&self, url: &str, kind: RequestKind) -> Result<TransportResponse> {
        let mut state = self.state.borrow_mut();
        state.requests.push((url.to_string(), kind));

        match state.routes.get(url) {
            Some(Route::Body(status, body)) => {
                Ok(TransportResponse::from_bytes(*status, body.clone()))
            }
            Some(Route::BrokenStream(prefix)) => Ok(TransportResponse::new(
                200,
                Box::new(BrokenReader {
                    prefix: prefix.clone(),
                    sent: false,
                }),
            )),
            None => Err(SoundrainError::Http(format!("No route for {url}"))),
        }
    }
}

/// Yields its prefix once, then fails.
struct BrokenReader {
    prefix: Vec<u8>,
    sent: bool,
}

impl AsyncRead for BrokenReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut [u8],
    ) -> Poll<io::Result<usize>> {
        if self.sent {
            return Poll::Ready(Err(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "connection reset",
            )));
        }
        let n = self.prefix.len().min(buf.len());
        buf[..n].copy_from_slice(&self.prefix[..n]);
        self.sent = true;
        Poll::Ready(Ok(n))
    }
}

/// A track container the way listing pages embed it.
pub fn track_div(payload: &str) -> String {
    format!(
        r#"<div class="player" data-sc-track="1"><script type="text/javascript">window.SC.bufferTracks.push({payload});</script></div>"#
    )
}

/// Pagination block linking pages 1..=last followed by a "next page" link.
pub fn pagination(last: u32) -> String {
    let links: String = (1..=last)
        .map(|page| format!(r#"<a href="?page={page}">{page}</a> "#))
        .collect();
    format!(
        r#"<div class="pagination"><span class="previous_page">Previous</span> {links}<a class="next_page" href="?page=2">Next</a></div>"#
    )
}

/// A full listing page with the given track payloads and optional pagination.
pub fn listing_page(payloads: &[&str], last_page: Option<u32>) -> String {
    let tracks: String = payloads.iter().map(|p| track_div(p)).collect();
    let pager = last_page.map(pagination).unwrap_or_default();
    format!(
        r#"<!DOCTYPE html><html><head><title>Tracks</title></head><body><div id="main">{tracks}</div>{pager}</body></html>"#
    )
}
