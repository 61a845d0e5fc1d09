pub mod dom;
pub mod http;

use bytes::Bytes;
use futures::future::BoxFuture;
use std::time::Duration;
use url::Url;

use crate::error::AuditError;
use dom::Document;

/// Why a single fact could not be read from an otherwise loaded page.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExtractError {
    #[error("{0} is not supported by this probe")]
    Unsupported(&'static str),

    #[error("{0} unavailable: {1}")]
    Unavailable(&'static str, String),
}

/// A fact the probe may or may not have managed to read.
pub type Fact<T> = Result<T, ExtractError>;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NavigationTiming {
    pub dns_ms: f64,
    pub tcp_ms: f64,
    pub ttfb_ms: f64,
    pub dom_load_ms: f64,
    pub page_load_ms: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaintEntry {
    pub name: String,
    pub start_time_ms: f64,
}

pub const FIRST_CONTENTFUL_PAINT: &str = "first-contentful-paint";

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceEntry {
    pub name: String,
    pub initiator_type: String,
}

/// Everything a probe learned about one page load.
///
/// `requested_url` and `load_time_ms` are always known once navigation
/// succeeded; every other fact is read independently and may be missing.
#[derive(Debug, Clone)]
pub struct RawPageFacts {
    pub requested_url: Url,
    pub final_url: Url,
    pub status: u16,
    pub load_time_ms: f64,
    pub navigation: Fact<NavigationTiming>,
    pub paint: Fact<Vec<PaintEntry>>,
    pub resources: Fact<Vec<ResourceEntry>>,
    pub html: Fact<String>,
    pub document: Fact<Document>,
}

/// Loads pages and reads raw facts from them.
///
/// Implementations must not share mutable session state between calls;
/// concurrent analyses each get an independent load.
pub trait PageProbe: Send + Sync {
    /// Navigate to `url`. Fails as a whole if the page cannot be loaded
    /// within `timeout`.
    fn fetch<'a>(
        &'a self,
        url: &'a Url,
        timeout: Duration,
    ) -> BoxFuture<'a, Result<RawPageFacts, AuditError>>;

    /// Capture a PNG of the page viewport.
    fn screenshot<'a>(
        &'a self,
        url: &'a Url,
        timeout: Duration,
    ) -> BoxFuture<'a, Result<Bytes, AuditError>>;
}
