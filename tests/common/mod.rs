#![allow(dead_code)]

use bytes::Bytes;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use page_auditor::audit::Auditor;
use page_auditor::error::AuditError;
use page_auditor::probe::dom::Document;
use page_auditor::probe::{
    ExtractError, NavigationTiming, PageProbe, PaintEntry, RawPageFacts, ResourceEntry,
    FIRST_CONTENTFUL_PAINT,
};
use page_auditor::screenshots::ScreenshotStore;

/// A page that passes every check when served over HTTPS.
pub const OPTIMAL_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Handmade ceramic mugs and bowls, shipped</title>
<meta name="description" content="Browse small-batch stoneware mugs, bowls and plates thrown by hand in our studio. Every piece is glazed, fired and packed with care before it ships.">
<meta name="viewport" content="width=device-width, initial-scale=1">
<meta property="og:image" content="https://shop.test/og.png">
<link rel="stylesheet" href="/app.css">
</head>
<body>
<h1>Studio pottery</h1>
<img src="/mug.png" alt="Blue mug">
<script src="/app.js" defer></script>
</body>
</html>"#;

pub enum FetchBehavior {
    Page(&'static str),
    Fail(&'static str),
    Hang,
}

/// Deterministic probe for pipeline tests.
pub struct StubProbe {
    pub behavior: FetchBehavior,
    pub timing: NavigationTiming,
    pub fcp_ms: f64,
    pub resource_count: usize,
    pub screenshot: Option<&'static [u8]>,
    pub screenshot_hangs: bool,
    pub fetches: AtomicUsize,
    pub screenshots_taken: AtomicUsize,
}

impl StubProbe {
    pub fn page(html: &'static str) -> Self {
        Self {
            behavior: FetchBehavior::Page(html),
            timing: NavigationTiming {
                dns_ms: 3.0,
                tcp_ms: 8.0,
                ttfb_ms: 200.0,
                dom_load_ms: 900.0,
                page_load_ms: 1200.0,
            },
            fcp_ms: 500.0,
            resource_count: 20,
            screenshot: None,
            screenshot_hangs: false,
            fetches: AtomicUsize::new(0),
            screenshots_taken: AtomicUsize::new(0),
        }
    }

    pub fn failing(cause: &'static str) -> Self {
        Self {
            behavior: FetchBehavior::Fail(cause),
            ..Self::page("")
        }
    }

    pub fn hanging() -> Self {
        Self {
            behavior: FetchBehavior::Hang,
            ..Self::page("")
        }
    }

    fn facts(&self, url: &Url, html: &str) -> RawPageFacts {
        let resources = (0..self.resource_count)
            .map(|i| ResourceEntry {
                name: format!("https://cdn.test/asset-{}.png", i),
                initiator_type: "img".to_string(),
            })
            .collect();
        RawPageFacts {
            requested_url: url.clone(),
            final_url: url.clone(),
            status: 200,
            load_time_ms: self.timing.page_load_ms,
            navigation: Ok(self.timing),
            paint: Ok(vec![PaintEntry {
                name: FIRST_CONTENTFUL_PAINT.to_string(),
                start_time_ms: self.fcp_ms,
            }]),
            resources: Ok(resources),
            html: Ok(html.to_string()),
            document: Ok(Document::parse(html)),
        }
    }
}

impl PageProbe for StubProbe {
    fn fetch<'a>(
        &'a self,
        url: &'a Url,
        _timeout: Duration,
    ) -> BoxFuture<'a, Result<RawPageFacts, AuditError>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        async move {
            match self.behavior {
                FetchBehavior::Page(html) => Ok(self.facts(url, html)),
                FetchBehavior::Fail(cause) => Err(AuditError::Probe(cause.to_string())),
                // Ignores the timeout; the auditor has to bound it
                FetchBehavior::Hang => futures::future::pending().await,
            }
        }
        .boxed()
    }

    fn screenshot<'a>(
        &'a self,
        _url: &'a Url,
        _timeout: Duration,
    ) -> BoxFuture<'a, Result<Bytes, AuditError>> {
        self.screenshots_taken.fetch_add(1, Ordering::SeqCst);
        if self.screenshot_hangs {
            return futures::future::pending().boxed();
        }
        let result = self
            .screenshot
            .map(Bytes::from_static)
            .ok_or_else(|| AuditError::Other("no screenshot".to_string()));
        async move { result }.boxed()
    }
}

pub fn auditor(probe: Arc<StubProbe>, screenshot_dir: &std::path::Path) -> Auditor {
    Auditor::new(
        probe,
        ScreenshotStore::new(screenshot_dir),
        Duration::from_millis(200),
    )
}

pub fn unavailable(fact: &'static str) -> ExtractError {
    ExtractError::Unavailable(fact, "stubbed".to_string())
}
