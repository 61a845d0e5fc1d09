//! Page probe backed by a plain HTTP fetch.
//!
//! Timing is measured around the request: TTFB is the time until response
//! headers arrive, DOM/page load the time until the body is fully read. Paint
//! timing needs a rendering engine and is reported as unsupported. Screenshots
//! are delegated to an external headless browser when one is configured.

use bytes::Bytes;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use url::Url;

use super::dom::{Document, Element};
use super::{ExtractError, NavigationTiming, PageProbe, RawPageFacts, ResourceEntry};
use crate::config::{USER_AGENT, VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use crate::error::AuditError;

pub struct HttpProbe {
    client: reqwest::Client,
    screenshot_command: Option<PathBuf>,
}

impl HttpProbe {
    pub fn new(screenshot_command: Option<PathBuf>) -> Result<Self, AuditError> {
        // No cookie store: every fetch is an independent session
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AuditError::Other(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            screenshot_command,
        })
    }

    async fn load(&self, url: &Url) -> Result<RawPageFacts, AuditError> {
        let started = Instant::now();

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| AuditError::Probe(describe_reqwest_error(&e)))?;
        let ttfb_ms = elapsed_ms(started);

        let status = response.status();
        let final_url = response.url().clone();
        if !status.is_success() {
            warn!("{} responded with status {}", final_url, status);
        }

        let html = response
            .text()
            .await
            .map_err(|e| ExtractError::Unavailable("html", e.to_string()));
        let load_time_ms = elapsed_ms(started);

        let navigation = match &html {
            Ok(_) => Ok(NavigationTiming {
                // Connection setup happens inside the client pool
                dns_ms: 0.0,
                tcp_ms: 0.0,
                ttfb_ms,
                dom_load_ms: load_time_ms,
                page_load_ms: load_time_ms,
            }),
            Err(e) => Err(ExtractError::Unavailable("navigation timing", e.to_string())),
        };

        let document = html.as_ref().map(|body| Document::parse(body)).map_err(|e| e.clone());
        let resources = document
            .as_ref()
            .map(|doc| subresources(doc, &final_url))
            .map_err(|e| e.clone());

        debug!(
            "Fetched {} ({}) in {:.0}ms, ttfb {:.0}ms",
            final_url, status, load_time_ms, ttfb_ms
        );

        Ok(RawPageFacts {
            requested_url: url.clone(),
            final_url,
            status: status.as_u16(),
            load_time_ms,
            navigation,
            paint: Err(ExtractError::Unsupported("paint timing")),
            resources,
            html,
            document,
        })
    }

    async fn capture(&self, url: &Url, timeout: Duration) -> Result<Bytes, AuditError> {
        let command = self
            .screenshot_command
            .as_ref()
            .ok_or_else(|| AuditError::Other("Screenshot capture is not configured".to_string()))?;

        let target = std::env::temp_dir().join(format!(
            "page-auditor-{}.png",
            uuid::Uuid::new_v4().simple()
        ));

        let result = run_capture(command, url, &target, timeout).await;
        match tokio::fs::remove_file(&target).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => debug!("Failed to remove temporary screenshot {:?}: {}", target, e),
        }
        let png = result?;
        info!("Captured screenshot of {} ({} bytes)", url, png.len());
        Ok(Bytes::from(png))
    }
}

impl PageProbe for HttpProbe {
    fn fetch<'a>(
        &'a self,
        url: &'a Url,
        timeout: Duration,
    ) -> BoxFuture<'a, Result<RawPageFacts, AuditError>> {
        async move {
            tokio::time::timeout(timeout, self.load(url))
                .await
                .map_err(|_| AuditError::Timeout(timeout.as_millis() as u64))?
        }
        .boxed()
    }

    fn screenshot<'a>(
        &'a self,
        url: &'a Url,
        timeout: Duration,
    ) -> BoxFuture<'a, Result<Bytes, AuditError>> {
        self.capture(url, timeout).boxed()
    }
}

async fn run_capture(
    command: &Path,
    url: &Url,
    target: &Path,
    timeout: Duration,
) -> Result<Vec<u8>, AuditError> {
    let child = tokio::process::Command::new(command)
        .args([
            "--headless".to_string(),
            "--disable-gpu".to_string(),
            "--hide-scrollbars".to_string(),
            format!("--window-size={},{}", VIEWPORT_WIDTH, VIEWPORT_HEIGHT),
            format!("--screenshot={}", target.display()),
            url.to_string(),
        ])
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output();

    let output = tokio::time::timeout(timeout, child)
        .await
        .map_err(|_| AuditError::Timeout(timeout.as_millis() as u64))??;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(AuditError::Other(format!(
            "Screenshot command exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    Ok(tokio::fs::read(target).await?)
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}

fn describe_reqwest_error(e: &reqwest::Error) -> String {
    let kind = if e.is_connect() {
        "connection failed"
    } else if e.is_timeout() {
        "request timed out"
    } else if e.is_builder() {
        "invalid request"
    } else if e.is_redirect() {
        "too many redirects"
    } else {
        "request failed"
    };
    format!("{}: {}", kind, e)
}

/// Subresources the page references, in document order, as the browser's
/// resource timing list would report them.
pub fn subresources(doc: &Document, base: &Url) -> Vec<ResourceEntry> {
    let mut entries = Vec::new();
    for element in doc.elements() {
        let (attr, initiator) = match element.tag.as_str() {
            "link" if is_fetched_link(element) => ("href", "link"),
            "script" => ("src", "script"),
            "img" => ("src", "img"),
            "iframe" => ("src", "iframe"),
            "video" | "audio" | "source" | "track" | "embed" => ("src", "other"),
            _ => continue,
        };
        let Some(raw) = element.non_empty_attr(attr) else {
            continue;
        };
        if let Ok(resolved) = base.join(raw) {
            if matches!(resolved.scheme(), "http" | "https") {
                entries.push(ResourceEntry {
                    name: resolved.to_string(),
                    initiator_type: initiator.to_string(),
                });
            }
        }
    }
    entries
}

fn is_fetched_link(link: &Element) -> bool {
    ["stylesheet", "preload", "modulepreload", "manifest"]
        .iter()
        .any(|rel| link.has_token("rel", rel))
        || link
            .attr("rel")
            .is_some_and(|rel| rel.to_ascii_lowercase().contains("icon"))
}
