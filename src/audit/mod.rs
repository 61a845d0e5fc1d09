pub mod model;
pub mod normalize;
pub mod overview;
pub mod report;
pub mod rules;
pub mod scores;
pub mod target;

use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

use crate::error::AuditError;
use crate::probe::PageProbe;
use crate::screenshots::ScreenshotStore;
use report::Report;

/// Runs the analysis pipeline for one URL at a time:
/// probe → normalize → evaluate → aggregate → assemble.
///
/// Holds no per-request state, so one instance serves concurrent requests.
#[derive(Clone)]
pub struct Auditor {
    probe: Arc<dyn PageProbe>,
    screenshots: ScreenshotStore,
    timeout: Duration,
}

impl Auditor {
    pub fn new(probe: Arc<dyn PageProbe>, screenshots: ScreenshotStore, timeout: Duration) -> Self {
        Self {
            probe,
            screenshots,
            timeout,
        }
    }

    pub async fn analyze(&self, raw_url: Option<&str>) -> Result<Report, AuditError> {
        let url = target::parse_target(raw_url)?;
        let raw = raw_url.map(str::trim).unwrap_or_default();

        info!("Analyzing {}", url);
        // The probe receives the timeout too, but the bound is enforced here
        let facts = tokio::time::timeout(self.timeout, self.probe.fetch(&url, self.timeout))
            .await
            .map_err(|_| AuditError::Timeout(self.timeout_ms()))??;
        let screenshot = self.capture_screenshot(&url).await;

        let page = normalize::normalize(&facts);
        let evaluation = rules::evaluate(&page.record);
        let scores = scores::aggregate(&evaluation.breakdown);

        info!(
            "Analyzed {}: performance={} seo={} accessibility={} best_practices={}",
            url, scores.performance, scores.seo, scores.accessibility, scores.best_practices
        );

        Ok(report::assemble(
            raw,
            report::now_timestamp(),
            screenshot,
            page,
            evaluation,
            scores,
        ))
    }

    fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }

    /// Screenshot failures never fail the analysis.
    async fn capture_screenshot(&self, url: &Url) -> Option<String> {
        let capture = tokio::time::timeout(self.timeout, self.probe.screenshot(url, self.timeout));
        let png = match capture.await {
            Ok(Ok(png)) => png,
            Ok(Err(e)) => {
                warn!("Screenshot error for {}: {}", url, e);
                return None;
            }
            Err(_) => {
                warn!("Screenshot of {} timed out after {}ms", url, self.timeout_ms());
                return None;
            }
        };
        match self.screenshots.save(&png).await {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Failed to store screenshot for {}: {}", url, e);
                None
            }
        }
    }
}
