use serde::Serialize;

use super::model::{Breakdown, Issue, Scores};
use super::normalize::{NormalizedPage, PageInfo, ResourceBreakdown, Timing};
use super::overview::SiteOverview;
use super::rules::Evaluation;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Display-formatted measurements.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub ttfb: String,
    pub fcp: String,
    pub dom_load: String,
    pub page_load: String,
    pub network_requests: u32,
    pub page_size: String,
    pub load_time: String,
    pub css_files: usize,
    pub js_files: usize,
    pub image_count: usize,
    pub font_files: usize,
}

impl Metrics {
    pub fn new(
        timing: &Timing,
        network_requests: u32,
        page_size_kb: f64,
        load_time_ms: f64,
        resources: &ResourceBreakdown,
    ) -> Self {
        Self {
            ttfb: format_ms(timing.ttfb_ms),
            fcp: format_ms(timing.fcp_ms),
            dom_load: format_ms(timing.dom_load_ms),
            page_load: format_ms(timing.page_load_ms),
            network_requests,
            page_size: format!("{:.2} KB", page_size_kb),
            load_time: format!("{:.2}s", load_time_ms / 1000.0),
            css_files: resources.css,
            js_files: resources.js,
            image_count: resources.images,
            font_files: resources.fonts,
        }
    }
}

pub fn format_ms(ms: f64) -> String {
    format!("{:.0}ms", ms)
}

/// The complete analysis result for one page. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub url: String,
    pub timestamp: String,
    pub page_info: PageInfo,
    pub screenshot: Option<String>,
    pub scores: Scores,
    pub metrics: Metrics,
    pub issues: Vec<Issue>,
    pub breakdown: Breakdown,
    pub overview: SiteOverview,
}

pub fn now_timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

pub fn assemble(
    url: &str,
    timestamp: String,
    screenshot: Option<String>,
    page: NormalizedPage,
    evaluation: Evaluation,
    scores: Scores,
) -> Report {
    let metrics = Metrics::new(
        &page.timing,
        page.record.network_request_count,
        page.record.page_size_kb,
        page.load_time_ms,
        &page.resources,
    );

    Report {
        url: url.to_string(),
        timestamp,
        page_info: page.page_info,
        screenshot,
        scores,
        metrics,
        issues: evaluation.issues,
        breakdown: evaluation.breakdown,
        overview: page.overview,
    }
}
