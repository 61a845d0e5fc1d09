//! Turns raw probe output into the fully populated records the rules and the
//! report read.
//!
//! Every fact is extracted by its own fallible function. [`or_default`] is the
//! single place a failed extraction is absorbed: the failure is logged and the
//! documented default takes its place.

use serde::Serialize;
use tracing::debug;
use url::Url;

use super::model::{MeasurementRecord, ROBOTS_NOT_SET};
use super::overview::{site_overview, SiteOverview};
use crate::probe::dom::Document;
use crate::probe::{Fact, RawPageFacts, FIRST_CONTENTFUL_PAINT};

const COULD_NOT_EXTRACT: &str = "Could not extract";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageInfo {
    pub title: String,
    pub description: String,
    pub favicon: String,
    pub h1: String,
}

impl Default for PageInfo {
    fn default() -> Self {
        Self {
            title: COULD_NOT_EXTRACT.to_string(),
            description: COULD_NOT_EXTRACT.to_string(),
            favicon: String::new(),
            h1: COULD_NOT_EXTRACT.to_string(),
        }
    }
}

/// Timing facts in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Timing {
    pub dns_ms: f64,
    pub tcp_ms: f64,
    pub ttfb_ms: f64,
    pub fcp_ms: f64,
    pub dom_load_ms: f64,
    pub page_load_ms: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResourceBreakdown {
    pub css: usize,
    pub js: usize,
    pub images: usize,
    pub fonts: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AltCoverage {
    pub total: u32,
    pub missing: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetaFacts {
    pub title_length: u32,
    pub description_length: u32,
    pub viewport: bool,
    pub og_image: bool,
    pub og_title: bool,
    pub og_description: bool,
    pub canonical: bool,
    pub robots: String,
}

impl Default for MetaFacts {
    fn default() -> Self {
        Self {
            title_length: 0,
            description_length: 0,
            viewport: false,
            og_image: false,
            og_title: false,
            og_description: false,
            canonical: false,
            robots: ROBOTS_NOT_SET.to_string(),
        }
    }
}

/// Everything downstream stages need, with no missing values.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedPage {
    pub record: MeasurementRecord,
    pub page_info: PageInfo,
    pub timing: Timing,
    pub resources: ResourceBreakdown,
    pub overview: SiteOverview,
    pub load_time_ms: f64,
}

pub fn or_default<T>(fact: &'static str, default: T, extracted: Fact<T>) -> T {
    match extracted {
        Ok(value) => value,
        Err(e) => {
            debug!(fact, error = %e, "Fact unavailable, using default");
            default
        }
    }
}

fn document(facts: &RawPageFacts) -> Fact<&Document> {
    facts.document.as_ref().map_err(|e| e.clone())
}

fn non_negative(ms: f64) -> f64 {
    if ms.is_finite() && ms > 0.0 {
        ms
    } else {
        0.0
    }
}

/// Length in UTF-16 code units, the way the DOM reports string length.
fn dom_len(s: &str) -> u32 {
    u32::try_from(s.encode_utf16().count()).unwrap_or(u32::MAX)
}

fn count_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

pub fn extract_page_info(facts: &RawPageFacts) -> Fact<PageInfo> {
    let doc = document(facts)?;
    Ok(PageInfo {
        title: doc.title().to_string(),
        description: doc
            .meta_named("description")
            .and_then(|m| m.attr("content"))
            .unwrap_or("")
            .to_string(),
        favicon: doc
            .icon_link()
            .and_then(|l| l.non_empty_attr("href"))
            .and_then(|href| facts.final_url.join(href.trim()).ok())
            .map(|u| u.to_string())
            .unwrap_or_default(),
        h1: doc
            .first_h1_text()
            .unwrap_or("No H1 found")
            .to_string(),
    })
}

pub fn extract_navigation(facts: &RawPageFacts) -> Fact<Timing> {
    let nav = facts.navigation.as_ref().map_err(|e| e.clone())?;
    Ok(Timing {
        dns_ms: non_negative(nav.dns_ms),
        tcp_ms: non_negative(nav.tcp_ms),
        ttfb_ms: non_negative(nav.ttfb_ms),
        fcp_ms: 0.0,
        dom_load_ms: non_negative(nav.dom_load_ms),
        page_load_ms: non_negative(nav.page_load_ms),
    })
}

pub fn extract_fcp(facts: &RawPageFacts) -> Fact<f64> {
    let paint = facts.paint.as_ref().map_err(|e| e.clone())?;
    Ok(paint
        .iter()
        .find(|p| p.name == FIRST_CONTENTFUL_PAINT)
        .map_or(0.0, |p| non_negative(p.start_time_ms)))
}

pub fn extract_network_requests(facts: &RawPageFacts) -> Fact<u32> {
    let resources = facts.resources.as_ref().map_err(|e| e.clone())?;
    Ok(count_u32(resources.len()))
}

pub fn extract_page_size_kb(facts: &RawPageFacts) -> Fact<f64> {
    let html = facts.html.as_ref().map_err(|e| e.clone())?;
    Ok(html.len() as f64 / 1024.0)
}

pub fn extract_resource_breakdown(facts: &RawPageFacts) -> Fact<ResourceBreakdown> {
    let resources = facts.resources.as_ref().map_err(|e| e.clone())?;
    let named = |needle: &str| resources.iter().filter(|r| r.name.contains(needle)).count();
    Ok(ResourceBreakdown {
        css: named(".css"),
        js: named(".js"),
        images: resources.iter().filter(|r| r.initiator_type == "img").count(),
        fonts: resources
            .iter()
            .filter(|r| r.name.contains(".woff") || r.name.contains(".ttf"))
            .count(),
    })
}

pub fn extract_alt_coverage(facts: &RawPageFacts) -> Fact<AltCoverage> {
    let doc = document(facts)?;
    let total = count_u32(doc.count("img"));
    let missing = count_u32(
        doc.select("img")
            .filter(|img| img.non_empty_attr("alt").is_none())
            .count(),
    );
    Ok(AltCoverage {
        total,
        missing: missing.min(total),
    })
}

pub fn extract_meta(facts: &RawPageFacts) -> Fact<MetaFacts> {
    let doc = document(facts)?;
    let description = doc
        .meta_named("description")
        .and_then(|m| m.attr("content"))
        .unwrap_or("");
    Ok(MetaFacts {
        title_length: dom_len(doc.title()),
        description_length: dom_len(description),
        viewport: doc.meta_named("viewport").is_some(),
        og_image: doc.meta_property("og:image").is_some(),
        og_title: doc.meta_property("og:title").is_some(),
        og_description: doc.meta_property("og:description").is_some(),
        canonical: doc.link_rel("canonical").is_some(),
        robots: doc
            .meta_named("robots")
            .and_then(|m| m.non_empty_attr("content"))
            .unwrap_or(ROBOTS_NOT_SET)
            .to_string(),
    })
}

pub fn extract_overview(facts: &RawPageFacts) -> Fact<SiteOverview> {
    let doc = document(facts)?;
    Ok(site_overview(doc, &facts.final_url))
}

/// HTTPS is judged from the URL the caller asked for, regardless of what the
/// probe managed to read.
pub fn is_https(url: &Url) -> bool {
    url.scheme() == "https"
}

pub fn normalize(facts: &RawPageFacts) -> NormalizedPage {
    let load_time_ms = non_negative(facts.load_time_ms);

    let mut timing = or_default(
        "navigation timing",
        Timing {
            dom_load_ms: load_time_ms,
            page_load_ms: load_time_ms,
            ..Timing::default()
        },
        extract_navigation(facts),
    );
    timing.fcp_ms = or_default("first contentful paint", 0.0, extract_fcp(facts));

    let network_requests = or_default("network requests", 0, extract_network_requests(facts));
    let page_size_kb = or_default("page size", 0.0, extract_page_size_kb(facts));
    let alt = or_default("image alt coverage", AltCoverage::default(), extract_alt_coverage(facts));
    let meta = or_default("meta tags", MetaFacts::default(), extract_meta(facts));

    let record = MeasurementRecord {
        ttfb_ms: timing.ttfb_ms,
        fcp_ms: timing.fcp_ms,
        dom_load_ms: timing.dom_load_ms,
        page_load_ms: timing.page_load_ms,
        network_request_count: network_requests,
        page_size_kb,
        is_https: is_https(&facts.requested_url),
        total_images: alt.total,
        missing_alt_images: alt.missing,
        title_length: meta.title_length,
        description_length: meta.description_length,
        has_viewport_tag: meta.viewport,
        has_og_image: meta.og_image,
        has_og_title: meta.og_title,
        has_og_description: meta.og_description,
        has_canonical: meta.canonical,
        robots_directive: meta.robots,
    };

    NormalizedPage {
        record,
        page_info: or_default("page info", PageInfo::default(), extract_page_info(facts)),
        timing,
        resources: or_default(
            "resource breakdown",
            ResourceBreakdown::default(),
            extract_resource_breakdown(facts),
        ),
        overview: or_default("site overview", SiteOverview::default(), extract_overview(facts)),
        load_time_ms,
    }
}
