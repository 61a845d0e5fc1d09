//! Fixed catalog of page checks.
//!
//! Each rule is a pure function of the [`MeasurementRecord`] and returns its
//! own issue and breakdown entries. The evaluator concatenates the outcomes in
//! catalog order, which is also the order issues appear in the report.

use super::model::{Breakdown, BreakdownEntry, Category, Issue, MeasurementRecord, Severity};

pub const TTFB_LIMIT_MS: f64 = 600.0;
pub const FCP_LIMIT_MS: f64 = 2000.0;
pub const PAGE_LOAD_LIMIT_MS: f64 = 3000.0;
pub const NETWORK_REQUEST_LIMIT: u32 = 50;
pub const PAGE_SIZE_LIMIT_KB: f64 = 1000.0;

pub const TITLE_MIN_LEN: u32 = 30;
pub const TITLE_MAX_LEN: u32 = 60;
pub const DESCRIPTION_MIN_LEN: u32 = 120;
pub const DESCRIPTION_MAX_LEN: u32 = 160;

pub const ALT_POINTS_PER_IMAGE: u32 = 5;
pub const ALT_POINTS_CAP: u32 = 40;

/// Output of a single rule invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleOutcome {
    pub issue: Option<Issue>,
    pub breakdown: Vec<BreakdownEntry>,
}

impl RuleOutcome {
    fn new(issue: Option<Issue>, breakdown: Vec<BreakdownEntry>) -> Self {
        Self { issue, breakdown }
    }
}

pub struct Rule {
    pub name: &'static str,
    pub evaluate: fn(&MeasurementRecord) -> RuleOutcome,
}

pub const CATALOG: &[Rule] = &[
    Rule { name: "https", evaluate: check_https },
    Rule { name: "image-alt", evaluate: check_image_alt },
    Rule { name: "title", evaluate: check_title },
    Rule { name: "meta-description", evaluate: check_description },
    Rule { name: "viewport", evaluate: check_viewport },
    Rule { name: "og-image", evaluate: check_og_image },
    Rule { name: "ttfb", evaluate: check_ttfb },
    Rule { name: "fcp", evaluate: check_fcp },
    Rule { name: "page-load", evaluate: check_page_load },
    Rule { name: "network-requests", evaluate: check_network_requests },
    Rule { name: "page-size", evaluate: check_page_size },
];

/// Issues and breakdown produced by running the whole catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluation {
    pub issues: Vec<Issue>,
    pub breakdown: Breakdown,
}

pub fn evaluate(record: &MeasurementRecord) -> Evaluation {
    CATALOG
        .iter()
        .map(|rule| (rule.evaluate)(record))
        .fold(Evaluation::default(), |mut acc, outcome| {
            acc.issues.extend(outcome.issue);
            for entry in outcome.breakdown {
                acc.breakdown.push(entry);
            }
            acc
        })
}

pub fn check_https(record: &MeasurementRecord) -> RuleOutcome {
    if !record.is_https {
        RuleOutcome::new(
            Some(Issue::new(
                Severity::Error,
                "Not using HTTPS",
                "Website is not secured with HTTPS encryption",
                "High security risk, affects SEO ranking",
            )),
            vec![
                BreakdownEntry::fail(Category::Seo, "HTTPS", 15, "Not using HTTPS protocol"),
                BreakdownEntry::fail(Category::BestPractices, "HTTPS", 30, "No SSL/TLS encryption"),
            ],
        )
    } else {
        RuleOutcome::new(
            Some(Issue::new(
                Severity::Success,
                "Using HTTPS",
                "Website is properly secured with HTTPS",
                "Secure connection established",
            )),
            vec![BreakdownEntry::pass(Category::Seo, "HTTPS", "Properly secured")],
        )
    }
}

pub fn alt_points_lost(missing: u32) -> u32 {
    missing.saturating_mul(ALT_POINTS_PER_IMAGE).min(ALT_POINTS_CAP)
}

pub fn check_image_alt(record: &MeasurementRecord) -> RuleOutcome {
    let total = record.total_images;
    let missing = record.missing_alt_images;

    if missing > 0 {
        let percentage = if total > 0 {
            missing as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        return RuleOutcome::new(
            Some(Issue::new(
                Severity::Warning,
                format!("Missing Alt Tags on {}/{} Images", missing, total),
                format!("{:.1}% of images lack alt attributes for screen readers", percentage),
                format!("Affects {} images - reduces accessibility score", missing),
            )),
            vec![BreakdownEntry::fail(
                Category::Accessibility,
                "Image Alt Attributes",
                alt_points_lost(missing),
                format!("{} images missing alt text ({:.1}%)", missing, percentage),
            )],
        );
    }

    if total == 0 {
        return RuleOutcome::default();
    }

    RuleOutcome::new(
        Some(Issue::new(
            Severity::Success,
            format!("All {} Images Have Alt Tags", total),
            "All images properly labeled for accessibility",
            "Screen reader friendly",
        )),
        Vec::new(),
    )
}

pub fn check_title(record: &MeasurementRecord) -> RuleOutcome {
    let len = record.title_length;

    if len == 0 {
        RuleOutcome::new(
            Some(Issue::new(
                Severity::Error,
                "Missing Page Title",
                "No title tag found",
                "Critical SEO issue - 30 points lost",
            )),
            vec![BreakdownEntry::fail(
                Category::Seo,
                "Title Tag",
                30,
                "Title tag is completely missing",
            )],
        )
    } else if len < TITLE_MIN_LEN {
        RuleOutcome::new(
            Some(Issue::new(
                Severity::Warning,
                "Title Too Short",
                format!("Title is {} characters. Recommended: 50-60", len),
                "10 points lost - title should be 50-60 characters",
            )),
            vec![BreakdownEntry::warning(
                Category::Seo,
                "Title Length",
                10,
                format!("Only {} characters (optimal: 50-60)", len),
            )],
        )
    } else if len > TITLE_MAX_LEN {
        RuleOutcome::new(
            Some(Issue::new(
                Severity::Warning,
                "Title Too Long",
                format!("Title is {} characters. Recommended: 50-60", len),
                format!(
                    "{} characters will be truncated in search results",
                    len - TITLE_MAX_LEN
                ),
            )),
            vec![BreakdownEntry::warning(
                Category::Seo,
                "Title Length",
                10,
                format!("{} characters (optimal: 50-60)", len),
            )],
        )
    } else {
        RuleOutcome::new(
            Some(Issue::new(
                Severity::Success,
                "Title Length Optimal",
                format!("Title is {} characters - perfect length", len),
                "Well optimized for search results",
            )),
            Vec::new(),
        )
    }
}

/// Only a missing description is scored; length bounds are advisory.
pub fn check_description(record: &MeasurementRecord) -> RuleOutcome {
    let len = record.description_length;

    if len == 0 {
        RuleOutcome::new(
            Some(Issue::new(
                Severity::Error,
                "Missing Meta Description",
                "No meta description tag found",
                "Critical SEO issue - 25 points lost",
            )),
            vec![BreakdownEntry::fail(
                Category::Seo,
                "Meta Description",
                25,
                "Meta description is completely missing",
            )],
        )
    } else if len < DESCRIPTION_MIN_LEN {
        RuleOutcome::new(
            Some(Issue::new(
                Severity::Warning,
                "Meta Description Too Short",
                format!("Description is {} characters. Recommended: 150-160", len),
                "Could provide more detail for search results",
            )),
            Vec::new(),
        )
    } else if len > DESCRIPTION_MAX_LEN {
        RuleOutcome::new(
            Some(Issue::new(
                Severity::Warning,
                "Meta Description Too Long",
                format!("Description is {} characters. Recommended: 150-160", len),
                format!("{} characters will be truncated", len - DESCRIPTION_MAX_LEN),
            )),
            Vec::new(),
        )
    } else {
        RuleOutcome::new(
            Some(Issue::new(
                Severity::Success,
                "Meta Description Optimal",
                format!("Description is {} characters - perfect length", len),
                "Well optimized for search results",
            )),
            Vec::new(),
        )
    }
}

pub fn check_viewport(record: &MeasurementRecord) -> RuleOutcome {
    if record.has_viewport_tag {
        return RuleOutcome::default();
    }
    RuleOutcome::new(
        Some(Issue::new(
            Severity::Error,
            "Missing Viewport Meta Tag",
            "No viewport meta tag for mobile responsiveness",
            "10 points lost from SEO, 15 from accessibility",
        )),
        vec![
            BreakdownEntry::fail(
                Category::Seo,
                "Viewport Meta Tag",
                10,
                "Mobile viewport not configured",
            ),
            BreakdownEntry::fail(
                Category::Accessibility,
                "Mobile Viewport",
                15,
                "Not mobile-friendly",
            ),
        ],
    )
}

/// Scored silently: a missing og:image shows up in the breakdown only.
pub fn check_og_image(record: &MeasurementRecord) -> RuleOutcome {
    if record.has_og_image {
        return RuleOutcome::default();
    }
    RuleOutcome::new(
        None,
        vec![BreakdownEntry::fail(
            Category::Seo,
            "Open Graph Image",
            10,
            "No og:image for social sharing",
        )],
    )
}

/// Shared shape of the three timing checks.
struct TimingCheck {
    check: &'static str,
    limit_ms: f64,
    points: u32,
    slow_title: &'static str,
    slow_description: fn(f64) -> String,
    impact: fn(u32) -> String,
}

fn timing_outcome(check: &TimingCheck, value: f64) -> RuleOutcome {
    if value > check.limit_ms {
        let over = value - check.limit_ms;
        RuleOutcome::new(
            Some(Issue::new(
                Severity::Warning,
                format!("{}: {:.0}ms", check.slow_title, value),
                (check.slow_description)(over),
                (check.impact)(check.points),
            )),
            vec![BreakdownEntry::fail(
                Category::Performance,
                check.check,
                check.points,
                format!(
                    "{:.0}ms (optimal: <{:.0}ms, {:.0}ms too slow)",
                    value, check.limit_ms, over
                ),
            )],
        )
    } else {
        RuleOutcome::new(
            None,
            vec![BreakdownEntry::pass(
                Category::Performance,
                check.check,
                format!("{:.0}ms (optimal: <{:.0}ms)", value, check.limit_ms),
            )],
        )
    }
}

pub fn check_ttfb(record: &MeasurementRecord) -> RuleOutcome {
    timing_outcome(
        &TimingCheck {
            check: "Time to First Byte (TTFB)",
            limit_ms: TTFB_LIMIT_MS,
            points: 10,
            slow_title: "Slow Server Response",
            slow_description: |over| format!("TTFB is {:.0}ms slower than recommended (600ms)", over),
            impact: |points| format!("Server response time costs {} performance points", points),
        },
        record.ttfb_ms,
    )
}

pub fn check_fcp(record: &MeasurementRecord) -> RuleOutcome {
    timing_outcome(
        &TimingCheck {
            check: "First Contentful Paint (FCP)",
            limit_ms: FCP_LIMIT_MS,
            points: 15,
            slow_title: "Slow First Contentful Paint",
            slow_description: |over| format!("FCP is {:.0}ms slower than recommended (2000ms)", over),
            impact: |points| format!("Content appears {} points too slowly", points),
        },
        record.fcp_ms,
    )
}

pub fn check_page_load(record: &MeasurementRecord) -> RuleOutcome {
    timing_outcome(
        &TimingCheck {
            check: "Total Page Load",
            limit_ms: PAGE_LOAD_LIMIT_MS,
            points: 20,
            slow_title: "Slow Page Load",
            slow_description: |over| {
                format!("Page takes {:.0}ms longer than recommended (3000ms)", over)
            },
            impact: |points| format!("Total load time costs {} performance points", points),
        },
        record.page_load_ms,
    )
}

pub fn check_network_requests(record: &MeasurementRecord) -> RuleOutcome {
    let count = record.network_request_count;

    if count > NETWORK_REQUEST_LIMIT {
        let excess = count - NETWORK_REQUEST_LIMIT;
        RuleOutcome::new(
            Some(Issue::new(
                Severity::Warning,
                format!("Too Many Network Requests: {}", count),
                format!("{} more requests than recommended (50 max)", excess),
                "Excessive requests cost 15 performance points",
            )),
            vec![
                BreakdownEntry::fail(
                    Category::Performance,
                    "Network Requests",
                    15,
                    format!("{} requests (optimal: <50, {} excess)", count, excess),
                ),
                BreakdownEntry::fail(
                    Category::BestPractices,
                    "Resource Optimization",
                    10,
                    format!("{} requests - should bundle/minimize", count),
                ),
            ],
        )
    } else {
        RuleOutcome::new(
            None,
            vec![BreakdownEntry::pass(
                Category::Performance,
                "Network Requests",
                format!("{} requests (optimal: <50)", count),
            )],
        )
    }
}

pub fn check_page_size(record: &MeasurementRecord) -> RuleOutcome {
    let kb = record.page_size_kb;

    if kb > PAGE_SIZE_LIMIT_KB {
        let over = kb - PAGE_SIZE_LIMIT_KB;
        RuleOutcome::new(
            Some(Issue::new(
                Severity::Warning,
                format!("Large Page Size: {:.2} KB", kb),
                format!("Page is {:.2} KB larger than recommended (1000 KB)", over),
                "Page size costs 10 performance points",
            )),
            vec![
                BreakdownEntry::fail(
                    Category::Performance,
                    "Page Size",
                    10,
                    format!("{:.0}KB (optimal: <1000KB, {:.0}KB too large)", kb, over),
                ),
                BreakdownEntry::fail(
                    Category::BestPractices,
                    "Page Weight",
                    10,
                    format!("{:.0}KB - compress assets", kb),
                ),
            ],
        )
    } else {
        RuleOutcome::new(
            None,
            vec![BreakdownEntry::pass(
                Category::Performance,
                "Page Size",
                format!("{:.0}KB (optimal: <1000KB)", kb),
            )],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::model::CheckStatus;

    fn optimal() -> MeasurementRecord {
        MeasurementRecord {
            ttfb_ms: 200.0,
            fcp_ms: 500.0,
            dom_load_ms: 900.0,
            page_load_ms: 1200.0,
            network_request_count: 20,
            page_size_kb: 300.0,
            is_https: true,
            total_images: 4,
            missing_alt_images: 0,
            title_length: 45,
            description_length: 155,
            has_viewport_tag: true,
            has_og_image: true,
            has_og_title: true,
            has_og_description: true,
            has_canonical: true,
            robots_directive: "index, follow".to_string(),
        }
    }

    #[test]
    fn test_title_boundaries() {
        let title = |len| {
            check_title(&MeasurementRecord {
                title_length: len,
                ..optimal()
            })
        };

        for len in [30, 60] {
            let outcome = title(len);
            assert_eq!(outcome.issue.unwrap().title, "Title Length Optimal");
            assert!(outcome.breakdown.is_empty());
        }

        let short = title(29);
        assert_eq!(short.issue.unwrap().title, "Title Too Short");
        assert_eq!(short.breakdown[0].points_lost, 10);
        assert_eq!(short.breakdown[0].status, CheckStatus::Warning);

        let long = title(61);
        let issue = long.issue.unwrap();
        assert_eq!(issue.title, "Title Too Long");
        assert_eq!(issue.impact, "1 characters will be truncated in search results");
        assert_eq!(long.breakdown[0].points_lost, 10);

        let missing = title(0);
        assert_eq!(missing.issue.unwrap().severity, Severity::Error);
        assert_eq!(missing.breakdown[0].points_lost, 30);
    }

    #[test]
    fn test_ttfb_boundary_is_strict() {
        let at_limit = check_ttfb(&MeasurementRecord {
            ttfb_ms: 600.0,
            ..optimal()
        });
        assert!(at_limit.issue.is_none());
        assert_eq!(at_limit.breakdown[0].status, CheckStatus::Pass);
        assert_eq!(at_limit.breakdown[0].points_lost, 0);
        assert_eq!(at_limit.breakdown[0].reason, "600ms (optimal: <600ms)");

        let over = check_ttfb(&MeasurementRecord {
            ttfb_ms: 601.0,
            ..optimal()
        });
        assert_eq!(over.breakdown[0].status, CheckStatus::Fail);
        assert_eq!(over.breakdown[0].points_lost, 10);
        assert_eq!(
            over.breakdown[0].reason,
            "601ms (optimal: <600ms, 1ms too slow)"
        );
        assert_eq!(over.issue.unwrap().title, "Slow Server Response: 601ms");
    }

    #[test]
    fn test_alt_points_are_capped() {
        assert_eq!(alt_points_lost(1), 5);
        assert_eq!(alt_points_lost(7), 35);
        assert_eq!(alt_points_lost(8), 40);
        assert_eq!(alt_points_lost(500), 40);
        assert_eq!(alt_points_lost(u32::MAX), 40);
    }

    #[test]
    fn test_alt_all_missing_reports_percentage() {
        let outcome = check_image_alt(&MeasurementRecord {
            total_images: 10,
            missing_alt_images: 10,
            ..optimal()
        });
        let issue = outcome.issue.unwrap();
        assert_eq!(issue.title, "Missing Alt Tags on 10/10 Images");
        assert!(issue.description.starts_with("100.0%"));
        assert_eq!(outcome.breakdown[0].points_lost, 40);
        assert_eq!(outcome.breakdown[0].category, Category::Accessibility);
    }

    #[test]
    fn test_alt_without_images_is_silent() {
        let outcome = check_image_alt(&MeasurementRecord {
            total_images: 0,
            missing_alt_images: 0,
            ..optimal()
        });
        assert_eq!(outcome, RuleOutcome::default());
    }

    #[test]
    fn test_description_bounds_are_advisory() {
        for len in [50, 119, 161, 400] {
            let outcome = check_description(&MeasurementRecord {
                description_length: len,
                ..optimal()
            });
            assert_eq!(outcome.issue.unwrap().severity, Severity::Warning);
            assert!(outcome.breakdown.is_empty());
        }
        let missing = check_description(&MeasurementRecord {
            description_length: 0,
            ..optimal()
        });
        assert_eq!(missing.breakdown[0].points_lost, 25);
    }

    #[test]
    fn test_og_image_has_no_issue() {
        let outcome = check_og_image(&MeasurementRecord {
            has_og_image: false,
            ..optimal()
        });
        assert!(outcome.issue.is_none());
        assert_eq!(outcome.breakdown.len(), 1);
        assert_eq!(outcome.breakdown[0].points_lost, 10);
    }

    #[test]
    fn test_viewport_hits_two_categories() {
        let outcome = check_viewport(&MeasurementRecord {
            has_viewport_tag: false,
            ..optimal()
        });
        let categories: Vec<_> = outcome.breakdown.iter().map(|e| e.category).collect();
        assert_eq!(categories, vec![Category::Seo, Category::Accessibility]);
    }

    #[test]
    fn test_page_size_formats_two_decimals() {
        let outcome = check_page_size(&MeasurementRecord {
            page_size_kb: 1500.5,
            ..optimal()
        });
        assert_eq!(outcome.issue.unwrap().title, "Large Page Size: 1500.50 KB");
    }

    #[test]
    fn test_issue_order_follows_catalog() {
        let record = MeasurementRecord {
            is_https: false,
            missing_alt_images: 2,
            title_length: 0,
            description_length: 0,
            has_viewport_tag: false,
            ttfb_ms: 900.0,
            fcp_ms: 2500.0,
            page_load_ms: 4000.0,
            network_request_count: 60,
            page_size_kb: 1200.0,
            ..optimal()
        };
        let titles: Vec<_> = evaluate(&record)
            .issues
            .into_iter()
            .map(|i| i.title)
            .collect();
        assert_eq!(
            titles,
            vec![
                "Not using HTTPS",
                "Missing Alt Tags on 2/4 Images",
                "Missing Page Title",
                "Missing Meta Description",
                "Missing Viewport Meta Tag",
                "Slow Server Response: 900ms",
                "Slow First Contentful Paint: 2500ms",
                "Slow Page Load: 4000ms",
                "Too Many Network Requests: 60",
                "Large Page Size: 1200.00 KB",
            ]
        );
    }

    #[test]
    fn test_catalog_names_are_unique() {
        let mut names: Vec<_> = CATALOG.iter().map(|r| r.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), CATALOG.len());
    }
}
