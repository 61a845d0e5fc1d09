use serde::{Deserialize, Serialize};

/// Normalized page measurements every rule reads from.
///
/// All fields are always populated; the normalizer substitutes defaults for
/// anything the probe could not supply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementRecord {
    pub ttfb_ms: f64,
    pub fcp_ms: f64,
    pub dom_load_ms: f64,
    pub page_load_ms: f64,
    pub network_request_count: u32,
    #[serde(rename = "pageSizeKB")]
    pub page_size_kb: f64,
    pub is_https: bool,
    pub total_images: u32,
    pub missing_alt_images: u32,
    pub title_length: u32,
    pub description_length: u32,
    pub has_viewport_tag: bool,
    pub has_og_image: bool,
    pub has_og_title: bool,
    pub has_og_description: bool,
    pub has_canonical: bool,
    pub robots_directive: String,
}

pub const ROBOTS_NOT_SET: &str = "not set";

impl Default for MeasurementRecord {
    fn default() -> Self {
        Self {
            ttfb_ms: 0.0,
            fcp_ms: 0.0,
            dom_load_ms: 0.0,
            page_load_ms: 0.0,
            network_request_count: 0,
            page_size_kb: 0.0,
            is_https: false,
            total_images: 0,
            missing_alt_images: 0,
            title_length: 0,
            description_length: 0,
            has_viewport_tag: false,
            has_og_image: false,
            has_og_title: false,
            has_og_description: false,
            has_canonical: false,
            robots_directive: ROBOTS_NOT_SET.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Warning,
    Error,
}

/// A user-facing finding. Presentation only; never feeds into scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub impact: String,
}

impl Issue {
    pub fn new(
        severity: Severity,
        title: impl Into<String>,
        description: impl Into<String>,
        impact: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity,
            impact: impact.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Performance,
    Seo,
    Accessibility,
    BestPractices,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Performance,
        Category::Seo,
        Category::Accessibility,
        Category::BestPractices,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Fail,
    Warning,
}

/// A scored per-check record. The category is implied by the breakdown list
/// the entry lives in, so it is not repeated on the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownEntry {
    #[serde(skip)]
    pub category: Category,
    pub check: String,
    pub status: CheckStatus,
    pub points_lost: u32,
    pub reason: String,
}

impl BreakdownEntry {
    pub fn pass(category: Category, check: &str, reason: impl Into<String>) -> Self {
        Self::scored(category, check, CheckStatus::Pass, 0, reason)
    }

    pub fn fail(category: Category, check: &str, points_lost: u32, reason: impl Into<String>) -> Self {
        Self::scored(category, check, CheckStatus::Fail, points_lost, reason)
    }

    pub fn warning(
        category: Category,
        check: &str,
        points_lost: u32,
        reason: impl Into<String>,
    ) -> Self {
        Self::scored(category, check, CheckStatus::Warning, points_lost, reason)
    }

    fn scored(
        category: Category,
        check: &str,
        status: CheckStatus,
        points_lost: u32,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            category,
            check: check.to_string(),
            status,
            points_lost,
            reason: reason.into(),
        }
    }
}

/// Breakdown entries grouped by category, each list in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakdown {
    pub performance: Vec<BreakdownEntry>,
    pub seo: Vec<BreakdownEntry>,
    pub accessibility: Vec<BreakdownEntry>,
    pub best_practices: Vec<BreakdownEntry>,
}

impl Breakdown {
    pub fn entries(&self, category: Category) -> &[BreakdownEntry] {
        match category {
            Category::Performance => &self.performance,
            Category::Seo => &self.seo,
            Category::Accessibility => &self.accessibility,
            Category::BestPractices => &self.best_practices,
        }
    }

    pub fn push(&mut self, entry: BreakdownEntry) {
        let list = match entry.category {
            Category::Performance => &mut self.performance,
            Category::Seo => &mut self.seo,
            Category::Accessibility => &mut self.accessibility,
            Category::BestPractices => &mut self.best_practices,
        };
        list.push(entry);
    }

    pub fn len(&self) -> usize {
        Category::ALL.iter().map(|c| self.entries(*c).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Final 0-100 score per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scores {
    pub performance: u32,
    pub seo: u32,
    pub accessibility: u32,
    pub best_practices: u32,
}

impl Scores {
    pub fn get(&self, category: Category) -> u32 {
        match category {
            Category::Performance => self.performance,
            Category::Seo => self.seo,
            Category::Accessibility => self.accessibility,
            Category::BestPractices => self.best_practices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_routes_every_entry_by_category() {
        let mut breakdown = Breakdown::default();
        for category in Category::ALL {
            breakdown.push(BreakdownEntry::fail(category, "Check", 5, "reason"));
        }
        assert_eq!(breakdown.len(), 4);
        for category in Category::ALL {
            let entries = breakdown.entries(category);
            assert_eq!(entries.len(), 1);
            assert_eq!(entries[0].category, category);
        }
    }

    #[test]
    fn test_entry_wire_shape_omits_category() {
        let entry = BreakdownEntry::warning(Category::Seo, "Title Length", 10, "Only 12 characters");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "check": "Title Length",
                "status": "warning",
                "points_lost": 10,
                "reason": "Only 12 characters",
            })
        );
    }
}
