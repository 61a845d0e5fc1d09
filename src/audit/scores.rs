use super::model::{Breakdown, Category, Scores};

pub const SCORE_CEILING: u32 = 100;

/// Points remaining for one category: ceiling minus deductions, floored at 0.
pub fn category_score(breakdown: &Breakdown, category: Category) -> u32 {
    let lost = breakdown
        .entries(category)
        .iter()
        .fold(0u32, |sum, entry| sum.saturating_add(entry.points_lost));
    SCORE_CEILING.saturating_sub(lost)
}

pub fn aggregate(breakdown: &Breakdown) -> Scores {
    Scores {
        performance: category_score(breakdown, Category::Performance),
        seo: category_score(breakdown, Category::Seo),
        accessibility: category_score(breakdown, Category::Accessibility),
        best_practices: category_score(breakdown, Category::BestPractices),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::model::BreakdownEntry;

    #[test]
    fn test_empty_breakdown_scores_full() {
        let scores = aggregate(&Breakdown::default());
        for category in Category::ALL {
            assert_eq!(scores.get(category), 100);
        }
    }

    #[test]
    fn test_score_floors_at_zero() {
        let mut breakdown = Breakdown::default();
        for _ in 0..5 {
            breakdown.push(BreakdownEntry::fail(Category::Seo, "Title Tag", 30, "missing"));
        }
        breakdown.push(BreakdownEntry::fail(
            Category::Accessibility,
            "Image Alt Attributes",
            u32::MAX,
            "overflow",
        ));
        breakdown.push(BreakdownEntry::fail(
            Category::Accessibility,
            "Mobile Viewport",
            15,
            "overflow",
        ));

        let scores = aggregate(&breakdown);
        assert_eq!(scores.seo, 0);
        assert_eq!(scores.accessibility, 0);
        assert_eq!(scores.performance, 100);
    }

    #[test]
    fn test_pass_entries_cost_nothing() {
        let mut breakdown = Breakdown::default();
        breakdown.push(BreakdownEntry::pass(Category::Performance, "Page Size", "ok"));
        breakdown.push(BreakdownEntry::fail(Category::Performance, "Total Page Load", 20, "slow"));
        assert_eq!(category_score(&breakdown, Category::Performance), 80);
    }
}
