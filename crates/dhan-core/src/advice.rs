//! Insight and recommendation text generation
//!
//! Pure functions over the metrics engine's outputs. These produce the
//! human-readable callouts shown on the insights page; the numbers behind
//! them always come from [`crate::metrics`] so the two never disagree.

use serde::{Deserialize, Serialize};

use crate::metrics::{BucketTotal, GoalView, Summary};

/// A short observation about the user's finances
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insight {
    pub title: String,
    pub detail: String,
}

/// An actionable recommendation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: String,
    pub suggestion: String,
    pub action: String,
}

/// Generate insights from the summary and expense breakdown
pub fn generate_insights(summary: &Summary, expense_by_category: &[BucketTotal]) -> Vec<Insight> {
    let mut insights = Vec::new();
    let rate = summary.savings_rate;

    let (title, detail) = if rate >= 70.0 {
        (
            "Excellent Savings",
            format!(
                "You're saving {:.0}% of your income. This is exceptional financial discipline!",
                rate
            ),
        )
    } else if rate >= 30.0 {
        (
            "Good Savings Rate",
            format!("Your {:.0}% savings rate is above average. Keep it up!", rate),
        )
    } else if rate >= 10.0 {
        (
            "Room for Improvement",
            format!(
                "Your {:.0}% savings rate is below the recommended 20%. Consider reducing discretionary spending.",
                rate
            ),
        )
    } else {
        (
            "Savings Alert",
            "Your savings rate is very low. Review your expenses to find areas to cut back."
                .to_string(),
        )
    };
    insights.push(Insight {
        title: title.to_string(),
        detail,
    });

    // Largest expense category callout
    let top = expense_by_category
        .iter()
        .filter(|b| b.total > 0.0)
        .max_by(|a, b| a.total.total_cmp(&b.total));
    if let Some(top) = top {
        insights.push(Insight {
            title: "Top Expense Category".to_string(),
            detail: format!(
                "'{}' is your largest expense at ₹{:.0}. Consider if this aligns with your priorities.",
                top.name, top.total
            ),
        });
    }

    insights
}

/// Generate recommendations from the summary, expense breakdown, and the
/// user's active goals
pub fn generate_recommendations(
    summary: &Summary,
    expense_by_category: &[BucketTotal],
    active_goals: &[GoalView],
) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if summary.savings_rate < 20.0 {
        recommendations.push(Recommendation {
            category: "Savings".to_string(),
            suggestion: "Aim to save at least 20% of your income".to_string(),
            action: "Set up automatic transfers to a savings account on payday".to_string(),
        });
    }

    let discretionary: f64 = expense_by_category
        .iter()
        .filter(|b| b.name == "entertainment" || b.name == "shopping")
        .map(|b| b.total)
        .sum();
    if discretionary > summary.total_income * 0.3 {
        recommendations.push(Recommendation {
            category: "Discretionary Spending".to_string(),
            suggestion: format!(
                "Your entertainment and shopping expenses (₹{:.0}) exceed 30% of income",
                discretionary
            ),
            action: "Try the 50/30/20 budget rule to balance your spending".to_string(),
        });
    }

    let underfunded = active_goals
        .iter()
        .filter(|g| g.progress_percent < 50.0)
        .count();
    if underfunded > 0 {
        recommendations.push(Recommendation {
            category: "Goals".to_string(),
            suggestion: format!(
                "You have {} goal(s) that are less than 50% funded",
                underfunded
            ),
            action: "Consider allocating more monthly savings to reach your goals on time"
                .to_string(),
        });
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::compute_summary;
    use crate::models::{Category, Necessity, Transaction};

    fn tx(amount: f64, category: &str) -> Transaction {
        Transaction {
            id: 0,
            user_id: 1,
            amount,
            category: Category::from(category),
            necessity: Necessity::Needs,
            description: String::new(),
            timestamp: None,
        }
    }

    #[test]
    fn test_insight_bands() {
        // 92% savings rate -> excellent
        let summary = compute_summary(
            &[tx(50_000.0, "income"), tx(-4_000.0, "food")],
            0,
        );
        let insights = generate_insights(&summary, &[]);
        assert_eq!(insights[0].title, "Excellent Savings");

        // No income -> rate 0 -> alert
        let summary = compute_summary(&[tx(-100.0, "food")], 0);
        let insights = generate_insights(&summary, &[]);
        assert_eq!(insights[0].title, "Savings Alert");
    }

    #[test]
    fn test_top_expense_callout() {
        let summary = compute_summary(&[tx(1_000.0, "income")], 0);
        let buckets = vec![
            BucketTotal {
                name: "food".to_string(),
                total: 120.0,
            },
            BucketTotal {
                name: "rent".to_string(),
                total: 800.0,
            },
        ];
        let insights = generate_insights(&summary, &buckets);
        let top = insights.last().unwrap();
        assert_eq!(top.title, "Top Expense Category");
        assert!(top.detail.contains("rent"));
    }

    #[test]
    fn test_no_top_expense_for_placeholder_bucket() {
        let summary = compute_summary(&[], 0);
        let buckets = vec![BucketTotal {
            name: "expense".to_string(),
            total: 0.0,
        }];
        // Zero-total placeholder must not produce a top-category insight
        let insights = generate_insights(&summary, &buckets);
        assert_eq!(insights.len(), 1);
    }

    #[test]
    fn test_discretionary_recommendation() {
        let summary = compute_summary(
            &[tx(1_000.0, "income"), tx(-400.0, "shopping")],
            0,
        );
        let buckets = vec![BucketTotal {
            name: "shopping".to_string(),
            total: 400.0,
        }];
        let recs = generate_recommendations(&summary, &buckets, &[]);
        assert!(recs.iter().any(|r| r.category == "Discretionary Spending"));
    }

    #[test]
    fn test_high_saver_gets_no_savings_nudge() {
        let summary = compute_summary(
            &[tx(1_000.0, "income"), tx(-100.0, "food")],
            0,
        );
        let recs = generate_recommendations(&summary, &[], &[]);
        assert!(recs.iter().all(|r| r.category != "Savings"));
    }
}
