//! Derived metrics engine
//!
//! Pure functions that transform transaction and goal records into the
//! summary figures and chart-ready aggregates shown on the dashboard,
//! insights, and goals views. No I/O, no mutation of inputs; results are a
//! deterministic function of the input multiset.
//!
//! Division-by-zero conditions (no income, overdue goals) are defined
//! quantities here, never errors - a rendering path must not be able to
//! fail on malformed numeric input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Goal, Transaction};

/// Which side of the ledger to aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    /// Positive amounts
    Income,
    /// Negative amounts (summed as absolute values)
    Expense,
}

impl Sign {
    /// Placeholder bucket name used when there are no matching transactions
    fn placeholder(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

/// Summary figures for the dashboard header
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub current_balance: f64,
    /// Balance as a percentage of income; 0 when there is no income
    pub savings_rate: f64,
    /// Expenses as a percentage of income; 0 when there is no income
    pub expense_ratio: f64,
    /// 0-10 wellness score
    pub financial_health_score: f64,
    /// min(100, savings_rate * 1.2)
    pub overall_health_percent: f64,
}

/// Compute the dashboard summary from a transaction list
///
/// Order of the input is irrelevant: every reduction is an
/// order-independent sum. `goal_count` is the number of goals the user has
/// (any status); having at least one contributes to the health score.
pub fn compute_summary(transactions: &[Transaction], goal_count: usize) -> Summary {
    let total_income: f64 = transactions
        .iter()
        .filter(|t| t.amount > 0.0)
        .map(|t| t.amount)
        .sum();
    let total_expenses: f64 = transactions
        .iter()
        .filter(|t| t.amount < 0.0)
        .map(|t| t.amount)
        .sum::<f64>()
        .abs();
    let current_balance = total_income - total_expenses;

    let savings_rate = if total_income > 0.0 {
        current_balance / total_income * 100.0
    } else {
        0.0
    };
    let expense_ratio = if total_income > 0.0 {
        total_expenses / total_income * 100.0
    } else {
        0.0
    };

    let mut score: f64 = 5.0;
    if savings_rate > 20.0 {
        score += 2.5;
    } else if savings_rate > 10.0 {
        score += 1.5;
    }
    if total_expenses < total_income * 0.8 {
        score += 1.5;
    }
    if goal_count > 0 {
        score += 1.0;
    }

    Summary {
        total_income,
        total_expenses,
        current_balance,
        savings_rate,
        expense_ratio,
        financial_health_score: score.clamp(0.0, 10.0),
        overall_health_percent: (savings_rate * 1.2).min(100.0),
    }
}

/// Display figures derived from a goal (never persisted)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalView {
    pub goal_id: i64,
    pub name: String,
    pub current_amount: f64,
    pub target_amount: f64,
    /// Clamped to [0, 100] even when contributions overshoot the target
    pub progress_percent: f64,
    pub days_left: i64,
    /// Amount per month needed to stay on track; for an overdue goal the
    /// divisor is one month, so the entire remainder is due immediately
    pub monthly_target: f64,
}

impl GoalView {
    pub fn compute(goal: &Goal, now: DateTime<Utc>) -> Self {
        let progress_percent = if goal.target_amount > 0.0 {
            (goal.current_amount / goal.target_amount * 100.0).min(100.0)
        } else {
            0.0
        };

        let secs = (goal.target_date - now).num_seconds();
        let days_left = if secs <= 0 { 0 } else { (secs + 86_399) / 86_400 };

        let remaining = goal.target_amount - goal.current_amount;
        let months = std::cmp::max(1, (days_left + 29) / 30);

        Self {
            goal_id: goal.id,
            name: goal.name.clone(),
            current_amount: goal.current_amount,
            target_amount: goal.target_amount,
            progress_percent,
            days_left,
            monthly_target: remaining / months as f64,
        }
    }
}

/// A named bucket total for pie/bar charts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketTotal {
    pub name: String,
    pub total: f64,
}

// Buckets keep first-seen order so chart colors stay stable across
// refreshes; the data sets are UI-sized, so linear lookup is fine.
fn bump(buckets: &mut Vec<BucketTotal>, name: &str, amount: f64) {
    match buckets.iter_mut().find(|b| b.name == name) {
        Some(bucket) => bucket.total += amount,
        None => buckets.push(BucketTotal {
            name: name.to_string(),
            total: amount,
        }),
    }
}

/// Group income or expense transactions by category, summing absolute amounts
///
/// An empty result set yields a single placeholder bucket with total 0 so
/// chart components stay non-degenerate. Unknown category values form their
/// own bucket.
pub fn aggregate_by_category(transactions: &[Transaction], sign: Sign) -> Vec<BucketTotal> {
    let mut buckets = Vec::new();
    for tx in transactions {
        let matches = match sign {
            Sign::Income => tx.amount > 0.0,
            Sign::Expense => tx.amount < 0.0,
        };
        if matches {
            bump(&mut buckets, tx.category.as_str(), tx.amount.abs());
        }
    }
    if buckets.is_empty() {
        buckets.push(BucketTotal {
            name: sign.placeholder().to_string(),
            total: 0.0,
        });
    }
    buckets
}

/// Sum absolute expense amounts grouped by necessity level
///
/// Missing necessity defaults to "needs" (already applied at
/// deserialization); unknown values form their own bucket.
pub fn aggregate_by_necessity(transactions: &[Transaction]) -> Vec<BucketTotal> {
    let mut buckets = Vec::new();
    for tx in transactions.iter().filter(|t| t.amount < 0.0) {
        bump(&mut buckets, tx.necessity.as_str(), tx.amount.abs());
    }
    if buckets.is_empty() {
        buckets.push(BucketTotal {
            name: "needs".to_string(),
            total: 0.0,
        });
    }
    buckets
}

/// One month's total in a trend series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthTotal {
    /// Calendar month label, e.g. "Nov 2025"
    pub month: String,
    pub amount: f64,
}

/// Parallel monthly income and expense series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySeries {
    pub income: Vec<MonthTotal>,
    pub expenses: Vec<MonthTotal>,
}

fn bump_month(series: &mut Vec<MonthTotal>, label: &str, amount: f64) {
    match series.iter_mut().find(|m| m.month == label) {
        Some(entry) => entry.amount += amount,
        None => series.push(MonthTotal {
            month: label.to_string(),
            amount,
        }),
    }
}

/// Bucket transactions into per-month income and expense totals
///
/// Month labels come from each transaction's timestamp; a missing timestamp
/// buckets under `now`. Both series contain one entry per month that has at
/// least one transaction, in first-seen order. Non-negative amounts count as
/// income, matching the sign rule used everywhere else.
pub fn aggregate_by_month(transactions: &[Transaction], now: DateTime<Utc>) -> MonthlySeries {
    let mut income = Vec::new();
    let mut expenses = Vec::new();

    for tx in transactions {
        let label = tx.timestamp.unwrap_or(now).format("%b %Y").to_string();
        if tx.amount >= 0.0 {
            bump_month(&mut income, &label, tx.amount);
            bump_month(&mut expenses, &label, 0.0);
        } else {
            bump_month(&mut income, &label, 0.0);
            bump_month(&mut expenses, &label, tx.amount.abs());
        }
    }

    MonthlySeries { income, expenses }
}
