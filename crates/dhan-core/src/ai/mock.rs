//! Mock backend for testing and offline use
//!
//! Answers from a small set of keyword-routed templates, filled in with the
//! user's real snapshot numbers. Keeps the chat endpoints useful when no
//! model server is reachable.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::ChatMessage;

use super::{CoachBackend, CoachContext};

/// Offline coach backend
#[derive(Debug, Clone, Default)]
pub struct MockBackend;

impl MockBackend {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CoachBackend for MockBackend {
    async fn coach_reply(
        &self,
        context: &CoachContext,
        _history: &[ChatMessage],
        question: &str,
    ) -> Result<String> {
        let q = question.to_lowercase();
        let s = &context.summary;

        let reply = if q.contains("save") || q.contains("saving") {
            format!(
                "You're currently saving {:.1}% of your income. A good target is 20%. \
                 With income of ₹{:.0}, that means putting aside about ₹{:.0} each month.",
                s.savings_rate,
                s.total_income,
                s.total_income * 0.2
            )
        } else if q.contains("budget") {
            format!(
                "Try the 50/30/20 rule: 50% needs, 30% wants, 20% savings. \
                 On your income of ₹{:.0} that's ₹{:.0} for needs, ₹{:.0} for wants, \
                 and ₹{:.0} saved.",
                s.total_income,
                s.total_income * 0.5,
                s.total_income * 0.3,
                s.total_income * 0.2
            )
        } else if q.contains("invest") {
            "Before investing, make sure you have an emergency fund covering 3-6 months \
             of expenses. After that, low-cost index funds via SIP are a solid start."
                .to_string()
        } else if q.contains("debt") || q.contains("loan") {
            "Pay off high-interest debt first (credit cards, personal loans), then work \
             down to lower-interest loans. Always cover minimum payments on everything."
                .to_string()
        } else if q.contains("emergency") {
            format!(
                "Aim for an emergency fund of 3-6 months of expenses. Your monthly \
                 expenses are ₹{:.0}, so target ₹{:.0} to ₹{:.0} in a liquid account.",
                s.total_expenses,
                s.total_expenses * 3.0,
                s.total_expenses * 6.0
            )
        } else if q.contains("score") || q.contains("health") {
            format!(
                "Your financial health score is {:.1}/10. It improves as your savings \
                 rate rises above 20%, expenses stay under 80% of income, and you keep \
                 at least one active goal.",
                s.financial_health_score
            )
        } else {
            format!(
                "Here's where you stand: income ₹{:.0}, expenses ₹{:.0}, savings rate \
                 {:.1}%. Ask me about saving, budgeting, investing, debt, or your \
                 emergency fund.",
                s.total_income, s.total_expenses, s.savings_rate
            )
        };

        Ok(reply)
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_keyword_routing() {
        let backend = MockBackend::new();
        let mut context = CoachContext::default();
        context.summary.total_income = 50_000.0;
        context.summary.total_expenses = 30_000.0;

        let reply = backend
            .coach_reply(&context, &[], "how much should I save?")
            .await
            .unwrap();
        assert!(reply.contains("20%"));
        assert!(reply.contains("₹10000"));

        let reply = backend
            .coach_reply(&context, &[], "do I need an emergency fund?")
            .await
            .unwrap();
        assert!(reply.contains("₹90000"));

        let reply = backend
            .coach_reply(&context, &[], "tell me something")
            .await
            .unwrap();
        assert!(reply.contains("income ₹50000"));
    }
}
