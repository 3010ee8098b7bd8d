//! Domain models for Dhan

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub created_at: DateTime<Utc>,
}

/// A new user to be registered (password already hashed)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
}

/// Transaction category
///
/// A closed set of known categories plus an explicit `Unknown` case that
/// preserves the original string. Unknown values are never rejected - they
/// aggregate under their own key in reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    Food,
    Rent,
    Utilities,
    Transportation,
    Entertainment,
    Healthcare,
    Shopping,
    Education,
    Income,
    Other,
    /// Unrecognized category value, passed through verbatim
    Unknown(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Food => "food",
            Self::Rent => "rent",
            Self::Utilities => "utilities",
            Self::Transportation => "transportation",
            Self::Entertainment => "entertainment",
            Self::Healthcare => "healthcare",
            Self::Shopping => "shopping",
            Self::Education => "education",
            Self::Income => "income",
            Self::Other => "other",
            Self::Unknown(s) => s,
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::Other
    }
}

impl From<&str> for Category {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "food" => Self::Food,
            "rent" => Self::Rent,
            "utilities" => Self::Utilities,
            "transportation" => Self::Transportation,
            "entertainment" => Self::Entertainment,
            "healthcare" => Self::Healthcare,
            "shopping" => Self::Shopping,
            "education" => Self::Education,
            "income" => Self::Income,
            "other" => Self::Other,
            _ => Self::Unknown(s.to_string()),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for Category {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s.as_str()))
    }
}

/// Necessity level of an expense (for budget-insight grouping)
///
/// Same pass-through rule as [`Category`]: unknown values become their own
/// bucket instead of an error. Missing values default to `needs`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Necessity {
    /// Essential for survival
    Needs,
    /// Important but not critical
    Essentials,
    /// Nice to have
    Luxury,
    /// Unrecognized necessity value, passed through verbatim
    Unknown(String),
}

impl Necessity {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Needs => "needs",
            Self::Essentials => "essentials",
            Self::Luxury => "luxury",
            Self::Unknown(s) => s,
        }
    }
}

impl Default for Necessity {
    fn default() -> Self {
        Self::Needs
    }
}

impl From<&str> for Necessity {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "needs" => Self::Needs,
            "essentials" => Self::Essentials,
            "luxury" => Self::Luxury,
            _ => Self::Unknown(s.to_string()),
        }
    }
}

impl std::str::FromStr for Necessity {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl std::fmt::Display for Necessity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for Necessity {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Necessity {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from(s.as_str()))
    }
}

/// A financial transaction
///
/// The sign of `amount` is the sole source of truth for income vs. expense:
/// positive = income, negative = expense. There is no separate type field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub amount: f64,
    pub category: Category,
    #[serde(default)]
    pub necessity: Necessity,
    #[serde(default)]
    pub description: String,
    /// When the transaction occurred; missing timestamps are bucketed as "now"
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// A new transaction to be recorded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransaction {
    pub amount: f64,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub necessity: Necessity,
    #[serde(default)]
    pub description: String,
    /// Defaults to the time of insertion when absent
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// A batch of transactions as found on the wire
///
/// Collaborating services return either a bare array or an object wrapping
/// the array under a `data` key; consumers must accept both shapes.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TransactionBatch {
    List(Vec<NewTransaction>),
    Wrapped { data: Vec<NewTransaction> },
}

impl TransactionBatch {
    pub fn into_inner(self) -> Vec<NewTransaction> {
        match self {
            Self::List(txs) => txs,
            Self::Wrapped { data } => data,
        }
    }
}

/// Goal lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    #[default]
    Active,
    Completed,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl std::str::FromStr for GoalStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            _ => Err(format!("Unknown goal status: {}", s)),
        }
    }
}

impl std::fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A savings goal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    /// Positive, fixed at creation, mutable via edit
    pub target_amount: f64,
    /// Non-negative; grows via contributions, resettable only via edit
    pub current_amount: f64,
    /// May be in the past - no validation is enforced
    pub target_date: DateTime<Utc>,
    pub status: GoalStatus,
    pub created_at: DateTime<Utc>,
}

/// A new goal to be created (starts at current_amount = 0, active)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGoal {
    pub name: String,
    pub target_amount: f64,
    pub target_date: DateTime<Utc>,
}

/// Partial update for a goal
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoalUpdate {
    pub name: Option<String>,
    pub target_amount: Option<f64>,
    pub current_amount: Option<f64>,
    pub target_date: Option<DateTime<Utc>>,
    pub status: Option<GoalStatus>,
}

/// Chat message author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl std::str::FromStr for ChatRole {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            _ => Err(format!("Unknown chat role: {}", s)),
        }
    }
}

impl std::fmt::Display for ChatRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A message in the AI coach conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub user_id: i64,
    pub role: ChatRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A portfolio holding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Holding {
    pub id: i64,
    pub user_id: i64,
    pub symbol: String,
    pub quantity: f64,
    pub avg_cost: f64,
    pub created_at: DateTime<Utc>,
}

/// A new holding (merged into an existing position on symbol collision)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewHolding {
    pub symbol: String,
    pub quantity: f64,
    pub avg_cost: f64,
}

/// Portfolio summary (total value at average cost plus positions)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub total_value: f64,
    pub positions: Vec<Holding>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_roundtrip() {
        let cat: Category = "food".parse().unwrap();
        assert_eq!(cat, Category::Food);
        assert_eq!(cat.as_str(), "food");

        // Unknown values pass through verbatim instead of erroring
        let cat: Category = "crypto".parse().unwrap();
        assert_eq!(cat, Category::Unknown("crypto".to_string()));
        assert_eq!(cat.as_str(), "crypto");
    }

    #[test]
    fn test_necessity_default_is_needs() {
        assert_eq!(Necessity::default(), Necessity::Needs);
    }

    #[test]
    fn test_transaction_batch_accepts_both_shapes() {
        let bare = r#"[{"amount": -100.0, "category": "food"}]"#;
        let wrapped = r#"{"data": [{"amount": -100.0, "category": "food"}]}"#;

        let a: TransactionBatch = serde_json::from_str(bare).unwrap();
        let b: TransactionBatch = serde_json::from_str(wrapped).unwrap();
        assert_eq!(a.into_inner().len(), 1);
        assert_eq!(b.into_inner().len(), 1);
    }

    #[test]
    fn test_missing_necessity_defaults_to_needs() {
        let tx: NewTransaction =
            serde_json::from_str(r#"{"amount": -50.0, "category": "food"}"#).unwrap();
        assert_eq!(tx.necessity, Necessity::Needs);
    }
}
