// 🧾 Expense Model - the single persisted record
// Category is a closed set; anything outside it collapses to Other on write

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// CATEGORY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Food,
    Transport,
    Entertainment,
    Shopping,
    Bills,
    Other,
}

impl Category {
    /// Every category, in display order
    pub const ALL: [Category; 6] = [
        Category::Food,
        Category::Transport,
        Category::Entertainment,
        Category::Shopping,
        Category::Bills,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Entertainment => "Entertainment",
            Category::Shopping => "Shopping",
            Category::Bills => "Bills",
            Category::Other => "Other",
        }
    }

    /// Exact (case-sensitive) lookup of a stored label
    pub fn parse(label: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.as_str() == label)
    }

    /// Write-path normalization: absent or unrecognized labels become Other
    pub fn normalize(label: Option<&str>) -> Category {
        label.and_then(Category::parse).unwrap_or(Category::Other)
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Other
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// MONEY
// ============================================================================

/// Largest storable amount in cents (99,999,999.99)
pub const MAX_AMOUNT_CENTS: i64 = 9_999_999_999;

/// Convert a decimal amount to whole cents, rounding half away from zero
pub fn to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

pub fn from_cents(cents: i64) -> f64 {
    cents as f64 / 100.0
}

// ============================================================================
// EXPENSE
// ============================================================================

/// A persisted expense, as returned by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: i64,
    pub item_name: String,
    pub amount: f64,
    pub category: Category,
    pub created_at: DateTime<Utc>,
}

/// A validated, normalized expense that has not been stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub item_name: String,
    pub amount_cents: i64,
    pub category: Category,
}

impl NewExpense {
    pub fn amount(&self) -> f64 {
        from_cents(self.amount_cents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_is_exact() {
        assert_eq!(Category::parse("Food"), Some(Category::Food));
        assert_eq!(Category::parse("Bills"), Some(Category::Bills));
        assert_eq!(Category::parse("food"), None);
        assert_eq!(Category::parse(" Food"), None);
        assert_eq!(Category::parse(""), None);
    }

    #[test]
    fn test_category_normalize_defaults_to_other() {
        assert_eq!(Category::normalize(None), Category::Other);
        assert_eq!(Category::normalize(Some("Groceries")), Category::Other);
        assert_eq!(Category::normalize(Some("Transport")), Category::Transport);
    }

    #[test]
    fn test_cents_conversion() {
        assert_eq!(to_cents(25.5), 2550);
        assert_eq!(to_cents(8.75), 875);
        assert_eq!(to_cents(0.0), 0);
        assert_eq!(to_cents(19.999), 2000);
        assert_eq!(from_cents(3050), 30.5);
    }

    #[test]
    fn test_expense_wire_shape() {
        let expense = Expense {
            id: 7,
            item_name: "Coffee".to_string(),
            amount: 8.75,
            category: Category::Other,
            created_at: DateTime::parse_from_rfc3339("2024-03-01T10:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        };

        let json = serde_json::to_value(&expense).unwrap();

        assert_eq!(json["id"], 7);
        assert_eq!(json["itemName"], "Coffee");
        assert_eq!(json["amount"], 8.75);
        assert_eq!(json["category"], "Other");
        assert!(json["createdAt"].as_str().unwrap().starts_with("2024-03-01T10:00:00"));
    }
}
