// 🛂 Input Validation - reject malformed requests before touching storage
// Checks run in a fixed order and the first failure wins

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{to_cents, Category, NewExpense, MAX_AMOUNT_CENTS};
use serde::Deserialize;
use serde_json::Value;

pub const ITEM_NAME_REQUIRED: &str = "item name required";
pub const AMOUNT_REQUIRED: &str = "amount required";
pub const AMOUNT_INVALID: &str = "amount must be a non-negative number";
pub const INVALID_ID: &str = "invalid id";

// ============================================================================
// REQUEST SCHEMA
// ============================================================================

/// Body of a create request. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExpenseRequest {
    pub item_name: Option<String>,
    pub amount: Option<AmountInput>,
    pub category: Option<String>,
}

/// Amount as sent by the client: a JSON number, a numeric string, or
/// anything else (which never parses)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(f64),
    Text(String),
    Other(Value),
}

impl AmountInput {
    fn to_number(&self) -> Option<f64> {
        let value = match self {
            AmountInput::Number(n) => *n,
            AmountInput::Text(s) => s.trim().parse::<f64>().ok()?,
            AmountInput::Other(_) => return None,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for AmountInput {
    fn from(n: f64) -> Self {
        AmountInput::Number(n)
    }
}

impl From<&str> for AmountInput {
    fn from(s: &str) -> Self {
        AmountInput::Text(s.to_string())
    }
}

impl CreateExpenseRequest {
    pub fn new(
        item_name: Option<&str>,
        amount: Option<AmountInput>,
        category: Option<&str>,
    ) -> Self {
        Self {
            item_name: item_name.map(str::to_string),
            amount,
            category: category.map(str::to_string),
        }
    }
}

// ============================================================================
// RULES
// ============================================================================

/// Validate and normalize a create request.
///
/// Order: item name, amount presence, amount value. Category is never a
/// reason to reject; unknown or missing labels become `Other`.
pub fn validate_create(request: &CreateExpenseRequest) -> ExpenseResult<NewExpense> {
    let item_name = request
        .item_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ExpenseError::validation(ITEM_NAME_REQUIRED))?;

    let amount = request
        .amount
        .as_ref()
        .ok_or_else(|| ExpenseError::validation(AMOUNT_REQUIRED))?;

    let amount_cents = amount
        .to_number()
        .filter(|n| *n >= 0.0)
        .map(to_cents)
        .filter(|cents| *cents <= MAX_AMOUNT_CENTS)
        .ok_or_else(|| ExpenseError::validation(AMOUNT_INVALID))?;

    Ok(NewExpense {
        item_name: item_name.to_string(),
        amount_cents,
        category: Category::normalize(request.category.as_deref()),
    })
}

/// Parse a path identifier; only positive integers are accepted
pub fn parse_expense_id(raw: &str) -> ExpenseResult<i64> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ExpenseError::validation(INVALID_ID))
}
