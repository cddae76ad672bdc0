// ⚙️ Expense Service - create, list, total, delete
// Each call is one self-contained unit against the store; nothing is retried

use crate::db::ExpenseStore;
use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{from_cents, Expense};
use crate::query::ExpenseQuery;
use crate::validation::{parse_expense_id, validate_create, CreateExpenseRequest};

/// Validate, normalize, and insert a new expense
pub fn create_expense(
    store: &dyn ExpenseStore,
    request: &CreateExpenseRequest,
) -> ExpenseResult<Expense> {
    let new_expense = validate_create(request)?;
    let stored = store.insert(&new_expense)?;

    tracing::info!(
        id = stored.id,
        amount = stored.amount,
        category = %stored.category,
        "expense created"
    );

    Ok(stored)
}

/// List expenses newest first, optionally filtered by a raw category value
pub fn list_expenses(
    store: &dyn ExpenseStore,
    category: Option<&str>,
) -> ExpenseResult<Vec<Expense>> {
    let query = ExpenseQuery::from_filter(category);
    let expenses = store.list(&query)?;

    tracing::debug!(category = ?query.category(), count = expenses.len(), "listed expenses");

    Ok(expenses)
}

/// Sum of amounts over the (optionally filtered) set; 0.0 when empty
pub fn total_expenses(store: &dyn ExpenseStore, category: Option<&str>) -> ExpenseResult<f64> {
    let query = ExpenseQuery::from_filter(category);
    let total = from_cents(store.total_cents(&query)?);

    tracing::debug!(category = ?query.category(), total, "computed total");

    Ok(total)
}

/// Delete by raw path identifier, returning the deleted id.
///
/// Existence check and delete are two separate statements. If another
/// caller removes the row in between, the delete affects nothing and the
/// call still succeeds.
pub fn delete_expense(store: &dyn ExpenseStore, raw_id: &str) -> ExpenseResult<i64> {
    let id = parse_expense_id(raw_id)?;

    if !store.exists(id)? {
        return Err(ExpenseError::NotFound(id));
    }

    let affected = store.delete(id)?;
    if affected == 0 {
        tracing::warn!(id, "expense removed concurrently before delete");
    } else {
        tracing::info!(id, "expense deleted");
    }

    Ok(id)
}
