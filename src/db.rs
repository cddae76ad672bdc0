use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use crate::models::{from_cents, Category, Expense, NewExpense, MAX_AMOUNT_CENTS};
use crate::query::{ExpenseQuery, EXPENSE_COLUMNS};

// ============================================================================
// STORE CONTRACT
// ============================================================================

/// Persistence engine handle used by the service layer.
///
/// Every call is a fresh round trip; implementations hold no cache.
pub trait ExpenseStore: Send + Sync {
    /// Insert one expense and return it with engine-assigned id and timestamp
    fn insert(&self, expense: &NewExpense) -> Result<Expense>;

    fn list(&self, query: &ExpenseQuery) -> Result<Vec<Expense>>;

    /// Sum of amounts in cents; 0 for an empty set
    fn total_cents(&self, query: &ExpenseQuery) -> Result<i64>;

    fn exists(&self, id: i64) -> Result<bool>;

    /// Delete by primary key, returning the number of rows removed
    fn delete(&self, id: i64) -> Result<usize>;
}

// ============================================================================
// SCHEMA
// ============================================================================

pub fn setup_database(conn: &Connection) -> Result<()> {
    let categories = Category::ALL
        .iter()
        .map(|c| format!("'{}'", c.as_str()))
        .collect::<Vec<_>>()
        .join(", ");

    // Constraints repeat the write-path rules so bad rows never land
    conn.execute(
        &format!(
            "CREATE TABLE IF NOT EXISTS expenses (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                item_name TEXT NOT NULL CHECK (length(trim(item_name)) > 0),
                amount_cents INTEGER NOT NULL CHECK (amount_cents BETWEEN 0 AND {max_cents}),
                category TEXT NOT NULL DEFAULT 'Other' CHECK (category IN ({categories})),
                created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            )",
            max_cents = MAX_AMOUNT_CENTS,
            categories = categories,
        ),
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_expenses_category ON expenses(category)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_expenses_created_at ON expenses(created_at)",
        [],
    )?;

    Ok(())
}

/// Open (or create) a database file and make sure the schema exists
pub fn open_database(path: &str, busy_timeout: Duration) -> Result<Connection> {
    let conn = if path == ":memory:" {
        Connection::open_in_memory()?
    } else {
        let conn = Connection::open(Path::new(path))
            .with_context(|| format!("Failed to open database at {}", path))?;
        // WAL for crash recovery and concurrent readers
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        tracing::debug!(journal_mode = %mode, "database journal mode set");
        conn
    };

    conn.busy_timeout(busy_timeout)?;
    setup_database(&conn)?;

    Ok(conn)
}

// ============================================================================
// ROW MAPPING
// ============================================================================

/// Map a row selected with `EXPENSE_COLUMNS`
fn row_to_expense(row: &Row<'_>) -> rusqlite::Result<Expense> {
    let amount_cents: i64 = row.get(2)?;
    let category_label: String = row.get(3)?;
    let created_at_str: String = row.get(4)?;

    let category = Category::parse(&category_label).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            Type::Text,
            format!("unknown category {:?}", category_label).into(),
        )
    })?;

    let created_at = DateTime::parse_from_rfc3339(&created_at_str)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?
        .with_timezone(&Utc);

    Ok(Expense {
        id: row.get(0)?,
        item_name: row.get(1)?,
        amount: from_cents(amount_cents),
        category,
        created_at,
    })
}

// ============================================================================
// SQLITE STORE
// ============================================================================

/// SQLite-backed store. One connection, serialized behind a mutex.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Wrap a connection, creating the schema if needed
    pub fn new(conn: Connection) -> Result<Self> {
        setup_database(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open(path: &str, busy_timeout: Duration) -> Result<Self> {
        Ok(Self {
            conn: Mutex::new(open_database(path, busy_timeout)?),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::new(Connection::open_in_memory()?)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("database connection lock poisoned"))
    }
}

impl ExpenseStore for SqliteStore {
    fn insert(&self, expense: &NewExpense) -> Result<Expense> {
        let conn = self.conn()?;

        let stored = conn.query_row(
            &format!(
                "INSERT INTO expenses (item_name, amount_cents, category)
                 VALUES (?1, ?2, ?3)
                 RETURNING {}",
                EXPENSE_COLUMNS
            ),
            params![
                expense.item_name,
                expense.amount_cents,
                expense.category.as_str()
            ],
            row_to_expense,
        )?;

        Ok(stored)
    }

    fn list(&self, query: &ExpenseQuery) -> Result<Vec<Expense>> {
        let statement = query.list_statement();
        let conn = self.conn()?;

        let mut stmt = conn.prepare(&statement.sql)?;
        let expenses = stmt
            .query_map(params_from_iter(statement.params.iter()), row_to_expense)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(expenses)
    }

    fn total_cents(&self, query: &ExpenseQuery) -> Result<i64> {
        let statement = query.total_statement();
        let conn = self.conn()?;

        let total: i64 = conn.query_row(
            &statement.sql,
            params_from_iter(statement.params.iter()),
            |row| row.get(0),
        )?;

        Ok(total)
    }

    fn exists(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;

        let found = conn
            .query_row("SELECT 1 FROM expenses WHERE id = ?1", [id], |_| Ok(()))
            .optional()?;

        Ok(found.is_some())
    }

    fn delete(&self, id: i64) -> Result<usize> {
        let conn = self.conn()?;
        let affected = conn.execute("DELETE FROM expenses WHERE id = ?1", [id])?;
        Ok(affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_expense(name: &str, cents: i64, category: Category) -> NewExpense {
        NewExpense {
            item_name: name.to_string(),
            amount_cents: cents,
            category,
        }
    }

    #[test]
    fn test_insert_returns_persisted_record() {
        let store = SqliteStore::open_in_memory().unwrap();

        let stored = store
            .insert(&new_expense("Coffee", 875, Category::Other))
            .unwrap();

        assert!(stored.id > 0);
        assert_eq!(stored.item_name, "Coffee");
        assert_eq!(stored.amount, 8.75);
        assert_eq!(stored.category, Category::Other);
        assert!(stored.created_at <= Utc::now());
    }

    #[test]
    fn test_list_is_newest_first() {
        let store = SqliteStore::open_in_memory().unwrap();

        let first = store.insert(&new_expense("First", 100, Category::Food)).unwrap();
        let second = store.insert(&new_expense("Second", 200, Category::Bills)).unwrap();
        let third = store.insert(&new_expense("Third", 300, Category::Food)).unwrap();

        let all = store.list(&ExpenseQuery::all()).unwrap();
        let ids: Vec<i64> = all.iter().map(|e| e.id).collect();

        assert_eq!(ids, vec![third.id, second.id, first.id]);
        assert!(all.windows(2).all(|w| w[0].created_at >= w[1].created_at));

        let food = store.list(&ExpenseQuery::from_filter(Some("Food"))).unwrap();
        assert_eq!(food.len(), 2);
        assert!(food.iter().all(|e| e.category == Category::Food));
    }

    #[test]
    fn test_list_filter_outside_category_set_matches_nothing() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.insert(&new_expense("Gift", 500, Category::Other)).unwrap();

        let result = store.list(&ExpenseQuery::from_filter(Some("Gifts"))).unwrap();
        assert!(result.is_empty());

        let lowercase = store.list(&ExpenseQuery::from_filter(Some("other"))).unwrap();
        assert!(lowercase.is_empty());
    }

    #[test]
    fn test_total_of_empty_set_is_zero() {
        let store = SqliteStore::open_in_memory().unwrap();

        assert_eq!(store.total_cents(&ExpenseQuery::all()).unwrap(), 0);
        assert_eq!(
            store.total_cents(&ExpenseQuery::from_filter(Some("Food"))).unwrap(),
            0
        );
    }

    #[test]
    fn test_total_sums_filtered_set() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.insert(&new_expense("Lunch", 2550, Category::Food)).unwrap();
        store.insert(&new_expense("Bus", 500, Category::Transport)).unwrap();

        assert_eq!(store.total_cents(&ExpenseQuery::all()).unwrap(), 3050);
        assert_eq!(
            store.total_cents(&ExpenseQuery::from_filter(Some("Food"))).unwrap(),
            2550
        );
    }

    #[test]
    fn test_exists_and_delete() {
        let store = SqliteStore::open_in_memory().unwrap();
        let stored = store.insert(&new_expense("Tickets", 4000, Category::Entertainment)).unwrap();

        assert!(store.exists(stored.id).unwrap());
        assert!(!store.exists(stored.id + 1).unwrap());

        assert_eq!(store.delete(stored.id).unwrap(), 1);
        assert!(!store.exists(stored.id).unwrap());

        // Second delete of the same id touches nothing
        assert_eq!(store.delete(stored.id).unwrap(), 0);
    }

    #[test]
    fn test_constraints_reject_bad_rows() {
        let store = SqliteStore::open_in_memory().unwrap();

        assert!(store.insert(&new_expense("Refund", -100, Category::Other)).is_err());
        assert!(store.insert(&new_expense("   ", 100, Category::Other)).is_err());
        assert!(store
            .insert(&new_expense("Yacht", MAX_AMOUNT_CENTS + 1, Category::Other))
            .is_err());
        assert!(store
            .insert(&new_expense("House", MAX_AMOUNT_CENTS, Category::Bills))
            .is_ok());
    }

    #[test]
    fn test_open_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("expenses.db");
        let path = path.to_str().unwrap();

        {
            let store = SqliteStore::open(path, Duration::from_millis(100)).unwrap();
            store.insert(&new_expense("Book", 1299, Category::Shopping)).unwrap();
        }

        let reopened = SqliteStore::open(path, Duration::from_millis(100)).unwrap();
        let all = reopened.list(&ExpenseQuery::all()).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].item_name, "Book");
    }
}
