// Expense Tracker - Core Library
// Exposes all modules for use in CLI, API server, and tests

pub mod config;
pub mod csv_io;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod query;
pub mod service;
pub mod validation;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use db::{open_database, setup_database, ExpenseStore, SqliteStore};
pub use error::{ExpenseError, ExpenseResult};
pub use models::{Category, Expense, NewExpense};
pub use query::{ExpenseQuery, Statement};
pub use service::{create_expense, delete_expense, list_expenses, total_expenses};
pub use validation::{parse_expense_id, validate_create, AmountInput, CreateExpenseRequest};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
