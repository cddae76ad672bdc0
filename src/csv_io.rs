// 📄 CSV Import / Export
// Imported rows go through the same create path as the API

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::db::ExpenseStore;
use crate::error::ExpenseError;
use crate::service;
use crate::validation::{AmountInput, CreateExpenseRequest};

/// One input row. Empty cells read as absent.
#[derive(Debug, Deserialize)]
struct ImportRow {
    item_name: Option<String>,
    amount: Option<String>,
    #[serde(default)]
    category: Option<String>,
}

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    id: i64,
    item_name: &'a str,
    amount: String,
    category: &'a str,
    created_at: String,
}

/// Outcome of an import run
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ImportSummary {
    pub imported: usize,
    /// (line number, reason) for every rejected row
    pub skipped: Vec<(u64, String)>,
}

/// Import expenses from a CSV with an `item_name,amount[,category]` header.
///
/// Rows failing validation are skipped and reported. A storage failure
/// stops the import; rows already inserted stay inserted.
pub fn import_csv(store: &dyn ExpenseStore, csv_path: &Path) -> Result<ImportSummary> {
    let mut rdr = csv::Reader::from_path(csv_path)
        .with_context(|| format!("Failed to open CSV file {}", csv_path.display()))?;

    let headers = rdr.headers()?.clone();
    let mut record = csv::StringRecord::new();
    let mut summary = ImportSummary::default();

    while rdr.read_record(&mut record)? {
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let row: ImportRow = record
            .deserialize(Some(&headers))
            .with_context(|| format!("Failed to deserialize expense row at line {}", line))?;

        let request = CreateExpenseRequest {
            item_name: row.item_name,
            amount: row.amount.map(AmountInput::Text),
            category: row.category,
        };

        match service::create_expense(store, &request) {
            Ok(_) => summary.imported += 1,
            Err(ExpenseError::Validation(reason)) => {
                tracing::warn!(line, %reason, "skipping invalid row");
                summary.skipped.push((line, reason));
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Import stopped at line {}", line));
            }
        }
    }

    Ok(summary)
}

/// Write the (optionally filtered) expense list to CSV, newest first
pub fn export_csv(
    store: &dyn ExpenseStore,
    category: Option<&str>,
    csv_path: &Path,
) -> Result<usize> {
    let expenses = service::list_expenses(store, category)?;

    let mut wtr = csv::Writer::from_path(csv_path)
        .with_context(|| format!("Failed to create CSV file {}", csv_path.display()))?;

    for expense in &expenses {
        wtr.serialize(ExportRow {
            id: expense.id,
            item_name: &expense.item_name,
            amount: format!("{:.2}", expense.amount),
            category: expense.category.as_str(),
            created_at: expense.created_at.to_rfc3339(),
        })?;
    }

    wtr.flush()?;
    Ok(expenses.len())
}
