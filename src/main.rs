use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use expense_tracker::config::DatabaseArgs;
use expense_tracker::csv_io::{export_csv, import_csv};
use expense_tracker::logging::init_tracing;
use expense_tracker::{
    create_expense, delete_expense, list_expenses, total_expenses, AmountInput,
    CreateExpenseRequest,
};

#[derive(Parser)]
#[command(name = "expense-tracker", version, about = "Record and summarize expenses")]
struct Cli {
    #[command(flatten)]
    db: DatabaseArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the database schema
    Init,

    /// Add a single expense
    Add {
        item_name: String,
        amount: String,
        #[arg(short, long)]
        category: Option<String>,
    },

    /// List expenses, newest first
    List {
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Sum of expense amounts
    Total {
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Delete an expense by id
    Delete { id: String },

    /// Import expenses from CSV (item_name,amount[,category])
    Import { path: PathBuf },

    /// Export expenses to CSV
    Export {
        path: PathBuf,
        #[arg(short, long)]
        category: Option<String>,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let store = cli.db.open_store()?;

    match cli.command {
        Command::Init => {
            println!("✓ Database ready: {}", cli.db.database);
        }
        Command::Add {
            item_name,
            amount,
            category,
        } => {
            let request = CreateExpenseRequest {
                item_name: Some(item_name),
                amount: Some(AmountInput::Text(amount)),
                category,
            };
            let expense = create_expense(&store, &request)?;
            println!(
                "✓ Added #{} {} ${:.2} [{}]",
                expense.id, expense.item_name, expense.amount, expense.category
            );
        }
        Command::List { category } => {
            let expenses = list_expenses(&store, category.as_deref())?;
            for expense in &expenses {
                println!(
                    "{:>6}  {}  {:<14} {:>10.2}  {}",
                    expense.id,
                    expense.created_at.format("%Y-%m-%d %H:%M"),
                    expense.category.as_str(),
                    expense.amount,
                    expense.item_name
                );
            }
            println!("{} expense(s)", expenses.len());
        }
        Command::Total { category } => {
            let total = total_expenses(&store, category.as_deref())?;
            println!("{:.2}", total);
        }
        Command::Delete { id } => {
            let id = delete_expense(&store, &id)?;
            println!("✓ Deleted #{}", id);
        }
        Command::Import { path } => {
            let summary = import_csv(&store, &path)?;
            println!("✓ Imported: {} expenses", summary.imported);
            println!("✓ Skipped invalid rows: {}", summary.skipped.len());
            for (line, reason) in &summary.skipped {
                println!("   line {}: {}", line, reason);
            }
        }
        Command::Export { path, category } => {
            let written = export_csv(&store, category.as_deref(), &path)?;
            println!("✓ Exported {} expenses to {}", written, path.display());
        }
    }

    Ok(())
}
