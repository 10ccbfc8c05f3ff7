use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::db::Database;
use crate::engine;
use crate::models::BudgetStatus;
use crate::transfer;
use crate::util::format_amount;

pub(crate) fn as_cli(args: &[String], db: &mut Database) -> Result<()> {
    match args[1].as_str() {
        "status" | "s" => cli_status(&args[2..], db),
        "import" => cli_import(&args[2..], db),
        "export" => cli_export(&args[2..], db),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("budgetweb {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("BudgetWeb: per-owner category budgets with spending warnings");
    println!();
    println!("Usage: budgetweb [command]");
    println!();
    println!("Commands:");
    println!("  (none), serve                 Run the HTTP API (needs JWT_SECRET)");
    println!("  status <owner> [category]     Print budget status and warnings");
    println!("  import <owner> <file.csv>     Import expenses (title,amount,category[,date])");
    println!("  export <owner> [path]         Export an owner's expenses to CSV");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
    println!();
    println!("Environment: BUDGETWEB_DB, BUDGETWEB_ADDR, JWT_SECRET, RUST_LOG");
}

fn cli_status(args: &[String], db: &mut Database) -> Result<()> {
    let Some(owner) = args.first() else {
        anyhow::bail!("Usage: budgetweb status <owner> [category]");
    };

    if let Some(category) = args.get(1) {
        let status = engine::compute_status(db, owner, category)?;
        print_status_header();
        print_status_row(&status);
        if let Some(warning) = engine::classify(&status) {
            println!();
            println!("  ! {warning}");
        }
        return Ok(());
    }

    let summary = engine::summarize(db, owner)?;
    if summary.budgets.is_empty() {
        println!("No budgets for {owner}");
        return Ok(());
    }

    print_status_header();
    for status in &summary.budgets {
        print_status_row(status);
    }
    println!("{}", "─".repeat(64));
    println!(
        "{:<20} {:>14} {:>14}",
        "Total",
        format_amount(summary.total_limit),
        format_amount(summary.total_spent),
    );

    if !summary.warnings.is_empty() {
        println!();
        for warning in &summary.warnings {
            println!("  ! {warning}");
        }
    }
    Ok(())
}

fn print_status_header() {
    println!(
        "{:<20} {:>14} {:>14} {:>14}",
        "Category", "Limit", "Spent", "Remaining"
    );
    println!("{}", "─".repeat(64));
}

fn print_status_row(status: &BudgetStatus) {
    println!(
        "{:<20} {:>14} {:>14} {:>14}",
        status.category,
        format_amount(status.limit),
        format_amount(status.spent),
        format_amount(status.remaining),
    );
}

fn cli_import(args: &[String], db: &mut Database) -> Result<()> {
    let [owner, file_path, ..] = args else {
        anyhow::bail!("Usage: budgetweb import <owner> <file.csv>");
    };

    let path = PathBuf::from(shellexpand(file_path));
    if !path.exists() {
        anyhow::bail!("File not found: {file_path}");
    }

    let rows = transfer::read_expenses(&path)?;
    println!("Parsed {} rows", rows.len());

    let count = engine::import_expenses(db, owner, rows)?;
    println!("Imported {count} expenses for {owner}");
    Ok(())
}

fn cli_export(args: &[String], db: &mut Database) -> Result<()> {
    let Some(owner) = args.first() else {
        anyhow::bail!("Usage: budgetweb export <owner> [path]");
    };

    let output_path = args
        .get(1)
        .filter(|a| !a.starts_with('-'))
        .map(|a| shellexpand(a))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            format!("{home}/budgetweb-{owner}.csv")
        });

    let expenses = engine::list_expenses(db, owner)?;
    if expenses.is_empty() {
        println!("No expenses for {owner}");
        return Ok(());
    }
    let count = transfer::write_expenses(Path::new(&output_path), &expenses)?;
    println!("Exported {count} expenses to {output_path}");
    Ok(())
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}
