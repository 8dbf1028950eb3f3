use std::path::PathBuf;

use clap::Parser;
use invoice_consolidator::{excel, process_batch, FileStatus};

/// Consolidate Excel invoice files into one report workbook.
#[derive(Parser)]
#[command(name = "invoice-consolidator", version)]
struct Args {
    /// Invoice files (.xlsx or .xls), processed in the order given
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Where to write the consolidated report (default: Downloads)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        )
        .init();

    let args = Args::parse();
    let outcome = process_batch(&args.files).await?;

    for file in &outcome.files {
        match file.status {
            FileStatus::Completed => {
                println!("  ok     {} - {} invoice(s)", file.name, file.records.len());
            }
            FileStatus::Error => {
                println!(
                    "  error  {} - {}",
                    file.name,
                    file.error.as_deref().unwrap_or("unknown error")
                );
            }
            _ => {}
        }
    }

    let report = &outcome.report;
    println!();
    println!("Total invoices: {}", report.total_invoices);
    println!("Total amount (exclusive): {:.2}", report.total_amount);
    println!("Total tax: {:.2}", report.total_tax);

    let saved = excel::write_report(report, args.out.as_deref())?;
    println!("Report written to {}", saved.display());
    Ok(())
}
