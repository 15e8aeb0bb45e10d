//! CSV export of a list of transactions.

use crate::model::Transaction;
use crate::{utils, Result};
use anyhow::Context;
use chrono::NaiveDate;
use std::path::Path;
use tracing::debug;

pub const EXPORT_HEADER: [&str; 6] = ["Date", "Type", "Category", "Amount", "Note", "Recurring"];

/// The default name of an export file made on `today`, e.g. `finance-export-2024-03-05.csv`.
pub fn export_filename(today: NaiveDate) -> String {
    format!("finance-export-{}.csv", today.format("%Y-%m-%d"))
}

/// Renders `transactions`, in the given order, as CSV with a header row.
pub fn to_csv(transactions: &[Transaction]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(EXPORT_HEADER)
        .context("Unable to write the CSV header")?;
    for t in transactions {
        writer
            .write_record([
                t.date().format("%Y-%m-%d").to_string(),
                t.transaction_type().to_string(),
                t.category().to_string(),
                t.amount().value().normalize().to_string(),
                t.note().unwrap_or_default().to_string(),
                if t.recurring() { "Yes" } else { "No" }.to_string(),
            ])
            .with_context(|| format!("Unable to write transaction {} as CSV", t.id()))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Unable to finish the CSV: {e}"))?;
    String::from_utf8(bytes).context("The CSV is not valid UTF-8")
}

/// Writes `transactions` to `path` as CSV and returns how many rows were written. When there is
/// nothing to export no file is created and zero is returned.
pub async fn export_csv(transactions: &[Transaction], path: &Path) -> Result<usize> {
    if transactions.is_empty() {
        debug!("Nothing to export, not creating {}", path.display());
        return Ok(0);
    }
    let csv = to_csv(transactions)?;
    utils::write(path, csv).await?;
    debug!(
        "Exported {} transactions to {}",
        transactions.len(),
        path.display()
    );
    Ok(transactions.len())
}
