use super::ui;
use crate::core::export::write_csv;
use crate::core::model::{Expense, Invoice};
use crate::sources::SnapshotSource;
use anyhow::{Context, Result};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default export filename, dated so repeated exports do not clobber
/// each other.
pub fn default_out_path() -> PathBuf {
    let today = chrono::Utc::now().date_naive();
    PathBuf::from(format!("proflow-export-{today}.csv"))
}

pub async fn run(source: &(dyn SnapshotSource), out: &Path) -> Result<()> {
    let projects = source.list_projects().await?;

    let mut expenses: Vec<Expense> = Vec::new();
    let mut invoices: Vec<Invoice> = Vec::new();
    for project in &projects {
        let snapshot = source
            .fetch_snapshot(project)
            .await
            .with_context(|| format!("Failed to fetch snapshot for project '{}'", project.name))?;
        debug!(project = %project.id, "collected snapshot for export");
        expenses.extend(snapshot.expenses);
        invoices.extend(snapshot.invoices);
    }

    let file =
        File::create(out).with_context(|| format!("Failed to create {}", out.display()))?;
    write_csv(file, &expenses, &invoices)?;

    println!(
        "Exported {} expenses and {} invoices to {}",
        expenses.len(),
        invoices.len(),
        ui::style_text(&out.display().to_string(), ui::StyleType::TotalValue)
    );
    Ok(())
}
