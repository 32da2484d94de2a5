//! File-backed snapshot source.
//!
//! Reads a JSON export of the document store, shaped as
//! `{"projects": [{id, name, customer, expenses, invoices, quotes}]}`.
//! The file is re-read on every fetch so an updated export shows up on the
//! next refresh, matching the snapshot-replace contract.

use super::SnapshotSource;
use crate::core::model::{Expense, Invoice, ProjectRef, ProjectSnapshot, Quote};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

pub struct FileSource {
    path: PathBuf,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct ExportDoc {
    projects: Vec<ProjectDoc>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct ProjectDoc {
    id: String,
    name: String,
    customer: String,
    expenses: Vec<Expense>,
    invoices: Vec<Invoice>,
    quotes: Vec<Quote>,
}

impl FileSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        FileSource { path: path.into() }
    }

    fn read(&self) -> Result<ExportDoc> {
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read data file: {}", self.path.display()))?;
        let doc: ExportDoc = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse data file: {}", self.path.display()))?;
        debug!(projects = doc.projects.len(), "loaded data file");
        Ok(doc)
    }
}

#[async_trait]
impl SnapshotSource for FileSource {
    async fn list_projects(&self) -> Result<Vec<ProjectRef>> {
        let doc = self.read()?;
        Ok(doc
            .projects
            .into_iter()
            .map(|p| ProjectRef {
                id: p.id,
                name: p.name,
                customer: p.customer,
            })
            .collect())
    }

    async fn fetch_snapshot(&self, project: &ProjectRef) -> Result<ProjectSnapshot> {
        let doc = self.read()?;
        let p = doc
            .projects
            .into_iter()
            .find(|p| p.id == project.id)
            .with_context(|| format!("Project '{}' not found in data file", project.id))?;
        Ok(ProjectSnapshot {
            expenses: p.expenses,
            invoices: p.invoices,
            quotes: p.quotes,
        })
    }
}
