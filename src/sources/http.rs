//! HTTP snapshot source against the store's REST facade.
//!
//! Endpoints:
//!   GET {base}/projects                     -> [ProjectRef]
//!   GET {base}/projects/{id}/expenses       -> [Expense]
//!   GET {base}/projects/{id}/invoices       -> [Invoice]
//!   GET {base}/projects/{id}/quotes         -> [Quote]
//!
//! Each response body is the complete current collection, per the
//! snapshot-replace contract.

use super::SnapshotSource;
use crate::core::model::{Expense, Invoice, ProjectRef, ProjectSnapshot, Quote};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

pub struct HttpSource {
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: &str) -> Self {
        HttpSource {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);
        debug!("Requesting {}", url);

        let client = reqwest::Client::builder().user_agent("proflow/0.2").build()?;
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for URL: {}", e, url))?
            .error_for_status()
            .map_err(|e| anyhow!("Server error: {} for URL: {}", e, url))?;

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl SnapshotSource for HttpSource {
    #[instrument(name = "ListProjects", skip(self))]
    async fn list_projects(&self) -> Result<Vec<ProjectRef>> {
        self.get_json("projects").await
    }

    #[instrument(name = "FetchSnapshot", skip(self), fields(project = %project.id))]
    async fn fetch_snapshot(&self, project: &ProjectRef) -> Result<ProjectSnapshot> {
        let expenses: Vec<Expense> = self
            .get_json(&format!("projects/{}/expenses", project.id))
            .await?;
        let invoices: Vec<Invoice> = self
            .get_json(&format!("projects/{}/invoices", project.id))
            .await?;
        let quotes: Vec<Quote> = self
            .get_json(&format!("projects/{}/quotes", project.id))
            .await?;

        debug!(
            expenses = expenses.len(),
            invoices = invoices.len(),
            quotes = quotes.len(),
            "fetched project snapshot"
        );
        Ok(ProjectSnapshot {
            expenses,
            invoices,
            quotes,
        })
    }
}
