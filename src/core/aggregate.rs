//! Cross-project aggregation for a dashboard session.

use crate::core::model::{ProjectRef, ProjectSnapshot};
use crate::core::rollup::{CustomerTotals, ProjectRollup, Totals};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Merges per-project rollups into global totals and a customer ranking.
///
/// One instance belongs to one dashboard session; nothing here is shared
/// across sessions. The aggregator owns only its in-memory mapping, so
/// tearing a session down is just dropping the value.
///
/// Snapshots may arrive in any order. Applying one wholesale replaces that
/// project's contribution, so re-delivery of an unchanged snapshot is
/// idempotent.
#[derive(Debug, Default)]
pub struct DashboardAggregator {
    rollups: HashMap<String, ProjectRollup>,
}

impl DashboardAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the tracked rollup for `project` with one recomputed from
    /// `snapshot`.
    pub fn apply(&mut self, project: &ProjectRef, snapshot: &ProjectSnapshot) {
        let rollup = ProjectRollup::compute(&project.customer, &snapshot.expenses, &snapshot.invoices);
        debug!(project = %project.id, "applied snapshot");
        self.rollups.insert(project.id.clone(), rollup);
    }

    /// Drops a project whose subscription failed. Its contribution is
    /// treated as absent; every other project keeps counting.
    pub fn mark_failed(&mut self, project_id: &str) {
        if self.rollups.remove(project_id).is_some() {
            debug!(project = %project_id, "dropped failed project from aggregation");
        }
    }

    /// Removes a project that is no longer part of the dashboard.
    pub fn remove(&mut self, project_id: &str) {
        self.rollups.remove(project_id);
    }

    pub fn rollup(&self, project_id: &str) -> Option<&ProjectRollup> {
        self.rollups.get(project_id)
    }

    pub fn project_count(&self) -> usize {
        self.rollups.len()
    }

    /// Element-wise sum of every tracked project's totals.
    pub fn global_totals(&self) -> Totals {
        let mut totals = Totals::default();
        for rollup in self.rollups.values() {
            totals.add(&rollup.totals);
        }
        totals
    }

    /// Per-customer breakdowns of all projects merged by exact customer
    /// name. No case or whitespace normalization is applied; differently
    /// typed names stay separate rows.
    pub fn customer_breakdown(&self) -> BTreeMap<String, CustomerTotals> {
        let mut merged: BTreeMap<String, CustomerTotals> = BTreeMap::new();
        for rollup in self.rollups.values() {
            for (name, totals) in &rollup.customers {
                let entry = merged.entry(name.clone()).or_default();
                entry.invoiced += totals.invoiced;
                entry.unpaid += totals.unpaid;
            }
        }
        merged
    }

    /// Customers ranked by descending unpaid total, truncated to `n` rows.
    /// Ties break on name so the ranking is stable across recomputations.
    pub fn top_customers(&self, n: usize) -> Vec<(String, CustomerTotals)> {
        let mut rows: Vec<(String, CustomerTotals)> = self.customer_breakdown().into_iter().collect();
        rows.sort_by(|a, b| {
            b.1.unpaid
                .partial_cmp(&a.1.unpaid)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        rows.truncate(n);
        rows
    }
}
