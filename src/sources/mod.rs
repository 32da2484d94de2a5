//! Snapshot sources: the seam to the backing document store.
//!
//! The store's contract is snapshot-replace: every fetch returns the full
//! current set of a project's documents, never a delta. The dashboard
//! treats each delivery as "replace my knowledge of this project
//! entirely".

pub mod file;
pub mod http;

use crate::core::model::{ProjectRef, ProjectSnapshot};
use crate::core::DashboardAggregator;
use anyhow::Result;
use async_trait::async_trait;
use futures::future::join_all;
use tracing::debug;

#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Projects visible to the current user.
    async fn list_projects(&self) -> Result<Vec<ProjectRef>>;

    /// Full point-in-time listing of one project's finance documents.
    async fn fetch_snapshot(&self, project: &ProjectRef) -> Result<ProjectSnapshot>;
}

/// One project's fetch failure, kept for transient user messaging.
#[derive(Debug)]
pub struct ProjectFailure {
    pub project: ProjectRef,
    pub error: String,
}

/// Result of one refresh pass over every project.
#[derive(Debug, Default)]
pub struct RefreshOutcome {
    pub projects: Vec<ProjectRef>,
    pub failures: Vec<ProjectFailure>,
}

/// Fetches every project's snapshot concurrently and feeds the results
/// into the aggregator.
///
/// Failures are isolated per project: a project whose fetch errors is
/// dropped from the aggregation and reported in the outcome, while every
/// other project's contribution lands normally. `on_project_done` fires
/// once per project for progress reporting.
pub async fn refresh_dashboard(
    source: &(dyn SnapshotSource),
    aggregator: &mut DashboardAggregator,
    on_project_done: &(dyn Fn()),
) -> Result<RefreshOutcome> {
    let projects = source.list_projects().await?;

    let fetches = projects
        .iter()
        .map(|project| async move { (project, source.fetch_snapshot(project).await) });
    let results = join_all(fetches).await;

    let mut failures = Vec::new();
    for (project, result) in results {
        match result {
            Ok(snapshot) => aggregator.apply(project, &snapshot),
            Err(e) => {
                debug!(project = %project.id, error = %e, "snapshot fetch failed");
                aggregator.mark_failed(&project.id);
                failures.push(ProjectFailure {
                    project: project.clone(),
                    error: e.to_string(),
                });
            }
        }
        on_project_done();
    }

    Ok(RefreshOutcome { projects, failures })
}
