//! The run coordinator.
//!
//! Materializes work items for a run, executes them under a shared
//! admission limiter, drives each through the lifecycle state machine,
//! persists every transition, and publishes a notification per
//! transition. Individual item failures are absorbed; only run-scoped
//! problems abort a call.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use swapbench_core::types::DbId;
use swapbench_core::{CaseSet, ItemState, StoreError, TestCase, WorkItem, WorkItemStore};
use swapbench_events::{NotificationHub, RunNotification};
use swapbench_gateway::PluginGateway;

use crate::error::RunError;
use crate::scorer::Scorer;
use crate::storage::ArtifactStore;

/// Maximum number of simultaneously in-flight work items.
pub const DEFAULT_MAX_CONCURRENT_ITEMS: usize = 3;

/// One entry of a run status report.
#[derive(Debug, Clone, Serialize)]
pub struct WorkItemSnapshot {
    pub case_id: String,
    pub tool_id: String,
    pub state: ItemState,
    pub artifact_uri: Option<String>,
    pub score: Option<serde_json::Value>,
}

impl From<WorkItem> for WorkItemSnapshot {
    fn from(item: WorkItem) -> Self {
        Self {
            case_id: item.case_id,
            tool_id: item.tool_id,
            state: item.state,
            artifact_uri: item.artifact_uri,
            score: item.score,
        }
    }
}

/// Coordinates execution of generate-then-score work items.
///
/// All collaborators are provided at construction; the coordinator holds
/// no ambient global state. It always carries a [`NotificationHub`] -- a
/// hub with zero subscribers makes `publish` a no-op, so execution never
/// branches on whether anyone is observing.
#[derive(Clone)]
pub struct RunCoordinator {
    store: Arc<dyn WorkItemStore>,
    gateway: Arc<PluginGateway>,
    hub: Arc<NotificationHub>,
    scorer: Arc<dyn Scorer>,
    artifacts: Arc<dyn ArtifactStore>,
    cases: Arc<CaseSet>,
    max_concurrent: usize,
}

impl RunCoordinator {
    pub fn new(
        store: Arc<dyn WorkItemStore>,
        gateway: Arc<PluginGateway>,
        hub: Arc<NotificationHub>,
        scorer: Arc<dyn Scorer>,
        artifacts: Arc<dyn ArtifactStore>,
        cases: Arc<CaseSet>,
    ) -> Self {
        Self {
            store,
            gateway,
            hub,
            scorer,
            artifacts,
            cases,
            max_concurrent: DEFAULT_MAX_CONCURRENT_ITEMS,
        }
    }

    /// Override the admission limiter cap (defaults to
    /// [`DEFAULT_MAX_CONCURRENT_ITEMS`]).
    pub fn with_max_concurrent(mut self, cap: usize) -> Self {
        self.max_concurrent = cap.max(1);
        self
    }

    /// Create a run and its queued work items, without executing them.
    ///
    /// The effective case set is the explicit filter or all known cases;
    /// the effective tool set is the explicit filter or all registered
    /// tools. An unknown tool id fails the call before any row is
    /// created. Items are one per case x tool pair, no duplicates.
    ///
    /// Returns the run id immediately so a caller can begin observing
    /// before execution starts.
    pub async fn start_run(
        &self,
        case_ids: Option<Vec<String>>,
        tool_ids: Option<Vec<String>>,
    ) -> Result<DbId, RunError> {
        let tools = match tool_ids {
            Some(ids) => {
                let ids = dedup_preserving(ids);
                for id in &ids {
                    if !self.gateway.registry().contains(id) {
                        return Err(RunError::Configuration(format!(
                            "unknown tool id '{id}'"
                        )));
                    }
                }
                ids
            }
            None => self.gateway.registry().tool_ids(),
        };

        let cases = match case_ids {
            Some(ids) => dedup_preserving(ids),
            None => self.cases.ids(),
        };

        let run = self.store.create_run().await?;

        let pairs: Vec<(String, String)> = cases
            .iter()
            .flat_map(|case| tools.iter().map(move |tool| (case.clone(), tool.clone())))
            .collect();
        let items = self.store.create_work_items(run.id, &pairs).await?;

        tracing::info!(
            run_id = run.id,
            cases = cases.len(),
            tools = tools.len(),
            items = items.len(),
            "Run created",
        );
        Ok(run.id)
    }

    /// Execute every queued item of a run to a terminal state.
    ///
    /// Each item task holds one limiter permit for its whole protocol,
    /// so at most `max_concurrent` items are resident at any moment
    /// regardless of how many items the run has. Completes only when all
    /// items are terminal; item-scoped failures never abort the batch.
    pub async fn execute_run(&self, run_id: DbId) -> Result<(), RunError> {
        let items = self.store.items_for_run(run_id).await?;
        let queued: Vec<WorkItem> = items
            .into_iter()
            .filter(|item| item.state == ItemState::Queued)
            .collect();

        tracing::info!(run_id, items = queued.len(), "Executing run");

        let limiter = Arc::new(Semaphore::new(self.max_concurrent));
        let mut tasks = JoinSet::new();

        for item in queued {
            let this = self.clone();
            let limiter = Arc::clone(&limiter);
            tasks.spawn(async move {
                // The semaphore is never closed, so acquire cannot fail.
                let Ok(_permit) = limiter.acquire_owned().await else {
                    return;
                };
                this.process_item(item).await;
            });
        }

        while let Some(result) = tasks.join_next().await {
            if let Err(e) = result {
                tracing::error!(run_id, error = %e, "Work item task panicked");
            }
        }

        tracing::info!(run_id, "Run execution complete");
        Ok(())
    }

    /// Start a run and execute it to completion.
    pub async fn run(
        &self,
        case_ids: Option<Vec<String>>,
        tool_ids: Option<Vec<String>>,
    ) -> Result<DbId, RunError> {
        let run_id = self.start_run(case_ids, tool_ids).await?;
        self.execute_run(run_id).await?;
        Ok(run_id)
    }

    /// Snapshot of every item in a run.
    pub async fn run_status(&self, run_id: DbId) -> Result<Vec<WorkItemSnapshot>, RunError> {
        let items = self.store.items_for_run(run_id).await?;
        Ok(items.into_iter().map(WorkItemSnapshot::from).collect())
    }

    /// Execute one item to a terminal state, absorbing its failures.
    async fn process_item(&self, item: WorkItem) {
        if let Err(e) = self.drive_item(&item).await {
            tracing::error!(
                item_id = item.id,
                run_id = item.run_id,
                error = %e,
                "Work item aborted on persistence failure",
            );
            // Best effort: record the failure, announcing it only once
            // it is durable. If the store is still down the item stays
            // where the last recorded transition left it, and no event
            // is emitted for a state the store never held.
            match self
                .store
                .update_item(item.id, ItemState::Failed, None, None)
                .await
            {
                Ok(()) => self.publish(&item, ItemState::Failed, None, None).await,
                Err(e) => {
                    tracing::error!(
                        item_id = item.id,
                        error = %e,
                        "Could not record item failure",
                    );
                }
            }
        }
    }

    /// The per-item protocol. Returns `Err` only on persistence
    /// failures; generation and scoring failures are handled inline.
    async fn drive_item(&self, item: &WorkItem) -> Result<(), StoreError> {
        self.transition(item, ItemState::Generating, None, None)
            .await?;

        // Missing case metadata is not fatal: the gateway still gets a
        // stub it can render an error artifact for.
        let case = match self.cases.get(&item.case_id) {
            Some(case) => case.clone(),
            None => {
                tracing::warn!(
                    item_id = item.id,
                    case_id = %item.case_id,
                    "No metadata for case, using stub",
                );
                TestCase::stub(&item.case_id)
            }
        };

        // Never fails; failures come back as placeholder artifacts.
        let artifact = self.gateway.invoke(&item.tool_id, &case).await;

        let uri = match self
            .artifacts
            .save(item.run_id, &item.tool_id, &item.case_id, artifact.png_bytes())
            .await
        {
            Ok(uri) => uri,
            Err(e) => {
                tracing::error!(item_id = item.id, error = %e, "Failed to store artifact");
                self.transition(item, ItemState::Failed, None, None).await?;
                return Ok(());
            }
        };

        self.transition(item, ItemState::Evaluating, Some(&uri), None)
            .await?;

        match self.scorer.evaluate(&uri, artifact.png_bytes()).await {
            Ok(score) => {
                self.transition(item, ItemState::Scored, Some(&uri), Some(&score))
                    .await?;
            }
            Err(e) => {
                tracing::warn!(
                    item_id = item.id,
                    artifact_uri = %uri,
                    error = %e,
                    "Scorer failed, item failed",
                );
                self.transition(item, ItemState::Failed, None, None).await?;
            }
        }
        Ok(())
    }

    /// Persist one transition, then announce it. The notification
    /// carries exactly the payload that became available with this
    /// transition.
    async fn transition(
        &self,
        item: &WorkItem,
        state: ItemState,
        artifact_uri: Option<&str>,
        score: Option<&serde_json::Value>,
    ) -> Result<(), StoreError> {
        self.store
            .update_item(item.id, state, artifact_uri, score)
            .await?;
        self.publish(item, state, artifact_uri, score).await;
        Ok(())
    }

    async fn publish(
        &self,
        item: &WorkItem,
        state: ItemState,
        artifact_uri: Option<&str>,
        score: Option<&serde_json::Value>,
    ) {
        let mut event = RunNotification::state_change(
            item.run_id,
            item.id,
            item.case_id.clone(),
            item.tool_id.clone(),
            state,
        );
        if let Some(uri) = artifact_uri {
            event = event.with_artifact(uri);
        }
        if let Some(score) = score {
            event = event.with_score(score.clone());
        }
        self.hub.publish(event).await;
    }
}

/// Drop repeated ids while keeping first-seen order.
fn dedup_preserving(ids: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::with_capacity(ids.len());
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}
