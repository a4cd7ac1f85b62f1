//! The durable Work Item Store seam.
//!
//! The run coordinator persists every state transition through
//! [`WorkItemStore`]; the production implementation lives in
//! `swapbench-db` over sqlx/Postgres. The store is handed to the
//! coordinator at construction time -- there is no ambient global
//! database handle anywhere in the engine.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::state::ItemState;
use crate::types::{DbId, Timestamp};

/// One execution batch. Created when a run is requested, never mutated
/// afterwards except through its items, never deleted by the engine.
#[derive(Debug, Clone)]
pub struct Run {
    pub id: DbId,
    pub created_at: Timestamp,
}

/// One (case, tool) pairing within a run.
#[derive(Debug, Clone)]
pub struct WorkItem {
    pub id: DbId,
    pub run_id: DbId,
    pub case_id: String,
    pub tool_id: String,
    pub state: ItemState,
    pub artifact_uri: Option<String>,
    pub score: Option<serde_json::Value>,
}

/// Durable storage for runs and their work items.
///
/// Contract notes:
///
/// - `create_work_items` is all-or-nothing: after it returns either every
///   item exists in `queued` state or none do.
/// - `update_item` applies one transition atomically -- state and its
///   associated payload (artifact URI, score) land together, and a
///   concurrent reader never observes a half-updated row.
/// - Terminal rows (`scored`, `failed`) are immutable: an update against
///   one is a silent no-op, which makes terminality idempotent under
///   races.
/// - Updates are scoped to a single row; no cross-item locking exists.
#[async_trait]
pub trait WorkItemStore: Send + Sync {
    /// Allocate a new run. Fails only on storage unavailability.
    async fn create_run(&self) -> Result<Run, StoreError>;

    /// Bulk-insert `(case_id, tool_id)` pairs as queued items.
    async fn create_work_items(
        &self,
        run_id: DbId,
        pairs: &[(String, String)],
    ) -> Result<Vec<WorkItem>, StoreError>;

    /// Apply one state transition, optionally recording the artifact URI
    /// and/or score alongside it.
    async fn update_item(
        &self,
        item_id: DbId,
        state: ItemState,
        artifact_uri: Option<&str>,
        score: Option<&serde_json::Value>,
    ) -> Result<(), StoreError>;

    /// All items belonging to a run, in creation order.
    async fn items_for_run(&self, run_id: DbId) -> Result<Vec<WorkItem>, StoreError>;

    /// A single item by id.
    async fn item(&self, item_id: DbId) -> Result<WorkItem, StoreError>;
}
