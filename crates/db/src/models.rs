//! Row structs matching the database schema, plus conversions into the
//! shared domain types.

use sqlx::FromRow;
use swapbench_core::types::{DbId, StatusId, Timestamp};
use swapbench_core::{ItemState, Run, WorkItem};

/// A row from the `runs` table.
#[derive(Debug, Clone, FromRow)]
pub struct RunRow {
    pub id: DbId,
    pub created_at: Timestamp,
}

impl From<RunRow> for Run {
    fn from(row: RunRow) -> Self {
        Run {
            id: row.id,
            created_at: row.created_at,
        }
    }
}

/// A row from the `run_items` table.
#[derive(Debug, Clone, FromRow)]
pub struct RunItemRow {
    pub id: DbId,
    pub run_id: DbId,
    pub case_id: String,
    pub tool_id: String,
    pub status_id: StatusId,
    pub artifact_uri: Option<String>,
    pub score: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl RunItemRow {
    /// Convert into the domain type. A status id outside the seeded
    /// range can only come from schema drift; surface it as a distinct
    /// error instead of panicking.
    pub fn into_work_item(self) -> Result<WorkItem, UnknownStatus> {
        let state = ItemState::from_id(self.status_id).ok_or(UnknownStatus {
            item_id: self.id,
            status_id: self.status_id,
        })?;
        Ok(WorkItem {
            id: self.id,
            run_id: self.run_id,
            case_id: self.case_id,
            tool_id: self.tool_id,
            state,
            artifact_uri: self.artifact_uri,
            score: self.score,
        })
    }
}

/// A `run_items.status_id` value with no matching [`ItemState`].
#[derive(Debug, thiserror::Error)]
#[error("run item {item_id} has unknown status id {status_id}")]
pub struct UnknownStatus {
    pub item_id: DbId,
    pub status_id: StatusId,
}
