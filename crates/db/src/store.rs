//! [`WorkItemStore`] implementation over Postgres.

use async_trait::async_trait;
use swapbench_core::types::DbId;
use swapbench_core::{ItemState, Run, StoreError, WorkItem, WorkItemStore};

use crate::models::UnknownStatus;
use crate::repositories::{RunItemRepo, RunRepo};
use crate::DbPool;

/// Production work-item store backed by a sqlx pool.
///
/// Cheap to clone; constructed once and handed to the run coordinator.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

// StoreError is defined in swapbench-core, which knows nothing about
// sqlx, so the mapping lives here instead of a From impl.
fn map_sqlx(e: sqlx::Error) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

fn map_status(e: UnknownStatus) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

#[async_trait]
impl WorkItemStore for PgStore {
    async fn create_run(&self) -> Result<Run, StoreError> {
        let row = RunRepo::create(&self.pool).await.map_err(map_sqlx)?;
        Ok(row.into())
    }

    async fn create_work_items(
        &self,
        run_id: DbId,
        pairs: &[(String, String)],
    ) -> Result<Vec<WorkItem>, StoreError> {
        let rows = RunItemRepo::create_batch(&self.pool, run_id, pairs)
            .await
            .map_err(map_sqlx)?;
        rows.into_iter()
            .map(|row| row.into_work_item().map_err(map_status))
            .collect()
    }

    async fn update_item(
        &self,
        item_id: DbId,
        state: ItemState,
        artifact_uri: Option<&str>,
        score: Option<&serde_json::Value>,
    ) -> Result<(), StoreError> {
        let applied =
            RunItemRepo::update_state(&self.pool, item_id, state, artifact_uri, score)
                .await
                .map_err(map_sqlx)?;
        if !applied {
            // Either the row does not exist or it is already terminal;
            // distinguish so missing rows are not silently ignored.
            let exists = RunItemRepo::find_by_id(&self.pool, item_id)
                .await
                .map_err(map_sqlx)?
                .is_some();
            if !exists {
                return Err(StoreError::NotFound {
                    entity: "run item",
                    id: item_id,
                });
            }
            tracing::debug!(item_id, state = state.as_str(), "Skipped update of terminal item");
        }
        Ok(())
    }

    async fn items_for_run(&self, run_id: DbId) -> Result<Vec<WorkItem>, StoreError> {
        let rows = RunItemRepo::list_by_run(&self.pool, run_id)
            .await
            .map_err(map_sqlx)?;
        rows.into_iter()
            .map(|row| row.into_work_item().map_err(map_status))
            .collect()
    }

    async fn item(&self, item_id: DbId) -> Result<WorkItem, StoreError> {
        let row = RunItemRepo::find_by_id(&self.pool, item_id)
            .await
            .map_err(map_sqlx)?
            .ok_or(StoreError::NotFound {
                entity: "run item",
                id: item_id,
            })?;
        row.into_work_item().map_err(map_status)
    }
}
