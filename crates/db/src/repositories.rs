//! Repository layer: zero-sized structs with async CRUD methods taking
//! `&PgPool` as the first argument.

use sqlx::PgPool;
use swapbench_core::types::DbId;
use swapbench_core::ItemState;

use crate::models::{RunItemRow, RunRow};

/// Column list for `run_items` queries.
const ITEM_COLUMNS: &str =
    "id, run_id, case_id, tool_id, status_id, artifact_uri, score, created_at, updated_at";

/// CRUD for the `runs` table.
pub struct RunRepo;

impl RunRepo {
    /// Allocate a new run row.
    pub async fn create(pool: &PgPool) -> Result<RunRow, sqlx::Error> {
        sqlx::query_as::<_, RunRow>(
            "INSERT INTO runs DEFAULT VALUES RETURNING id, created_at",
        )
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<RunRow>, sqlx::Error> {
        sqlx::query_as::<_, RunRow>("SELECT id, created_at FROM runs WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}

/// CRUD for the `run_items` table.
pub struct RunItemRepo;

impl RunItemRepo {
    /// Bulk-insert `(case_id, tool_id)` pairs as queued items inside one
    /// transaction -- either all items exist afterwards or none do.
    pub async fn create_batch(
        pool: &PgPool,
        run_id: DbId,
        pairs: &[(String, String)],
    ) -> Result<Vec<RunItemRow>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut rows = Vec::with_capacity(pairs.len());

        let query = format!(
            "INSERT INTO run_items (run_id, case_id, tool_id, status_id) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {ITEM_COLUMNS}"
        );
        for (case_id, tool_id) in pairs {
            let row = sqlx::query_as::<_, RunItemRow>(&query)
                .bind(run_id)
                .bind(case_id)
                .bind(tool_id)
                .bind(ItemState::Queued.id())
                .fetch_one(&mut *tx)
                .await?;
            rows.push(row);
        }

        tx.commit().await?;
        Ok(rows)
    }

    /// Apply one state transition in a single UPDATE, writing the
    /// artifact URI and score together with the status so no reader ever
    /// observes a half-updated row.
    ///
    /// Rows already in a terminal status are left untouched (`rows
    /// affected = 0`), which makes terminality idempotent under races.
    pub async fn update_state(
        pool: &PgPool,
        item_id: DbId,
        state: ItemState,
        artifact_uri: Option<&str>,
        score: Option<&serde_json::Value>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE run_items \
             SET status_id = $2, \
                 artifact_uri = COALESCE($3, artifact_uri), \
                 score = COALESCE($4, score), \
                 updated_at = NOW() \
             WHERE id = $1 AND status_id NOT IN ($5, $6)",
        )
        .bind(item_id)
        .bind(state.id())
        .bind(artifact_uri)
        .bind(score)
        .bind(ItemState::Scored.id())
        .bind(ItemState::Failed.id())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn find_by_id(
        pool: &PgPool,
        item_id: DbId,
    ) -> Result<Option<RunItemRow>, sqlx::Error> {
        let query = format!("SELECT {ITEM_COLUMNS} FROM run_items WHERE id = $1");
        sqlx::query_as::<_, RunItemRow>(&query)
            .bind(item_id)
            .fetch_optional(pool)
            .await
    }

    /// All items for a run, in creation order.
    pub async fn list_by_run(
        pool: &PgPool,
        run_id: DbId,
    ) -> Result<Vec<RunItemRow>, sqlx::Error> {
        let query =
            format!("SELECT {ITEM_COLUMNS} FROM run_items WHERE run_id = $1 ORDER BY id ASC");
        sqlx::query_as::<_, RunItemRow>(&query)
            .bind(run_id)
            .fetch_all(pool)
            .await
    }
}
