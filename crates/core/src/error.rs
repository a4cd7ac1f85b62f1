//! Error taxonomy shared across the engine.
//!
//! Generator failures are absent on purpose: the plugin gateway converts
//! them into placeholder artifacts and they never cross a crate boundary
//! as errors.

use crate::types::DbId;

/// Failure applying or reading a durable work-item record.
///
/// Fatal to the item being processed (execution cannot safely continue
/// without a durable state record) but never to sibling items.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Failure produced by the external scorer.
///
/// Unlike generator failures this propagates: the affected item moves to
/// `failed` and no score is persisted.
#[derive(Debug, thiserror::Error)]
pub enum ScoreError {
    #[error("scorer rejected artifact: {0}")]
    Rejected(String),

    #[error("scorer produced invalid output: {0}")]
    InvalidOutput(String),
}
