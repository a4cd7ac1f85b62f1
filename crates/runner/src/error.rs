//! Run-scoped errors.

use swapbench_core::StoreError;

/// Failure starting or executing a run as a whole.
///
/// Item-scoped failures never surface here: they are absorbed per item
/// and reflected in that item's `failed` state. Only problems with the
/// run itself -- resolving the tool universe, creating the run record --
/// abort the call.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// Bad configuration, e.g. an unknown tool id. Raised before any
    /// work item is created.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
