//! Run coordinator: the heart of the swapbench engine.
//!
//! [`RunCoordinator`](coordinator::RunCoordinator) materializes the work
//! items for a run, executes them under a bounded concurrency cap,
//! drives each item through its state machine, persists every
//! transition, and publishes a notification for each one.

pub mod coordinator;
pub mod error;
pub mod scorer;
pub mod storage;

pub use coordinator::{RunCoordinator, WorkItemSnapshot, DEFAULT_MAX_CONCURRENT_ITEMS};
pub use error::RunError;
pub use scorer::{PixelStatScorer, Scorer};
pub use storage::{ArtifactStore, ArtifactStoreError, FsArtifactStore};
