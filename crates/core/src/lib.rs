//! Shared domain types for the swapbench run-execution engine.
//!
//! This crate holds the pieces every other crate agrees on:
//!
//! - [`types`] -- id and timestamp aliases.
//! - [`state`] -- the per-item lifecycle state machine.
//! - [`error`] -- store and scorer error taxonomy.
//! - [`case`] -- the read-only test-case model and its JSON source.
//! - [`store`] -- the [`WorkItemStore`](store::WorkItemStore) seam the run
//!   coordinator persists through.
//!
//! It depends on no other workspace crate.

pub mod case;
pub mod error;
pub mod state;
pub mod store;
pub mod types;

pub use case::{CaseSet, TestCase};
pub use error::{ScoreError, StoreError};
pub use state::ItemState;
pub use store::{Run, WorkItem, WorkItemStore};
