//! Live notification infrastructure for run execution.
//!
//! - [`RunNotification`] -- the JSON-serializable event emitted once per
//!   work-item state transition.
//! - [`NotificationHub`] -- fan-out broadcaster with a self-healing
//!   subscriber registry.

pub mod hub;
pub mod notification;

pub use hub::{NotificationHub, SubscriptionHandle};
pub use notification::RunNotification;
