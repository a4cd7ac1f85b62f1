//! Work-item lifecycle state machine.
//!
//! States are strictly ordered on the happy path with a universal escape
//! to `Failed` from any non-terminal state:
//!
//! ```text
//! queued -> generating -> evaluating -> scored
//!    \            \             \
//!     -----------> failed <------
//! ```
//!
//! `Queued` is the only initial rest state; `Scored` and `Failed` are
//! terminal and immutable.

use serde::{Deserialize, Serialize};

use crate::types::StatusId;

/// Lifecycle state of a single work item.
///
/// Discriminants match the seed order (1-based) of the `item_statuses`
/// lookup table.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemState {
    Queued = 1,
    Generating = 2,
    Evaluating = 3,
    Scored = 4,
    Failed = 5,
}

impl ItemState {
    /// Return the database status ID.
    pub fn id(self) -> StatusId {
        self as StatusId
    }

    /// Map a database status ID back to a state.
    pub fn from_id(id: StatusId) -> Option<Self> {
        match id {
            1 => Some(Self::Queued),
            2 => Some(Self::Generating),
            3 => Some(Self::Evaluating),
            4 => Some(Self::Scored),
            5 => Some(Self::Failed),
            _ => None,
        }
    }

    /// Whether no further transitions may occur from this state.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Scored | Self::Failed)
    }

    /// Whether a single transition from `self` to `next` is legal.
    ///
    /// Legal transitions are the immediate successor on the happy path,
    /// or `Failed` from any non-terminal state. Terminal states accept
    /// nothing.
    pub fn can_transition_to(self, next: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        match (self, next) {
            (Self::Queued, Self::Generating)
            | (Self::Generating, Self::Evaluating)
            | (Self::Evaluating, Self::Scored) => true,
            (_, Self::Failed) => true,
            _ => false,
        }
    }

    /// Lowercase wire name, as used in notifications and status snapshots.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Generating => "generating",
            Self::Evaluating => "evaluating",
            Self::Scored => "scored",
            Self::Failed => "failed",
        }
    }
}

impl From<ItemState> for StatusId {
    fn from(value: ItemState) -> Self {
        value as StatusId
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_match_seed_data() {
        assert_eq!(ItemState::Queued.id(), 1);
        assert_eq!(ItemState::Generating.id(), 2);
        assert_eq!(ItemState::Evaluating.id(), 3);
        assert_eq!(ItemState::Scored.id(), 4);
        assert_eq!(ItemState::Failed.id(), 5);
    }

    #[test]
    fn from_id_round_trips() {
        for state in [
            ItemState::Queued,
            ItemState::Generating,
            ItemState::Evaluating,
            ItemState::Scored,
            ItemState::Failed,
        ] {
            assert_eq!(ItemState::from_id(state.id()), Some(state));
        }
        assert_eq!(ItemState::from_id(0), None);
        assert_eq!(ItemState::from_id(6), None);
    }

    #[test]
    fn happy_path_is_legal() {
        assert!(ItemState::Queued.can_transition_to(ItemState::Generating));
        assert!(ItemState::Generating.can_transition_to(ItemState::Evaluating));
        assert!(ItemState::Evaluating.can_transition_to(ItemState::Scored));
    }

    #[test]
    fn failed_reachable_from_any_non_terminal() {
        assert!(ItemState::Queued.can_transition_to(ItemState::Failed));
        assert!(ItemState::Generating.can_transition_to(ItemState::Failed));
        assert!(ItemState::Evaluating.can_transition_to(ItemState::Failed));
    }

    #[test]
    fn skipping_states_is_illegal() {
        assert!(!ItemState::Queued.can_transition_to(ItemState::Evaluating));
        assert!(!ItemState::Queued.can_transition_to(ItemState::Scored));
        assert!(!ItemState::Generating.can_transition_to(ItemState::Scored));
    }

    #[test]
    fn terminal_states_accept_nothing() {
        assert!(!ItemState::Scored.can_transition_to(ItemState::Failed));
        assert!(!ItemState::Scored.can_transition_to(ItemState::Generating));
        assert!(!ItemState::Failed.can_transition_to(ItemState::Scored));
        assert!(!ItemState::Failed.can_transition_to(ItemState::Failed));
    }

    #[test]
    fn backward_transitions_are_illegal() {
        assert!(!ItemState::Evaluating.can_transition_to(ItemState::Generating));
        assert!(!ItemState::Generating.can_transition_to(ItemState::Queued));
    }

    #[test]
    fn wire_names_are_lowercase() {
        assert_eq!(ItemState::Queued.as_str(), "queued");
        assert_eq!(ItemState::Scored.as_str(), "scored");
        let json = serde_json::to_string(&ItemState::Generating).unwrap();
        assert_eq!(json, "\"generating\"");
    }
}
