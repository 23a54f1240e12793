//! Order state machine.

use serde::{Deserialize, Serialize};

/// The state of an order in the service workflow.
///
/// Transition table:
/// ```text
/// New ───────► Preparing ───► Ready ─┐
///  │  ◄────────   │             ▲    │ (self-loop)
///  │              │             └────┘
///  └──► Served    │
///  │              │
///  └──────────────┴──► Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderState {
    /// Order was just taken, items can be added/removed.
    #[default]
    New,

    /// The kitchen is working on the order, items can still change.
    Preparing,

    /// The order is ready to be served.
    Ready,

    /// The order was served to the table (terminal state).
    Served,

    /// The order was cancelled (terminal state).
    Cancelled,
}

impl OrderState {
    /// All states, in workflow order.
    pub const ALL: [OrderState; 5] = [
        OrderState::New,
        OrderState::Preparing,
        OrderState::Ready,
        OrderState::Served,
        OrderState::Cancelled,
    ];

    /// Returns the states reachable from this one through the transition
    /// table. Cancellation is handled separately by [`Self::can_cancel`].
    // TODO: `Ready` only loops back to itself, so a ready order can never be
    // served; confirm `Ready -> Served` with the floor staff before changing it.
    pub fn allowed_targets(&self) -> &'static [OrderState] {
        match self {
            OrderState::New => &[OrderState::Preparing, OrderState::Served],
            OrderState::Preparing => &[OrderState::Ready, OrderState::New],
            OrderState::Ready => &[OrderState::Ready],
            OrderState::Served | OrderState::Cancelled => &[],
        }
    }

    /// Returns true if the order can be cancelled in this state.
    pub fn can_cancel(&self) -> bool {
        matches!(self, OrderState::New | OrderState::Preparing)
    }

    /// Returns true if moving to `target` is legal.
    pub fn can_transition_to(&self, target: OrderState) -> bool {
        if target == OrderState::Cancelled {
            return self.can_cancel();
        }
        self.allowed_targets().contains(&target)
    }

    /// Returns true if items can be added or removed in this state.
    pub fn can_modify_items(&self) -> bool {
        matches!(self, OrderState::New | OrderState::Preparing)
    }

    /// Returns true if this is a terminal state (no further transitions possible).
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderState::Served | OrderState::Cancelled)
    }

    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderState::New => "new",
            OrderState::Preparing => "preparing",
            OrderState::Ready => "ready",
            OrderState::Served => "served",
            OrderState::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when parsing an unknown state name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown order state '{0}'")]
pub struct ParseStateError(pub String);

impl std::str::FromStr for OrderState {
    type Err = ParseStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        OrderState::ALL
            .into_iter()
            .find(|state| state.as_str() == normalized)
            .ok_or_else(|| ParseStateError(s.to_string()))
    }
}
