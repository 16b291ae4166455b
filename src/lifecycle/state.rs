//! Listener lifecycle states.

/// Where a listener is in its one-way lifecycle.
///
/// ```text
/// Created ──bind──▶ Listening ──shutdown──▶ ShuttingDown ──drained/forced──▶ Closed
///    │                  │
///    └──bind failed──▶ Closed ◀──listener failed──┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Constructed, not yet bound.
    Created,
    /// Accepting connections.
    Listening,
    /// No longer accepting; in-flight requests are draining.
    ShuttingDown,
    /// Accept loop has exited. Terminal.
    Closed,
}

impl LifecycleState {
    /// Whether moving from `self` to `next` is a legal step.
    pub fn can_transition_to(self, next: LifecycleState) -> bool {
        use LifecycleState::*;
        matches!(
            (self, next),
            (Created, Listening)
                | (Created, Closed)
                | (Listening, ShuttingDown)
                | (Listening, Closed)
                | (ShuttingDown, Closed)
        )
    }

    pub fn is_terminal(self) -> bool {
        self == LifecycleState::Closed
    }
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LifecycleState::Created => "created",
            LifecycleState::Listening => "listening",
            LifecycleState::ShuttingDown => "shutting_down",
            LifecycleState::Closed => "closed",
        };
        f.write_str(name)
    }
}
