//! Selection state machine
//!
//! ```text
//!            Toggle
//!   Closed ◄────────► Open ──┐ Edit / Highlight
//!     ▲                 │ ◄──┘
//!     └─────────────────┘
//!     Commit | Clear | Dismiss
//! ```
//!
//! Every transition into `Closed` resets the episode data (query, active
//! row, positioned flag). Side effects such as `on_change` are owned by the
//! combobox, which fires them before applying the transition.

use sift_layout::Placement;

/// Open/closed phase of the selector
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    #[default]
    Closed,
    Open,
}

/// Events driving the selection state machine
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionEvent {
    /// Trigger activated
    Toggle,
    /// An item was committed (Enter or click)
    Commit,
    /// The Clear action was used
    Clear,
    /// Escape, outside interaction, or the Done action
    Dismiss,
    /// The filter query changed
    Edit(String),
    /// The highlighted row changed
    Highlight(Option<usize>),
}

impl Phase {
    /// Transition function; `None` means the phase does not change
    pub fn on_event(&self, event: &SelectionEvent) -> Option<Phase> {
        use Phase::*;
        use SelectionEvent::*;

        match (self, event) {
            (Closed, Toggle) => Some(Open),
            (Open, Toggle) | (Open, Commit) | (Open, Clear) | (Open, Dismiss) => Some(Closed),
            _ => None,
        }
    }
}

/// Widget-local selection state
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectionState {
    phase: Phase,
    query: String,
    active_index: Option<usize>,
    placement: Placement,
    positioned: bool,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase == Phase::Open
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Highlighted row in the filtered list (`None`: nothing highlighted)
    pub fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// Whether the positioning engine ran during this open episode
    pub fn positioned(&self) -> bool {
        self.positioned
    }

    /// Apply an event; returns the new phase when it changed
    pub fn apply(&mut self, event: SelectionEvent) -> Option<Phase> {
        let next = self.phase.on_event(&event);

        match event {
            SelectionEvent::Edit(query) if self.is_open() => {
                self.query = query;
                self.active_index = None;
            }
            SelectionEvent::Highlight(index) if self.is_open() => {
                self.active_index = index;
            }
            _ => {}
        }

        match next {
            Some(Phase::Open) => {
                self.phase = Phase::Open;
                self.active_index = None;
                self.positioned = false;
            }
            Some(Phase::Closed) => self.reset(),
            None => {}
        }

        if let Some(phase) = next {
            tracing::debug!(?phase, "combobox phase changed");
        }
        next
    }

    /// Record a completed positioning pass
    pub fn mark_positioned(&mut self, placement: Placement) {
        self.placement = placement;
        self.positioned = true;
    }

    fn reset(&mut self) {
        self.phase = Phase::Closed;
        self.query.clear();
        self.active_index = None;
        self.positioned = false;
    }
}
