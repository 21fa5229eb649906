//! Open-episode lifecycle
//!
//! Each time a panel opens it goes through two ordered phases:
//!
//! ```text
//! open ──► Opened ──(layout committed, geometry computed)──► Positioned
//! ```
//!
//! Focus acquisition subscribes to exactly one phase per render target and
//! runs at most once per episode.

use smallvec::SmallVec;

/// Ordered lifecycle phases of one open episode
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LifecyclePhase {
    /// The panel has been opened
    Opened,
    /// The positioning engine completed its first computation
    Positioned,
}

/// Per-episode lifecycle bookkeeping
#[derive(Clone, Debug)]
pub struct Lifecycle {
    episode: u64,
    reached: SmallVec<[LifecyclePhase; 2]>,
    focus_phase: LifecyclePhase,
    focus_attempted: bool,
    awaiting_layout: bool,
}

impl Lifecycle {
    /// Create a lifecycle whose focus acquisition runs on `focus_phase`
    pub fn new(focus_phase: LifecyclePhase) -> Self {
        Self {
            episode: 0,
            reached: SmallVec::new(),
            focus_phase,
            focus_attempted: false,
            awaiting_layout: false,
        }
    }

    /// Start a new open episode
    pub fn begin(&mut self) -> u64 {
        self.episode += 1;
        self.reached.clear();
        self.focus_attempted = false;
        self.awaiting_layout = true;
        self.episode
    }

    /// End the current episode
    pub fn end(&mut self) {
        self.reached.clear();
        self.awaiting_layout = false;
    }

    /// Enter `phase`; returns true when focus acquisition is due now
    ///
    /// Phases must be entered in order; entering one twice is a no-op.
    pub fn enter(&mut self, phase: LifecyclePhase) -> bool {
        if self.reached.contains(&phase) {
            return false;
        }
        debug_assert!(
            self.reached.iter().all(|p| *p < phase),
            "lifecycle phases entered out of order"
        );
        self.reached.push(phase);
        tracing::trace!(episode = self.episode, ?phase, "lifecycle phase");

        if phase == self.focus_phase && !self.focus_attempted {
            self.focus_attempted = true;
            true
        } else {
            false
        }
    }

    pub fn has_reached(&self, phase: LifecyclePhase) -> bool {
        self.reached.contains(&phase)
    }

    /// Consume the pending post-layout continuation, if any
    pub fn take_layout(&mut self) -> bool {
        std::mem::take(&mut self.awaiting_layout)
    }

    pub fn is_awaiting_layout(&self) -> bool {
        self.awaiting_layout
    }

    pub fn focus_attempted(&self) -> bool {
        self.focus_attempted
    }

    pub fn focus_phase(&self) -> LifecyclePhase {
        self.focus_phase
    }

    pub fn episode(&self) -> u64 {
        self.episode
    }
}
