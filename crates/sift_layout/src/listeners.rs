//! Open-scoped listener registrations
//!
//! Global listeners (document pointer capture, key handling, page scroll and
//! resize) only exist while a panel is open. The scope is torn down
//! synchronously on close, so a host forwarding a late event finds nothing
//! listening and the event is dropped.

use smallvec::SmallVec;

/// Kinds of global listeners a widget can hold
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    /// Capture-phase pointer events anywhere in the document
    PointerCapture,
    /// Key events while the panel is open
    Key,
    /// Page or ancestor scroll
    Scroll,
    /// Viewport resize
    Resize,
}

impl ListenerKind {
    /// Every listener kind
    pub const ALL: [ListenerKind; 4] = [
        ListenerKind::PointerCapture,
        ListenerKind::Key,
        ListenerKind::Scroll,
        ListenerKind::Resize,
    ];
}

/// Set of listeners currently registered by one widget
#[derive(Clone, Debug, Default)]
pub struct ListenerScope {
    active: SmallVec<[ListenerKind; 4]>,
}

impl ListenerScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register listeners; already registered kinds are ignored
    pub fn register(&mut self, kinds: &[ListenerKind]) {
        for kind in kinds {
            if !self.active.contains(kind) {
                self.active.push(*kind);
            }
        }
    }

    /// Deregister everything, returning how many listeners were dropped
    pub fn release_all(&mut self) -> usize {
        let released = self.active.len();
        self.active.clear();
        if released > 0 {
            tracing::trace!(released, "listeners released");
        }
        released
    }

    pub fn is_listening(&self, kind: ListenerKind) -> bool {
        self.active.contains(&kind)
    }

    /// Currently registered kinds, in registration order
    pub fn active(&self) -> &[ListenerKind] {
        &self.active
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_is_idempotent() {
        let mut scope = ListenerScope::new();
        scope.register(&[ListenerKind::Key, ListenerKind::Scroll]);
        scope.register(&[ListenerKind::Key]);
        assert_eq!(scope.active(), &[ListenerKind::Key, ListenerKind::Scroll]);
    }

    #[test]
    fn test_release_all() {
        let mut scope = ListenerScope::new();
        scope.register(&ListenerKind::ALL);
        assert!(scope.is_listening(ListenerKind::Resize));

        assert_eq!(scope.release_all(), 4);
        assert!(scope.is_empty());
        assert!(!scope.is_listening(ListenerKind::PointerCapture));
        assert_eq!(scope.release_all(), 0);
    }
}
