//! Host abstraction
//!
//! A host is whatever embeds a headless widget: a windowing toolkit, a
//! browser bridge, or a scripted test harness. Widgets only ever query the
//! viewport and ask for focus; everything else flows in through
//! [`InputEvent`](crate::InputEvent)s and region bounds.

use sift_core::Size;

use crate::error::Result;

/// Elements a widget may ask the host to focus
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FocusTarget {
    /// The filter input inside the overlay panel
    FilterInput,
}

/// Options for a focus request
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FocusOptions {
    /// Ask the host not to scroll the page while moving focus
    pub prevent_scroll: bool,
}

impl FocusOptions {
    /// Focus without scrolling the page
    pub fn preserve_scroll() -> Self {
        Self {
            prevent_scroll: true,
        }
    }

    /// Plain focus; the host may scroll the element into view
    pub fn plain() -> Self {
        Self::default()
    }
}

/// Host abstraction trait
///
/// Implemented by toolkit bridges and test harnesses.
pub trait Host {
    /// Current viewport size in logical pixels
    fn viewport(&self) -> Size;

    /// Move keyboard focus to `target`
    ///
    /// Hosts that cannot honor `options` should return
    /// [`PlatformError::FocusRejected`](crate::PlatformError::FocusRejected)
    /// so callers can retry with plainer options.
    fn focus(&mut self, target: FocusTarget, options: FocusOptions) -> Result<()>;
}
