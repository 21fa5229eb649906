//! Sift Platform Abstraction Layer
//!
//! Platform-agnostic input events and the [`Host`] trait that headless Sift
//! widgets talk to.
//!
//! # Example
//!
//! ```ignore
//! use sift_platform::prelude::*;
//!
//! struct BrowserHost { /* ... */ }
//!
//! impl Host for BrowserHost {
//!     fn viewport(&self) -> Size { self.window_size() }
//!     fn focus(&mut self, target: FocusTarget, options: FocusOptions) -> Result<()> {
//!         self.focus_element(target, options.prevent_scroll)
//!     }
//! }
//! ```

mod error;
mod host;
mod input;

// Re-export all public types
pub use error::{PlatformError, Result};
pub use host::{FocusOptions, FocusTarget, Host};
pub use input::{
    InputEvent, Key, KeyState, KeyboardEvent, PointerEvent, PointerPhase, ViewportEvent,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{PlatformError, Result};
    pub use crate::host::{FocusOptions, FocusTarget, Host};
    pub use crate::input::{
        InputEvent, Key, KeyState, KeyboardEvent, PointerEvent, PointerPhase, ViewportEvent,
    };
    pub use sift_core::{Point, Rect, Size};
}
