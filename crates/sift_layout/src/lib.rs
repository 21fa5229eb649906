//! Sift Layout
//!
//! Framework-independent building blocks for dropdown-style widgets:
//!
//! - **Overlay**: inline vs detached render targets and the viewport-aware
//!   positioning engine for detached panels
//! - **Dismiss**: region registration, hit testing and backdrop tap tracking
//! - **Listeners**: open-scoped global listener registrations
//! - **Lifecycle**: ordered `Opened` → `Positioned` phases per open episode
//! - **Scroll**: nearest-edge scroll-into-view for list rows
//!
//! # Example
//!
//! ```rust
//! use sift_core::{Rect, Size};
//! use sift_layout::overlay::{compute_geometry, Placement, PlacementPreference};
//!
//! let trigger = Rect::new(100.0, 400.0, 300.0, 188.0);
//! let (placement, geometry) =
//!     compute_geometry(trigger, Size::new(1024.0, 768.0), PlacementPreference::Auto, 1000);
//!
//! assert_eq!(placement, Placement::Top);
//! assert_eq!(geometry.z_index, 1001);
//! ```

pub mod dismiss;
pub mod error;
pub mod key;
pub mod lifecycle;
pub mod listeners;
pub mod overlay;
pub mod scroll;

pub use dismiss::{DismissController, DismissMode, Region, RegionRegistry, TapTracker};
pub use error::{LayoutError, Result};
pub use key::InstanceKey;
pub use lifecycle::{Lifecycle, LifecyclePhase};
pub use listeners::{ListenerKind, ListenerScope};
pub use overlay::{
    compute_geometry, DetachedOverlay, InlineOverlay, OverlayGeometry, Placement,
    PlacementPreference, RenderTarget,
};
pub use scroll::ListScroll;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::dismiss::{DismissMode, Region};
    pub use crate::key::InstanceKey;
    pub use crate::overlay::{
        DetachedOverlay, InlineOverlay, OverlayGeometry, Placement, PlacementPreference,
        RenderTarget,
    };
    pub use sift_core::{Point, Rect, Size};
}
