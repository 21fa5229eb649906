//! # Sift Component Library (sift_cn)
//!
//! Headless, shadcn-style components built on `sift_layout` primitives.
//!
//! - **Primitives**: `sift_layout` provides overlay positioning, dismissal,
//!   listener scoping and the open-episode lifecycle
//! - **Platform**: `sift_platform` defines input events and the [`Host`]
//!   trait components talk to
//! - **Components**: `sift_cn` combines them into interactive widgets that
//!   render to plain view snapshots
//!
//! ## Example
//!
//! ```ignore
//! use sift_cn::prelude::*;
//!
//! let mut city = cn::combobox()
//!     .label("City")
//!     .option("1", "Tucumán")
//!     .option("2", "Tafí del Valle")
//!     .on_change(|value, _| println!("Selected: {value:?}"))
//!     .build();
//!
//! city.activate_trigger(&mut host);
//! city.set_query("tafi");
//! assert_eq!(city.filtered_indices(), &[1]);
//! ```
//!
//! ## Components
//!
//! - **Combobox** - Searchable single-select dropdown with inline or detached panel
//!
//! [`Host`]: sift_platform::Host

pub mod components;

pub use components::*;

/// Convenience module for accessing components with `cn::` prefix
pub mod cn {
    pub use crate::components::combobox::{combobox, combobox_with};
}

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::cn;
    pub use crate::components::combobox::{
        Combobox, ComboboxBuilder, ComboboxError, ComboboxOption, ComboboxView, FnAccessor,
        ItemAccessor, OptionAccessor, PanelSurface,
    };
    #[cfg(feature = "json")]
    pub use crate::components::combobox::JsonAccessor;

    pub use sift_core::{Point, Rect, ScrollLock, Size};
    pub use sift_layout::{PlacementPreference, Region};
    pub use sift_platform::{
        FocusOptions, FocusTarget, Host, InputEvent, Key, KeyboardEvent, PointerEvent,
        ViewportEvent,
    };
}

#[cfg(all(test, feature = "json"))]
mod tests;
