//! Headless components built on sift_layout primitives
//!
//! Each component follows a consistent pattern:
//! - Builder function (e.g., `combobox()`)
//! - Builder with fluent options, finished by `build()`
//! - A mounted instance driven by host events, rendered through `view()`

pub mod combobox;

pub use combobox::{
    combobox, combobox_with, Combobox, ComboboxBuilder, ComboboxConfig, ComboboxError,
    ComboboxOption, ComboboxView, FnAccessor, ItemAccessor, OptionAccessor,
};
#[cfg(feature = "json")]
pub use combobox::JsonAccessor;
