//! Sift Core
//!
//! Foundational types shared by every Sift crate:
//!
//! - **Geometry**: [`Point`], [`Size`], [`Rect`] in viewport coordinates
//! - **Scroll Lock**: a reference-counted page scroll lock owned by the host shell
//!
//! # Example
//!
//! ```rust
//! use sift_core::{Point, Rect};
//!
//! let trigger = Rect::new(20.0, 300.0, 240.0, 40.0);
//! assert_eq!(trigger.bottom(), 340.0);
//! assert!(trigger.contains(Point::new(30.0, 310.0)));
//! ```

pub mod geometry;
pub mod scroll_lock;

pub use geometry::{clamp, Point, Rect, Size};
pub use scroll_lock::{ScrollLock, ScrollLockGuard, ScrollLockHandler};
