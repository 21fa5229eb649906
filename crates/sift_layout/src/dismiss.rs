//! Outside-interaction dismissal
//!
//! Widgets register the viewport bounds of their interactive regions and
//! feed pointer events through a [`DismissController`]. Two strategies:
//!
//! - **Direct**: every pointer-down is seen during the capture phase; a
//!   press outside all registered regions dismisses immediately.
//! - **Backdrop**: a transparent full-viewport layer sits under the panel.
//!   A press on it arms a [`TapTracker`]; moving further than the tap slop
//!   turns the gesture into a drag (so the page can be scrolled through the
//!   backdrop) and only an armed release dismisses.

use smallvec::SmallVec;

use sift_core::{Point, Rect};
use sift_platform::{PointerEvent, PointerPhase};

/// Squared pointer travel beyond which a backdrop press stops being a tap
pub const TAP_SLOP_SQUARED: f32 = 36.0;

// =============================================================================
// Regions
// =============================================================================

/// Named interactive region of a widget
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Region {
    /// The trigger control
    Trigger,
    /// The dropdown panel
    Overlay,
}

/// Current viewport bounds of a widget's interactive regions
#[derive(Clone, Debug, Default)]
pub struct RegionRegistry {
    regions: SmallVec<[(Region, Rect); 2]>,
}

impl RegionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or update the bounds of a region
    pub fn set(&mut self, region: Region, bounds: Rect) {
        match self.regions.iter_mut().find(|(r, _)| *r == region) {
            Some(entry) => entry.1 = bounds,
            None => self.regions.push((region, bounds)),
        }
    }

    /// Forget a region (e.g. the panel after closing)
    pub fn remove(&mut self, region: Region) {
        self.regions.retain(|(r, _)| *r != region);
    }

    /// Bounds of a region, if registered
    pub fn bounds(&self, region: Region) -> Option<Rect> {
        self.regions
            .iter()
            .find(|(r, _)| *r == region)
            .map(|(_, bounds)| *bounds)
    }

    /// First region containing `point`
    pub fn hit_test(&self, point: Point) -> Option<Region> {
        self.regions
            .iter()
            .find(|(_, bounds)| bounds.contains(point))
            .map(|(region, _)| *region)
    }

    /// Whether `point` lies inside a specific region
    pub fn region_contains(&self, region: Region, point: Point) -> bool {
        self.bounds(region)
            .map(|bounds| bounds.contains(point))
            .unwrap_or(false)
    }
}

// =============================================================================
// Tap tracking
// =============================================================================

/// Tracks one pointer-down → pointer-up cycle on the backdrop
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TapTracker {
    origin: Point,
    armed: bool,
}

impl TapTracker {
    /// Start a new tap at `origin`
    pub fn arm(&mut self, origin: Point) {
        self.origin = origin;
        self.armed = true;
    }

    /// Follow pointer movement; disarms once travel exceeds the slop
    pub fn track(&mut self, position: Point) {
        if self.armed && self.origin.distance_squared(position) > TAP_SLOP_SQUARED {
            self.armed = false;
        }
    }

    /// Finish the cycle; returns whether it still counts as a tap
    pub fn release(&mut self) -> bool {
        std::mem::take(&mut self.armed)
    }

    /// Abandon the current cycle
    pub fn cancel(&mut self) {
        self.armed = false;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn origin(&self) -> Point {
        self.origin
    }
}

// =============================================================================
// Controller
// =============================================================================

/// Outside-interaction strategy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DismissMode {
    /// Capture-phase pointer-down hit testing
    #[default]
    Direct,
    /// Backdrop tap detection
    Backdrop,
}

/// Decides whether pointer input should dismiss an open panel
#[derive(Clone, Debug, Default)]
pub struct DismissController {
    mode: DismissMode,
    tracker: TapTracker,
}

impl DismissController {
    pub fn new(mode: DismissMode) -> Self {
        Self {
            mode,
            tracker: TapTracker::default(),
        }
    }

    pub fn mode(&self) -> DismissMode {
        self.mode
    }

    pub fn tracker(&self) -> &TapTracker {
        &self.tracker
    }

    /// Feed a pointer event; returns true when the panel should close
    pub fn on_pointer(&mut self, event: &PointerEvent, regions: &RegionRegistry) -> bool {
        let point = event.position();
        match self.mode {
            DismissMode::Direct => {
                event.phase == PointerPhase::Down && regions.hit_test(point).is_none()
            }
            DismissMode::Backdrop => match event.phase {
                PointerPhase::Down => {
                    // The panel sits above the backdrop and swallows its own presses
                    if regions.region_contains(Region::Overlay, point) {
                        self.tracker.cancel();
                    } else {
                        self.tracker.arm(point);
                    }
                    false
                }
                PointerPhase::Move => {
                    self.tracker.track(point);
                    false
                }
                PointerPhase::Up => {
                    let tap = self.tracker.release();
                    if tap {
                        tracing::trace!(x = point.x, y = point.y, "backdrop tap");
                    }
                    tap
                }
            },
        }
    }

    /// Drop any in-flight gesture
    pub fn reset(&mut self) {
        self.tracker.cancel();
    }
}
