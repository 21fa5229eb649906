//! Overlay rendering targets and viewport-aware positioning
//!
//! A dropdown panel is rendered through one of two targets, chosen when the
//! widget is built:
//!
//! - [`InlineOverlay`]: the panel participates in normal layout below the
//!   trigger and is clipped by its ancestors like any other child.
//! - [`DetachedOverlay`]: the panel is rendered into a top-level layer and
//!   its geometry is computed here from the trigger's viewport bounds.
//!
//! # Placement
//!
//! ```text
//!            space_above = anchor.top
//!   ┌──────────────────────────────────┐
//!   │          [ trigger ]             │
//!   └──────────────────────────────────┘
//!            space_below = viewport.height - anchor.bottom
//! ```
//!
//! `Auto` prefers the bottom when there is comfortable room (240px) or at
//! least as much room as above, and flips to the top otherwise.

use std::str::FromStr;

use sift_core::{clamp, Rect, Size};

use crate::dismiss::DismissMode;
use crate::error::LayoutError;
use crate::lifecycle::LifecyclePhase;

/// Distance kept between the panel and the viewport edges
pub const VIEWPORT_MARGIN: f32 = 8.0;
/// Gap between the trigger and the panel
pub const ANCHOR_GAP: f32 = 8.0;
/// Space below the trigger that always satisfies `Auto` placement
pub const COMFORTABLE_SPACE: f32 = 240.0;
/// Smallest list height ever produced
pub const MIN_LIST_HEIGHT: f32 = 120.0;
/// Largest list height as a fraction of the viewport height
pub const MAX_VIEWPORT_FRACTION: f32 = 0.6;

/// Default base layer for the detached backdrop
pub const DEFAULT_BACKDROP_Z: i32 = 1000;
/// Default list height for inline panels
pub const DEFAULT_INLINE_MAX_HEIGHT: f32 = 240.0;

// =============================================================================
// Placement
// =============================================================================

/// Resolved side of the trigger the panel opens on
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Placement {
    /// Above the trigger
    Top,
    /// Below the trigger
    #[default]
    Bottom,
}

/// Configured placement
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PlacementPreference {
    /// Pick a side from the available space
    #[default]
    Auto,
    /// Always above
    Top,
    /// Always below
    Bottom,
}

impl PlacementPreference {
    /// Resolve against the space around the anchor
    pub fn resolve(self, space_above: f32, space_below: f32) -> Placement {
        match self {
            PlacementPreference::Top => Placement::Top,
            PlacementPreference::Bottom => Placement::Bottom,
            PlacementPreference::Auto => {
                if space_below >= COMFORTABLE_SPACE || space_below >= space_above {
                    Placement::Bottom
                } else {
                    Placement::Top
                }
            }
        }
    }
}

impl FromStr for PlacementPreference {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(PlacementPreference::Auto),
            "top" => Ok(PlacementPreference::Top),
            "bottom" => Ok(PlacementPreference::Bottom),
            _ => Err(LayoutError::InvalidPlacement(s.to_string())),
        }
    }
}

// =============================================================================
// Geometry
// =============================================================================

/// Computed geometry of a detached panel, in viewport coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayGeometry {
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub max_height: f32,
    pub z_index: i32,
    /// Whether the panel may be painted yet
    pub visible: bool,
}

/// Compute the panel geometry for an anchor inside a viewport
///
/// The result is always invisible; visibility is owned by [`DetachedOverlay`].
pub fn compute_geometry(
    anchor: Rect,
    viewport: Size,
    preference: PlacementPreference,
    backdrop_z: i32,
) -> (Placement, OverlayGeometry) {
    let space_above = anchor.top();
    let space_below = viewport.height - anchor.bottom();
    let placement = preference.resolve(space_above, space_below);

    let width = anchor.width().min(viewport.width - 2.0 * VIEWPORT_MARGIN);
    let left = clamp(
        anchor.left(),
        VIEWPORT_MARGIN,
        viewport.width - width - VIEWPORT_MARGIN,
    );

    let available = match placement {
        Placement::Bottom => space_below,
        Placement::Top => space_above,
    };
    let max_height = clamp(
        available - VIEWPORT_MARGIN,
        MIN_LIST_HEIGHT,
        viewport.height * MAX_VIEWPORT_FRACTION,
    );

    let top = match placement {
        Placement::Bottom => {
            (anchor.bottom() + ANCHOR_GAP).min(viewport.height - VIEWPORT_MARGIN)
        }
        Placement::Top => VIEWPORT_MARGIN.max(anchor.top() - max_height - ANCHOR_GAP),
    };

    (
        placement,
        OverlayGeometry {
            top,
            left,
            width,
            max_height,
            z_index: backdrop_z + 1,
            visible: false,
        },
    )
}

// =============================================================================
// Render targets
// =============================================================================

/// Panel rendered in normal layout flow
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InlineOverlay {
    /// Maximum height of the option list
    pub max_height: f32,
}

impl Default for InlineOverlay {
    fn default() -> Self {
        Self {
            max_height: DEFAULT_INLINE_MAX_HEIGHT,
        }
    }
}

/// Panel rendered in a top-level layer, positioned against the viewport
#[derive(Clone, Debug, PartialEq)]
pub struct DetachedOverlay {
    /// Configured placement
    pub placement: PlacementPreference,
    /// Base layer of the backdrop; the panel sits one above it
    pub backdrop_z: i32,
    /// Render a dismiss-tap backdrop under the panel
    pub backdrop: bool,
    /// Hold the page scroll lock while open
    pub lock_page_scroll: bool,
    geometry: Option<OverlayGeometry>,
}

impl Default for DetachedOverlay {
    fn default() -> Self {
        Self {
            placement: PlacementPreference::Auto,
            backdrop_z: DEFAULT_BACKDROP_Z,
            backdrop: true,
            lock_page_scroll: false,
            geometry: None,
        }
    }
}

impl DetachedOverlay {
    /// Create with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the placement preference
    pub fn placement(mut self, placement: PlacementPreference) -> Self {
        self.placement = placement;
        self
    }

    /// Set the backdrop base layer
    pub fn z_index(mut self, z: i32) -> Self {
        self.backdrop_z = z;
        self
    }

    /// Enable or disable the backdrop
    pub fn backdrop(mut self, backdrop: bool) -> Self {
        self.backdrop = backdrop;
        self
    }

    /// Hold the page scroll lock while open
    pub fn lock_page_scroll(mut self, lock: bool) -> Self {
        self.lock_page_scroll = lock;
        self
    }

    /// Current geometry, if positioned during this open episode
    pub fn geometry(&self) -> Option<&OverlayGeometry> {
        self.geometry.as_ref()
    }

    /// Recompute geometry, keeping visibility already granted this episode
    pub fn reposition(&mut self, anchor: Rect, viewport: Size) -> Placement {
        let (placement, mut geometry) =
            compute_geometry(anchor, viewport, self.placement, self.backdrop_z);
        geometry.visible = self.geometry.map(|g| g.visible).unwrap_or(false);
        tracing::trace!(
            ?placement,
            top = geometry.top,
            left = geometry.left,
            width = geometry.width,
            max_height = geometry.max_height,
            "detached overlay positioned"
        );
        self.geometry = Some(geometry);
        placement
    }

    /// Allow the panel to be painted
    ///
    /// Returns true only on the false→true edge.
    pub fn reveal(&mut self) -> bool {
        match self.geometry.as_mut() {
            Some(geometry) if !geometry.visible => {
                geometry.visible = true;
                true
            }
            _ => false,
        }
    }

    /// Forget geometry at the end of an open episode
    pub fn reset(&mut self) {
        self.geometry = None;
    }
}

/// How the dropdown panel is rendered
#[derive(Clone, Debug, PartialEq)]
pub enum RenderTarget {
    /// Normal layout flow
    Inline(InlineOverlay),
    /// Top-level layer with computed geometry
    Detached(DetachedOverlay),
}

impl Default for RenderTarget {
    fn default() -> Self {
        RenderTarget::Inline(InlineOverlay::default())
    }
}

impl RenderTarget {
    /// Whether geometry is computed by the positioning engine
    pub fn is_detached(&self) -> bool {
        matches!(self, RenderTarget::Detached(_))
    }

    /// Outside-interaction strategy for this target
    pub fn dismiss_mode(&self) -> DismissMode {
        match self {
            RenderTarget::Detached(detached) if detached.backdrop => DismissMode::Backdrop,
            _ => DismissMode::Direct,
        }
    }

    /// Lifecycle phase after which the filter input takes focus
    pub fn focus_phase(&self) -> LifecyclePhase {
        match self {
            RenderTarget::Inline(_) => LifecyclePhase::Opened,
            RenderTarget::Detached(_) => LifecyclePhase::Positioned,
        }
    }

    /// Whether opening should hold the page scroll lock
    pub fn locks_page_scroll(&self) -> bool {
        matches!(self, RenderTarget::Detached(d) if d.lock_page_scroll)
    }

    /// Height available to the option list
    pub fn list_max_height(&self) -> Option<f32> {
        match self {
            RenderTarget::Inline(inline) => Some(inline.max_height),
            RenderTarget::Detached(detached) => detached.geometry().map(|g| g.max_height),
        }
    }

    /// Detached state, if any
    pub fn detached(&self) -> Option<&DetachedOverlay> {
        match self {
            RenderTarget::Detached(detached) => Some(detached),
            RenderTarget::Inline(_) => None,
        }
    }

    /// Mutable detached state, if any
    pub fn detached_mut(&mut self) -> Option<&mut DetachedOverlay> {
        match self {
            RenderTarget::Detached(detached) => Some(detached),
            RenderTarget::Inline(_) => None,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Size = Size::new(1024.0, 768.0);

    #[test]
    fn test_auto_flips_to_top_when_cramped() {
        // 180 below, 400 above
        let anchor = Rect::new(100.0, 400.0, 300.0, 188.0);
        let viewport = Size::new(1024.0, 768.0);
        assert_eq!(viewport.height - anchor.bottom(), 180.0);

        let (placement, _) = compute_geometry(anchor, viewport, PlacementPreference::Auto, 1000);
        assert_eq!(placement, Placement::Top);
    }

    #[test]
    fn test_auto_prefers_bottom_with_comfortable_space() {
        // 240 below beats 500 above
        let anchor = Rect::new(0.0, 500.0, 200.0, 28.0);
        let (placement, _) = compute_geometry(anchor, VIEWPORT, PlacementPreference::Auto, 0);
        assert_eq!(placement, Placement::Bottom);
    }

    #[test]
    fn test_auto_prefers_bottom_on_tie() {
        let anchor = Rect::new(0.0, 100.0, 200.0, 40.0);
        let viewport = Size::new(800.0, 240.0);
        // 100 above, 100 below
        let (placement, _) = compute_geometry(anchor, viewport, PlacementPreference::Auto, 0);
        assert_eq!(placement, Placement::Bottom);
    }

    #[test]
    fn test_explicit_placement_wins() {
        let anchor = Rect::new(0.0, 10.0, 200.0, 40.0);
        let (placement, geometry) =
            compute_geometry(anchor, VIEWPORT, PlacementPreference::Top, 0);
        assert_eq!(placement, Placement::Top);
        // Pinned to the margin when there is no room above
        assert_eq!(geometry.top, VIEWPORT_MARGIN);
    }

    #[test]
    fn test_bottom_geometry() {
        let anchor = Rect::new(40.0, 100.0, 300.0, 40.0);
        let (placement, g) = compute_geometry(anchor, VIEWPORT, PlacementPreference::Auto, 1000);
        assert_eq!(placement, Placement::Bottom);
        assert_eq!(g.top, 148.0);
        assert_eq!(g.left, 40.0);
        assert_eq!(g.width, 300.0);
        // space_below = 628 → 620, capped at 60% of 768
        assert!((g.max_height - 460.8).abs() < 1e-3);
        assert_eq!(g.z_index, 1001);
        assert!(!g.visible);
    }

    #[test]
    fn test_top_geometry() {
        let anchor = Rect::new(40.0, 400.0, 300.0, 188.0);
        let (_, g) = compute_geometry(anchor, VIEWPORT, PlacementPreference::Top, 0);
        // space_above = 400 → 392, cap 460.8
        assert_eq!(g.max_height, 392.0);
        assert_eq!(g.top, 8.0_f32.max(400.0 - 392.0 - 8.0));
    }

    #[test]
    fn test_width_and_left_clamped_to_viewport() {
        let viewport = Size::new(320.0, 600.0);
        let anchor = Rect::new(-20.0, 100.0, 400.0, 40.0);
        let (_, g) = compute_geometry(anchor, viewport, PlacementPreference::Bottom, 0);
        assert_eq!(g.width, 304.0);
        assert_eq!(g.left, 8.0);

        let anchor = Rect::new(200.0, 100.0, 200.0, 40.0);
        let (_, g) = compute_geometry(anchor, viewport, PlacementPreference::Bottom, 0);
        assert_eq!(g.width, 200.0);
        assert_eq!(g.left, 112.0);
    }

    #[test]
    fn test_max_height_floor() {
        // Trigger at the very bottom of a short viewport
        let viewport = Size::new(800.0, 300.0);
        let anchor = Rect::new(0.0, 280.0, 200.0, 20.0);
        let (_, g) = compute_geometry(anchor, viewport, PlacementPreference::Bottom, 0);
        assert_eq!(g.max_height, MIN_LIST_HEIGHT);
        assert_eq!(g.top, 292.0);
    }

    #[test]
    fn test_reposition_preserves_visibility() {
        let mut detached = DetachedOverlay::new();
        let anchor = Rect::new(10.0, 10.0, 200.0, 40.0);

        detached.reposition(anchor, VIEWPORT);
        assert!(!detached.geometry().map(|g| g.visible).unwrap_or(true));

        assert!(detached.reveal());
        assert!(!detached.reveal());

        detached.reposition(anchor.offset(0.0, 30.0), VIEWPORT);
        assert!(detached.geometry().map(|g| g.visible).unwrap_or(false));

        detached.reset();
        assert!(detached.geometry().is_none());
        assert!(!detached.reveal());
    }

    #[test]
    fn test_placement_from_str() {
        assert_eq!(
            "auto".parse::<PlacementPreference>(),
            Ok(PlacementPreference::Auto)
        );
        assert_eq!(
            " Top ".parse::<PlacementPreference>(),
            Ok(PlacementPreference::Top)
        );
        assert_eq!(
            "bottom".parse::<PlacementPreference>(),
            Ok(PlacementPreference::Bottom)
        );
        assert!("left".parse::<PlacementPreference>().is_err());
    }

    #[test]
    fn test_render_target_strategies() {
        let inline = RenderTarget::default();
        assert_eq!(inline.dismiss_mode(), DismissMode::Direct);
        assert_eq!(inline.focus_phase(), LifecyclePhase::Opened);
        assert_eq!(inline.list_max_height(), Some(DEFAULT_INLINE_MAX_HEIGHT));

        let detached = RenderTarget::Detached(DetachedOverlay::new());
        assert_eq!(detached.dismiss_mode(), DismissMode::Backdrop);
        assert_eq!(detached.focus_phase(), LifecyclePhase::Positioned);
        assert_eq!(detached.list_max_height(), None);

        let bare = RenderTarget::Detached(DetachedOverlay::new().backdrop(false));
        assert_eq!(bare.dismiss_mode(), DismissMode::Direct);
    }
}
