//! Scroll model for fixed-height list rows
//!
//! Keeps a vertical scroll offset for a list viewport and reveals rows with
//! nearest-edge semantics: scroll the minimum distance that makes the row
//! fully visible, never re-centering.

/// Default row height in logical pixels
pub const DEFAULT_ROW_HEIGHT: f32 = 36.0;

/// Scroll offset of a uniform-row list
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ListScroll {
    offset: f32,
    viewport_height: f32,
    row_height: f32,
}

impl Default for ListScroll {
    fn default() -> Self {
        Self::new(DEFAULT_ROW_HEIGHT)
    }
}

impl ListScroll {
    pub fn new(row_height: f32) -> Self {
        Self {
            offset: 0.0,
            viewport_height: 0.0,
            row_height: row_height.max(1.0),
        }
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn row_height(&self) -> f32 {
        self.row_height
    }

    pub fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    pub fn set_viewport_height(&mut self, height: f32) {
        self.viewport_height = height.max(0.0);
    }

    /// Back to the top
    pub fn reset(&mut self) {
        self.offset = 0.0;
    }

    /// Scroll the minimum amount needed to show `index` fully
    ///
    /// Returns whether the offset changed.
    pub fn reveal(&mut self, index: usize) -> bool {
        let top = index as f32 * self.row_height;
        let bottom = top + self.row_height;
        let previous = self.offset;

        if top < self.offset {
            self.offset = top;
        } else if bottom > self.offset + self.viewport_height {
            // Rows taller than the viewport align to their top edge
            self.offset = (bottom - self.viewport_height).min(top);
        }

        self.offset != previous
    }

    /// Keep the offset within the content of a `count`-row list
    pub fn clamp_to(&mut self, count: usize) {
        let max = (count as f32 * self.row_height - self.viewport_height).max(0.0);
        self.offset = self.offset.min(max);
    }
}
