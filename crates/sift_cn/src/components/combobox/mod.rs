//! Combobox component - searchable dropdown selection
//!
//! A headless combobox with accent-insensitive filtering, keyboard
//! navigation and an optional detached overlay layer. The host feeds input
//! events and element bounds in, and renders [`ComboboxView`] snapshots out.
//!
//! # Example
//!
//! ```ignore
//! use sift_cn::prelude::*;
//!
//! let mut city = cn::combobox()
//!     .label("City")
//!     .placeholder("Pick a city")
//!     .option("1", "Tucumán")
//!     .option("2", "Tafí del Valle")
//!     .on_change(|value, _item| println!("Selected: {value:?}"))
//!     .build();
//!
//! city.set_region_bounds(Region::Trigger, Rect::new(16.0, 560.0, 280.0, 40.0));
//! city.activate_trigger(&mut host);
//! city.layout_committed(&mut host);
//! city.set_query("tafi");
//! city.dispatch(&KeyboardEvent::pressed(Key::Enter).into(), &mut host);
//!
//! // Detached layer above everything else, with a dismiss backdrop
//! cn::combobox()
//!     .detached_layer(true)
//!     .placement(PlacementPreference::Auto)
//!     .lock_page_scroll(true)
//!     .scroll_lock(shell.scroll_lock())
//!
//! // Arbitrary records through an accessor
//! cn::combobox_with(JsonAccessor::default())
//!     .items(cities)
//! ```

pub mod accessor;
pub mod error;
pub mod filter;
pub mod keyboard;
pub mod state;
pub mod view;

use std::fmt;
use std::sync::Arc;

use sift_core::{Rect, ScrollLock, ScrollLockGuard, Size};
use sift_layout::{
    DetachedOverlay, DismissController, InlineOverlay, InstanceKey, Lifecycle, LifecyclePhase,
    ListScroll, ListenerKind, ListenerScope, OverlayGeometry, Placement, PlacementPreference,
    Region, RegionRegistry, RenderTarget,
};
use sift_platform::{
    FocusOptions, FocusTarget, Host, InputEvent, KeyState, KeyboardEvent, ViewportEvent,
};

pub use accessor::{ComboboxOption, FnAccessor, ItemAccessor, OptionAccessor};
#[cfg(feature = "json")]
pub use accessor::JsonAccessor;
pub use error::{ComboboxError, Result};
pub use filter::{filtered, normalize};
pub use keyboard::NavKey;
pub use state::{Phase, SelectionEvent, SelectionState};
pub use view::{
    ComboboxView, FooterAction, HighlightedLabel, OptionRow, PanelSurface, PanelView,
    SearchField, TriggerView,
};

/// Callback fired with the committed value and record (`None, None` on clear)
pub type OnChange<T, V> = Arc<dyn Fn(Option<V>, Option<&T>) + Send + Sync>;

/// Static presentation and behavior options
#[derive(Clone, Debug, PartialEq)]
pub struct ComboboxConfig {
    pub label: Option<String>,
    pub placeholder: String,
    pub search_placeholder: String,
    pub empty_text: String,
    pub disabled: bool,
    pub required: bool,
    pub row_height: f32,
}

impl Default for ComboboxConfig {
    fn default() -> Self {
        Self {
            label: None,
            placeholder: "Select...".to_string(),
            search_placeholder: "Type to search...".to_string(),
            empty_text: "No results found".to_string(),
            disabled: false,
            required: false,
            row_height: sift_layout::scroll::DEFAULT_ROW_HEIGHT,
        }
    }
}

// =============================================================================
// Combobox
// =============================================================================

/// A mounted combobox instance
///
/// Dropping the combobox releases its listeners and any held scroll lock.
pub struct Combobox<T, A: ItemAccessor<T>> {
    key: InstanceKey,
    config: ComboboxConfig,
    accessor: A,
    items: Vec<T>,
    value: Option<A::Value>,
    state: SelectionState,
    filtered: Vec<usize>,
    target: RenderTarget,
    dismiss: DismissController,
    regions: RegionRegistry,
    listeners: ListenerScope,
    lifecycle: Lifecycle,
    scroll: ListScroll,
    list_height: Option<f32>,
    scroll_lock: Option<ScrollLock>,
    scroll_guard: Option<ScrollLockGuard>,
    on_change: Option<OnChange<T, A::Value>>,
}

impl<T, A: ItemAccessor<T>> fmt::Debug for Combobox<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Combobox")
            .field("key", &self.key)
            .field("items", &self.items.len())
            .field("value", &self.value)
            .field("state", &self.state)
            .field("target", &self.target)
            .finish()
    }
}

impl<T, A: ItemAccessor<T>> Combobox<T, A> {
    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn key(&self) -> &InstanceKey {
        &self.key
    }

    pub fn config(&self) -> &ComboboxConfig {
        &self.config
    }

    pub fn accessor(&self) -> &A {
        &self.accessor
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    pub fn query(&self) -> &str {
        self.state.query()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.state.active_index()
    }

    /// Indices into [`items`](Self::items) currently listed, in order
    pub fn filtered_indices(&self) -> &[usize] {
        &self.filtered
    }

    /// Records currently listed, in order
    pub fn filtered_items(&self) -> impl Iterator<Item = &T> + '_ {
        self.filtered.iter().map(|&index| &self.items[index])
    }

    pub fn render_target(&self) -> &RenderTarget {
        &self.target
    }

    /// Detached panel geometry, if positioned during this open episode
    pub fn geometry(&self) -> Option<&OverlayGeometry> {
        self.target.detached().and_then(DetachedOverlay::geometry)
    }

    pub fn placement(&self) -> Placement {
        self.state.placement()
    }

    /// Global listeners currently registered
    pub fn listeners(&self) -> &ListenerScope {
        &self.listeners
    }

    /// Whether this instance currently holds the page scroll lock
    pub fn holds_scroll_lock(&self) -> bool {
        self.scroll_guard.is_some()
    }

    /// Current vertical offset of the option list
    pub fn list_scroll(&self) -> &ListScroll {
        &self.scroll
    }

    // -------------------------------------------------------------------------
    // Value
    // -------------------------------------------------------------------------

    pub fn value(&self) -> Option<&A::Value> {
        self.value.as_ref()
    }

    /// Replace the selected value without firing `on_change`
    pub fn set_value(&mut self, value: Option<A::Value>) {
        self.value = value;
    }

    /// The record whose value equals the selected value
    pub fn selected_item(&self) -> Option<&T> {
        let value = self.value.as_ref()?;
        self.items
            .iter()
            .find(|item| self.accessor.value(item).as_ref() == Some(value))
    }

    /// Label of the selected record; `None` shows the placeholder
    pub fn selected_label(&self) -> Option<String> {
        self.selected_item().map(|item| self.accessor.label(item))
    }

    // -------------------------------------------------------------------------
    // Host-provided data
    // -------------------------------------------------------------------------

    /// Replace the option records
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.refilter();
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.config.disabled = disabled;
        if disabled && self.is_open() {
            self.close(SelectionEvent::Dismiss);
        }
    }

    /// Record the viewport bounds of a hit-test region
    pub fn set_region_bounds(&mut self, region: Region, bounds: Rect) {
        self.regions.set(region, bounds);
    }

    /// Forget a region (element unmounted)
    pub fn remove_region(&mut self, region: Region) {
        self.regions.remove(region);
    }

    /// Override the height of the scrollable option list
    pub fn set_list_viewport_height(&mut self, height: f32) {
        self.list_height = Some(height);
        self.scroll.set_viewport_height(height);
        self.scroll.clamp_to(self.filtered.len());
    }

    // -------------------------------------------------------------------------
    // Interaction
    // -------------------------------------------------------------------------

    /// Trigger click or keyboard activation: toggles the panel
    pub fn activate_trigger<H: Host + ?Sized>(&mut self, host: &mut H) {
        if self.config.disabled {
            tracing::trace!(key = self.key.get(), "trigger ignored: disabled");
            return;
        }
        if self.is_open() {
            self.close(SelectionEvent::Toggle);
        } else {
            self.open(host);
        }
    }

    /// The host committed the layout pass that followed opening
    ///
    /// In detached mode this runs the first positioning pass, then focus,
    /// then reveals the panel. Without trigger bounds the pass is retried on
    /// the next call.
    pub fn layout_committed<H: Host + ?Sized>(&mut self, host: &mut H) {
        if !self.is_open() || !self.lifecycle.is_awaiting_layout() {
            return;
        }
        if !self.target.is_detached() {
            self.lifecycle.take_layout();
            return;
        }
        if !self.reposition(host.viewport()) {
            return;
        }
        self.lifecycle.take_layout();

        if self.lifecycle.enter(LifecyclePhase::Positioned) {
            self.focus_filter_input(host);
        }
        if let Some(detached) = self.target.detached_mut() {
            if detached.reveal() {
                tracing::trace!(key = self.key.get(), "detached panel revealed");
            }
        }
    }

    /// The filter input changed
    pub fn set_query(&mut self, query: impl Into<String>) {
        if !self.is_open() {
            return;
        }
        self.state.apply(SelectionEvent::Edit(query.into()));
        self.refilter();
        self.scroll.reset();
    }

    /// Handle a key event while open; returns whether it was consumed
    pub fn handle_key(&mut self, event: &KeyboardEvent) -> bool {
        if !self.is_open() || event.state != KeyState::Pressed {
            return false;
        }
        let Some(key) = NavKey::from_key(event.key) else {
            return false;
        };

        let count = self.filtered.len();
        match key {
            NavKey::Escape => self.close(SelectionEvent::Dismiss),
            NavKey::Enter => match keyboard::enter_target(self.active_index(), count) {
                Some(row) => self.commit(row),
                None => tracing::trace!(count, "enter ignored: nothing to commit"),
            },
            _ => {
                if let Some(row) = keyboard::navigate(self.active_index(), key, count) {
                    self.highlight(row);
                }
            }
        }
        true
    }

    /// Click on a listed row
    pub fn select_row(&mut self, row: usize) -> Result<()> {
        if self.config.disabled {
            return Err(ComboboxError::Disabled);
        }
        if !self.is_open() {
            return Err(ComboboxError::Closed);
        }
        let count = self.filtered.len();
        if row >= count {
            return Err(ComboboxError::RowOutOfRange { row, count });
        }
        self.commit(row);
        Ok(())
    }

    /// Pointer entered a listed row; out-of-range rows are ignored
    pub fn hover_row(&mut self, row: usize) {
        if self.is_open() && row < self.filtered.len() {
            self.highlight(row);
        }
    }

    /// The Clear action: drop the selection and close
    ///
    /// Ignored while disabled.
    pub fn clear(&mut self) {
        if self.config.disabled {
            tracing::trace!(key = self.key.get(), "clear ignored: disabled");
            return;
        }
        self.value = None;
        if let Some(on_change) = self.on_change.clone() {
            on_change(None, None);
        }
        tracing::debug!(key = self.key.get(), "selection cleared");
        self.close(SelectionEvent::Clear);
    }

    /// The Done action: close without changing the selection
    pub fn done(&mut self) {
        self.close(SelectionEvent::Dismiss);
    }

    /// Route a host event; returns whether the widget consumed it
    ///
    /// Events for listeners that are not registered (everything while
    /// closed) are ignored.
    pub fn dispatch<H: Host + ?Sized>(&mut self, event: &InputEvent, host: &mut H) -> bool {
        match event {
            InputEvent::Pointer(pointer) => {
                if !self.listeners.is_listening(ListenerKind::PointerCapture) {
                    return false;
                }
                if self.dismiss.on_pointer(pointer, &self.regions) {
                    tracing::debug!(key = self.key.get(), "dismissed by outside interaction");
                    self.close(SelectionEvent::Dismiss);
                    return true;
                }
                false
            }
            InputEvent::Keyboard(key) => {
                self.listeners.is_listening(ListenerKind::Key) && self.handle_key(key)
            }
            InputEvent::Viewport(ViewportEvent::Scrolled) => {
                self.listeners.is_listening(ListenerKind::Scroll)
                    && self.reposition(host.viewport())
            }
            InputEvent::Viewport(ViewportEvent::Resized(size)) => {
                self.listeners.is_listening(ListenerKind::Resize) && self.reposition(*size)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn open<H: Host + ?Sized>(&mut self, host: &mut H) {
        self.state.apply(SelectionEvent::Toggle);
        self.refilter();
        self.scroll.reset();
        if let Some(height) = self.list_height.or(self.target.list_max_height()) {
            self.scroll.set_viewport_height(height);
        }

        self.dismiss.reset();
        self.listeners.register(&ListenerKind::ALL);

        if self.target.locks_page_scroll() {
            match &self.scroll_lock {
                Some(lock) => self.scroll_guard = Some(lock.acquire()),
                None => tracing::debug!("page scroll lock requested without a lock service"),
            }
        }

        let episode = self.lifecycle.begin();
        tracing::debug!(key = self.key.get(), episode, "combobox opened");

        if self.lifecycle.enter(LifecyclePhase::Opened) {
            self.focus_filter_input(host);
        }
    }

    fn close(&mut self, event: SelectionEvent) {
        if self.state.apply(event).is_none() {
            return;
        }
        self.listeners.release_all();
        if let Some(guard) = self.scroll_guard.take() {
            guard.release();
        }
        self.lifecycle.end();
        self.dismiss.reset();
        if let Some(detached) = self.target.detached_mut() {
            detached.reset();
        }
        self.scroll.reset();
        self.refilter();
    }

    fn commit(&mut self, row: usize) {
        let Some(&index) = self.filtered.get(row) else {
            return;
        };
        let value = self.accessor.value(&self.items[index]);
        self.value = value.clone();
        tracing::debug!(key = self.key.get(), index, ?value, "option committed");

        if let Some(on_change) = self.on_change.clone() {
            on_change(value, Some(&self.items[index]));
        }
        self.close(SelectionEvent::Commit);
    }

    /// Move the highlight and keep the row inside the list viewport
    fn highlight(&mut self, row: usize) {
        if self.active_index() != Some(row) {
            self.state.apply(SelectionEvent::Highlight(Some(row)));
        }
        self.scroll.reveal(row);
    }

    fn refilter(&mut self) {
        self.filtered = filtered(&self.items, self.state.query(), &self.accessor);
        if self.active_index().is_some_and(|row| row >= self.filtered.len()) {
            self.state.apply(SelectionEvent::Highlight(None));
        }
        self.scroll.clamp_to(self.filtered.len());
    }

    /// Recompute detached geometry; false when there is nothing to position
    fn reposition(&mut self, viewport: Size) -> bool {
        if !self.is_open() {
            return false;
        }
        let Some(detached) = self.target.detached_mut() else {
            return false;
        };
        let Some(anchor) = self.regions.bounds(Region::Trigger) else {
            tracing::trace!(key = self.key.get(), "positioning skipped: no trigger bounds");
            return false;
        };

        let placement = detached.reposition(anchor, viewport);
        self.state.mark_positioned(placement);

        if self.list_height.is_none() {
            if let Some(height) = self.target.list_max_height() {
                self.scroll.set_viewport_height(height);
                self.scroll.clamp_to(self.filtered.len());
            }
        }
        true
    }

    fn focus_filter_input<H: Host + ?Sized>(&self, host: &mut H) {
        let target = FocusTarget::FilterInput;
        if let Err(err) = host.focus(target, FocusOptions::preserve_scroll()) {
            tracing::trace!(%err, "scroll-preserving focus rejected, retrying");
            if let Err(err) = host.focus(target, FocusOptions::plain()) {
                tracing::debug!(%err, "filter input focus failed");
            }
        }
    }
}

impl<T, A: ItemAccessor<T>> Drop for Combobox<T, A> {
    fn drop(&mut self) {
        let released = self.listeners.release_all();
        if released > 0 || self.scroll_guard.is_some() {
            tracing::trace!(key = self.key.get(), released, "combobox unmounted while open");
        }
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builder for creating Combobox components with fluent API
pub struct ComboboxBuilder<T, A: ItemAccessor<T>> {
    key: InstanceKey,
    config: ComboboxConfig,
    accessor: A,
    items: Vec<T>,
    value: Option<A::Value>,
    detached_layer: bool,
    inline: InlineOverlay,
    detached: DetachedOverlay,
    scroll_lock: Option<ScrollLock>,
    on_change: Option<OnChange<T, A::Value>>,
}

impl<T, A: ItemAccessor<T>> ComboboxBuilder<T, A> {
    /// Create a builder reading records through `accessor`
    ///
    /// Generates a unique instance key; `#[track_caller]` records the call site.
    #[track_caller]
    pub fn new(accessor: A) -> Self {
        Self::with_instance_key(InstanceKey::new("combobox"), accessor)
    }

    /// Create a combobox builder with an explicit key
    pub fn with_key(key: impl AsRef<str>, accessor: A) -> Self {
        Self::with_instance_key(InstanceKey::explicit(key), accessor)
    }

    fn with_instance_key(key: InstanceKey, accessor: A) -> Self {
        Self {
            key,
            config: ComboboxConfig::default(),
            accessor,
            items: Vec::new(),
            value: None,
            detached_layer: false,
            inline: InlineOverlay::default(),
            detached: DetachedOverlay::default(),
            scroll_lock: None,
            on_change: None,
        }
    }

    /// Set the option records
    pub fn items(mut self, items: impl IntoIterator<Item = T>) -> Self {
        self.items = items.into_iter().collect();
        self
    }

    /// Set the initially selected value
    pub fn value(mut self, value: A::Value) -> Self {
        self.value = Some(value);
        self
    }

    /// Add a label above the combobox
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.config.label = Some(label.into());
        self
    }

    /// Set the trigger placeholder text
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.config.placeholder = placeholder.into();
        self
    }

    /// Set the filter input placeholder text
    pub fn search_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.config.search_placeholder = placeholder.into();
        self
    }

    /// Set the text shown when nothing matches
    pub fn empty_text(mut self, text: impl Into<String>) -> Self {
        self.config.empty_text = text.into();
        self
    }

    /// Set disabled state
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.config.disabled = disabled;
        self
    }

    /// Mark the field as required
    pub fn required(mut self, required: bool) -> Self {
        self.config.required = required;
        self
    }

    /// Set the option row height used for scroll-into-view
    pub fn row_height(mut self, height: f32) -> Self {
        self.config.row_height = height;
        self
    }

    /// Render the panel in a top-level layer positioned against the viewport
    pub fn detached_layer(mut self, detached: bool) -> Self {
        self.detached_layer = detached;
        self
    }

    /// Maximum list height in inline mode
    pub fn dropdown_max_height(mut self, height: f32) -> Self {
        self.inline.max_height = height;
        self
    }

    /// Backdrop layer in detached mode; the panel sits one above it
    pub fn detached_z_index(mut self, z: i32) -> Self {
        self.detached = self.detached.z_index(z);
        self
    }

    /// Detached panel placement
    pub fn placement(mut self, placement: PlacementPreference) -> Self {
        self.detached = self.detached.placement(placement);
        self
    }

    /// Show a dismiss backdrop in detached mode
    pub fn show_backdrop(mut self, show: bool) -> Self {
        self.detached = self.detached.backdrop(show);
        self
    }

    /// Hold the page scroll lock while open (detached mode)
    pub fn lock_page_scroll(mut self, lock: bool) -> Self {
        self.detached = self.detached.lock_page_scroll(lock);
        self
    }

    /// Page scroll lock service shared with the host shell
    pub fn scroll_lock(mut self, lock: ScrollLock) -> Self {
        self.scroll_lock = Some(lock);
        self
    }

    /// Set the change callback
    pub fn on_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(Option<A::Value>, Option<&T>) + Send + Sync + 'static,
    {
        self.on_change = Some(Arc::new(callback));
        self
    }

    /// Mount the combobox
    pub fn build(self) -> Combobox<T, A> {
        let target = if self.detached_layer {
            RenderTarget::Detached(self.detached)
        } else {
            RenderTarget::Inline(self.inline)
        };
        let mut combobox = Combobox {
            dismiss: DismissController::new(target.dismiss_mode()),
            lifecycle: Lifecycle::new(target.focus_phase()),
            scroll: ListScroll::new(self.config.row_height),
            key: self.key,
            config: self.config,
            accessor: self.accessor,
            items: self.items,
            value: self.value,
            state: SelectionState::new(),
            filtered: Vec::new(),
            target,
            regions: RegionRegistry::new(),
            listeners: ListenerScope::new(),
            list_height: None,
            scroll_lock: self.scroll_lock,
            scroll_guard: None,
            on_change: self.on_change,
        };
        combobox.refilter();
        tracing::trace!(
            key = combobox.key.get(),
            items = combobox.items.len(),
            detached = combobox.target.is_detached(),
            "combobox mounted"
        );
        combobox
    }
}

impl ComboboxBuilder<ComboboxOption, OptionAccessor> {
    /// Add an option with value and label
    pub fn option(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.items.push(ComboboxOption::new(value, label));
        self
    }

    /// Add multiple options
    pub fn options(mut self, options: impl IntoIterator<Item = ComboboxOption>) -> Self {
        self.items.extend(options);
        self
    }
}

/// Create a combobox over [`ComboboxOption`] records
///
/// # Example
///
/// ```ignore
/// use sift_cn::prelude::*;
///
/// let country = cn::combobox()
///     .placeholder("Search countries...")
///     .option("us", "United States")
///     .option("uk", "United Kingdom")
///     .on_change(|v, _| println!("Selected: {v:?}"))
///     .build();
/// ```
#[track_caller]
pub fn combobox() -> ComboboxBuilder<ComboboxOption, OptionAccessor> {
    ComboboxBuilder::new(OptionAccessor)
}

/// Create a combobox over arbitrary records read through `accessor`
#[track_caller]
pub fn combobox_with<T, A: ItemAccessor<T>>(accessor: A) -> ComboboxBuilder<T, A> {
    ComboboxBuilder::new(accessor)
}
