//! End-to-end combobox scenarios driven through a scripted host

use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use sift_core::{Rect, ScrollLock, Size};
use sift_layout::{ListenerKind, Placement, PlacementPreference, Region};
use sift_platform::{
    FocusOptions, FocusTarget, Host, InputEvent, Key, KeyboardEvent, PlatformError,
    PointerEvent, Result as PlatformResult, ViewportEvent,
};

use crate::components::combobox::{
    combobox, combobox_with, Combobox, ComboboxBuilder, ComboboxError, ItemAccessor,
    JsonAccessor, OptionAccessor, PanelSurface,
};

struct TestHost {
    viewport: Size,
    focus_calls: Vec<(FocusTarget, FocusOptions)>,
    /// Number of upcoming focus requests to reject
    reject: usize,
}

impl TestHost {
    fn new() -> Self {
        Self {
            viewport: Size::new(1024.0, 768.0),
            focus_calls: Vec::new(),
            reject: 0,
        }
    }
}

impl Host for TestHost {
    fn viewport(&self) -> Size {
        self.viewport
    }

    fn focus(&mut self, target: FocusTarget, options: FocusOptions) -> PlatformResult<()> {
        self.focus_calls.push((target, options));
        if self.reject > 0 {
            self.reject -= 1;
            return Err(PlatformError::FocusRejected("element hidden".into()));
        }
        Ok(())
    }
}

type Changes = Arc<Mutex<Vec<(Option<Value>, Option<Value>)>>>;

fn json_cities(changes: &Changes) -> Combobox<Value, JsonAccessor> {
    let changes = changes.clone();
    combobox_with(JsonAccessor::default())
        .items([
            json!({"id": 1, "nombre": "Tucumán"}),
            json!({"id": 2, "nombre": "Tafi del Valle"}),
        ])
        .on_change(move |value, item| {
            changes.lock().unwrap().push((value, item.cloned()));
        })
        .build()
}

fn press<T, A: ItemAccessor<T>>(cb: &mut Combobox<T, A>, host: &mut TestHost, key: Key) -> bool {
    cb.dispatch(&KeyboardEvent::pressed(key).into(), host)
}

fn pointer<T, A: ItemAccessor<T>>(
    cb: &mut Combobox<T, A>,
    host: &mut TestHost,
    event: PointerEvent,
) -> bool {
    cb.dispatch(&InputEvent::Pointer(event), host)
}

/// Trigger 180px above the bottom of a 768px viewport, 400px below the top
fn low_trigger() -> Rect {
    Rect::new(100.0, 400.0, 300.0, 188.0)
}

#[test]
fn test_type_to_filter_and_commit() {
    let changes = Changes::default();
    let mut host = TestHost::new();
    let mut cb = json_cities(&changes);

    cb.activate_trigger(&mut host);
    cb.set_query("tafi");
    assert_eq!(cb.filtered_indices(), &[1]);

    assert!(press(&mut cb, &mut host, Key::Enter));

    let changes = changes.lock().unwrap();
    assert_eq!(
        *changes,
        vec![(
            Some(json!(2)),
            Some(json!({"id": 2, "nombre": "Tafi del Valle"}))
        )]
    );
    assert!(!cb.is_open());
    assert_eq!(cb.query(), "");
    assert_eq!(cb.active_index(), None);
    assert_eq!(cb.value(), Some(&json!(2)));
    assert_eq!(cb.view().trigger.text, "Tafi del Valle");
}

#[test]
fn test_enter_on_single_match_equals_click() {
    let by_key = Changes::default();
    let by_click = Changes::default();
    let mut host = TestHost::new();
    let mut typed = json_cities(&by_key);
    let mut clicked = json_cities(&by_click);

    for cb in [&mut typed, &mut clicked] {
        cb.activate_trigger(&mut host);
        cb.set_query("tafi");
        assert_eq!(cb.filtered_indices(), &[1]);
        assert_eq!(cb.active_index(), None);
    }

    assert!(press(&mut typed, &mut host, Key::Enter));
    assert_eq!(clicked.select_row(0), Ok(()));

    let by_key = by_key.lock().unwrap();
    assert_eq!(by_key.len(), 1);
    assert_eq!(*by_key, *by_click.lock().unwrap());
    assert_eq!(typed.state(), clicked.state());
    assert_eq!(typed.value(), clicked.value());
    assert_eq!(typed.selected_label(), clicked.selected_label());
}

#[test]
fn test_no_results() {
    let changes = Changes::default();
    let mut host = TestHost::new();
    let mut cb = json_cities(&changes);

    cb.activate_trigger(&mut host);
    cb.set_query("zzz");
    assert!(cb.filtered_indices().is_empty());

    let panel = cb.view().panel.expect("panel should be open");
    assert!(panel.rows.is_empty());
    assert_eq!(panel.empty_text.as_deref(), Some("No results found"));

    assert!(press(&mut cb, &mut host, Key::Enter));
    assert!(cb.is_open());
    assert!(changes.lock().unwrap().is_empty());

    assert!(press(&mut cb, &mut host, Key::Down));
    assert_eq!(cb.active_index(), None);
}

#[test]
fn test_home_end() {
    let mut host = TestHost::new();
    let mut cb = combobox()
        .option("1", "Tucumán")
        .option("2", "Tafí del Valle")
        .option("3", "Concepción")
        .option("4", "Famaillá")
        .build();

    cb.activate_trigger(&mut host);
    press(&mut cb, &mut host, Key::End);
    assert_eq!(cb.active_index(), Some(3));
    press(&mut cb, &mut host, Key::Home);
    assert_eq!(cb.active_index(), Some(0));
}

#[test]
fn test_arrow_up_from_nothing_lands_on_first() {
    let mut host = TestHost::new();
    let mut cb = combobox().option("1", "A").option("2", "B").build();

    cb.activate_trigger(&mut host);
    press(&mut cb, &mut host, Key::Up);
    assert_eq!(cb.active_index(), Some(0));
    press(&mut cb, &mut host, Key::Down);
    press(&mut cb, &mut host, Key::Down);
    assert_eq!(cb.active_index(), Some(1));
}

#[test]
fn test_auto_flips_to_top() {
    let mut host = TestHost::new();
    let mut cb = combobox()
        .option("1", "Tucumán")
        .detached_layer(true)
        .placement(PlacementPreference::Auto)
        .build();

    cb.set_region_bounds(Region::Trigger, low_trigger());
    cb.activate_trigger(&mut host);
    cb.layout_committed(&mut host);

    assert_eq!(cb.placement(), Placement::Top);
    let geometry = *cb.geometry().expect("positioned");
    assert_eq!(geometry.top, 8.0);
    assert_eq!(geometry.left, 100.0);
    assert_eq!(geometry.width, 300.0);
    assert_eq!(geometry.max_height, 392.0);
    assert_eq!(geometry.z_index, 1001);
    assert!(geometry.visible);
}

#[test]
fn test_clear_fires_once() {
    let changes = Changes::default();
    let mut host = TestHost::new();
    let mut cb = json_cities(&changes);
    cb.set_value(Some(json!(1)));
    assert_eq!(cb.selected_label().as_deref(), Some("Tucumán"));

    cb.activate_trigger(&mut host);
    cb.set_query("tu");
    cb.clear();

    assert_eq!(*changes.lock().unwrap(), vec![(None, None)]);
    assert!(!cb.is_open());
    assert_eq!(cb.query(), "");
    assert_eq!(cb.value(), None);

    let view = cb.view();
    assert!(view.trigger.is_placeholder);
    assert_eq!(view.trigger.text, "Select...");
}

#[test]
fn test_clear_ignored_while_disabled() {
    let changes = Changes::default();
    let mut cb = json_cities(&changes);
    cb.set_value(Some(json!(2)));
    cb.set_disabled(true);

    cb.clear();

    assert!(changes.lock().unwrap().is_empty());
    assert_eq!(cb.value(), Some(&json!(2)));
    assert_eq!(cb.view().trigger.text, "Tafi del Valle");
}

#[test]
fn test_done_keeps_selection() {
    let changes = Changes::default();
    let mut host = TestHost::new();
    let mut cb = json_cities(&changes);
    cb.set_value(Some(json!(2)));

    cb.activate_trigger(&mut host);
    cb.set_query("tuc");
    cb.done();

    assert!(!cb.is_open());
    assert_eq!(cb.value(), Some(&json!(2)));
    assert!(changes.lock().unwrap().is_empty());
}

#[test]
fn test_escape_closes_without_change() {
    let changes = Changes::default();
    let mut host = TestHost::new();
    let mut cb = json_cities(&changes);

    cb.activate_trigger(&mut host);
    press(&mut cb, &mut host, Key::Down);
    assert!(press(&mut cb, &mut host, Key::Escape));

    assert!(!cb.is_open());
    assert_eq!(cb.active_index(), None);
    assert!(changes.lock().unwrap().is_empty());
}

#[test]
fn test_listeners_scoped_to_open() {
    let mut host = TestHost::new();
    let mut cb = combobox().option("1", "A").build();
    cb.set_region_bounds(Region::Trigger, Rect::new(0.0, 0.0, 200.0, 40.0));
    assert!(cb.listeners().is_empty());

    cb.activate_trigger(&mut host);
    for kind in ListenerKind::ALL {
        assert!(cb.listeners().is_listening(kind));
    }

    press(&mut cb, &mut host, Key::Escape);
    assert!(cb.listeners().is_empty());

    // Late events after close are ignored
    assert!(!pointer(&mut cb, &mut host, PointerEvent::down(500.0, 500.0)));
    assert!(!press(&mut cb, &mut host, Key::Down));
    assert!(!cb.dispatch(&ViewportEvent::Scrolled.into(), &mut host));
    assert!(!cb.is_open());
}

#[test]
fn test_inline_outside_pointer_dismisses() {
    let mut host = TestHost::new();
    let mut cb = combobox().option("1", "A").build();
    cb.set_region_bounds(Region::Trigger, Rect::new(0.0, 0.0, 200.0, 40.0));
    cb.set_region_bounds(Region::Overlay, Rect::new(0.0, 44.0, 200.0, 200.0));

    cb.activate_trigger(&mut host);
    assert!(!pointer(&mut cb, &mut host, PointerEvent::down(20.0, 20.0)));
    assert!(!pointer(&mut cb, &mut host, PointerEvent::down(20.0, 100.0)));
    assert!(cb.is_open());

    assert!(pointer(&mut cb, &mut host, PointerEvent::down(600.0, 600.0)));
    assert!(!cb.is_open());
}

#[test]
fn test_backdrop_tap_slop() {
    let mut host = TestHost::new();
    let mut cb = combobox().option("1", "A").detached_layer(true).build();
    cb.set_region_bounds(Region::Trigger, low_trigger());
    cb.set_region_bounds(Region::Overlay, Rect::new(100.0, 8.0, 300.0, 384.0));
    cb.activate_trigger(&mut host);
    cb.layout_committed(&mut host);

    // Drag: displacement² = 100
    pointer(&mut cb, &mut host, PointerEvent::down(600.0, 100.0));
    pointer(&mut cb, &mut host, PointerEvent::moved(610.0, 100.0));
    assert!(!pointer(&mut cb, &mut host, PointerEvent::up(610.0, 100.0)));
    assert!(cb.is_open());

    // Press inside the panel is not a backdrop tap
    pointer(&mut cb, &mut host, PointerEvent::down(150.0, 50.0));
    assert!(!pointer(&mut cb, &mut host, PointerEvent::up(150.0, 50.0)));
    assert!(cb.is_open());

    // Tap: displacement² = 25
    pointer(&mut cb, &mut host, PointerEvent::down(600.0, 100.0));
    pointer(&mut cb, &mut host, PointerEvent::moved(603.0, 104.0));
    assert!(pointer(&mut cb, &mut host, PointerEvent::up(603.0, 104.0)));
    assert!(!cb.is_open());
}

#[test]
fn test_detached_positions_before_focus() {
    let mut host = TestHost::new();
    let mut cb = combobox().option("1", "A").detached_layer(true).build();
    cb.set_region_bounds(Region::Trigger, low_trigger());

    cb.activate_trigger(&mut host);
    assert!(host.focus_calls.is_empty());
    assert!(cb.geometry().is_none());
    let panel = cb.view().panel.expect("open");
    assert!(!panel.surface.is_visible());

    cb.layout_committed(&mut host);
    assert_eq!(
        host.focus_calls,
        vec![(FocusTarget::FilterInput, FocusOptions::preserve_scroll())]
    );
    assert!(cb.state().positioned());
    assert!(cb.view().panel.expect("open").surface.is_visible());

    // Later layout passes do not refocus
    cb.layout_committed(&mut host);
    assert_eq!(host.focus_calls.len(), 1);
}

#[test]
fn test_inline_focuses_on_open() {
    let mut host = TestHost::new();
    let mut cb = combobox().option("1", "A").build();

    cb.activate_trigger(&mut host);
    assert_eq!(host.focus_calls.len(), 1);
    cb.layout_committed(&mut host);
    assert_eq!(host.focus_calls.len(), 1);
    assert!(cb.geometry().is_none());
}

#[test]
fn test_focus_falls_back_to_plain() {
    let mut host = TestHost::new();
    host.reject = 1;
    let mut cb = combobox().option("1", "A").build();

    cb.activate_trigger(&mut host);
    assert_eq!(
        host.focus_calls,
        vec![
            (FocusTarget::FilterInput, FocusOptions::preserve_scroll()),
            (FocusTarget::FilterInput, FocusOptions::plain()),
        ]
    );
    assert!(cb.is_open());
}

#[test]
fn test_focus_failure_still_reveals() {
    let mut host = TestHost::new();
    host.reject = 2;
    let mut cb = combobox().option("1", "A").detached_layer(true).build();
    cb.set_region_bounds(Region::Trigger, low_trigger());

    cb.activate_trigger(&mut host);
    cb.layout_committed(&mut host);
    assert_eq!(host.focus_calls.len(), 2);
    assert!(cb.geometry().is_some_and(|g| g.visible));
}

#[test]
fn test_missing_trigger_bounds_defers_positioning() {
    let mut host = TestHost::new();
    let mut cb = combobox().option("1", "A").detached_layer(true).build();

    cb.activate_trigger(&mut host);
    cb.layout_committed(&mut host);
    assert!(cb.geometry().is_none());
    assert!(host.focus_calls.is_empty());

    cb.set_region_bounds(Region::Trigger, Rect::new(16.0, 16.0, 240.0, 40.0));
    cb.layout_committed(&mut host);
    assert_eq!(cb.placement(), Placement::Bottom);
    assert_eq!(host.focus_calls.len(), 1);
}

#[test]
fn test_viewport_changes_reposition() {
    let mut host = TestHost::new();
    let mut cb = combobox().option("1", "A").detached_layer(true).build();
    cb.set_region_bounds(Region::Trigger, low_trigger());
    cb.activate_trigger(&mut host);
    cb.layout_committed(&mut host);
    assert_eq!(cb.placement(), Placement::Top);

    let resized = ViewportEvent::Resized(Size::new(1024.0, 1200.0));
    assert!(cb.dispatch(&resized.into(), &mut host));
    assert_eq!(cb.placement(), Placement::Bottom);
    let geometry = *cb.geometry().expect("positioned");
    assert_eq!(geometry.top, 596.0);
    assert!(geometry.visible);

    // Trigger scrolled near the top
    cb.set_region_bounds(Region::Trigger, Rect::new(100.0, 20.0, 300.0, 40.0));
    assert!(cb.dispatch(&ViewportEvent::Scrolled.into(), &mut host));
    assert_eq!(cb.geometry().map(|g| g.top), Some(68.0));
}

#[test]
fn test_scroll_lock_refcount() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let lock = {
        let log = log.clone();
        ScrollLock::with_handler(move |locked| log.lock().unwrap().push(locked))
    };
    let mut host = TestHost::new();
    let build = || {
        combobox()
            .option("1", "A")
            .detached_layer(true)
            .lock_page_scroll(true)
            .scroll_lock(lock.clone())
            .build()
    };
    let mut a = build();
    let mut b = build();

    a.activate_trigger(&mut host);
    b.activate_trigger(&mut host);
    assert_eq!(lock.holders(), 2);
    assert!(a.holds_scroll_lock());

    a.done();
    assert!(!a.holds_scroll_lock());
    assert!(lock.is_locked());

    drop(b);
    assert!(!lock.is_locked());
    assert_eq!(*log.lock().unwrap(), vec![true, false]);
}

#[test]
fn test_inline_never_locks_scroll() {
    let lock = ScrollLock::new();
    let mut host = TestHost::new();
    let mut cb = combobox()
        .option("1", "A")
        .lock_page_scroll(true)
        .scroll_lock(lock.clone())
        .build();

    cb.activate_trigger(&mut host);
    assert!(!lock.is_locked());
}

#[test]
fn test_keyboard_scrolls_row_into_view() {
    let mut host = TestHost::new();
    let mut cb = combobox()
        .option("1", "Tucumán")
        .option("2", "Tafí del Valle")
        .option("3", "Concepción")
        .option("4", "Famaillá")
        .dropdown_max_height(72.0)
        .build();

    cb.activate_trigger(&mut host);
    for _ in 0..3 {
        press(&mut cb, &mut host, Key::Down);
    }
    assert_eq!(cb.active_index(), Some(2));
    assert_eq!(cb.list_scroll().offset(), 36.0);

    press(&mut cb, &mut host, Key::Home);
    assert_eq!(cb.view().panel.map(|p| p.scroll_offset), Some(0.0));
}

#[test]
fn test_hover_scrolls_row_into_view() {
    let mut host = TestHost::new();
    let four_rows = || {
        combobox()
            .option("1", "Tucumán")
            .option("2", "Tafí del Valle")
            .option("3", "Concepción")
            .option("4", "Famaillá")
            .dropdown_max_height(90.0)
            .build()
    };

    let mut hovered = four_rows();
    hovered.activate_trigger(&mut host);
    hovered.hover_row(2);
    assert_eq!(hovered.active_index(), Some(2));
    assert_eq!(hovered.list_scroll().offset(), 18.0);

    let mut keyed = four_rows();
    keyed.activate_trigger(&mut host);
    for _ in 0..3 {
        press(&mut keyed, &mut host, Key::Down);
    }
    assert_eq!(keyed.list_scroll().offset(), hovered.list_scroll().offset());

    hovered.hover_row(3);
    assert_eq!(hovered.list_scroll().offset(), 54.0);
    hovered.hover_row(1);
    assert_eq!(hovered.list_scroll().offset(), 36.0);
    hovered.hover_row(0);
    assert_eq!(hovered.list_scroll().offset(), 0.0);
}

#[test]
fn test_row_click_and_hover() {
    let picked = Arc::new(Mutex::new(Vec::new()));
    let mut host = TestHost::new();
    let mut cb = {
        let picked = picked.clone();
        ComboboxBuilder::with_key("city", OptionAccessor)
            .option("1", "Tucumán")
            .option("2", "Tafí del Valle")
            .option("3", "Concepción")
            .on_change(move |value, _| picked.lock().unwrap().push(value))
            .build()
    };

    assert_eq!(cb.select_row(0), Err(ComboboxError::Closed));

    cb.activate_trigger(&mut host);
    cb.set_query("c");
    assert_eq!(cb.filtered_indices(), &[0, 2]);

    cb.hover_row(1);
    cb.hover_row(9);
    assert_eq!(cb.active_index(), Some(1));
    assert_eq!(
        cb.view().trigger.active_descendant.as_deref(),
        Some("city_opt-2")
    );

    assert_eq!(
        cb.select_row(5),
        Err(ComboboxError::RowOutOfRange { row: 5, count: 2 })
    );
    assert_eq!(cb.select_row(1), Ok(()));
    assert_eq!(*picked.lock().unwrap(), vec![Some("3".to_string())]);
    assert_eq!(cb.view().trigger.text, "Concepción");
}

#[test]
fn test_view_rows() {
    let mut host = TestHost::new();
    let mut cb = combobox()
        .option("1", "Tucumán")
        .option("2", "Tafí del Valle")
        .value("2".to_string())
        .build();

    cb.activate_trigger(&mut host);
    cb.set_query("TUC");
    press(&mut cb, &mut host, Key::Down);

    let view = cb.view();
    assert!(view.trigger.expanded);
    assert_eq!(view.trigger.text, "Tafí del Valle");

    let panel = view.panel.expect("open");
    assert_eq!(panel.search.query, "TUC");
    assert_eq!(panel.search.placeholder, "Type to search...");
    assert!(matches!(panel.surface, PanelSurface::Inline { max_height } if max_height == 240.0));
    assert_eq!(panel.rows.len(), 1);

    let row = &panel.rows[0];
    assert_eq!(row.item_index, 0);
    assert!(row.active);
    assert!(!row.selected);
    assert_eq!(row.label.segments(), ("", "Tuc", "umán"));
}

#[test]
fn test_disabled() {
    let mut host = TestHost::new();
    let mut cb = combobox().option("1", "A").disabled(true).build();

    cb.activate_trigger(&mut host);
    assert!(!cb.is_open());
    assert!(cb.view().panel.is_none());
    assert!(cb.view().trigger.disabled);

    cb.set_disabled(false);
    cb.activate_trigger(&mut host);
    assert!(cb.is_open());

    cb.set_disabled(true);
    assert!(!cb.is_open());
    assert!(cb.listeners().is_empty());
    assert_eq!(cb.select_row(0), Err(ComboboxError::Disabled));
}

#[test]
fn test_trigger_toggles() {
    let mut host = TestHost::new();
    let mut cb = combobox().option("1", "A").option("2", "B").build();

    cb.activate_trigger(&mut host);
    cb.set_query("b");
    cb.activate_trigger(&mut host);
    assert!(!cb.is_open());
    assert_eq!(cb.query(), "");

    cb.activate_trigger(&mut host);
    assert_eq!(cb.filtered_indices(), &[0, 1]);
    assert_eq!(cb.active_index(), None);
}

#[test]
fn test_set_items_keeps_highlight_in_range() {
    let mut host = TestHost::new();
    let mut cb = combobox()
        .option("1", "A")
        .option("2", "B")
        .option("3", "C")
        .build();

    cb.activate_trigger(&mut host);
    press(&mut cb, &mut host, Key::End);
    assert_eq!(cb.active_index(), Some(2));

    cb.set_items(vec![crate::ComboboxOption::new("1", "A")]);
    assert_eq!(cb.active_index(), None);
    assert_eq!(cb.filtered_indices(), &[0]);
}

#[test]
fn test_key_release_ignored() {
    let mut host = TestHost::new();
    let mut cb = combobox().option("1", "A").build();
    cb.activate_trigger(&mut host);

    assert!(!cb.dispatch(&KeyboardEvent::released(Key::Down).into(), &mut host));
    assert!(!press(&mut cb, &mut host, Key::Char('a')));
    assert_eq!(cb.active_index(), None);
}
