//! Session replay
//!
//! Drives a combobox through the scripted steps of a [`SessionConfig`],
//! acting as the host: after every step it runs the layout pass, keeps the
//! overlay hit-test region in sync with the panel, and prints a snapshot.

use std::io::Write;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use serde_json::Value;
use tracing::{debug, info};

use sift_cn::components::combobox::{
    combobox_with, Combobox, ComboboxBuilder, ComboboxView, JsonAccessor, OptionRow,
    PanelSurface,
};
use sift_core::Rect;
use sift_layout::Region;
use sift_platform::{InputEvent, Key, KeyboardEvent, PointerEvent, ViewportEvent};

use crate::config::{ItemsConfig, SessionConfig, Step};
use crate::host::ScriptHost;

type Changes = Arc<Mutex<Vec<String>>>;

/// Build the JSON accessor described by the items section
pub fn accessor(items: &ItemsConfig) -> JsonAccessor {
    let mut accessor = JsonAccessor::new();
    if let Some(keys) = &items.label_keys {
        accessor = accessor.label_keys(keys.iter().cloned());
    }
    if let Some(key) = &items.value_key {
        accessor = accessor.value_key(key.clone());
    }
    accessor.search_keys(items.search_keys.iter().cloned())
}

/// A combobox plus the host state around it
pub struct Session {
    combobox: Combobox<Value, JsonAccessor>,
    host: ScriptHost,
    trigger: Rect,
    changes: Changes,
}

impl Session {
    pub fn new(config: &SessionConfig, items: Vec<Value>) -> Result<Self> {
        let widget = &config.widget;
        let changes = Changes::default();

        let builder: ComboboxBuilder<Value, JsonAccessor> = match &widget.key {
            Some(key) => ComboboxBuilder::with_key(key.clone(), accessor(&config.items)),
            None => combobox_with(accessor(&config.items)),
        };
        let mut builder = builder
            .items(items)
            .disabled(widget.disabled)
            .required(widget.required)
            .detached_layer(widget.detached_layer)
            .placement(widget.placement()?)
            .detached_z_index(widget.z_index)
            .show_backdrop(widget.show_backdrop)
            .lock_page_scroll(widget.lock_page_scroll)
            .dropdown_max_height(widget.dropdown_max_height)
            .row_height(widget.row_height);

        if let Some(label) = &widget.label {
            builder = builder.label(label.clone());
        }
        if let Some(placeholder) = &widget.placeholder {
            builder = builder.placeholder(placeholder.clone());
        }
        if let Some(placeholder) = &widget.search_placeholder {
            builder = builder.search_placeholder(placeholder.clone());
        }
        if let Some(text) = &widget.empty_text {
            builder = builder.empty_text(text.clone());
        }
        if let Some(value) = widget.json_value()? {
            builder = builder.value(value);
        }

        let log = changes.clone();
        let mut combobox = builder
            .on_change(move |value, item| {
                let value = value.map_or_else(|| "none".to_string(), |v| v.to_string());
                let item = item.map_or_else(|| "none".to_string(), |i| i.to_string());
                if let Ok(mut log) = log.lock() {
                    log.push(format!("on_change value={value} item={item}"));
                }
            })
            .build();

        let trigger = config.trigger.rect();
        combobox.set_region_bounds(Region::Trigger, trigger);

        Ok(Self {
            combobox,
            host: ScriptHost::new(config.viewport.size(), &config.host),
            trigger,
            changes,
        })
    }

    pub fn combobox(&self) -> &Combobox<Value, JsonAccessor> {
        &self.combobox
    }

    /// Apply one step, then run the host's layout pass
    pub fn apply(&mut self, step: &Step) -> Result<()> {
        debug!(?step, "applying step");
        match step {
            Step::Open => self.combobox.activate_trigger(&mut self.host),
            Step::Type { text } => self.combobox.set_query(text.clone()),
            Step::Key { key } => {
                let event = KeyboardEvent::pressed(Key::from_name(key));
                self.dispatch(event.into());
            }
            Step::Tap { x, y, to } => {
                let (end_x, end_y) = to.map_or((*x, *y), |[tx, ty]| (tx, ty));
                self.dispatch(PointerEvent::down(*x, *y).into());
                if to.is_some() {
                    self.dispatch(PointerEvent::moved(end_x, end_y).into());
                }
                self.dispatch(PointerEvent::up(end_x, end_y).into());
            }
            Step::Select { row } => self.combobox.select_row(*row)?,
            Step::Hover { row } => self.combobox.hover_row(*row),
            Step::Clear => self.combobox.clear(),
            Step::Done => self.combobox.done(),
            Step::Scroll { y } => {
                self.trigger = Rect::new(
                    self.trigger.x(),
                    *y,
                    self.trigger.width(),
                    self.trigger.height(),
                );
                self.combobox.set_region_bounds(Region::Trigger, self.trigger);
                self.dispatch(ViewportEvent::Scrolled.into());
            }
            Step::Resize { width, height } => {
                let size = sift_core::Size::new(*width, *height);
                self.host.viewport = size;
                self.dispatch(ViewportEvent::Resized(size).into());
            }
        }

        self.combobox.layout_committed(&mut self.host);
        self.sync_overlay_region();
        Ok(())
    }

    fn dispatch(&mut self, event: InputEvent) {
        let consumed = self.combobox.dispatch(&event, &mut self.host);
        debug!(?event, consumed, "event dispatched");
    }

    /// Keep the overlay hit-test region where the panel is drawn
    fn sync_overlay_region(&mut self) {
        let region = self.combobox.view().panel.and_then(|panel| match panel.surface {
            PanelSurface::Inline { max_height } => Some(Rect::new(
                self.trigger.x(),
                self.trigger.bottom(),
                self.trigger.width(),
                max_height,
            )),
            PanelSurface::Detached { geometry, .. } => geometry
                .map(|g| Rect::new(g.left, g.top, g.width, g.max_height)),
        });
        match region {
            Some(bounds) => self.combobox.set_region_bounds(Region::Overlay, bounds),
            None => self.combobox.remove_region(Region::Overlay),
        }
    }

    /// Drain `on_change` notifications recorded since the last call
    pub fn take_changes(&mut self) -> Vec<String> {
        self.changes
            .lock()
            .map(|mut log| std::mem::take(&mut *log))
            .unwrap_or_default()
    }
}

/// Replay every step of `config`, writing snapshots to `out`
pub fn replay(config: &SessionConfig, items: Vec<Value>, out: &mut impl Write) -> Result<()> {
    let mut session = Session::new(config, items)?;
    info!(
        steps = config.steps.len(),
        items = session.combobox().items().len(),
        "replaying session"
    );

    writeln!(out, "[0] mount")?;
    write_view(out, &session.combobox().view())?;

    for (index, step) in config.steps.iter().enumerate() {
        writeln!(out, "[{}] {}", index + 1, describe(step))?;
        if let Err(err) = session.apply(step) {
            writeln!(out, "    error: {err}")?;
        }
        for change in session.take_changes() {
            writeln!(out, "    {change}")?;
        }
        write_view(out, &session.combobox().view())?;
    }
    Ok(())
}

fn describe(step: &Step) -> String {
    match step {
        Step::Open => "open".to_string(),
        Step::Type { text } => format!("type {text:?}"),
        Step::Key { key } => format!("key {key}"),
        Step::Tap { x, y, to: None } => format!("tap ({x}, {y})"),
        Step::Tap { x, y, to: Some([tx, ty]) } => format!("drag ({x}, {y}) -> ({tx}, {ty})"),
        Step::Select { row } => format!("select row {row}"),
        Step::Hover { row } => format!("hover row {row}"),
        Step::Clear => "clear".to_string(),
        Step::Done => "done".to_string(),
        Step::Scroll { y } => format!("scroll trigger to y={y}"),
        Step::Resize { width, height } => format!("resize {width}x{height}"),
    }
}

/// Print a view snapshot
pub fn write_view(out: &mut impl Write, view: &ComboboxView) -> std::io::Result<()> {
    let trigger = &view.trigger;
    let mut flags = Vec::new();
    if trigger.is_placeholder {
        flags.push("placeholder");
    }
    if trigger.expanded {
        flags.push("expanded");
    }
    if trigger.disabled {
        flags.push("disabled");
    }
    if trigger.required {
        flags.push("required");
    }
    writeln!(out, "    trigger {:?} [{}]", trigger.text, flags.join(", "))?;

    let Some(panel) = &view.panel else {
        return Ok(());
    };

    match &panel.surface {
        PanelSurface::Inline { max_height } => {
            writeln!(out, "    panel inline max_height={max_height}")?;
        }
        PanelSurface::Detached {
            geometry: Some(g),
            backdrop_z,
        } => {
            writeln!(
                out,
                "    panel detached top={} left={} width={} max_height={} z={} visible={}{}",
                g.top,
                g.left,
                g.width,
                g.max_height,
                g.z_index,
                g.visible,
                backdrop_z.map(|z| format!(" backdrop_z={z}")).unwrap_or_default()
            )?;
        }
        PanelSurface::Detached { geometry: None, .. } => {
            writeln!(out, "    panel detached (not positioned)")?;
        }
    }

    writeln!(out, "    search {:?}", panel.search.query)?;
    if let Some(empty) = &panel.empty_text {
        writeln!(out, "    ({empty})")?;
    }
    for row in &panel.rows {
        writeln!(out, "    {}", format_row(row))?;
    }
    Ok(())
}

fn format_row(row: &OptionRow) -> String {
    let (before, matched, after) = row.label.segments();
    let label = if matched.is_empty() {
        before.to_string()
    } else {
        format!("{before}[{matched}]{after}")
    };
    format!(
        "{}{} {}",
        if row.active { '>' } else { ' ' },
        if row.selected { '*' } else { ' ' },
        label
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn session(toml: &str) -> SessionConfig {
        toml::from_str(toml).unwrap()
    }

    fn cities() -> Vec<Value> {
        vec![
            json!({"id": 1, "nombre": "Tucumán"}),
            json!({"id": 2, "nombre": "Tafi del Valle"}),
        ]
    }

    fn output(config: &SessionConfig) -> String {
        let mut out = Vec::new();
        replay(config, cities(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_replay_filter_and_commit() {
        let config = session(
            r#"
            [items]
            path = "cities.json"

            [[steps]]
            action = "open"

            [[steps]]
            action = "type"
            text = "tafi"

            [[steps]]
            action = "key"
            key = "Enter"
            "#,
        );
        let out = output(&config);

        assert!(out.contains("[2] type \"tafi\""));
        assert!(out.contains("  [Tafi] del Valle"));
        assert!(out.contains("on_change value=2 item={\"id\":2,\"nombre\":\"Tafi del Valle\"}"));
        assert!(out.trim_end().ends_with("trigger \"Tafi del Valle\" []"));
    }

    #[test]
    fn test_replay_detached_flip() {
        let config = session(
            r#"
            [widget]
            detached_layer = true

            [items]
            path = "cities.json"

            [trigger]
            x = 100.0
            y = 400.0
            width = 300.0
            height = 188.0

            [[steps]]
            action = "open"
            "#,
        );
        let out = output(&config);

        assert!(out.contains(
            "panel detached top=8 left=100 width=300 max_height=392 z=1001 visible=true backdrop_z=1000"
        ));
    }

    #[test]
    fn test_replay_backdrop_tap_closes() {
        let config = session(
            r#"
            [widget]
            detached_layer = true

            [items]
            path = "cities.json"

            [[steps]]
            action = "open"

            [[steps]]
            action = "tap"
            x = 900.0
            y = 700.0
            to = [930.0, 700.0]

            [[steps]]
            action = "tap"
            x = 900.0
            y = 700.0
            "#,
        );
        let mut session = Session::new(&config, cities()).unwrap();

        session.apply(&config.steps[0]).unwrap();
        assert!(session.combobox().is_open());
        session.apply(&config.steps[1]).unwrap();
        assert!(session.combobox().is_open());
        session.apply(&config.steps[2]).unwrap();
        assert!(!session.combobox().is_open());
    }

    #[test]
    fn test_replay_reports_bad_row() {
        let config = session(
            r#"
            [items]
            path = "cities.json"

            [[steps]]
            action = "open"

            [[steps]]
            action = "select"
            row = 7
            "#,
        );
        let out = output(&config);
        assert!(out.contains("error: Row 7 out of range (2 rows visible)"));
    }

    #[test]
    fn test_accessor_from_config() {
        let items = ItemsConfig {
            path: "agents.json".into(),
            label_keys: Some(vec!["full_name".into()]),
            value_key: Some("uuid".into()),
            search_keys: vec!["full_name".into(), "email".into()],
        };
        let accessor = accessor(&items);
        let agent = json!({"uuid": "a-1", "full_name": "Ana Paz", "email": "ana@example.com"});

        use sift_cn::ItemAccessor;
        assert_eq!(accessor.label(&agent), "Ana Paz");
        assert_eq!(accessor.value(&agent), Some(json!("a-1")));
        assert_eq!(accessor.search_text(&agent), "Ana Paz ana@example.com");
    }
}
