//! Session file handling
//!
//! A session (`sift.toml`) describes one combobox, the records it lists,
//! the simulated viewport and a script of interactions to replay:
//!
//! ```toml
//! [widget]
//! label = "City"
//! detached_layer = true
//! placement = "auto"
//!
//! [items]
//! path = "cities.json"
//! label_keys = ["nombre"]
//!
//! [trigger]
//! x = 100
//! y = 400
//! width = 300
//! height = 188
//!
//! [[steps]]
//! action = "open"
//!
//! [[steps]]
//! action = "type"
//! text = "tafi"
//!
//! [[steps]]
//! action = "key"
//! key = "Enter"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use sift_core::{Rect, Size};
use sift_layout::PlacementPreference;

/// Default session file name looked up inside a directory
pub const SESSION_FILE: &str = "sift.toml";

/// A replayable combobox session
#[derive(Debug, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub widget: WidgetConfig,
    pub items: ItemsConfig,
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub trigger: RectConfig,
    #[serde(default)]
    pub host: HostConfig,
    #[serde(default)]
    pub steps: Vec<Step>,
    /// Directory relative paths are resolved against
    #[serde(skip)]
    pub base_dir: PathBuf,
}

/// Combobox options
#[derive(Debug, Deserialize, Serialize)]
pub struct WidgetConfig {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub search_placeholder: Option<String>,
    #[serde(default)]
    pub empty_text: Option<String>,
    /// Initially selected value, compared against each record's value field
    #[serde(default)]
    pub value: Option<toml::Value>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub detached_layer: bool,
    #[serde(default = "default_placement")]
    pub placement: String,
    #[serde(default = "default_z_index")]
    pub z_index: i32,
    #[serde(default = "default_true")]
    pub show_backdrop: bool,
    #[serde(default)]
    pub lock_page_scroll: bool,
    #[serde(default = "default_max_height")]
    pub dropdown_max_height: f32,
    #[serde(default = "default_row_height")]
    pub row_height: f32,
}

fn default_placement() -> String {
    "auto".to_string()
}

fn default_z_index() -> i32 {
    1000
}

fn default_true() -> bool {
    true
}

fn default_max_height() -> f32 {
    240.0
}

fn default_row_height() -> f32 {
    36.0
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            key: None,
            label: None,
            placeholder: None,
            search_placeholder: None,
            empty_text: None,
            value: None,
            disabled: false,
            required: false,
            detached_layer: false,
            placement: default_placement(),
            z_index: default_z_index(),
            show_backdrop: true,
            lock_page_scroll: false,
            dropdown_max_height: default_max_height(),
            row_height: default_row_height(),
        }
    }
}

impl WidgetConfig {
    pub fn placement(&self) -> Result<PlacementPreference> {
        Ok(self.placement.parse()?)
    }

    /// Initial value as a JSON value
    pub fn json_value(&self) -> Result<Option<Value>> {
        self.value
            .as_ref()
            .map(|value| serde_json::to_value(value).context("Invalid widget value"))
            .transpose()
    }
}

/// Where records come from and how they are read
#[derive(Debug, Deserialize, Serialize)]
pub struct ItemsConfig {
    /// JSON file holding an array of records
    pub path: String,
    #[serde(default)]
    pub label_keys: Option<Vec<String>>,
    #[serde(default)]
    pub value_key: Option<String>,
    #[serde(default)]
    pub search_keys: Vec<String>,
}

/// Simulated viewport
#[derive(Debug, Deserialize, Serialize)]
pub struct ViewportConfig {
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default = "default_height")]
    pub height: f32,
}

fn default_width() -> f32 {
    1024.0
}

fn default_height() -> f32 {
    768.0
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

impl ViewportConfig {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// A rectangle in viewport coordinates
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct RectConfig {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for RectConfig {
    fn default() -> Self {
        Self {
            x: 16.0,
            y: 16.0,
            width: 280.0,
            height: 40.0,
        }
    }
}

impl RectConfig {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Simulated host behavior
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct HostConfig {
    /// Refuse scroll-preserving focus requests
    #[serde(default)]
    pub reject_preserve_scroll: bool,
    /// Refuse every focus request
    #[serde(default)]
    pub reject_focus: bool,
}

/// One scripted interaction
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Activate the trigger
    Open,
    /// Replace the filter query
    Type { text: String },
    /// Press a key (DOM key name)
    Key { key: String },
    /// Full pointer press/release at a point, optionally dragged to `to`
    Tap {
        x: f32,
        y: f32,
        #[serde(default)]
        to: Option<[f32; 2]>,
    },
    /// Click a listed row
    Select { row: usize },
    /// Hover a listed row
    Hover { row: usize },
    /// The Clear action
    Clear,
    /// The Done action
    Done,
    /// Page scroll moving the trigger to a new position
    Scroll { y: f32 },
    /// Viewport resize
    Resize { width: f32, height: f32 },
}

impl SessionConfig {
    /// Load a session from a file, or from `sift.toml` inside a directory
    pub fn load(path: &Path) -> Result<Self> {
        let file = if path.is_dir() {
            path.join(SESSION_FILE)
        } else {
            path.to_path_buf()
        };

        let content = fs::read_to_string(&file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        let mut config: SessionConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", file.display()))?;

        config.base_dir = file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(config)
    }

    /// Load the records listed by this session
    pub fn load_items(&self) -> Result<Vec<Value>> {
        load_items(&self.base_dir.join(&self.items.path))
    }
}

/// Read a JSON array of records
pub fn load_items(path: &Path) -> Result<Vec<Value>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {} as a JSON array", path.display()))
}
