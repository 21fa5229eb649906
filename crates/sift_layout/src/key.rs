//! Element ids for widget instances.
//!
//! Hosts use the key to build element ids (`aria-activedescendant` targets,
//! row ids) that stay stable for the lifetime of one widget, and differ
//! between two widgets created at the same call site.
//!
//! # Example
//!
//! ```ignore
//! let key = InstanceKey::new("combobox");
//! let row_id = key.derive("opt-3"); // "combobox-5f0c…_opt-3"
//!
//! // Explicit key for deterministic ids
//! let key = InstanceKey::explicit("city picker");
//! assert_eq!(key.derive("opt-0"), "city-picker_opt-0");
//! ```

use std::fmt;
use std::panic::Location;
use uuid::Uuid;

/// Id root shared by every element of one widget instance
///
/// Generated keys look like `{prefix}-{uuid}`. Every character outside
/// `[A-Za-z0-9_.-]` is replaced with `-`, so keys can be used as id
/// references without escaping.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct InstanceKey {
    id: String,
    origin: Option<&'static Location<'static>>,
}

impl InstanceKey {
    /// Fresh key remembering where the widget was built
    #[track_caller]
    pub fn new(prefix: &str) -> Self {
        Self {
            id: format!("{}-{}", id_safe(prefix), Uuid::new_v4().as_simple()),
            origin: Some(Location::caller()),
        }
    }

    /// Deterministic key supplied by the caller
    pub fn explicit(key: impl AsRef<str>) -> Self {
        Self {
            id: id_safe(key.as_ref()),
            origin: None,
        }
    }

    pub fn get(&self) -> &str {
        &self.id
    }

    /// Source location of the builder call, for generated keys
    pub fn origin(&self) -> Option<&'static Location<'static>> {
        self.origin
    }

    /// Id of a sub-element: `{key}_{part}`
    pub fn derive(&self, part: &str) -> String {
        format!("{}_{}", self.id, id_safe(part))
    }
}

impl fmt::Debug for InstanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.origin {
            Some(origin) => write!(f, "InstanceKey({} @ {origin})", self.id),
            None => write!(f, "InstanceKey({})", self.id),
        }
    }
}

fn id_safe(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '-'
            }
        })
        .collect()
}
