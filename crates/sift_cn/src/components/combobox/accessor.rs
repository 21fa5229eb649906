//! Item accessor strategies
//!
//! The combobox never inspects records directly. Every label, value and
//! search text goes through an [`ItemAccessor`] chosen at construction:
//!
//! - [`OptionAccessor`] for the built-in [`ComboboxOption`] record
//! - [`FnAccessor`] for arbitrary records via closures
//! - [`JsonAccessor`] for `serde_json::Value` records (feature `json`)
//!
//! Accessors never fail: a record without a usable label yields `""`, one
//! without a usable value yields `None`.

use std::fmt;
use std::sync::Arc;

/// Strategy for reading display data out of an opaque record
pub trait ItemAccessor<T> {
    /// Raw value reported through `on_change`
    type Value: Clone + PartialEq + fmt::Debug;

    /// Text shown in the trigger and option rows
    fn label(&self, item: &T) -> String;

    /// Value stored when the item is selected
    fn value(&self, item: &T) -> Option<Self::Value>;

    /// Text matched against the search query
    fn search_text(&self, item: &T) -> String {
        self.label(item)
    }
}

// =============================================================================
// ComboboxOption
// =============================================================================

/// An option in the combobox dropdown
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComboboxOption {
    /// The value (reported when selected)
    pub value: String,
    /// The display label shown in UI
    pub label: String,
    /// Extra words that should match searches without being displayed
    pub keywords: Option<String>,
}

impl ComboboxOption {
    /// Create a new option with value and label
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            keywords: None,
        }
    }

    /// Add hidden search keywords
    pub fn keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = Some(keywords.into());
        self
    }
}

/// Accessor for [`ComboboxOption`] records
#[derive(Clone, Copy, Debug, Default)]
pub struct OptionAccessor;

impl ItemAccessor<ComboboxOption> for OptionAccessor {
    type Value = String;

    fn label(&self, item: &ComboboxOption) -> String {
        item.label.clone()
    }

    fn value(&self, item: &ComboboxOption) -> Option<String> {
        Some(item.value.clone())
    }

    fn search_text(&self, item: &ComboboxOption) -> String {
        match &item.keywords {
            Some(keywords) => format!("{} {}", item.label, keywords),
            None => item.label.clone(),
        }
    }
}

// =============================================================================
// FnAccessor
// =============================================================================

type LabelFn<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;
type ValueFn<T, V> = Arc<dyn Fn(&T) -> Option<V> + Send + Sync>;
type SearchFn<T> = Arc<dyn Fn(&T, &str) -> String + Send + Sync>;

/// Closure-based accessor for arbitrary records
///
/// ```ignore
/// let accessor = FnAccessor::new(|agent: &Agent| agent.full_name.clone(), |agent| Some(agent.id))
///     .with_search_text(|agent, label| format!("{label} {}", agent.email));
/// ```
pub struct FnAccessor<T, V> {
    label: LabelFn<T>,
    value: ValueFn<T, V>,
    search: Option<SearchFn<T>>,
}

impl<T, V> Clone for FnAccessor<T, V> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            value: self.value.clone(),
            search: self.search.clone(),
        }
    }
}

impl<T, V> fmt::Debug for FnAccessor<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnAccessor")
            .field("search", &self.search.is_some())
            .finish()
    }
}

impl<T, V> FnAccessor<T, V> {
    /// Create from label and value extractors
    pub fn new<L, F>(label: L, value: F) -> Self
    where
        L: Fn(&T) -> String + Send + Sync + 'static,
        F: Fn(&T) -> Option<V> + Send + Sync + 'static,
    {
        Self {
            label: Arc::new(label),
            value: Arc::new(value),
            search: None,
        }
    }

    /// Override the search text; the closure receives the item and its label
    pub fn with_search_text<S>(mut self, search: S) -> Self
    where
        S: Fn(&T, &str) -> String + Send + Sync + 'static,
    {
        self.search = Some(Arc::new(search));
        self
    }
}

impl<T, V> ItemAccessor<T> for FnAccessor<T, V>
where
    V: Clone + PartialEq + fmt::Debug,
{
    type Value = V;

    fn label(&self, item: &T) -> String {
        (self.label)(item)
    }

    fn value(&self, item: &T) -> Option<V> {
        (self.value)(item)
    }

    fn search_text(&self, item: &T) -> String {
        let label = self.label(item);
        match &self.search {
            Some(search) => search(item, &label),
            None => label,
        }
    }
}

// =============================================================================
// JsonAccessor
// =============================================================================

#[cfg(feature = "json")]
pub use json::JsonAccessor;

#[cfg(feature = "json")]
mod json {
    use serde_json::Value;

    use super::ItemAccessor;

    /// Accessor for JSON object records such as `{"id": 2, "nombre": "Tafí del Valle"}`
    ///
    /// The label is the first present scalar among `label_keys`; the value is
    /// the non-null field at `value_key`.
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct JsonAccessor {
        label_keys: Vec<String>,
        value_key: String,
        search_keys: Vec<String>,
    }

    impl Default for JsonAccessor {
        fn default() -> Self {
            Self {
                label_keys: vec!["nombre".into(), "name".into(), "label".into()],
                value_key: "id".into(),
                search_keys: Vec::new(),
            }
        }
    }

    impl JsonAccessor {
        pub fn new() -> Self {
            Self::default()
        }

        /// Fields tried, in order, for the label
        pub fn label_keys<I, S>(mut self, keys: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            self.label_keys = keys.into_iter().map(Into::into).collect();
            self
        }

        /// Field holding the value
        pub fn value_key(mut self, key: impl Into<String>) -> Self {
            self.value_key = key.into();
            self
        }

        /// Fields joined into the search text (defaults to the label)
        pub fn search_keys<I, S>(mut self, keys: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            self.search_keys = keys.into_iter().map(Into::into).collect();
            self
        }
    }

    fn scalar_text(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    impl ItemAccessor<Value> for JsonAccessor {
        type Value = Value;

        fn label(&self, item: &Value) -> String {
            self.label_keys
                .iter()
                .find_map(|key| item.get(key).and_then(scalar_text))
                .unwrap_or_default()
        }

        fn value(&self, item: &Value) -> Option<Value> {
            item.get(&self.value_key)
                .filter(|value| !value.is_null())
                .cloned()
        }

        fn search_text(&self, item: &Value) -> String {
            if self.search_keys.is_empty() {
                return self.label(item);
            }
            self.search_keys
                .iter()
                .filter_map(|key| item.get(key).and_then(scalar_text))
                .collect::<Vec<_>>()
                .join(" ")
        }
    }
}
