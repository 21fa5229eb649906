//! Presentation-free render surface
//!
//! [`Combobox::view`](super::Combobox::view) produces a [`ComboboxView`]
//! snapshot that a host turns into real elements. It carries everything a
//! renderer needs (texts, ids, ARIA state, geometry) and nothing about
//! styling.

use std::ops::Range;

use sift_layout::{OverlayGeometry, RenderTarget};

use super::accessor::ItemAccessor;
use super::Combobox;

/// Snapshot of the whole widget
#[derive(Clone, Debug, PartialEq)]
pub struct ComboboxView {
    /// Field label rendered above the trigger
    pub label: Option<String>,
    pub trigger: TriggerView,
    /// `None` while closed or disabled
    pub panel: Option<PanelView>,
}

/// The trigger control with combobox semantics
#[derive(Clone, Debug, PartialEq)]
pub struct TriggerView {
    pub id: String,
    /// Selected label, or the placeholder
    pub text: String,
    pub is_placeholder: bool,
    pub expanded: bool,
    /// Id of the listbox the trigger controls
    pub controls: String,
    /// Row id of the highlighted option
    pub active_descendant: Option<String>,
    pub required: bool,
    pub disabled: bool,
}

/// Where and how the panel is presented
#[derive(Clone, Debug, PartialEq)]
pub enum PanelSurface {
    /// In layout flow, list capped at `max_height`
    Inline { max_height: f32 },
    /// Top-level layer; `geometry` is `None` until the first positioning
    Detached {
        geometry: Option<OverlayGeometry>,
        /// Layer of the dismiss backdrop, when one is shown
        backdrop_z: Option<i32>,
    },
}

impl PanelSurface {
    /// Whether the panel may be painted now
    pub fn is_visible(&self) -> bool {
        match self {
            PanelSurface::Inline { .. } => true,
            PanelSurface::Detached { geometry, .. } => geometry.is_some_and(|g| g.visible),
        }
    }
}

/// The filter input at the top of the panel
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchField {
    pub id: String,
    pub query: String,
    pub placeholder: String,
}

/// Footer actions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FooterAction {
    /// Remove the selection and close
    Clear,
    /// Close without changing the selection
    Done,
}

impl FooterAction {
    pub fn label(&self) -> &'static str {
        match self {
            FooterAction::Clear => "Clear",
            FooterAction::Done => "Done",
        }
    }
}

/// Open panel contents
#[derive(Clone, Debug, PartialEq)]
pub struct PanelView {
    pub surface: PanelSurface,
    pub listbox_id: String,
    pub search: SearchField,
    pub rows: Vec<OptionRow>,
    /// Shown instead of rows when nothing matches
    pub empty_text: Option<String>,
    /// Vertical scroll of the option list
    pub scroll_offset: f32,
    pub actions: [FooterAction; 2],
}

/// One option row
#[derive(Clone, Debug, PartialEq)]
pub struct OptionRow {
    pub id: String,
    /// Index into the caller's item collection
    pub item_index: usize,
    pub label: HighlightedLabel,
    pub selected: bool,
    pub active: bool,
}

/// Label text with an optional emphasized span
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HighlightedLabel {
    pub text: String,
    /// Byte range of the emphasized span
    pub highlight: Option<Range<usize>>,
}

impl HighlightedLabel {
    /// Label with the first case-insensitive occurrence of `query` emphasized
    pub fn new(text: String, query: &str) -> Self {
        let highlight = find_case_insensitive(&text, query.trim());
        Self { text, highlight }
    }

    pub fn plain(text: String) -> Self {
        Self {
            text,
            highlight: None,
        }
    }

    /// `(before, matched, after)`; `matched` is empty when unsegmented
    pub fn segments(&self) -> (&str, &str, &str) {
        match &self.highlight {
            Some(range) => (
                &self.text[..range.start],
                &self.text[range.clone()],
                &self.text[range.end..],
            ),
            None => (&self.text, "", ""),
        }
    }
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Byte range of the first case-insensitive occurrence of `needle`
///
/// Comparison is per character, so the range always lies on char boundaries
/// of `haystack`. Diacritics are significant here.
fn find_case_insensitive(haystack: &str, needle: &str) -> Option<Range<usize>> {
    if needle.is_empty() {
        return None;
    }

    haystack.char_indices().find_map(|(start, _)| {
        let mut rest = haystack[start..].char_indices();
        let mut end = start;
        for n in needle.chars() {
            match rest.next() {
                Some((offset, h)) if chars_eq_ignore_case(h, n) => {
                    end = start + offset + h.len_utf8();
                }
                _ => return None,
            }
        }
        Some(start..end)
    })
}

impl<T, A: ItemAccessor<T>> Combobox<T, A> {
    /// Build the current render snapshot
    pub fn view(&self) -> ComboboxView {
        let selected = self.selected_item().map(|item| self.accessor.label(item));
        let open = self.is_open() && !self.config.disabled;
        let active_descendant = if open {
            self.state
                .active_index()
                .and_then(|row| self.filtered.get(row))
                .map(|&index| self.row_id(index))
        } else {
            None
        };

        let trigger = TriggerView {
            id: self.key.derive("trigger"),
            is_placeholder: selected.is_none(),
            text: selected.unwrap_or_else(|| self.config.placeholder.clone()),
            expanded: open,
            controls: self.key.derive("listbox"),
            active_descendant,
            required: self.config.required,
            disabled: self.config.disabled,
        };

        ComboboxView {
            label: self.config.label.clone(),
            trigger,
            panel: open.then(|| self.panel_view()),
        }
    }

    fn panel_view(&self) -> PanelView {
        let query = self.state.query();
        let active = self.state.active_index();
        let selected = self.value.as_ref();

        let rows: Vec<OptionRow> = self
            .filtered
            .iter()
            .enumerate()
            .map(|(row, &index)| {
                let item = &self.items[index];
                OptionRow {
                    id: self.row_id(index),
                    item_index: index,
                    label: HighlightedLabel::new(self.accessor.label(item), query),
                    selected: selected.is_some()
                        && self.accessor.value(item).as_ref() == selected,
                    active: active == Some(row),
                }
            })
            .collect();

        let surface = match &self.target {
            RenderTarget::Inline(inline) => PanelSurface::Inline {
                max_height: inline.max_height,
            },
            RenderTarget::Detached(detached) => PanelSurface::Detached {
                geometry: detached.geometry().copied(),
                backdrop_z: detached.backdrop.then_some(detached.backdrop_z),
            },
        };

        PanelView {
            surface,
            listbox_id: self.key.derive("listbox"),
            search: SearchField {
                id: self.key.derive("search"),
                query: query.to_string(),
                placeholder: self.config.search_placeholder.clone(),
            },
            empty_text: rows.is_empty().then(|| self.config.empty_text.clone()),
            rows,
            scroll_offset: self.scroll.offset(),
            actions: [FooterAction::Clear, FooterAction::Done],
        }
    }

    pub(super) fn row_id(&self, item_index: usize) -> String {
        self.key.derive(&format!("opt-{item_index}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_first_occurrence() {
        let label = HighlightedLabel::new("Tafí del Valle".into(), "VALLE");
        assert_eq!(label.segments(), ("Tafí del ", "Valle", ""));

        let label = HighlightedLabel::new("banana".into(), "an");
        assert_eq!(label.segments(), ("b", "an", "ana"));
    }

    #[test]
    fn test_highlight_trims_query() {
        let label = HighlightedLabel::new("Tucumán".into(), "  tuc ");
        assert_eq!(label.segments(), ("", "Tuc", "umán"));
    }

    #[test]
    fn test_highlight_is_diacritic_sensitive() {
        // Matched through normalization, but the raw text differs
        let label = HighlightedLabel::new("Tucumán".into(), "cuman");
        assert_eq!(label.highlight, None);
        assert_eq!(label.segments(), ("Tucumán", "", ""));

        let label = HighlightedLabel::new("Tucumán".into(), "MÁN");
        assert_eq!(label.segments(), ("Tucu", "mán", ""));
    }

    #[test]
    fn test_highlight_empty_query() {
        assert_eq!(HighlightedLabel::new("Famaillá".into(), "   ").highlight, None);
        assert_eq!(HighlightedLabel::plain("x".into()).segments(), ("x", "", ""));
    }

    #[test]
    fn test_panel_surface_visibility() {
        assert!(PanelSurface::Inline { max_height: 240.0 }.is_visible());
        assert!(!PanelSurface::Detached {
            geometry: None,
            backdrop_z: Some(1000)
        }
        .is_visible());
    }

    #[test]
    fn test_footer_labels() {
        assert_eq!(FooterAction::Clear.label(), "Clear");
        assert_eq!(FooterAction::Done.label(), "Done");
    }
}
