//! Accent-insensitive option filtering
//!
//! Matching is plain substring containment over normalized text: no
//! ranking, no fuzzy distance. Results keep the caller's order.

use std::ops::RangeInclusive;

use unicode_normalization::UnicodeNormalization;

use super::accessor::ItemAccessor;

/// The Combining Diacritical Marks block
const COMBINING_DIACRITICS: RangeInclusive<char> = '\u{0300}'..='\u{036F}';

/// Lower-case, canonically decompose, and strip combining diacritics
///
/// `normalize("Concepción") == "concepcion"`
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !COMBINING_DIACRITICS.contains(c))
        .collect()
}

/// Indices of the items matching `query`, in their original order
///
/// A query that normalizes to nothing after trimming matches everything.
pub fn filtered<T, A>(items: &[T], query: &str, accessor: &A) -> Vec<usize>
where
    A: ItemAccessor<T> + ?Sized,
{
    if normalize(query.trim()).is_empty() {
        return (0..items.len()).collect();
    }

    let needle = normalize(query);
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| normalize(&accessor.search_text(item)).contains(&needle))
        .map(|(index, _)| index)
        .collect()
}
