//! Keyboard navigation over the filtered list

use sift_platform::Key;

/// Keys the open panel reacts to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NavKey {
    Down,
    Up,
    Home,
    End,
    Enter,
    Escape,
}

impl NavKey {
    /// Map a platform key; everything else is left to the filter input
    pub fn from_key(key: Key) -> Option<Self> {
        match key {
            Key::Down => Some(NavKey::Down),
            Key::Up => Some(NavKey::Up),
            Key::Home => Some(NavKey::Home),
            Key::End => Some(NavKey::End),
            Key::Enter => Some(NavKey::Enter),
            Key::Escape => Some(NavKey::Escape),
            _ => None,
        }
    }
}

/// New highlight after a movement key, for a list of `count` rows
///
/// Up from no highlight lands on the first row, same as Down.
pub fn navigate(active: Option<usize>, key: NavKey, count: usize) -> Option<usize> {
    if count == 0 {
        return None;
    }
    let last = count - 1;

    match key {
        NavKey::Down => Some(active.map_or(0, |i| (i + 1).min(last))),
        NavKey::Up => Some(active.map_or(0, |i| i.saturating_sub(1).min(last))),
        NavKey::Home => Some(0),
        NavKey::End => Some(last),
        NavKey::Enter | NavKey::Escape => active.filter(|&i| i < count),
    }
}

/// Row committed by Enter, if any
pub fn enter_target(active: Option<usize>, count: usize) -> Option<usize> {
    match active {
        Some(i) if i < count => Some(i),
        _ if count == 1 => Some(0),
        _ => None,
    }
}
