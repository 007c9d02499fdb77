//! Keyboard shortcut mapping.
//!
//! The sketchpad has a single global binding: bare `R` clears the active
//! canvas. Combinations with Ctrl/Cmd/Alt are left to the host (so Cmd+R
//! still reloads the page).

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    /// Clear every stroke on the canvas.
    Reset,
}

/// Resolves key events into shortcut actions.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value. Shift is ignored so both `r`
    /// and `R` (caps lock or shift held) reset.
    pub fn resolve(
        key: &str,
        ctrl: bool,
        _shift: bool,
        alt: bool,
        meta: bool,
    ) -> Option<ShortcutAction> {
        if ctrl || alt || meta {
            return None;
        }
        match key {
            "r" | "R" => Some(ShortcutAction::Reset),
            _ => None,
        }
    }
}
