//! Action enum - everything the playground can do
//!
//! Components turn terminal input into Actions; the App applies them.
//! Anything that touches a menu is forwarded to the framework's tick queue
//! rather than applied directly.

use inventory_framework::event::ClickKind;
use std::fmt;

/// Cursor movement inside the chest grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Host tick: drain the UI queue
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    /// Quit without confirmation
    ForceQuit,

    // ─────────────────────────────────────────────────────────────────────────
    // Chest interaction
    // ─────────────────────────────────────────────────────────────────────────
    MoveCursor(Direction),
    /// Click the slot under the cursor
    ClickCursor(ClickKind),
    /// Click a specific slot (mouse)
    ClickSlot(usize, ClickKind),
    /// Drag across the cursor row, like a vanilla paint-drag
    DragRow,
    /// The viewer closes the menu
    CloseMenu,
    /// Open the menu again (reloading the menu file)
    ReopenMenu,

    // ─────────────────────────────────────────────────────────────────────────
    // Event log
    // ─────────────────────────────────────────────────────────────────────────
    ScrollLogUp,
    ScrollLogDown,
    ClearLog,

    // ─────────────────────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────────────────────
    OpenQuitDialog,
    OpenHelp,
    CloseModal,
    ConfirmModal,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tick => write!(f, "Tick"),
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::ForceQuit => write!(f, "ForceQuit"),
            Action::MoveCursor(d) => write!(f, "MoveCursor({:?})", d),
            Action::ClickCursor(kind) => write!(f, "ClickCursor({:?})", kind),
            Action::ClickSlot(slot, kind) => write!(f, "ClickSlot({}, {:?})", slot, kind),
            Action::DragRow => write!(f, "DragRow"),
            Action::CloseMenu => write!(f, "CloseMenu"),
            Action::ReopenMenu => write!(f, "ReopenMenu"),
            Action::ScrollLogUp => write!(f, "ScrollLogUp"),
            Action::ScrollLogDown => write!(f, "ScrollLogDown"),
            Action::ClearLog => write!(f, "ClearLog"),
            Action::OpenQuitDialog => write!(f, "OpenQuitDialog"),
            Action::OpenHelp => write!(f, "OpenHelp"),
            Action::CloseModal => write!(f, "CloseModal"),
            Action::ConfirmModal => write!(f, "ConfirmModal"),
        }
    }
}
