//! Events the host delivers for open menus

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identity of the player looking at a menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ViewerId(pub Uuid);

impl ViewerId {
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl From<Uuid> for ViewerId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for ViewerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// How a slot was clicked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClickKind {
    Left,
    Right,
    ShiftLeft,
    ShiftRight,
    Middle,
    Drop,
    ControlDrop,
    DoubleClick,
    /// Hotbar swap with the given hotbar key (0..=8)
    NumberKey(u8),
}

impl ClickKind {
    pub fn is_shift(self) -> bool {
        matches!(self, ClickKind::ShiftLeft | ClickKind::ShiftRight)
    }

    pub fn is_right(self) -> bool {
        matches!(self, ClickKind::Right | ClickKind::ShiftRight)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub viewer: ViewerId,
    /// Raw slot; indices past the chest belong to the viewer's own inventory
    pub slot: usize,
    pub kind: ClickKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragEvent {
    pub viewer: ViewerId,
    pub slots: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CloseReason {
    /// The viewer closed the menu
    Player,
    /// Closed by plugin code
    Plugin,
    /// Another menu was opened for the same viewer
    Replaced,
    Disconnect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseEvent {
    pub viewer: ViewerId,
    pub reason: CloseReason,
}

/// Any event the host forwards to the framework
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Click(ClickEvent),
    Drag(DragEvent),
    Close(CloseEvent),
}

impl HostEvent {
    pub fn viewer(&self) -> ViewerId {
        match self {
            HostEvent::Click(e) => e.viewer,
            HostEvent::Drag(e) => e.viewer,
            HostEvent::Close(e) => e.viewer,
        }
    }
}

impl fmt::Display for HostEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostEvent::Click(e) => write!(f, "Click({}, {:?})", e.slot, e.kind),
            HostEvent::Drag(e) => write!(f, "Drag({:?})", e.slots),
            HostEvent::Close(e) => write!(f, "Close({:?})", e.reason),
        }
    }
}

/// What the host should do with the vanilla interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventOutcome {
    /// The host must cancel the vanilla click/drag
    pub cancelled: bool,
    /// At least one handler ran
    pub handled: bool,
}
