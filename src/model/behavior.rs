//! Click, drag and close behaviours
//!
//! Handlers never touch the layout directly. They receive a context that
//! exposes the triggering event and collects [`Command`]s, which the
//! session applies once every handler for the event has run.

use super::item::ItemStack;
use super::pane::PaneId;
use super::slot::SlotPos;
use crate::event::{ClickEvent, ClickKind, CloseEvent, DragEvent, ViewerId};
use std::fmt;

/// A state change requested by a handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    NextPage(PaneId),
    PreviousPage(PaneId),
    SetPage(PaneId, usize),
    ShowPane(PaneId),
    HidePane(PaneId),
    TogglePane(PaneId),
    /// Swap the displayed stack of an occupied slot, keeping its handler
    UpdateItemStack {
        pane: PaneId,
        pos: SlotPos,
        stack: ItemStack,
    },
    /// Message for the viewer, delivered through the host surface
    Notify(String),
    Close,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::NextPage(p) => write!(f, "NextPage({})", p),
            Command::PreviousPage(p) => write!(f, "PreviousPage({})", p),
            Command::SetPage(p, n) => write!(f, "SetPage({}, {})", p, n),
            Command::ShowPane(p) => write!(f, "ShowPane({})", p),
            Command::HidePane(p) => write!(f, "HidePane({})", p),
            Command::TogglePane(p) => write!(f, "TogglePane({})", p),
            Command::UpdateItemStack { pane, pos, .. } => {
                write!(f, "UpdateItemStack({}, {})", pane, pos)
            }
            Command::Notify(msg) => write!(f, "Notify({})", msg),
            Command::Close => write!(f, "Close"),
        }
    }
}

/// What a handler can see and do while reacting to an event
pub struct HandlerContext<'a, E> {
    event: &'a E,
    viewer: ViewerId,
    cancelled: bool,
    commands: Vec<Command>,
}

pub type ClickContext<'a> = HandlerContext<'a, ClickEvent>;
pub type DragContext<'a> = HandlerContext<'a, DragEvent>;
pub type CloseContext<'a> = HandlerContext<'a, CloseEvent>;

impl<'a, E> HandlerContext<'a, E> {
    pub(crate) fn new(event: &'a E, viewer: ViewerId, cancelled: bool) -> Self {
        Self {
            event,
            viewer,
            cancelled,
            commands: Vec::new(),
        }
    }

    pub fn event(&self) -> &E {
        self.event
    }

    pub fn viewer(&self) -> ViewerId {
        self.viewer
    }

    /// Ask the host to cancel the vanilla interaction
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn emit(&mut self, command: Command) {
        self.commands.push(command);
    }

    pub(crate) fn into_parts(self) -> (bool, Vec<Command>) {
        (self.cancelled, self.commands)
    }
}

impl ClickContext<'_> {
    pub fn slot(&self) -> usize {
        self.event.slot
    }

    pub fn kind(&self) -> ClickKind {
        self.event.kind
    }
}

pub trait ClickHandler: Send + Sync {
    fn on_click(&self, cx: &mut ClickContext<'_>);
}

pub trait DragHandler: Send + Sync {
    fn on_drag(&self, cx: &mut DragContext<'_>);
}

pub trait CloseHandler: Send + Sync {
    fn on_close(&self, cx: &mut CloseContext<'_>);
}

impl<F> ClickHandler for F
where
    F: Fn(&mut ClickContext<'_>) + Send + Sync,
{
    fn on_click(&self, cx: &mut ClickContext<'_>) {
        self(cx)
    }
}

impl<F> DragHandler for F
where
    F: Fn(&mut DragContext<'_>) + Send + Sync,
{
    fn on_drag(&self, cx: &mut DragContext<'_>) {
        self(cx)
    }
}

impl<F> CloseHandler for F
where
    F: Fn(&mut CloseContext<'_>) + Send + Sync,
{
    fn on_close(&self, cx: &mut CloseContext<'_>) {
        self(cx)
    }
}

/// Click handler that emits a fixed command
#[derive(Debug, Clone)]
pub struct EmitCommand(pub Command);

impl ClickHandler for EmitCommand {
    fn on_click(&self, cx: &mut ClickContext<'_>) {
        cx.emit(self.0.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn click() -> ClickEvent {
        ClickEvent {
            viewer: ViewerId(uuid::Uuid::nil()),
            slot: 4,
            kind: ClickKind::Left,
        }
    }

    #[test]
    fn test_context_collects_commands_in_order() {
        let event = click();
        let mut cx = ClickContext::new(&event, event.viewer, false);
        cx.emit(Command::Close);
        cx.emit(Command::Notify("hi".into()));
        cx.cancel();

        let (cancelled, commands) = cx.into_parts();
        assert!(cancelled);
        assert_eq!(commands, vec![Command::Close, Command::Notify("hi".into())]);
    }

    #[test]
    fn test_closure_and_emit_handlers() {
        let event = click();
        let mut cx = ClickContext::new(&event, event.viewer, false);

        let closure = |cx: &mut ClickContext<'_>| {
            if cx.slot() == 4 {
                cx.cancel();
            }
        };
        closure.on_click(&mut cx);
        EmitCommand(Command::NextPage(PaneId::from("shop"))).on_click(&mut cx);

        assert!(cx.is_cancelled());
        let (_, commands) = cx.into_parts();
        assert_eq!(commands, vec![Command::NextPage(PaneId::from("shop"))]);
    }
}
