//! Per-viewer session arena

use super::controller::Session;
use crate::event::{CloseEvent, CloseReason, EventOutcome, HostEvent, ViewerId};
use crate::host::HostSurface;
use crate::model::{ChestLayout, Command};
use std::collections::HashMap;
use tracing::debug;

/// Open sessions keyed by viewer; at most one menu per viewer
#[derive(Default)]
pub struct SessionRegistry {
    sessions: HashMap<ViewerId, Session>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a menu for `viewer`, closing the one they had open first
    pub fn open(&mut self, viewer: ViewerId, layout: ChestLayout, surface: &mut dyn HostSurface) {
        self.finish(viewer, CloseReason::Replaced, surface);
        let session = Session::open(viewer, layout, surface);
        self.sessions.insert(viewer, session);
    }

    /// Route a host event to the viewer's session.
    ///
    /// Returns `None` when the viewer has no menu open, in which case the
    /// host should let the event through untouched.
    pub fn dispatch(&mut self, event: &HostEvent, surface: &mut dyn HostSurface) -> Option<EventOutcome> {
        let viewer = event.viewer();

        let outcome = match event {
            HostEvent::Close(close) => {
                let mut session = self.sessions.remove(&viewer)?;
                return Some(session.handle_close(close, surface));
            }
            HostEvent::Click(click) => self.sessions.get_mut(&viewer)?.handle_click(click, surface),
            HostEvent::Drag(drag) => self.sessions.get_mut(&viewer)?.handle_drag(drag, surface),
        };

        self.close_if_requested(viewer, surface);
        Some(outcome)
    }

    /// Apply a command to a viewer's session from outside a handler
    pub fn apply(&mut self, viewer: ViewerId, command: Command, surface: &mut dyn HostSurface) -> bool {
        let Some(session) = self.sessions.get_mut(&viewer) else {
            debug!(viewer = %viewer, command = %command, "no session for command");
            return false;
        };
        let changed = session.apply(command, surface);
        self.close_if_requested(viewer, surface);
        changed
    }

    /// Close a viewer's menu from plugin code. Returns whether one was open.
    pub fn close(&mut self, viewer: ViewerId, surface: &mut dyn HostSurface) -> bool {
        self.finish(viewer, CloseReason::Plugin, surface)
    }

    pub fn close_all(&mut self, surface: &mut dyn HostSurface) {
        let viewers: Vec<_> = self.sessions.keys().copied().collect();
        for viewer in viewers {
            self.finish(viewer, CloseReason::Plugin, surface);
        }
    }

    pub fn get(&self, viewer: ViewerId) -> Option<&Session> {
        self.sessions.get(&viewer)
    }

    pub fn get_mut(&mut self, viewer: ViewerId) -> Option<&mut Session> {
        self.sessions.get_mut(&viewer)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn viewers(&self) -> impl Iterator<Item = ViewerId> + '_ {
        self.sessions.keys().copied()
    }

    fn close_if_requested(&mut self, viewer: ViewerId, surface: &mut dyn HostSurface) {
        if self.sessions.get(&viewer).is_some_and(Session::close_requested) {
            self.finish(viewer, CloseReason::Plugin, surface);
        }
    }

    // The session leaves the arena before its close handler runs, so a
    // handler can never observe its own menu as still open.
    fn finish(&mut self, viewer: ViewerId, reason: CloseReason, surface: &mut dyn HostSurface) -> bool {
        match self.sessions.remove(&viewer) {
            Some(mut session) => {
                session.handle_close(&CloseEvent { viewer, reason }, surface);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{ClickEvent, ClickKind, DragEvent};
    use crate::host::RecordingSurface;
    use crate::model::{InventoryItem, ItemStack, Material, Pane, SlotPos};
    use std::sync::{Arc, Mutex};

    fn layout(title: &str, closes: Arc<Mutex<Vec<CloseReason>>>) -> ChestLayout {
        ChestLayout::new(1, title)
            .unwrap()
            .on_close(move |cx| closes.lock().unwrap().push(cx.event().reason))
            .with_pane(Pane::new("p").with_item(
                SlotPos::new(0, 0),
                InventoryItem::emitting(
                    ItemStack::new(Material::parse("barrier").unwrap()),
                    Command::Close,
                ),
            ))
            .unwrap()
    }

    fn click(viewer: ViewerId, slot: usize) -> HostEvent {
        HostEvent::Click(ClickEvent {
            viewer,
            slot,
            kind: ClickKind::Left,
        })
    }

    #[test]
    fn test_events_for_unknown_viewer_pass_through() {
        let mut registry = SessionRegistry::new();
        let mut surface = RecordingSurface::new();
        assert!(registry
            .dispatch(&click(ViewerId::new_random(), 0), &mut surface)
            .is_none());
    }

    #[test]
    fn test_sessions_are_isolated_per_viewer() {
        let closes = Arc::new(Mutex::new(Vec::new()));
        let (alice, bob) = (ViewerId::new_random(), ViewerId::new_random());
        let mut registry = SessionRegistry::new();
        let mut surface = RecordingSurface::new();

        registry.open(alice, layout("A", closes.clone()), &mut surface);
        registry.open(bob, layout("B", closes.clone()), &mut surface);
        assert_eq!(registry.len(), 2);

        registry
            .get_mut(alice)
            .unwrap()
            .apply(Command::HidePane("p".into()), &mut surface);

        assert!(surface.slot(alice, 0).is_none());
        assert!(surface.slot(bob, 0).is_some());
    }

    #[test]
    fn test_reopen_replaces_previous_session() {
        let closes = Arc::new(Mutex::new(Vec::new()));
        let viewer = ViewerId::new_random();
        let mut registry = SessionRegistry::new();
        let mut surface = RecordingSurface::new();

        registry.open(viewer, layout("First", closes.clone()), &mut surface);
        registry.open(viewer, layout("Second", closes.clone()), &mut surface);

        assert_eq!(registry.len(), 1);
        assert_eq!(*closes.lock().unwrap(), vec![CloseReason::Replaced]);
        assert_eq!(surface.screen(viewer).unwrap().title, "Second");
        assert!(surface.is_open(viewer));
    }

    #[test]
    fn test_close_command_finishes_session() {
        let closes = Arc::new(Mutex::new(Vec::new()));
        let viewer = ViewerId::new_random();
        let mut registry = SessionRegistry::new();
        let mut surface = RecordingSurface::new();

        registry.open(viewer, layout("Menu", closes.clone()), &mut surface);
        let outcome = registry.dispatch(&click(viewer, 0), &mut surface).unwrap();

        assert!(outcome.handled);
        assert!(registry.is_empty());
        assert!(!surface.is_open(viewer));
        assert_eq!(*closes.lock().unwrap(), vec![CloseReason::Plugin]);
    }

    #[test]
    fn test_player_close_and_drag() {
        let closes = Arc::new(Mutex::new(Vec::new()));
        let viewer = ViewerId::new_random();
        let mut registry = SessionRegistry::new();
        let mut surface = RecordingSurface::new();

        registry.open(viewer, layout("Menu", closes.clone()), &mut surface);

        let drag = HostEvent::Drag(DragEvent {
            viewer,
            slots: vec![1, 2],
        });
        assert_eq!(
            registry.dispatch(&drag, &mut surface),
            Some(EventOutcome::default())
        );

        let close = HostEvent::Close(CloseEvent {
            viewer,
            reason: CloseReason::Player,
        });
        assert!(registry.dispatch(&close, &mut surface).unwrap().handled);
        assert!(registry.dispatch(&close, &mut surface).is_none());
        assert_eq!(*closes.lock().unwrap(), vec![CloseReason::Player]);
    }

    #[test]
    fn test_close_all() {
        let closes = Arc::new(Mutex::new(Vec::new()));
        let mut registry = SessionRegistry::new();
        let mut surface = RecordingSurface::new();
        for _ in 0..3 {
            registry.open(ViewerId::new_random(), layout("M", closes.clone()), &mut surface);
        }

        registry.close_all(&mut surface);
        assert!(registry.is_empty());
        assert_eq!(closes.lock().unwrap().len(), 3);
        assert!(!registry.close(ViewerId::new_random(), &mut surface));
    }
}
