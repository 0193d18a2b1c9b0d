//! Host surface - the game server side of an open menu
//!
//! The framework never talks to a game server directly. Whatever hosts
//! the menus (a server plugin bridge, the terminal playground, a test)
//! implements [`HostSurface`], and all rendering goes through it.

use crate::event::ViewerId;
use crate::model::{ItemStack, Rows, SlotGrid};
use std::collections::HashMap;

/// The container UI a viewer sees
///
/// All calls happen on the host's tick thread.
pub trait HostSurface {
    /// Show an empty chest of `rows` rows titled `title` to `viewer`
    fn open(&mut self, viewer: ViewerId, title: &str, rows: Rows);

    /// Set (or clear, with `None`) one slot of the viewer's open chest
    fn set_slot(&mut self, viewer: ViewerId, slot: usize, item: Option<&ItemStack>);

    /// Close the viewer's chest
    fn close(&mut self, viewer: ViewerId);

    /// Show a short message to the viewer
    fn notify(&mut self, viewer: ViewerId, message: &str) {
        let _ = (viewer, message);
    }
}

/// What a [`RecordingSurface`] knows about one viewer
#[derive(Debug, Clone, Default)]
pub struct ViewerScreen {
    pub title: String,
    pub grid: SlotGrid,
    pub open: bool,
    pub notifications: Vec<String>,
    /// Total `set_slot` calls since the chest was opened
    pub slot_writes: usize,
}

/// In-memory surface that keeps the last state shown to every viewer
#[derive(Debug, Default)]
pub struct RecordingSurface {
    screens: HashMap<ViewerId, ViewerScreen>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self, viewer: ViewerId) -> Option<&ViewerScreen> {
        self.screens.get(&viewer)
    }

    pub fn is_open(&self, viewer: ViewerId) -> bool {
        self.screens.get(&viewer).is_some_and(|s| s.open)
    }

    pub fn slot(&self, viewer: ViewerId, slot: usize) -> Option<&ItemStack> {
        self.screens.get(&viewer)?.grid.get(slot)
    }

    /// Drain pending notifications for a viewer
    pub fn take_notifications(&mut self, viewer: ViewerId) -> Vec<String> {
        self.screens
            .get_mut(&viewer)
            .map(|s| std::mem::take(&mut s.notifications))
            .unwrap_or_default()
    }
}

impl HostSurface for RecordingSurface {
    fn open(&mut self, viewer: ViewerId, title: &str, rows: Rows) {
        let screen = self.screens.entry(viewer).or_default();
        screen.title = title.to_string();
        screen.grid = SlotGrid::empty(rows);
        screen.open = true;
        screen.slot_writes = 0;
    }

    fn set_slot(&mut self, viewer: ViewerId, slot: usize, item: Option<&ItemStack>) {
        if let Some(screen) = self.screens.get_mut(&viewer) {
            screen.grid.set(slot, item.cloned());
            screen.slot_writes += 1;
        }
    }

    fn close(&mut self, viewer: ViewerId) {
        if let Some(screen) = self.screens.get_mut(&viewer) {
            screen.open = false;
        }
    }

    fn notify(&mut self, viewer: ViewerId, message: &str) {
        self.screens
            .entry(viewer)
            .or_default()
            .notifications
            .push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Material;

    #[test]
    fn test_recording_surface_tracks_slots() {
        let viewer = ViewerId::new_random();
        let mut surface = RecordingSurface::new();
        let stone = ItemStack::new(Material::parse("stone").unwrap());

        surface.set_slot(viewer, 0, Some(&stone));
        assert!(surface.screen(viewer).is_none());

        surface.open(viewer, "Menu", Rows::new(2).unwrap());
        surface.set_slot(viewer, 3, Some(&stone));
        assert!(surface.is_open(viewer));
        assert_eq!(surface.slot(viewer, 3), Some(&stone));
        assert_eq!(surface.screen(viewer).unwrap().slot_writes, 1);

        surface.notify(viewer, "hello");
        assert_eq!(surface.take_notifications(viewer), vec!["hello".to_string()]);
        assert!(surface.take_notifications(viewer).is_empty());

        surface.close(viewer);
        assert!(!surface.is_open(viewer));
    }
}
