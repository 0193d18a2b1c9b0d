//! One open menu bound to one viewer

use crate::event::{ClickEvent, CloseEvent, CloseReason, DragEvent, EventOutcome, ViewerId};
use crate::host::HostSurface;
use crate::model::{ChestLayout, ClickContext, CloseContext, Command, DragContext};
use crate::reconcile::Reconciler;
use tracing::{debug, info, warn};

/// A viewer's open menu
///
/// The session owns its copy of the layout, so paging or hiding panes in
/// one viewer's menu never affects another viewer looking at the same
/// declared layout.
pub struct Session {
    viewer: ViewerId,
    layout: ChestLayout,
    reconciler: Reconciler,
    close_requested: bool,
}

impl Session {
    /// Open `layout` for `viewer` and render it in full
    pub fn open(viewer: ViewerId, layout: ChestLayout, surface: &mut dyn HostSurface) -> Self {
        surface.open(viewer, layout.title(), layout.rows());
        info!(viewer = %viewer, title = layout.title(), rows = layout.rows().get(), "opened menu");

        let mut session = Self {
            viewer,
            layout,
            reconciler: Reconciler::new(),
            close_requested: false,
        };
        session.refresh(surface);
        session
    }

    pub fn viewer(&self) -> ViewerId {
        self.viewer
    }

    pub fn layout(&self) -> &ChestLayout {
        &self.layout
    }

    /// Direct access to the layout; call [`Session::refresh`] afterwards.
    /// Items placed outside the grid this way are never shown.
    pub fn layout_mut(&mut self) -> &mut ChestLayout {
        &mut self.layout
    }

    /// A handler asked for the menu to be closed
    pub fn close_requested(&self) -> bool {
        self.close_requested
    }

    /// Push the current layout to the surface
    pub fn refresh(&mut self, surface: &mut dyn HostSurface) -> usize {
        self.reconciler
            .sync(self.viewer, self.layout.render(), surface)
    }

    /// Repaint every slot, e.g. after the host lost the chest contents
    pub fn repaint(&mut self, surface: &mut dyn HostSurface) -> usize {
        self.reconciler.invalidate();
        self.refresh(surface)
    }

    pub fn handle_click(&mut self, event: &ClickEvent, surface: &mut dyn HostSurface) -> EventOutcome {
        let mut cx = ClickContext::new(event, self.viewer, self.layout.cancels_clicks());
        let mut handled = false;

        if let Some(handler) = self.layout.global_click_handler() {
            handler.on_click(&mut cx);
            handled = true;
        }

        // Clicks in the viewer's own inventory only reach the global handler.
        if event.slot < self.layout.rows().slot_count() {
            for item in self.layout.items_at(event.slot) {
                handled |= item.call_on_click(&mut cx);
            }
        }

        let (cancelled, commands) = cx.into_parts();
        debug!(viewer = %self.viewer, slot = event.slot, kind = ?event.kind, commands = commands.len(), "click");
        self.apply_all(commands, surface);

        EventOutcome { cancelled, handled }
    }

    pub fn handle_drag(&mut self, event: &DragEvent, surface: &mut dyn HostSurface) -> EventOutcome {
        let mut cx = DragContext::new(event, self.viewer, self.layout.cancels_clicks());
        let mut handled = false;

        if let Some(handler) = self.layout.global_drag_handler() {
            handler.on_drag(&mut cx);
            handled = true;
        }

        let (cancelled, commands) = cx.into_parts();
        self.apply_all(commands, surface);

        EventOutcome { cancelled, handled }
    }

    /// Run the close handler. The session must not be used afterwards.
    pub fn handle_close(&mut self, event: &CloseEvent, surface: &mut dyn HostSurface) -> EventOutcome {
        let mut cx = CloseContext::new(event, self.viewer, false);
        let mut handled = false;

        if let Some(handler) = self.layout.close_handler() {
            handler.on_close(&mut cx);
            handled = true;
        }

        let (_, commands) = cx.into_parts();
        for command in commands {
            match command {
                Command::Notify(message) => surface.notify(self.viewer, &message),
                other => debug!(viewer = %self.viewer, command = %other, "ignored command from close handler"),
            }
        }

        // The host already tore the chest down when the player closed it.
        if matches!(event.reason, CloseReason::Plugin | CloseReason::Replaced) {
            surface.close(self.viewer);
        }

        info!(viewer = %self.viewer, reason = ?event.reason, "closed menu");
        EventOutcome {
            cancelled: false,
            handled,
        }
    }

    /// Apply one command and re-render. Returns whether the layout changed.
    pub fn apply(&mut self, command: Command, surface: &mut dyn HostSurface) -> bool {
        let changed = self.apply_one(command, surface);
        if changed && !self.close_requested {
            self.refresh(surface);
        }
        changed
    }

    fn apply_all(&mut self, commands: Vec<Command>, surface: &mut dyn HostSurface) {
        let mut changed = false;
        for command in commands {
            changed |= self.apply_one(command, surface);
        }
        if changed && !self.close_requested {
            self.refresh(surface);
        }
    }

    fn apply_one(&mut self, command: Command, surface: &mut dyn HostSurface) -> bool {
        match command {
            Command::Notify(message) => {
                surface.notify(self.viewer, &message);
                false
            }
            Command::Close => {
                self.close_requested = true;
                false
            }
            command => match self.layout.apply(&command) {
                Ok(changed) => changed,
                Err(e) => {
                    warn!(viewer = %self.viewer, command = %command, error = %e, "ignored command");
                    false
                }
            },
        }
    }
}
