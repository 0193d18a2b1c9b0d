//! Tick boundary
//!
//! Menus may only be mutated on the host's tick thread. Other threads
//! (async tasks, database callbacks, timers) send work through a
//! [`UiHandle`]; the host drains it once per tick with
//! [`TickDispatcher::drain`].

use crate::error::{FrameworkError, FrameworkResult};
use crate::event::{EventOutcome, HostEvent, ViewerId};
use crate::host::HostSurface;
use crate::model::{ChestLayout, Command};
use crate::session::SessionRegistry;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use tracing::debug;

/// Work queued for the tick thread
pub enum UiMessage {
    Open {
        viewer: ViewerId,
        layout: Box<ChestLayout>,
    },
    Close(ViewerId),
    Event(HostEvent),
    Command {
        viewer: ViewerId,
        command: Command,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatcherConfig {
    /// Upper bound of messages handled per tick; the rest wait for the next one
    pub max_messages_per_tick: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            max_messages_per_tick: 256,
        }
    }
}

/// Cloneable, `Send` sender side of the tick queue
#[derive(Clone)]
pub struct UiHandle {
    sender: Sender<UiMessage>,
}

impl UiHandle {
    pub fn open(&self, viewer: ViewerId, layout: ChestLayout) -> FrameworkResult<()> {
        self.send(UiMessage::Open {
            viewer,
            layout: Box::new(layout),
        })
    }

    pub fn close(&self, viewer: ViewerId) -> FrameworkResult<()> {
        self.send(UiMessage::Close(viewer))
    }

    pub fn event(&self, event: HostEvent) -> FrameworkResult<()> {
        self.send(UiMessage::Event(event))
    }

    pub fn command(&self, viewer: ViewerId, command: Command) -> FrameworkResult<()> {
        self.send(UiMessage::Command { viewer, command })
    }

    fn send(&self, message: UiMessage) -> FrameworkResult<()> {
        self.sender
            .send(message)
            .map_err(|_| FrameworkError::DispatcherGone)
    }
}

/// Result of one [`TickDispatcher::drain`] call
#[derive(Debug, Default)]
pub struct TickReport {
    pub processed: usize,
    /// Outcome of each queued host event, in processing order
    pub outcomes: Vec<(HostEvent, Option<EventOutcome>)>,
    /// Messages left for the next tick
    pub backlog: usize,
}

/// Tick-thread side: owns the sessions and applies queued work
pub struct TickDispatcher {
    receiver: Receiver<UiMessage>,
    sender: Sender<UiMessage>,
    pending: VecDeque<UiMessage>,
    registry: SessionRegistry,
    config: DispatcherConfig,
}

impl TickDispatcher {
    pub fn new(config: DispatcherConfig) -> (Self, UiHandle) {
        let (sender, receiver) = mpsc::channel();
        let handle = UiHandle {
            sender: sender.clone(),
        };
        let dispatcher = Self {
            receiver,
            sender,
            pending: VecDeque::new(),
            registry: SessionRegistry::new(),
            config,
        };
        (dispatcher, handle)
    }

    /// Another handle onto this dispatcher's queue
    pub fn handle(&self) -> UiHandle {
        UiHandle {
            sender: self.sender.clone(),
        }
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut SessionRegistry {
        &mut self.registry
    }

    /// Handle a host event immediately, for hosts that must decide
    /// cancellation synchronously on the tick thread
    pub fn dispatch_now(&mut self, event: &HostEvent, surface: &mut dyn HostSurface) -> Option<EventOutcome> {
        self.registry.dispatch(event, surface)
    }

    /// Process queued messages in FIFO order, up to the per-tick limit
    pub fn drain(&mut self, surface: &mut dyn HostSurface) -> TickReport {
        loop {
            match self.receiver.try_recv() {
                Ok(message) => self.pending.push_back(message),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        let mut report = TickReport::default();
        while report.processed < self.config.max_messages_per_tick {
            let Some(message) = self.pending.pop_front() else {
                break;
            };
            report.processed += 1;

            match message {
                UiMessage::Open { viewer, layout } => self.registry.open(viewer, *layout, surface),
                UiMessage::Close(viewer) => {
                    self.registry.close(viewer, surface);
                }
                UiMessage::Event(event) => {
                    let outcome = self.registry.dispatch(&event, surface);
                    report.outcomes.push((event, outcome));
                }
                UiMessage::Command { viewer, command } => {
                    self.registry.apply(viewer, command, surface);
                }
            }
        }

        report.backlog = self.pending.len();
        if report.processed > 0 {
            debug!(processed = report.processed, backlog = report.backlog, "drained tick queue");
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{ClickEvent, ClickKind};
    use crate::host::RecordingSurface;
    use crate::model::{InventoryItem, ItemStack, Material, Pane, SlotPos};
    use std::thread;

    fn layout() -> ChestLayout {
        ChestLayout::new(1, "Queued")
            .unwrap()
            .with_pane(Pane::new("p").with_item(
                SlotPos::new(0, 0),
                InventoryItem::new(ItemStack::new(Material::parse("stone").unwrap()))
                    .on_click(|cx| cx.cancel()),
            ))
            .unwrap()
    }

    #[test]
    fn test_messages_apply_only_on_drain() {
        let (mut dispatcher, handle) = TickDispatcher::new(DispatcherConfig::default());
        let mut surface = RecordingSurface::new();
        let viewer = ViewerId::new_random();

        let worker = {
            let handle = handle.clone();
            thread::spawn(move || {
                handle.open(viewer, layout()).unwrap();
                handle
                    .event(HostEvent::Click(ClickEvent {
                        viewer,
                        slot: 0,
                        kind: ClickKind::Left,
                    }))
                    .unwrap();
            })
        };
        worker.join().unwrap();

        assert!(surface.screen(viewer).is_none());

        let report = dispatcher.drain(&mut surface);
        assert_eq!(report.processed, 2);
        assert_eq!(report.backlog, 0);
        assert!(surface.is_open(viewer));
        assert_eq!(report.outcomes.len(), 1);
        assert_eq!(
            report.outcomes[0].1,
            Some(EventOutcome {
                cancelled: true,
                handled: true
            })
        );
    }

    #[test]
    fn test_drain_respects_limit() {
        let (mut dispatcher, handle) = TickDispatcher::new(DispatcherConfig {
            max_messages_per_tick: 2,
        });
        let mut surface = RecordingSurface::new();
        let viewer = ViewerId::new_random();

        handle.open(viewer, layout()).unwrap();
        handle.command(viewer, Command::HidePane("p".into())).unwrap();
        handle.command(viewer, Command::ShowPane("p".into())).unwrap();
        handle.close(viewer).unwrap();

        let first = dispatcher.drain(&mut surface);
        assert_eq!(first.processed, 2);
        assert_eq!(first.backlog, 2);
        assert!(surface.slot(viewer, 0).is_none());

        let second = dispatcher.drain(&mut surface);
        assert_eq!(second.processed, 2);
        assert_eq!(second.backlog, 0);
        assert!(dispatcher.registry().is_empty());
        assert!(!surface.is_open(viewer));
    }

    #[test]
    fn test_handle_reports_dropped_dispatcher() {
        let (dispatcher, handle) = TickDispatcher::new(DispatcherConfig::default());
        drop(dispatcher);
        assert!(matches!(
            handle.close(ViewerId::new_random()),
            Err(FrameworkError::DispatcherGone)
        ));
    }
}
