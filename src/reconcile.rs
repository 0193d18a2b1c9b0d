//! Update reconciler
//!
//! Keeps the last grid pushed to the host and, on every change, sends only
//! the slots that differ.

use crate::event::ViewerId;
use crate::host::HostSurface;
use crate::model::{ItemStack, SlotGrid};
use tracing::debug;

/// One slot write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotMutation {
    pub slot: usize,
    pub item: Option<ItemStack>,
}

/// Slot writes turning `previous` into `desired`, in ascending slot order
pub fn diff(previous: &SlotGrid, desired: &SlotGrid) -> Vec<SlotMutation> {
    let len = previous.len().max(desired.len());
    (0..len)
        .filter_map(|slot| {
            let before = previous.get(slot);
            let after = desired.get(slot);
            (before != after).then(|| SlotMutation {
                slot,
                item: after.cloned(),
            })
        })
        .collect()
}

/// Apply mutations to a grid, growing it when a mutation is past the end
pub fn apply(grid: &mut SlotGrid, mutations: &[SlotMutation]) {
    for mutation in mutations {
        if mutation.slot >= grid.len() {
            let mut grown = SlotGrid::with_len(mutation.slot + 1);
            for (slot, item) in grid.iter() {
                grown.set(slot, item.cloned());
            }
            *grid = grown;
        }
        grid.set(mutation.slot, mutation.item.clone());
    }
}

/// Rendered-state tracker for one open surface
#[derive(Debug, Default)]
pub struct Reconciler {
    rendered: Option<SlotGrid>,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last grid pushed to the host, if any
    pub fn rendered(&self) -> Option<&SlotGrid> {
        self.rendered.as_ref()
    }

    /// Forget what was rendered; the next sync writes every slot
    pub fn invalidate(&mut self) {
        self.rendered = None;
    }

    /// Push the difference between the rendered and desired grids.
    /// Returns the number of slot writes.
    pub fn sync(
        &mut self,
        viewer: ViewerId,
        desired: SlotGrid,
        surface: &mut dyn HostSurface,
    ) -> usize {
        let mutations = match &self.rendered {
            Some(previous) => diff(previous, &desired),
            // Nothing known about the host state: write every slot.
            None => desired
                .iter()
                .map(|(slot, item)| SlotMutation {
                    slot,
                    item: item.cloned(),
                })
                .collect(),
        };

        for mutation in &mutations {
            surface.set_slot(viewer, mutation.slot, mutation.item.as_ref());
        }

        debug!(viewer = %viewer, writes = mutations.len(), "reconciled surface");
        self.rendered = Some(desired);
        mutations.len()
    }
}
