//! inventory-framework - a simple inventory framework for block-game servers
//!
//! Plugin code declares chest menus as a [`model::ChestLayout`] of panes,
//! opens them per viewer through a [`session::SessionRegistry`], and the
//! [`reconcile::Reconciler`] keeps each viewer's [`host::HostSurface`] in
//! sync with the minimal number of slot writes.
//!
//! ```no_run
//! use inventory_framework::host::RecordingSurface;
//! use inventory_framework::model::{ChestLayout, InventoryItem, ItemBuilder, Material, Pane, SlotPos};
//! use inventory_framework::session::SessionRegistry;
//! use inventory_framework::event::ViewerId;
//!
//! # fn main() -> inventory_framework::FrameworkResult<()> {
//! let button = ItemBuilder::new(Material::parse("emerald")?).name("Buy").glow().build()?;
//! let layout = ChestLayout::new(3, "Shop")?
//!     .cancel_clicks(true)
//!     .with_pane(Pane::new("main").with_item(
//!         SlotPos::new(4, 1),
//!         InventoryItem::new(button).on_click(|cx| cx.cancel()),
//!     ))?;
//!
//! let mut surface = RecordingSurface::new();
//! let mut registry = SessionRegistry::new();
//! registry.open(ViewerId::new_random(), layout, &mut surface);
//! # Ok(())
//! # }
//! ```

pub mod dispatch;
pub mod error;
pub mod event;
pub mod host;
pub mod menu;
pub mod model;
pub mod reconcile;
pub mod session;

pub use error::{FrameworkError, FrameworkResult};
