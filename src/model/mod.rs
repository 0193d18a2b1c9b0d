//! Layout model - everything a plugin author declares
//!
//! This module contains the menu building blocks:
//! - `ItemStack` / `ItemBuilder` - what a slot displays
//! - `Pattern` - character maps for placing items
//! - `Pane` - groups of items, optionally paginated
//! - `ChestLayout` - the full menu with its global handlers

pub mod behavior;
pub mod item;
pub mod layout;
pub mod pane;
pub mod pattern;
pub mod slot;

// Re-export commonly used types
pub use behavior::{
    ClickContext, ClickHandler, CloseContext, CloseHandler, Command, DragContext, DragHandler,
    EmitCommand, HandlerContext,
};
pub use item::{ItemBuilder, ItemStack, Material, SkullProfile, PROFILE_COMPONENT};
pub use layout::ChestLayout;
pub use pane::{InventoryItem, PaginationItem, Pane, PaneId, PaneItems, BACK_TEXTURE, NEXT_TEXTURE};
pub use pattern::Pattern;
pub use slot::{Rows, SlotGrid, SlotPos, COLUMNS, MAX_ROWS};
