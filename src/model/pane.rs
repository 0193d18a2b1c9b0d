//! Panes - groups of items that can be shown, hidden and paged together

use super::behavior::{ClickHandler, Command, EmitCommand};
use super::item::{ItemBuilder, ItemStack, Material};
use super::pattern::Pattern;
use super::slot::SlotPos;
use super::ClickContext;
use crate::error::{FrameworkError, FrameworkResult};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// Skin of the "previous page" head
pub const BACK_TEXTURE: &str = "bd69e06e5dadfd84e5f3d1c21063f2553b2fa945ee1d4d7152fdc5425bc12a9";
/// Skin of the "next page" head
pub const NEXT_TEXTURE: &str = "19bf3292e126a105b54eba713aa1b152d541a1d8938829c56364d178ed22bf";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PaneId(String);

impl PaneId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PaneId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for PaneId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An item placed in a pane, with an optional click handler
#[derive(Clone)]
pub struct InventoryItem {
    pub stack: ItemStack,
    pub on_click: Option<Arc<dyn ClickHandler>>,
}

impl InventoryItem {
    pub fn new(stack: ItemStack) -> Self {
        Self {
            stack,
            on_click: None,
        }
    }

    pub fn on_click<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut ClickContext<'_>) + Send + Sync + 'static,
    {
        self.on_click = Some(Arc::new(handler));
        self
    }

    pub fn with_handler(mut self, handler: Arc<dyn ClickHandler>) -> Self {
        self.on_click = Some(handler);
        self
    }

    /// Shorthand for an item whose click emits `command`
    pub fn emitting(stack: ItemStack, command: Command) -> Self {
        Self::new(stack).with_handler(Arc::new(EmitCommand(command)))
    }

    pub fn call_on_click(&self, cx: &mut ClickContext<'_>) -> bool {
        match &self.on_click {
            Some(handler) => {
                handler.on_click(cx);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for InventoryItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InventoryItem")
            .field("stack", &self.stack)
            .field("on_click", &self.on_click.is_some())
            .finish()
    }
}

/// Items of one pane page, keyed by position
///
/// Positions are stored as given. Whether they fit a chest is checked when
/// the pane joins a layout.
#[derive(Debug, Clone, Default)]
pub struct PaneItems {
    items: BTreeMap<SlotPos, InventoryItem>,
}

impl PaneItems {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_item(&mut self, pos: SlotPos, item: InventoryItem) {
        self.items.insert(pos, item);
    }

    /// Place `map[c]` on every cell of `pattern` holding `c`
    pub fn create_pattern(&mut self, map: &HashMap<char, InventoryItem>, pattern: &Pattern) {
        for (pos, key) in pattern.cells() {
            if let Some(item) = map.get(&key) {
                self.add_item(pos, item.clone());
            }
        }
    }

    /// Replace an existing item; empty slots are left alone
    pub fn update_item(&mut self, pos: SlotPos, item: InventoryItem) -> bool {
        match self.items.get_mut(&pos) {
            Some(existing) => {
                *existing = item;
                true
            }
            None => false,
        }
    }

    /// Replace the stack of an existing item, keeping its click handler
    pub fn update_item_stack(&mut self, pos: SlotPos, stack: ItemStack) -> bool {
        match self.items.get_mut(&pos) {
            Some(existing) => {
                existing.stack = stack;
                true
            }
            None => false,
        }
    }

    pub fn remove_item(&mut self, pos: SlotPos) -> Option<InventoryItem> {
        self.items.remove(&pos)
    }

    pub fn get(&self, slot: usize) -> Option<&InventoryItem> {
        self.items.get(&SlotPos::from_index(slot))
    }

    /// Items in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (SlotPos, &InventoryItem)> {
        self.items.iter().map(|(pos, item)| (*pos, item))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone)]
pub enum PaneContent {
    Static(PaneItems),
    Paginated { pages: Vec<PaneItems>, page: usize },
}

/// Back/next button description for [`Pane::add_pagination_items`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationItem {
    pub pos: SlotPos,
    pub name: String,
}

impl PaginationItem {
    pub fn new(column: usize, row: usize, name: impl Into<String>) -> Self {
        Self {
            pos: SlotPos::new(column, row),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Pane {
    id: PaneId,
    visible: bool,
    content: PaneContent,
}

impl Pane {
    pub fn new(id: impl Into<PaneId>) -> Self {
        Self {
            id: id.into(),
            visible: true,
            content: PaneContent::Static(PaneItems::new()),
        }
    }

    /// A pane showing one of several pages at a time, starting at page 0
    pub fn paginated(id: impl Into<PaneId>) -> Self {
        Self {
            id: id.into(),
            visible: true,
            content: PaneContent::Paginated {
                pages: Vec::new(),
                page: 0,
            },
        }
    }

    pub fn id(&self) -> &PaneId {
        &self.id
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn is_paginated(&self) -> bool {
        matches!(self.content, PaneContent::Paginated { .. })
    }

    /// Items currently displayed by this pane (ignoring visibility)
    pub fn items(&self) -> Option<&PaneItems> {
        match &self.content {
            PaneContent::Static(items) => Some(items),
            PaneContent::Paginated { pages, page } => pages.get(*page),
        }
    }

    /// Items of the current page, mutable. For a paginated pane without
    /// pages there is nothing to edit.
    pub fn items_mut(&mut self) -> Option<&mut PaneItems> {
        match &mut self.content {
            PaneContent::Static(items) => Some(items),
            PaneContent::Paginated { pages, page } => pages.get_mut(*page),
        }
    }

    pub fn item_at(&self, slot: usize) -> Option<&InventoryItem> {
        self.items()?.get(slot)
    }

    /// Every position this pane could ever occupy, across all pages
    pub fn all_positions(&self) -> impl Iterator<Item = SlotPos> + '_ {
        let pages: Box<dyn Iterator<Item = &PaneItems> + '_> = match &self.content {
            PaneContent::Static(items) => Box::new(std::iter::once(items)),
            PaneContent::Paginated { pages, .. } => Box::new(pages.iter()),
        };
        pages.flat_map(|p| p.iter().map(|(pos, _)| pos))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Item editing (current page for paginated panes)
    // ─────────────────────────────────────────────────────────────────────

    pub fn add_item(&mut self, pos: SlotPos, item: InventoryItem) {
        if let Some(items) = self.items_mut() {
            items.add_item(pos, item);
        }
    }

    pub fn with_item(mut self, pos: SlotPos, item: InventoryItem) -> Self {
        self.add_item(pos, item);
        self
    }

    pub fn create_pattern(&mut self, map: &HashMap<char, InventoryItem>, pattern: &Pattern) {
        if let Some(items) = self.items_mut() {
            items.create_pattern(map, pattern);
        }
    }

    pub fn update_item(&mut self, pos: SlotPos, item: InventoryItem) -> bool {
        self.items_mut()
            .map(|items| items.update_item(pos, item))
            .unwrap_or(false)
    }

    pub fn update_item_stack(&mut self, pos: SlotPos, stack: ItemStack) -> bool {
        self.items_mut()
            .map(|items| items.update_item_stack(pos, stack))
            .unwrap_or(false)
    }

    /// Add back/next heads whose clicks page `target`
    pub fn add_pagination_items(
        &mut self,
        back: Option<&PaginationItem>,
        next: Option<&PaginationItem>,
        target: &PaneId,
    ) -> FrameworkResult<()> {
        if let Some(back) = back {
            let stack = ItemBuilder::new(Material::player_head())
                .custom_texture(BACK_TEXTURE)
                .name(back.name.clone())
                .build()?;
            self.add_item(
                back.pos,
                InventoryItem::emitting(stack, Command::PreviousPage(target.clone())),
            );
        }

        if let Some(next) = next {
            let stack = ItemBuilder::new(Material::player_head())
                .custom_texture(NEXT_TEXTURE)
                .name(next.name.clone())
                .build()?;
            self.add_item(
                next.pos,
                InventoryItem::emitting(stack, Command::NextPage(target.clone())),
            );
        }

        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Pagination
    // ─────────────────────────────────────────────────────────────────────

    pub fn add_page(&mut self, page: PaneItems) -> FrameworkResult<()> {
        match &mut self.content {
            PaneContent::Paginated { pages, .. } => {
                pages.push(page);
                Ok(())
            }
            PaneContent::Static(_) => Err(FrameworkError::NotPaginated(self.id.clone())),
        }
    }

    pub fn with_page(mut self, page: PaneItems) -> FrameworkResult<Self> {
        self.add_page(page)?;
        Ok(self)
    }

    /// Current page index; static panes are always on page 0
    pub fn page(&self) -> usize {
        match &self.content {
            PaneContent::Static(_) => 0,
            PaneContent::Paginated { page, .. } => *page,
        }
    }

    pub fn page_count(&self) -> usize {
        match &self.content {
            PaneContent::Static(_) => 1,
            PaneContent::Paginated { pages, .. } => pages.len(),
        }
    }

    pub fn set_page(&mut self, target: usize) -> FrameworkResult<()> {
        match &mut self.content {
            PaneContent::Paginated { pages, page } => {
                if target >= pages.len() {
                    return Err(FrameworkError::PageOutOfBounds {
                        page: target,
                        pages: pages.len(),
                    });
                }
                *page = target;
                Ok(())
            }
            PaneContent::Static(_) => Err(FrameworkError::NotPaginated(self.id.clone())),
        }
    }

    /// Advance one page; returns whether the page changed
    pub fn next_page(&mut self) -> bool {
        match &mut self.content {
            PaneContent::Paginated { pages, page } if *page + 1 < pages.len() => {
                *page += 1;
                true
            }
            _ => false,
        }
    }

    /// Go back one page; returns whether the page changed
    pub fn previous_page(&mut self) -> bool {
        match &mut self.content {
            PaneContent::Paginated { page, .. } if *page > 0 => {
                *page -= 1;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SkullProfile;

    fn stack(material: &str) -> ItemStack {
        ItemStack::new(Material::parse(material).unwrap())
    }

    fn page_with(material: &str, column: usize) -> PaneItems {
        let mut page = PaneItems::new();
        page.add_item(SlotPos::new(column, 0), InventoryItem::new(stack(material)));
        page
    }

    #[test]
    fn test_add_and_update_item() {
        let mut pane = Pane::new("main");
        pane.add_item(SlotPos::new(1, 1), InventoryItem::new(stack("stone")));

        assert!(pane.item_at(10).is_some());
        assert!(!pane.update_item(SlotPos::new(0, 0), InventoryItem::new(stack("dirt"))));
        assert!(pane.item_at(0).is_none());
        assert!(pane.update_item(SlotPos::new(1, 1), InventoryItem::new(stack("dirt"))));
        assert_eq!(pane.item_at(10).unwrap().stack.material.path(), "dirt");
    }

    #[test]
    fn test_update_item_stack_keeps_handler() {
        let mut pane = Pane::new("main");
        pane.add_item(
            SlotPos::new(0, 0),
            InventoryItem::new(stack("stone")).on_click(|cx| cx.cancel()),
        );

        assert!(pane.update_item_stack(SlotPos::new(0, 0), stack("gold_block")));
        let item = pane.item_at(0).unwrap();
        assert_eq!(item.stack.material.path(), "gold_block");
        assert!(item.on_click.is_some());
        assert!(!pane.update_item_stack(SlotPos::new(5, 0), stack("gold_block")));
    }

    #[test]
    fn test_create_pattern() {
        let mut map = HashMap::new();
        map.insert('#', InventoryItem::new(stack("gray_stained_glass_pane")));
        map.insert('X', InventoryItem::new(stack("barrier")));
        let pattern = Pattern::new(&["###", "#X?"]).unwrap();

        let mut pane = Pane::new("border");
        pane.create_pattern(&map, &pattern);

        let items = pane.items().unwrap();
        assert_eq!(items.len(), 5);
        assert_eq!(items.get(10).unwrap().stack.material.path(), "barrier");
        assert!(items.get(11).is_none());
    }

    #[test]
    fn test_paging() {
        let mut pane = Pane::paginated("pages")
            .with_page(page_with("stone", 0))
            .unwrap()
            .with_page(page_with("dirt", 1))
            .unwrap();

        assert_eq!(pane.page(), 0);
        assert!(!pane.previous_page());
        assert!(pane.next_page());
        assert_eq!(pane.page(), 1);
        assert!(!pane.next_page());
        assert!(pane.item_at(1).is_some());
        assert!(pane.item_at(0).is_none());

        assert!(matches!(
            pane.set_page(2),
            Err(FrameworkError::PageOutOfBounds { page: 2, pages: 2 })
        ));
        pane.set_page(0).unwrap();
        assert_eq!(pane.page(), 0);

        let positions: Vec<_> = pane.all_positions().collect();
        assert_eq!(positions, vec![SlotPos::new(0, 0), SlotPos::new(1, 0)]);
    }

    #[test]
    fn test_wide_position_does_not_alias_next_row() {
        let mut pane = Pane::new("main");
        pane.add_item(SlotPos::new(9, 0), InventoryItem::new(stack("stone")));

        assert!(pane.item_at(9).is_none());
        assert_eq!(pane.all_positions().collect::<Vec<_>>(), vec![SlotPos::new(9, 0)]);
    }

    #[test]
    fn test_empty_paginated_pane_has_no_items() {
        let mut pane = Pane::paginated("empty");
        assert!(pane.items().is_none());
        assert!(!pane.next_page());
        pane.add_item(SlotPos::new(0, 0), InventoryItem::new(stack("stone")));
        assert!(pane.item_at(0).is_none());
    }

    #[test]
    fn test_static_pane_rejects_pages() {
        let mut pane = Pane::new("static");
        assert!(matches!(
            pane.add_page(PaneItems::new()),
            Err(FrameworkError::NotPaginated(_))
        ));
        assert!(pane.set_page(0).is_err());
    }

    #[test]
    fn test_pagination_items() {
        let target = PaneId::from("pages");
        let mut pane = Pane::new("controls");
        pane.add_pagination_items(
            Some(&PaginationItem::new(0, 2, "Back")),
            Some(&PaginationItem::new(8, 2, "Next")),
            &target,
        )
        .unwrap();

        let back = pane.item_at(18).unwrap();
        assert_eq!(back.stack.name.as_deref(), Some("Back"));
        assert!(back.stack.material.is_player_head());
        assert!(matches!(back.stack.profile, Some(SkullProfile::Texture { .. })));
        assert!(pane.item_at(26).is_some());
    }
}
