//! Chest layouts - the declared shape of a menu

use super::behavior::{
    ClickContext, ClickHandler, CloseContext, CloseHandler, Command, DragContext, DragHandler,
};
use super::pane::{InventoryItem, Pane, PaneId};
use super::slot::{Rows, SlotGrid, SlotPos};
use crate::error::{FrameworkError, FrameworkResult};
use std::fmt;
use std::sync::Arc;

/// A chest menu: title, height, an ordered stack of panes and the
/// menu-wide handlers.
///
/// Panes are composed in insertion order when rendering, so a pane added
/// later wins where two panes share a slot.
#[derive(Clone)]
pub struct ChestLayout {
    title: String,
    rows: Rows,
    panes: Vec<Pane>,
    cancel_clicks: bool,
    on_global_click: Option<Arc<dyn ClickHandler>>,
    on_global_drag: Option<Arc<dyn DragHandler>>,
    on_close: Option<Arc<dyn CloseHandler>>,
}

impl ChestLayout {
    pub fn new(rows: usize, title: impl Into<String>) -> FrameworkResult<Self> {
        Ok(Self {
            title: title.into(),
            rows: Rows::new(rows)?,
            panes: Vec::new(),
            cancel_clicks: false,
            on_global_click: None,
            on_global_drag: None,
            on_close: None,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn rows(&self) -> Rows {
        self.rows
    }

    /// Whether clicks start out cancelled before handlers run
    pub fn cancels_clicks(&self) -> bool {
        self.cancel_clicks
    }

    pub fn cancel_clicks(mut self, cancel: bool) -> Self {
        self.cancel_clicks = cancel;
        self
    }

    pub fn on_global_click<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut ClickContext<'_>) + Send + Sync + 'static,
    {
        self.on_global_click = Some(Arc::new(handler));
        self
    }

    pub fn on_global_drag<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut DragContext<'_>) + Send + Sync + 'static,
    {
        self.on_global_drag = Some(Arc::new(handler));
        self
    }

    pub fn on_close<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut CloseContext<'_>) + Send + Sync + 'static,
    {
        self.on_close = Some(Arc::new(handler));
        self
    }

    pub fn global_click_handler(&self) -> Option<&Arc<dyn ClickHandler>> {
        self.on_global_click.as_ref()
    }

    pub fn global_drag_handler(&self) -> Option<&Arc<dyn DragHandler>> {
        self.on_global_drag.as_ref()
    }

    pub fn close_handler(&self) -> Option<&Arc<dyn CloseHandler>> {
        self.on_close.as_ref()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Panes
    // ─────────────────────────────────────────────────────────────────────

    pub fn add_pane(&mut self, pane: Pane) -> FrameworkResult<()> {
        if self.pane(pane.id()).is_some() {
            return Err(FrameworkError::DuplicatePane(pane.id().clone()));
        }
        for pos in pane.all_positions() {
            pos.check(self.rows)?;
        }
        self.panes.push(pane);
        Ok(())
    }

    pub fn with_pane(mut self, pane: Pane) -> FrameworkResult<Self> {
        self.add_pane(pane)?;
        Ok(self)
    }

    pub fn remove_pane(&mut self, id: &PaneId) -> Option<Pane> {
        let index = self.panes.iter().position(|p| p.id() == id)?;
        Some(self.panes.remove(index))
    }

    pub fn pane(&self, id: &PaneId) -> Option<&Pane> {
        self.panes.iter().find(|p| p.id() == id)
    }

    /// Mutable access to a pane already in the layout
    ///
    /// Items added through here skip the bounds check of
    /// [`ChestLayout::add_pane`]; positions outside the grid are never
    /// rendered or clicked.
    pub fn pane_mut(&mut self, id: &PaneId) -> Option<&mut Pane> {
        self.panes.iter_mut().find(|p| p.id() == id)
    }

    pub fn panes(&self) -> &[Pane] {
        &self.panes
    }

    /// Items at `slot` in every visible pane, bottom pane first
    pub fn items_at(&self, slot: usize) -> impl Iterator<Item = &InventoryItem> {
        self.panes
            .iter()
            .filter(|p| p.is_visible())
            .filter_map(move |p| p.item_at(slot))
    }

    /// The grid this layout should currently display
    pub fn render(&self) -> SlotGrid {
        let mut grid = SlotGrid::empty(self.rows);
        for pane in self.panes.iter().filter(|p| p.is_visible()) {
            if let Some(items) = pane.items() {
                for (pos, item) in items.iter().filter(|(pos, _)| pos.fits(self.rows)) {
                    grid.set(pos.index(), Some(item.stack.clone()));
                }
            }
        }
        grid
    }

    /// Apply a pane-level command. Returns whether the layout changed.
    ///
    /// `Notify` and `Close` are not layout state and are reported as
    /// unchanged; the session handles them.
    pub fn apply(&mut self, command: &Command) -> FrameworkResult<bool> {
        let changed = match command {
            Command::NextPage(id) => self.require_pane(id)?.next_page(),
            Command::PreviousPage(id) => self.require_pane(id)?.previous_page(),
            Command::SetPage(id, page) => {
                let pane = self.require_pane(id)?;
                let before = pane.page();
                pane.set_page(*page)?;
                before != *page
            }
            Command::ShowPane(id) => Self::change_visibility(self.require_pane(id)?, true),
            Command::HidePane(id) => Self::change_visibility(self.require_pane(id)?, false),
            Command::TogglePane(id) => {
                let pane = self.require_pane(id)?;
                let visible = !pane.is_visible();
                pane.set_visible(visible);
                true
            }
            Command::UpdateItemStack { pane, pos, stack } => {
                pos.check(self.rows)?;
                self.require_pane(pane)?.update_item_stack(*pos, stack.clone())
            }
            Command::Notify(_) | Command::Close => false,
        };
        Ok(changed)
    }

    fn require_pane(&mut self, id: &PaneId) -> FrameworkResult<&mut Pane> {
        self.pane_mut(id)
            .ok_or_else(|| FrameworkError::PaneNotFound(id.clone()))
    }

    fn change_visibility(pane: &mut Pane, visible: bool) -> bool {
        let changed = pane.is_visible() != visible;
        pane.set_visible(visible);
        changed
    }
}

impl fmt::Debug for ChestLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChestLayout")
            .field("title", &self.title)
            .field("rows", &self.rows)
            .field("panes", &self.panes)
            .field("cancel_clicks", &self.cancel_clicks)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ItemStack, Material, PaneItems};

    fn item(material: &str) -> InventoryItem {
        InventoryItem::new(ItemStack::new(Material::parse(material).unwrap()))
    }

    fn layout() -> ChestLayout {
        ChestLayout::new(3, "Test")
            .unwrap()
            .with_pane(
                Pane::new("background")
                    .with_item(SlotPos::new(0, 0), item("stone"))
                    .with_item(SlotPos::new(1, 0), item("stone")),
            )
            .unwrap()
            .with_pane(Pane::new("overlay").with_item(SlotPos::new(0, 0), item("diamond")))
            .unwrap()
    }

    #[test]
    fn test_invalid_rows() {
        assert!(matches!(
            ChestLayout::new(0, "x"),
            Err(FrameworkError::InvalidRows(0))
        ));
    }

    #[test]
    fn test_render_composes_in_order() {
        let grid = layout().render();
        assert_eq!(grid.len(), 27);
        assert_eq!(grid.get(0).unwrap().material.path(), "diamond");
        assert_eq!(grid.get(1).unwrap().material.path(), "stone");
        assert!(grid.get(2).is_none());
    }

    #[test]
    fn test_hidden_pane_reveals_lower_pane() {
        let mut layout = layout();
        assert!(layout.apply(&Command::HidePane("overlay".into())).unwrap());
        assert!(!layout.apply(&Command::HidePane("overlay".into())).unwrap());

        let grid = layout.render();
        assert_eq!(grid.get(0).unwrap().material.path(), "stone");
        assert_eq!(layout.items_at(0).count(), 1);
    }

    #[test]
    fn test_duplicate_pane_rejected() {
        let mut layout = layout();
        assert!(matches!(
            layout.add_pane(Pane::new("overlay")),
            Err(FrameworkError::DuplicatePane(_))
        ));
    }

    #[test]
    fn test_out_of_bounds_pane_rejected() {
        let mut layout = ChestLayout::new(1, "Small").unwrap();
        let pane = Pane::new("big").with_item(SlotPos::new(0, 1), item("stone"));
        assert!(matches!(
            layout.add_pane(pane),
            Err(FrameworkError::SlotOutOfBounds { row: 1, rows: 1, .. })
        ));
    }

    #[test]
    fn test_column_past_the_edge_rejected() {
        let mut layout = ChestLayout::new(2, "Narrow").unwrap();
        let pane = Pane::new("wide").with_item(SlotPos::new(9, 0), item("stone"));
        assert!(matches!(
            layout.add_pane(pane),
            Err(FrameworkError::SlotOutOfBounds { column: 9, row: 0, rows: 2 })
        ));
        assert!(layout.panes().is_empty());
        assert_eq!(layout.render().occupied(), 0);
    }

    #[test]
    fn test_huge_row_rejected_without_overflow() {
        let mut layout = ChestLayout::new(6, "Tall").unwrap();
        let pane = Pane::new("far").with_item(SlotPos::new(0, usize::MAX / 2), item("stone"));
        assert!(matches!(
            layout.add_pane(pane),
            Err(FrameworkError::SlotOutOfBounds { column: 0, rows: 6, .. })
        ));
    }

    #[test]
    fn test_items_added_later_outside_grid_are_not_shown() {
        let mut layout = layout();
        let pane = layout.pane_mut(&"overlay".into()).unwrap();
        pane.add_item(SlotPos::new(9, 0), item("gold_block"));
        pane.add_item(SlotPos::new(0, 7), item("gold_block"));

        let grid = layout.render();
        assert_eq!(grid.occupied(), 2);
        assert!(grid.get(9).is_none());
        assert_eq!(layout.items_at(9).count(), 0);
    }

    #[test]
    fn test_apply_paging_and_unknown_pane() {
        let mut page_a = PaneItems::new();
        page_a.add_item(SlotPos::new(4, 1), item("apple"));
        let mut page_b = PaneItems::new();
        page_b.add_item(SlotPos::new(4, 1), item("bread"));

        let mut layout = ChestLayout::new(3, "Paged")
            .unwrap()
            .with_pane(
                Pane::paginated("food")
                    .with_page(page_a)
                    .unwrap()
                    .with_page(page_b)
                    .unwrap(),
            )
            .unwrap();

        assert!(layout.apply(&Command::NextPage("food".into())).unwrap());
        assert_eq!(layout.render().get(13).unwrap().material.path(), "bread");
        assert!(!layout.apply(&Command::NextPage("food".into())).unwrap());
        assert!(layout.apply(&Command::SetPage("food".into(), 0)).unwrap());
        assert!(matches!(
            layout.apply(&Command::NextPage("missing".into())),
            Err(FrameworkError::PaneNotFound(_))
        ));
    }

    #[test]
    fn test_remove_pane() {
        let mut layout = layout();
        assert!(layout.remove_pane(&"overlay".into()).is_some());
        assert!(layout.remove_pane(&"overlay".into()).is_none());
        assert_eq!(layout.panes().len(), 1);
    }
}
