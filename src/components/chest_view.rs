//! Chest view component
//!
//! Draws the viewer's open chest as a grid of cells and maps keys and
//! mouse clicks back to slot clicks.

use crate::action::{Action, Direction};
use crate::component::Component;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use inventory_framework::event::ClickKind;
use inventory_framework::host::ViewerScreen;
use inventory_framework::model::{ItemStack, COLUMNS};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const CELL_HEIGHT: u16 = 3;
const MAX_CELL_WIDTH: u16 = 14;
const MIN_CELL_WIDTH: u16 = 4;

/// Grid of chest cells with a keyboard cursor
pub struct ChestView {
    /// Last screen the host surface showed for our viewer
    screen: Option<ViewerScreen>,
    cursor_column: usize,
    cursor_row: usize,
    /// Where the cells were drawn last frame, for mouse hit-testing
    grid_area: Rect,
    cell_width: u16,
}

impl Default for ChestView {
    fn default() -> Self {
        Self::new()
    }
}

impl ChestView {
    pub fn new() -> Self {
        Self {
            screen: None,
            cursor_column: 0,
            cursor_row: 0,
            grid_area: Rect::default(),
            cell_width: MAX_CELL_WIDTH,
        }
    }

    pub fn set_screen(&mut self, screen: Option<ViewerScreen>) {
        self.screen = screen;
        let rows = self.rows();
        if rows > 0 && self.cursor_row >= rows {
            self.cursor_row = rows - 1;
        }
    }

    pub fn is_open(&self) -> bool {
        self.screen.as_ref().is_some_and(|s| s.open)
    }

    pub fn rows(&self) -> usize {
        self.screen
            .as_ref()
            .map(|s| s.grid.len() / COLUMNS)
            .unwrap_or(0)
    }

    pub fn cursor_slot(&self) -> usize {
        self.cursor_column + self.cursor_row * COLUMNS
    }

    /// Slots of the cursor row, for drag simulation
    pub fn cursor_row_slots(&self) -> Vec<usize> {
        let start = self.cursor_row * COLUMNS;
        (start..start + COLUMNS).collect()
    }

    pub fn move_cursor(&mut self, direction: Direction) {
        let rows = self.rows().max(1);
        match direction {
            Direction::Up => self.cursor_row = self.cursor_row.saturating_sub(1),
            Direction::Down => self.cursor_row = (self.cursor_row + 1).min(rows - 1),
            Direction::Left => self.cursor_column = self.cursor_column.saturating_sub(1),
            Direction::Right => self.cursor_column = (self.cursor_column + 1).min(COLUMNS - 1),
        }
    }

    /// Slot under a terminal position, if it is inside the drawn grid
    pub fn slot_at(&self, x: u16, y: u16) -> Option<usize> {
        let area = self.grid_area;
        if x < area.x || y < area.y || x >= area.x + area.width || y >= area.y + area.height {
            return None;
        }
        let column = ((x - area.x) / self.cell_width) as usize;
        let row = ((y - area.y) / CELL_HEIGHT) as usize;
        (column < COLUMNS && row < self.rows()).then(|| column + row * COLUMNS)
    }

    fn item_style(item: &ItemStack) -> Style {
        let path = item.material.path();
        let color = if item.material.is_player_head() {
            Color::Cyan
        } else if path.ends_with("glass_pane") {
            Color::DarkGray
        } else if path == "barrier" {
            Color::Red
        } else {
            Color::White
        };
        let style = Style::default().fg(color);
        if item.glint {
            style.fg(Color::Magenta).add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }

    fn cell_label(item: &ItemStack, width: usize) -> String {
        let name = item.display_name().trim();
        if item.amount > 1 {
            let suffix = format!(" x{}", item.amount);
            let room = width.saturating_sub(suffix.width());
            format!("{}{}", fit_width(name, room), suffix)
        } else {
            fit_width(name, width)
        }
    }
}

/// Truncate `text` to at most `max` terminal columns, marking the cut with `…`
pub fn fit_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

impl Component for ChestView {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveCursor(Direction::Up)),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveCursor(Direction::Down)),
            KeyCode::Left | KeyCode::Char('h') => Some(Action::MoveCursor(Direction::Left)),
            KeyCode::Right | KeyCode::Char('l') => Some(Action::MoveCursor(Direction::Right)),
            KeyCode::Enter if key.modifiers.contains(KeyModifiers::SHIFT) => {
                Some(Action::ClickCursor(ClickKind::ShiftLeft))
            }
            KeyCode::Enter | KeyCode::Char(' ') => Some(Action::ClickCursor(ClickKind::Left)),
            KeyCode::Char('r') => Some(Action::ClickCursor(ClickKind::Right)),
            KeyCode::Char('s') => Some(Action::ClickCursor(ClickKind::ShiftLeft)),
            KeyCode::Char('m') => Some(Action::ClickCursor(ClickKind::Middle)),
            KeyCode::Char('d') => Some(Action::ClickCursor(ClickKind::Drop)),
            KeyCode::Char(c @ '1'..='9') => {
                let hotbar = c as u8 - b'1';
                Some(Action::ClickCursor(ClickKind::NumberKey(hotbar)))
            }
            KeyCode::Char('g') => Some(Action::DragRow),
            _ => None,
        };
        Ok(action)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        let kind = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if mouse.modifiers.contains(KeyModifiers::SHIFT) => {
                ClickKind::ShiftLeft
            }
            MouseEventKind::Down(MouseButton::Left) => ClickKind::Left,
            MouseEventKind::Down(MouseButton::Right) => ClickKind::Right,
            MouseEventKind::Down(MouseButton::Middle) => ClickKind::Middle,
            _ => return Ok(None),
        };

        Ok(self.slot_at(mouse.column, mouse.row).map(|slot| {
            self.cursor_column = slot % COLUMNS;
            self.cursor_row = slot / COLUMNS;
            Action::ClickSlot(slot, kind)
        }))
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        if let Action::MoveCursor(direction) = action {
            self.move_cursor(direction);
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let Some(screen) = self.screen.as_ref().filter(|s| s.open) else {
            let paragraph = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    "No menu open",
                    Style::default().fg(Color::DarkGray),
                )),
                Line::from(Span::styled(
                    "Press o to open it again",
                    Style::default().fg(Color::DarkGray),
                )),
            ])
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
            frame.render_widget(paragraph, area);
            self.grid_area = Rect::default();
            return Ok(());
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(format!(" {} ", screen.title))
            .title_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = screen.grid.len() / COLUMNS;
        self.cell_width = (inner.width / COLUMNS as u16).clamp(MIN_CELL_WIDTH, MAX_CELL_WIDTH);
        self.grid_area = Rect::new(
            inner.x,
            inner.y,
            (self.cell_width * COLUMNS as u16).min(inner.width),
            (CELL_HEIGHT * rows as u16).min(inner.height),
        );

        for (slot, item) in screen.grid.iter() {
            let column = (slot % COLUMNS) as u16;
            let row = (slot / COLUMNS) as u16;
            let cell = Rect::new(
                inner.x + column * self.cell_width,
                inner.y + row * CELL_HEIGHT,
                self.cell_width,
                CELL_HEIGHT,
            );
            if cell.right() > inner.right() || cell.bottom() > inner.bottom() {
                continue;
            }

            let selected = slot == self.cursor_slot();
            let border_style = if selected {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };

            let label_width = self.cell_width.saturating_sub(2) as usize;
            let line = match item {
                Some(item) => Line::from(Span::styled(
                    Self::cell_label(item, label_width),
                    Self::item_style(item),
                )),
                None => Line::from(""),
            };

            let paragraph = Paragraph::new(line)
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).border_style(border_style));
            frame.render_widget(paragraph, cell);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inventory_framework::model::{Material, Rows, SlotGrid};

    fn screen(rows: usize) -> ViewerScreen {
        ViewerScreen {
            title: "Test".to_string(),
            grid: SlotGrid::empty(Rows::new(rows).unwrap()),
            open: true,
            notifications: Vec::new(),
            slot_writes: 0,
        }
    }

    #[test]
    fn test_fit_width() {
        assert_eq!(fit_width("Apple", 10), "Apple");
        assert_eq!(fit_width("Golden Apple", 6), "Golde…");
        assert_eq!(fit_width("剣の盾", 4), "剣…");
        assert_eq!(fit_width("x", 0), "");
    }

    #[test]
    fn test_cell_label_keeps_amount() {
        let mut item = ItemStack::new(Material::parse("bread").unwrap());
        item.amount = 12;
        assert_eq!(ChestView::cell_label(&item, 8), "bre… x12");
    }

    #[test]
    fn test_cursor_is_clamped_to_grid() {
        let mut view = ChestView::new();
        view.set_screen(Some(screen(2)));

        for _ in 0..5 {
            view.move_cursor(Direction::Down);
            view.move_cursor(Direction::Right);
        }
        assert_eq!(view.cursor_slot(), 5 + 9);

        for _ in 0..10 {
            view.move_cursor(Direction::Right);
        }
        assert_eq!(view.cursor_slot(), 8 + 9);
        assert_eq!(view.cursor_row_slots(), (9..18).collect::<Vec<_>>());

        view.set_screen(Some(screen(1)));
        assert_eq!(view.cursor_slot(), 8);
    }

    #[test]
    fn test_slot_hit_testing() {
        let mut view = ChestView::new();
        view.set_screen(Some(screen(3)));
        view.grid_area = Rect::new(1, 1, 9 * 10, 9);
        view.cell_width = 10;

        assert_eq!(view.slot_at(1, 1), Some(0));
        assert_eq!(view.slot_at(25, 4), Some(11));
        assert_eq!(view.slot_at(0, 0), None);
        assert_eq!(view.slot_at(95, 4), None);
    }
}
