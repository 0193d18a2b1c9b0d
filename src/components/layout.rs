//! Layout calculations for the playground screen

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main screen layout areas
pub struct MainLayout {
    pub title: Rect,
    pub chest: Rect,
    pub log: Rect,
    pub help: Rect,
}

/// Calculate centered popup area
pub fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let popup_x = area.x + (area.width.saturating_sub(width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect::new(
        popup_x,
        popup_y,
        width.min(area.width),
        height.min(area.height),
    )
}

/// Height of a chest view with `rows` rows of 3-line cells plus its border
pub fn chest_height(rows: usize) -> u16 {
    (rows as u16) * 3 + 2
}

/// Title bar, chest view, event log and help bar stacked vertically
pub fn calculate_main_layout(area: Rect, rows: usize) -> MainLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(chest_height(rows)),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    MainLayout {
        title: chunks[0],
        chest: chunks[1],
        log: chunks[2],
        help: chunks[3],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_layout_fits_chest() {
        let layout = calculate_main_layout(Rect::new(0, 0, 120, 40), 6);
        assert_eq!(layout.title.height, 1);
        assert_eq!(layout.chest.height, 20);
        assert_eq!(layout.help.y, 39);
        assert!(layout.log.height >= 3);
    }

    #[test]
    fn test_centered_popup_clamps() {
        let popup = centered_popup(Rect::new(0, 0, 20, 10), 40, 7);
        assert_eq!(popup.width, 20);
        assert_eq!(popup.height, 7);
        assert_eq!(popup.x, 0);
        assert_eq!(popup.y, 1);
    }
}
