//! Root application component
//!
//! The App struct implements the Component trait, acting as the root component
//! that delegates event handling and rendering to child components.
//! It plays the game server: terminal input becomes host events on the
//! framework's queue, and each tick drains that queue into a recording surface.

use crate::action::Action;
use crate::component::Component;
use crate::components::{calculate_main_layout, ChestView, EventLog, HelpDialog, LogKind, QuitDialog};
use crate::config::PlaygroundConfig;
use crate::modal::{Modal, ModalStack};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use inventory_framework::dispatch::{TickDispatcher, UiHandle};
use inventory_framework::event::{
    ClickEvent, ClickKind, CloseEvent, CloseReason, DragEvent, HostEvent, ViewerId,
};
use inventory_framework::host::{HostSurface, RecordingSurface};
use inventory_framework::menu::MenuDefinition;
use inventory_framework::FrameworkResult;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::path::PathBuf;
use tracing::{info, warn};

const DEMO_MENU: &str = include_str!("../menus/demo.yaml");

/// Rows the chest area keeps while no menu is open
const IDLE_ROWS: usize = 3;

// ═══════════════════════════════════════════════════════════════════════════════
// Menu Source
// ═══════════════════════════════════════════════════════════════════════════════

/// Where the hosted menu comes from; re-read on every reopen
#[derive(Debug, Clone, PartialEq)]
pub enum MenuSource {
    File(PathBuf),
    Demo,
}

impl MenuSource {
    /// Command line path first, then the configured path, then the demo
    pub fn resolve(arg: Option<String>, config: &PlaygroundConfig) -> Self {
        arg.or_else(|| config.menu_path.clone())
            .map(|path| MenuSource::File(PathBuf::from(path)))
            .unwrap_or(MenuSource::Demo)
    }

    pub fn load(&self) -> FrameworkResult<MenuDefinition> {
        match self {
            MenuSource::File(path) => MenuDefinition::load(path),
            MenuSource::Demo => MenuDefinition::from_yaml(DEMO_MENU),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            MenuSource::File(path) => path.display().to_string(),
            MenuSource::Demo => "built-in demo".to_string(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// App Struct
// ═══════════════════════════════════════════════════════════════════════════════

/// Main application state - coordinates between components
pub struct App {
    /// Flag to indicate the app should quit
    pub should_quit: bool,

    /// Owns every session; only touched on tick
    dispatcher: TickDispatcher,
    /// Queue into the dispatcher, used for everything the viewer does
    handle: UiHandle,
    surface: RecordingSurface,
    viewer: ViewerId,
    source: MenuSource,

    /// Modal overlay stack
    pub modals: ModalStack,

    // ─────────────────────────────────────────────────────────────────────────
    // Child Components
    // ─────────────────────────────────────────────────────────────────────────
    pub chest: ChestView,
    pub log: EventLog,
    pub help_dialog: HelpDialog,
    pub quit_dialog: QuitDialog,
}

impl App {
    pub fn new(config: &PlaygroundConfig, source: MenuSource) -> Self {
        let (dispatcher, handle) = TickDispatcher::new(config.dispatcher);
        Self {
            should_quit: false,
            dispatcher,
            handle,
            surface: RecordingSurface::new(),
            viewer: ViewerId::new_random(),
            source,
            modals: ModalStack::new(),
            chest: ChestView::new(),
            log: EventLog::new(),
            help_dialog: HelpDialog::default(),
            quit_dialog: QuitDialog::default(),
        }
    }

    /// Queue the first open; it shows up on the first tick
    pub fn init(&mut self) -> Result<()> {
        self.log.push(
            LogKind::Info,
            format!("viewer {} joined", self.viewer),
        );
        self.open_menu()
    }

    /// Load the menu again and queue an open for our viewer
    ///
    /// A broken menu file is reported in the log and leaves the current
    /// session alone.
    fn open_menu(&mut self) -> Result<()> {
        let layout = match self.source.load().and_then(|menu| menu.build()) {
            Ok(layout) => layout,
            Err(e) => {
                warn!(source = %self.source.describe(), error = %e, "menu failed to load");
                self.log.push(LogKind::Error, format!("{}: {}", self.source.describe(), e));
                return Ok(());
            }
        };

        info!(source = %self.source.describe(), viewer = %self.viewer, "opening menu");
        self.log.push(
            LogKind::Info,
            format!("opening \"{}\" from {}", layout.title(), self.source.describe()),
        );
        self.handle.open(self.viewer, layout)?;
        Ok(())
    }

    fn send(&mut self, event: HostEvent) -> Result<()> {
        if !self.chest.is_open() {
            self.log.push(LogKind::Info, "no menu open, press o to open it");
            return Ok(());
        }
        self.handle.event(event)?;
        Ok(())
    }

    fn click(&mut self, slot: usize, kind: ClickKind) -> Result<()> {
        self.send(HostEvent::Click(ClickEvent {
            viewer: self.viewer,
            slot,
            kind,
        }))
    }

    /// The viewer closed the chest client side; the host learns afterwards
    fn close_menu(&mut self) -> Result<()> {
        if !self.chest.is_open() {
            return Ok(());
        }
        self.surface.close(self.viewer);
        self.handle.event(HostEvent::Close(CloseEvent {
            viewer: self.viewer,
            reason: CloseReason::Player,
        }))?;
        Ok(())
    }

    /// One host tick: run queued work, then pick up what the viewer now sees
    fn tick(&mut self) {
        let report = self.dispatcher.drain(&mut self.surface);

        for (event, outcome) in &report.outcomes {
            self.log.push(LogKind::Event, event.to_string());
            let message = match outcome {
                Some(o) if o.cancelled => "cancelled".to_string(),
                Some(o) if o.handled => "handled".to_string(),
                Some(_) => "passed through".to_string(),
                None => "no session".to_string(),
            };
            self.log.push(LogKind::Outcome, message);
        }

        for message in self.surface.take_notifications(self.viewer) {
            self.log.push(LogKind::Notify, message);
        }

        if report.backlog > 0 {
            self.log.push(
                LogKind::Info,
                format!("{} messages deferred to the next tick", report.backlog),
            );
        }

        self.chest.set_screen(self.surface.screen(self.viewer).cloned());
    }

    fn shutdown(&mut self) {
        let sessions = self.dispatcher.registry().len();
        self.dispatcher.registry_mut().close_all(&mut self.surface);
        info!(sessions, "playground shutting down");
        self.should_quit = true;
    }

    fn draw_title_bar(&self, frame: &mut Frame, area: Rect) {
        let sessions = self.dispatcher.registry().len();
        let line = Line::from(vec![
            Span::styled(
                " inventory-framework ",
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(self.source.describe(), Style::default().fg(Color::White)),
            Span::styled(
                format!("  sessions: {}  viewer: {}", sessions, self.viewer),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn draw_help_bar(&self, frame: &mut Frame, area: Rect) {
        let key = |k: &'static str| {
            Span::styled(k, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        };
        let line = Line::from(vec![
            key(" Enter"),
            Span::raw(" click  "),
            key("r"),
            Span::raw(" right  "),
            key("s"),
            Span::raw(" shift  "),
            key("g"),
            Span::raw(" drag  "),
            key("e"),
            Span::raw(" close  "),
            key("o"),
            Span::raw(" reopen  "),
            key("?"),
            Span::raw(" help  "),
            key("q"),
            Span::raw(" quit"),
        ]);
        frame.render_widget(
            Paragraph::new(line).style(Style::default().fg(Color::DarkGray)),
            area,
        );
    }
}

impl Component for App {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::ForceQuit));
        }

        // Modals take all input
        match self.modals.top() {
            Some(Modal::QuitConfirm) => return self.quit_dialog.handle_key_event(key),
            Some(Modal::Help) => return self.help_dialog.handle_key_event(key),
            None => {}
        }

        let action = match key.code {
            KeyCode::Char('q') => Some(Action::OpenQuitDialog),
            KeyCode::Char('?') => Some(Action::OpenHelp),
            KeyCode::Char('e') | KeyCode::Esc => Some(Action::CloseMenu),
            KeyCode::Char('o') => Some(Action::ReopenMenu),
            _ => match self.log.handle_key_event(key)? {
                Some(action) => Some(action),
                None => self.chest.handle_key_event(key)?,
            },
        };
        Ok(action)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        if !self.modals.is_empty() {
            return Ok(None);
        }
        self.chest.handle_mouse_event(mouse)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            // ─────────────────────────────────────────────────────────────────
            // App Lifecycle
            // ─────────────────────────────────────────────────────────────────
            Action::Tick => self.tick(),
            Action::Resize(_, _) => {}
            Action::ForceQuit => self.shutdown(),

            // ─────────────────────────────────────────────────────────────────
            // Chest interaction
            // ─────────────────────────────────────────────────────────────────
            Action::MoveCursor(_) => return self.chest.update(action),
            Action::ClickCursor(kind) => self.click(self.chest.cursor_slot(), kind)?,
            Action::ClickSlot(slot, kind) => self.click(slot, kind)?,
            Action::DragRow => {
                let slots = self.chest.cursor_row_slots();
                self.send(HostEvent::Drag(DragEvent {
                    viewer: self.viewer,
                    slots,
                }))?;
            }
            Action::CloseMenu => self.close_menu()?,
            Action::ReopenMenu => self.open_menu()?,

            // ─────────────────────────────────────────────────────────────────
            // Event log
            // ─────────────────────────────────────────────────────────────────
            Action::ScrollLogUp | Action::ScrollLogDown | Action::ClearLog => {
                return self.log.update(action);
            }

            // ─────────────────────────────────────────────────────────────────
            // Modals
            // ─────────────────────────────────────────────────────────────────
            Action::OpenQuitDialog => {
                self.quit_dialog.open_sessions = self.dispatcher.registry().len();
                self.modals.push(Modal::QuitConfirm);
            }
            Action::OpenHelp => {
                self.help_dialog.scroll_offset = 0;
                self.modals.push(Modal::Help);
            }
            Action::CloseModal => {
                self.modals.pop();
            }
            Action::ConfirmModal => {
                if self.modals.pop() == Some(Modal::QuitConfirm) {
                    return Ok(Some(Action::ForceQuit));
                }
            }
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let rows = match self.chest.rows() {
            0 => IDLE_ROWS,
            rows => rows,
        };
        let layout = calculate_main_layout(area, rows);

        self.draw_title_bar(frame, layout.title);
        self.chest.draw(frame, layout.chest)?;
        self.log.draw(frame, layout.log)?;
        self.draw_help_bar(frame, layout.help);

        match self.modals.top() {
            Some(Modal::QuitConfirm) => self.quit_dialog.draw(frame, area)?,
            Some(Modal::Help) => self.help_dialog.draw(frame, area)?,
            None => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventKind;
    use inventory_framework::model::COLUMNS;

    fn app() -> App {
        let mut app = App::new(&PlaygroundConfig::default(), MenuSource::Demo);
        app.init().unwrap();
        app.update(Action::Tick).unwrap();
        app
    }

    fn press(app: &mut App, code: KeyCode) {
        let mut key = KeyEvent::new(code, KeyModifiers::NONE);
        key.kind = KeyEventKind::Press;
        let mut action = app.handle_key_event(key).unwrap();
        while let Some(a) = action {
            action = app.update(a).unwrap();
        }
    }

    fn slot_name(app: &App, slot: usize) -> Option<String> {
        app.surface
            .slot(app.viewer, slot)
            .map(|item| item.display_name().to_string())
    }

    #[test]
    fn test_demo_menu_opens_on_first_tick() {
        let app = app();
        assert!(app.chest.is_open());
        assert_eq!(app.chest.rows(), 5);
        assert_eq!(app.dispatcher.registry().len(), 1);
        assert_eq!(slot_name(&app, COLUMNS + 1).as_deref(), Some("Apple"));
    }

    #[test]
    fn test_next_page_click_turns_the_page() {
        let mut app = app();
        app.update(Action::ClickSlot(4 * COLUMNS + 8, ClickKind::Left))
            .unwrap();
        app.update(Action::Tick).unwrap();
        assert_eq!(slot_name(&app, COLUMNS + 1).as_deref(), Some("Iron Sword"));
    }

    #[test]
    fn test_notify_reaches_the_log() {
        let mut app = app();
        app.update(Action::ClickSlot(COLUMNS + 1, ClickKind::Left))
            .unwrap();
        app.update(Action::Tick).unwrap();
        assert!(app
            .log
            .entries()
            .any(|e| e.kind == LogKind::Notify && e.message == "Bought 4 apples"));
        assert!(app
            .log
            .entries()
            .any(|e| e.kind == LogKind::Outcome && e.message == "cancelled"));
    }

    #[test]
    fn test_close_and_reopen() {
        let mut app = app();
        press(&mut app, KeyCode::Char('e'));
        app.update(Action::Tick).unwrap();
        assert!(!app.chest.is_open());
        assert!(app.dispatcher.registry().is_empty());

        // Clicks while closed never reach the queue
        app.update(Action::ClickCursor(ClickKind::Left)).unwrap();
        app.update(Action::Tick).unwrap();
        assert!(!app.log.entries().any(|e| e.kind == LogKind::Event && e.message.starts_with("Click")));

        press(&mut app, KeyCode::Char('o'));
        app.update(Action::Tick).unwrap();
        assert!(app.chest.is_open());
        assert_eq!(app.dispatcher.registry().len(), 1);
    }

    #[test]
    fn test_quit_needs_confirmation() {
        let mut app = app();
        press(&mut app, KeyCode::Char('q'));
        assert_eq!(app.modals.top(), Some(&Modal::QuitConfirm));
        assert!(!app.should_quit);

        press(&mut app, KeyCode::Char('n'));
        assert!(app.modals.is_empty());

        press(&mut app, KeyCode::Char('q'));
        press(&mut app, KeyCode::Char('y'));
        assert!(app.should_quit);
        assert!(app.dispatcher.registry().is_empty());
    }

    #[test]
    fn test_missing_menu_file_is_logged() {
        let source = MenuSource::File(PathBuf::from("/nonexistent/menu.yaml"));
        let mut app = App::new(&PlaygroundConfig::default(), source);
        app.init().unwrap();
        app.update(Action::Tick).unwrap();
        assert!(!app.chest.is_open());
        assert!(app.log.entries().any(|e| e.kind == LogKind::Error));
    }

    #[test]
    fn test_menu_source_resolution() {
        let mut config = PlaygroundConfig::default();
        assert_eq!(MenuSource::resolve(None, &config), MenuSource::Demo);

        config.menu_path = Some("shop.yaml".to_string());
        assert_eq!(
            MenuSource::resolve(None, &config),
            MenuSource::File(PathBuf::from("shop.yaml"))
        );
        assert_eq!(
            MenuSource::resolve(Some("other.yaml".to_string()), &config),
            MenuSource::File(PathBuf::from("other.yaml"))
        );
    }
}
