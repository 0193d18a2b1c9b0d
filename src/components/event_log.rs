//! Event log component
//!
//! Scrollable history of what the host sent and what the framework did
//! with it, newest at the bottom.

use crate::action::Action;
use crate::component::Component;
use anyhow::Result;
use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::collections::VecDeque;

const MAX_ENTRIES: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    /// Event delivered to the session registry
    Event,
    /// Outcome reported back to the host
    Outcome,
    /// Message a handler sent to the viewer
    Notify,
    Info,
    Error,
}

impl LogKind {
    fn label(self) -> &'static str {
        match self {
            LogKind::Event => "event",
            LogKind::Outcome => "result",
            LogKind::Notify => "notify",
            LogKind::Info => "info",
            LogKind::Error => "error",
        }
    }

    fn color(self) -> Color {
        match self {
            LogKind::Event => Color::Blue,
            LogKind::Outcome => Color::Green,
            LogKind::Notify => Color::Magenta,
            LogKind::Info => Color::Gray,
            LogKind::Error => Color::Red,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub at: DateTime<Local>,
    pub kind: LogKind,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct EventLog {
    entries: VecDeque<LogEntry>,
    /// Lines scrolled up from the bottom
    scroll_back: usize,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: LogKind, message: impl Into<String>) {
        if self.entries.len() == MAX_ENTRIES {
            self.entries.pop_front();
        }
        self.entries.push_back(LogEntry {
            at: Local::now(),
            kind,
            message: message.into(),
        });
        // Keep the view anchored on the same entries while scrolled back
        if self.scroll_back > 0 {
            self.scroll_back = (self.scroll_back + 1).min(self.entries.len().saturating_sub(1));
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.scroll_back = 0;
    }

    fn visible_range(&self, height: usize) -> std::ops::Range<usize> {
        let end = self.entries.len().saturating_sub(self.scroll_back);
        end.saturating_sub(height)..end
    }
}

impl Component for EventLog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::PageUp => Some(Action::ScrollLogUp),
            KeyCode::PageDown => Some(Action::ScrollLogDown),
            KeyCode::Char('c') => Some(Action::ClearLog),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::ScrollLogUp => {
                self.scroll_back = (self.scroll_back + 5).min(self.entries.len().saturating_sub(1));
            }
            Action::ScrollLogDown => {
                self.scroll_back = self.scroll_back.saturating_sub(5);
            }
            Action::ClearLog => self.clear(),
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let height = area.height.saturating_sub(2) as usize;
        let lines: Vec<Line> = self
            .entries
            .range(self.visible_range(height))
            .map(|entry| {
                Line::from(vec![
                    Span::styled(
                        entry.at.format("%H:%M:%S%.3f ").to_string(),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(
                        format!("{:<7}", entry.kind.label()),
                        Style::default()
                            .fg(entry.kind.color())
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(entry.message.clone()),
                ])
            })
            .collect();

        let title = if self.scroll_back > 0 {
            format!(" Events ({} more below) ", self.scroll_back)
        } else {
            format!(" Events ({}) ", self.entries.len())
        };

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(paragraph, area);
        Ok(())
    }
}
