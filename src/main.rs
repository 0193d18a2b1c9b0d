//! if-playground - a terminal host for inventory-framework menus
//!
//! Plays the game server's part: the terminal shows the chest a single
//! viewer sees, keys and mouse clicks become host events, and a fixed-rate
//! tick drains the framework's queue.
//!
//! Usage: `if-playground [menu.yaml]`

mod action;
mod app;
mod component;
mod components;
mod config;
mod logging;
mod modal;
mod tui;

use crate::action::Action;
use crate::app::{App, MenuSource};
use crate::component::Component;
use crate::config::PlaygroundConfig;
use crate::tui::Tui;
use anyhow::Result;
use crossterm::event::Event;
use tracing::{error, info};

fn main() -> Result<()> {
    // A broken config file stops startup instead of being overwritten
    let config = match PlaygroundConfig::load()? {
        Some(config) => config,
        None => {
            let config = PlaygroundConfig::default();
            // A read-only home is fine, the defaults still apply
            if let Err(e) = config.save() {
                eprintln!("Could not write default config: {}", e);
            }
            config
        }
    };

    if let Some(log_path) = config.log_path() {
        logging::init(&log_path)?;
    }

    let source = MenuSource::resolve(std::env::args().nth(1), &config);
    info!(menu = %source.describe(), tick_ms = config.tick_rate_ms, "starting playground");

    // Setup terminal
    let mut tui = Tui::new(config.tick_rate())?;
    tui.enter()?;

    let mut app = App::new(&config, source);
    let result = app.init().and_then(|_| run_app(&mut tui, &mut app));

    // Cleanup terminal
    tui.exit()?;

    if let Err(err) = result {
        error!(error = ?err, "playground stopped");
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }

    Ok(())
}

/// Run the main application loop
fn run_app(tui: &mut Tui, app: &mut App) -> Result<()> {
    while !app.should_quit {
        tui.draw(|frame| {
            if let Err(e) = app.draw(frame, frame.area()) {
                error!(error = %e, "draw failed");
            }
        })?;

        if let Some(event) = tui.next_event()? {
            let action = match event {
                Event::Key(key) => app.handle_key_event(key)?,
                Event::Mouse(mouse) => app.handle_mouse_event(mouse)?,
                Event::Resize(w, h) => Some(Action::Resize(w, h)),
                _ => None,
            };

            // Action might produce a follow-up action
            let mut current_action = action;
            while let Some(a) = current_action {
                current_action = app.update(a)?;
            }
        }

        // Input never starves the host tick
        if tui.tick_due() {
            app.update(Action::Tick)?;
        }
    }

    Ok(())
}
