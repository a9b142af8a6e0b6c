use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event as CrosstermEvent};
use taskmeter_app::{Controller, SnapshotStorage};
use tracing::subscriber::NoSubscriber;

use crate::config::keybindings::{KeyBindingsConfig, load_config, validate_tui_config};

mod confirm;
pub mod constants;
mod editor;
mod handlers;
mod terminal;
mod view;
mod widgets;

use self::constants::TUI_TICK_RATE_MS;
use self::handlers::handle_ui_action;
use self::terminal::Term;
use self::view::Ui;

/// Launch the interactive TUI.
///
/// The controller is flushed once more when the user quits.
pub fn run<S: SnapshotStorage>(controller: Controller<S>, config_path: Option<&Path>) -> Result<()> {
    let mut terminal = terminal::open()?;

    let result = tracing::subscriber::with_default(NoSubscriber::default(), || {
        run_event_loop(&mut terminal, controller, config_path)
    });

    terminal::close(&mut terminal);

    result
}

fn run_event_loop<S: SnapshotStorage>(
    terminal: &mut Term,
    controller: Controller<S>,
    config_path: Option<&Path>,
) -> Result<()> {
    let keybindings = match load_config(config_path)? {
        Some(config) => {
            validate_tui_config(&config.tui)?;
            config.tui.keybindings
        }
        None => KeyBindingsConfig::default(),
    };

    let mut ui = Ui::new(controller, keybindings);
    ui.report_load_problem();

    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(TUI_TICK_RATE_MS);

    loop {
        terminal.draw(|f| ui.draw(f))?;
        if ui.should_quit {
            break;
        }

        let timeout = tick_rate.checked_sub(last_tick.elapsed()).unwrap_or_default();

        if event::poll(timeout)? {
            let evt = event::read()?;
            if let CrosstermEvent::Key(key) = evt
                && let Some(action) = ui.handle_key(key)
                && let Err(err) = handle_ui_action(terminal, &mut ui, action)
            {
                ui.error(format!("Editor action failed: {err}"));
            }
        }

        if last_tick.elapsed() >= tick_rate {
            ui.tick(Instant::now());
            last_tick = Instant::now();
        }
    }

    ui.controller
        .shutdown()
        .context("failed to save tasks on exit")?;

    Ok(())
}
