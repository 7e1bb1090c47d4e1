// Terminal UI: event loop, screen, and state

pub mod alert;
pub mod components;
pub mod events;
pub mod focus;
pub mod screen;
pub mod state;
pub mod widgets;

use std::io;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::bridge::{HostBridge, HostEvent};
use crate::logfile;
use crate::ui::screen::FormScreen;
use crate::ui::state::AppState;

const TICK_RATE: Duration = Duration::from_millis(16); // ~60fps

pub enum UiEvent {
    Input(Event),
    Tick,
    Host(HostEvent),
}

/// Dedicated input thread: polls the terminal and emits ticks so the
/// main loop never blocks on crossterm.
fn spawn_event_thread(tx: mpsc::Sender<UiEvent>) {
    thread::spawn(move || {
        let mut last_tick = Instant::now();
        loop {
            let timeout = TICK_RATE.saturating_sub(last_tick.elapsed());
            match event::poll(timeout) {
                Ok(true) => {
                    if let Ok(ev) = event::read() {
                        if tx.send(UiEvent::Input(ev)).is_err() {
                            return;
                        }
                    }
                }
                Ok(false) => {}
                Err(_) => return,
            }
            if last_tick.elapsed() >= TICK_RATE {
                if tx.send(UiEvent::Tick).is_err() {
                    return;
                }
                last_tick = Instant::now();
            }
        }
    });
}

/// Funnels host pushes into the single UI channel.
fn spawn_host_forwarder(host_rx: mpsc::Receiver<HostEvent>, tx: mpsc::Sender<UiEvent>) {
    thread::spawn(move || {
        while let Ok(ev) = host_rx.recv() {
            if tx.send(UiEvent::Host(ev)).is_err() {
                return;
            }
        }
    });
}

pub fn run(
    mut state: AppState,
    bridge: &dyn HostBridge,
    host_rx: mpsc::Receiver<HostEvent>,
) -> Result<()> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let result = run_app(&mut terminal, &mut state, bridge, host_rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Persist whatever the last run logged before the screen goes away.
    if !state.log.is_empty() {
        if let Err(e) = logfile::save_run_log(&state.log) {
            tracing::warn!("could not save run log: {e}");
        }
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
    bridge: &dyn HostBridge,
    host_rx: mpsc::Receiver<HostEvent>,
) -> Result<()> {
    let (tx, rx) = mpsc::channel();
    spawn_event_thread(tx.clone());
    spawn_host_forwarder(host_rx, tx);

    loop {
        terminal.draw(|frame| FormScreen::render(frame, state))?;

        // Block for the first event, then drain the backlog so a burst
        // of host log lines collapses into one redraw.
        let first = rx.recv().context("ui event channel closed")?;
        let mut batch = vec![first];
        while let Ok(ev) = rx.try_recv() {
            batch.push(ev);
        }

        for ui_event in batch {
            match ui_event {
                UiEvent::Input(Event::Key(key)) => {
                    if events::handle_key(key, state, bridge) {
                        return Ok(());
                    }
                }
                UiEvent::Input(Event::Mouse(mouse)) => events::handle_mouse(mouse, state),
                UiEvent::Input(_) => {}
                UiEvent::Host(host_event) => dispatch_host_event(state, bridge, host_event),
                UiEvent::Tick => {} // redraw happens at the top of the loop
            }
            if state.should_quit {
                return Ok(());
            }
        }
    }
}

/// Host → UI callback dispatch. Payload validation lives in the state
/// handlers; anything malformed is dropped there.
fn dispatch_host_event(state: &mut AppState, bridge: &dyn HostBridge, event: HostEvent) {
    match event {
        HostEvent::AddLog(text) => state.add_log(&text),
        HostEvent::AddError(text) => state.add_error(&text),
        HostEvent::ShowAlert(text) => state.show_alert(&text),
        HostEvent::QuitProcess(text) => state.quit_process(&text),
        HostEvent::ShowProgress(value) => state.show_progress(&value),
        HostEvent::GetAllLog { request_id } => {
            let log = state.all_log();
            if let Err(e) = bridge.reply_all_log(request_id, &log) {
                tracing::warn!("getAllLog reply failed: {e}");
            }
            // The host collects the transcript when a run finishes;
            // persist it at the same point.
            if let Err(e) = logfile::save_run_log(&log) {
                tracing::warn!("could not save run log: {e:#}");
            }
        }
        HostEvent::CodecResolved(codec) => {
            state.selected_codec = Some(codec);
            if state.form.hw_encode {
                state.refresh_presets_for_toggle();
            }
        }
    }
}
