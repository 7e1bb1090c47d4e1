// Key and mouse handling for the form screen

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use serde_json::json;

use crate::bridge::HostBridge;
use crate::settings;
use crate::ui::focus::FormFocus;
use crate::ui::state::{AppState, InputMode, GUIDE_ABORTED};

/// Chords the embedding surface used to swallow (reload, save, new tab,
/// view source); they stay swallowed here.
fn is_suppressed_chord(key: &KeyEvent) -> bool {
    if key.code == KeyCode::F(5) {
        return true;
    }
    if !key.modifiers.contains(KeyModifiers::CONTROL) {
        return false;
    }
    matches!(
        key.code,
        KeyCode::Char('r')
            | KeyCode::Char('R')
            | KeyCode::Char('s')
            | KeyCode::Char('S')
            | KeyCode::Char('t')
            | KeyCode::Char('T')
            | KeyCode::Char('u')
            | KeyCode::Char('U')
            | KeyCode::Char('n')
            | KeyCode::Char('N')
    )
}

/// Returns true when the app should quit.
pub fn handle_key(key: KeyEvent, state: &mut AppState, bridge: &dyn HostBridge) -> bool {
    if is_suppressed_chord(&key) {
        return false;
    }

    // The alert modal is blocking: only dismissal gets through.
    if state.alert.is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
            state.alert = None;
        }
        return false;
    }

    if state.input_mode == InputMode::Editing {
        handle_editing_key(key, state);
        return false;
    }

    // Quit on 'q' or Ctrl+C
    if matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
    {
        state.should_quit = true;
        return true;
    }

    match key.code {
        KeyCode::Tab => state.focus = state.focus.next(),
        KeyCode::BackTab => state.focus = state.focus.prev(),

        KeyCode::Up if key.modifiers.contains(KeyModifiers::SHIFT) => {
            if state.focus == FormFocus::InputList {
                state.move_selected_input(-1);
            }
        }
        KeyCode::Down if key.modifiers.contains(KeyModifiers::SHIFT) => {
            if state.focus == FormFocus::InputList {
                state.move_selected_input(1);
            }
        }

        KeyCode::Up => match state.focus {
            FormFocus::InputList => state.select_prev_input(),
            FormFocus::PresetList => {
                let current = state.preset_state.selected().unwrap_or(0);
                state.preset_state.select(Some(current.saturating_sub(1)));
            }
            _ => state.focus = state.focus.prev(),
        },
        KeyCode::Down => match state.focus {
            FormFocus::InputList => state.select_next_input(),
            FormFocus::PresetList => {
                let current = state.preset_state.selected().unwrap_or(0);
                let last = state.presets.len().saturating_sub(1);
                state.preset_state.select(Some((current + 1).min(last)));
            }
            _ => state.focus = state.focus.next(),
        },

        KeyCode::Char(' ') => match state.focus {
            FormFocus::InputList => state.toggle_caption_on_selected(),
            FormFocus::HwEncodeCheckbox => {
                state.form.hw_encode = !state.form.hw_encode;
                state.refresh_presets_for_toggle();
            }
            _ => {}
        },

        KeyCode::Char('o') | KeyCode::Char('O') => {
            if state.focus == FormFocus::InputList {
                open_selected_file(state, bridge);
            }
        }

        KeyCode::Char('f') | KeyCode::Char('F') => {
            open_folder_link(state, bridge);
        }

        KeyCode::Enter => handle_enter(state, bridge),

        _ => {}
    }

    false
}

pub fn handle_mouse(mouse: MouseEvent, _state: &mut AppState) {
    // The context menu is globally suppressed.
    if let MouseEventKind::Down(MouseButton::Right) = mouse.kind {
        // swallowed
    }
}

fn handle_editing_key(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Enter | KeyCode::Esc => {
            state.input_mode = InputMode::Normal;
        }
        KeyCode::Left => {
            state.cursor_pos = state.cursor_pos.saturating_sub(1);
        }
        KeyCode::Right => {
            let len = state.focused_field_mut().map_or(0, |f| f.chars().count());
            state.cursor_pos = (state.cursor_pos + 1).min(len);
        }
        KeyCode::Backspace => {
            let cursor = state.cursor_pos;
            if cursor == 0 {
                return;
            }
            if let Some(field) = state.focused_field_mut() {
                let byte = byte_index(field, cursor - 1);
                field.remove(byte);
            }
            state.cursor_pos = cursor - 1;
        }
        KeyCode::Char(c) => {
            let cursor = state.cursor_pos;
            if let Some(field) = state.focused_field_mut() {
                let byte = byte_index(field, cursor);
                field.insert(byte, c);
            }
            state.cursor_pos = cursor + 1;
        }
        _ => {}
    }
}

fn byte_index(s: &str, char_pos: usize) -> usize {
    s.char_indices()
        .nth(char_pos)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

fn handle_enter(state: &mut AppState, bridge: &dyn HostBridge) {
    match state.focus {
        FormFocus::InputFiles => select_input_files(state, bridge),
        FormFocus::OutputFile => select_output_file(state, bridge),
        FormFocus::CaptionFontButton => select_font_file(state, bridge),
        FormFocus::InputList => open_selected_file(state, bridge),
        FormFocus::ExecButton => {
            if state.is_running() {
                terminate(state, bridge);
            } else {
                execute(state, bridge);
            }
        }
        focus if focus.is_text_input() => {
            state.input_mode = InputMode::Editing;
            state.cursor_pos = state
                .focused_field_mut()
                .map_or(0, |f| f.chars().count());
        }
        _ => {}
    }
}

fn select_input_files(state: &mut AppState, bridge: &dyn HostBridge) {
    match bridge.select_input_files() {
        Ok(Some(paths)) => state.apply_input_selection(paths),
        Ok(None) => {}
        Err(e) => tracing::warn!("selectInputFiles failed: {e}"),
    }
}

fn select_output_file(state: &mut AppState, bridge: &dyn HostBridge) {
    match bridge.select_output_files() {
        Ok(Some(path)) => state.apply_output_selection(path),
        Ok(None) => {}
        Err(e) => tracing::warn!("selectOutputFiles failed: {e}"),
    }
}

fn select_font_file(state: &mut AppState, bridge: &dyn HostBridge) {
    match bridge.select_font_file() {
        Ok(Some(path)) => state.form.caption_font = path,
        Ok(None) => {}
        Err(e) => tracing::warn!("selectFontFile failed: {e}"),
    }
}

fn open_selected_file(state: &mut AppState, bridge: &dyn HostBridge) {
    if let Some(path) = state.selected_input_path() {
        if let Err(e) = bridge.open_file(path) {
            tracing::warn!("openFile failed: {e}");
        }
    }
}

fn open_folder_link(state: &mut AppState, bridge: &dyn HostBridge) {
    let link = match state.focus {
        FormFocus::OutputFile => state.output_folder_link.as_deref(),
        _ => state.input_folder_link.as_deref(),
    };
    // No binding yet means nothing to open.
    if let Some(dir) = link {
        if let Err(e) = bridge.open_dir(dir) {
            tracing::warn!("openDir failed: {e}");
        }
    }
}

fn execute(state: &mut AppState, bridge: &dyn HostBridge) {
    state.commit_preset();
    state.begin_execution();
    let payload = settings::build_payload(&state.form);
    if let Err(e) = bridge.generate_video(&payload) {
        // Submission failures surface through the same channel as a
        // host-reported error.
        state.add_error(&json!(e.to_string()));
    }
}

fn terminate(state: &mut AppState, bridge: &dyn HostBridge) {
    match bridge.terminate_process() {
        Ok(()) => state.quit_process(&json!(GUIDE_ABORTED)),
        Err(e) => state.add_error(&json!(e.to_string())),
    }
}
