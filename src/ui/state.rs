// Application state management

use ratatui::widgets::ListState;
use serde_json::Value;

use crate::presets::{self, PresetOption};
use crate::settings::{InputEntry, SettingsForm};
use crate::ui::focus::FormFocus;

/// Software codec used for the preset table whenever hardware encoding
/// is off (or the hardware codec was never resolved).
pub const SOFTWARE_CODEC: &str = "libx264";

/// Guide label shown while a generation is running.
pub const GUIDE_RUNNING: &str = "実行中...";
/// Guide label for a locally aborted run.
pub const GUIDE_ABORTED: &str = "中止";
/// Guide label for a host-reported error.
pub const GUIDE_ERROR: &str = "エラー";

/// Placeholder returned by getAllLog when nothing has been logged.
pub const EMPTY_LOG: &str = "log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecPhase {
    /// Nothing submitted yet.
    Idle,
    /// A generation request is with the host.
    Running,
    /// A run ended (completed, aborted, or errored); a new one may start.
    Terminal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,  // Navigation; global shortcuts active
    Editing, // Character input goes to the focused field
}

pub struct AppState {
    pub title: String,

    // Execution lifecycle
    pub phase: ExecPhase,
    pub guide: String,

    // Log area
    pub log: String,
    pub log_error: bool,

    // Progress gauge
    pub progress_visible: bool,
    pub progress_ratio: f64,
    pub progress_label: String,

    // Blocking alert modal
    pub alert: Option<String>,

    // Form
    pub form: SettingsForm,
    pub file_selection: Option<usize>,
    pub input_folder_link: Option<String>,
    pub output_folder_link: Option<String>,

    // Encoder / presets
    pub selected_codec: Option<String>,
    pub presets: &'static [PresetOption],
    pub preset_state: ListState,

    // Focus & editing
    pub focus: FormFocus,
    pub input_mode: InputMode,
    pub cursor_pos: usize,

    pub should_quit: bool,
}

impl AppState {
    pub fn new(title: impl Into<String>) -> Self {
        let presets = presets::presets_for(SOFTWARE_CODEC);
        let mut preset_state = ListState::default();
        preset_state.select(Some(presets::default_index(presets)));

        Self {
            title: title.into(),
            phase: ExecPhase::Idle,
            guide: String::new(),
            log: String::new(),
            log_error: false,
            progress_visible: false,
            progress_ratio: 0.0,
            progress_label: "0%".to_string(),
            alert: None,
            form: SettingsForm::default(),
            file_selection: None,
            input_folder_link: None,
            output_folder_link: None,
            selected_codec: None,
            presets,
            preset_state,
            focus: FormFocus::default(),
            input_mode: InputMode::Normal,
            cursor_pos: 0,
            should_quit: false,
        }
    }

    // ---- Inbound callbacks (host → UI). Wrong-shaped payloads are
    // ---- dropped silently; that is the observed contract.

    /// Append a log line and clear any prior error styling.
    pub fn add_log(&mut self, text: &Value) {
        if let Value::String(s) = text {
            self.log_error = false;
            self.log.push_str(s);
        }
    }

    /// Replace the log with the error text and force the terminal state.
    pub fn add_error(&mut self, text: &Value) {
        if let Value::String(s) = text {
            self.log = s.clone();
            self.log_error = true;
            self.enter_terminal(GUIDE_ERROR);
        }
    }

    /// Open the blocking modal.
    pub fn show_alert(&mut self, text: &Value) {
        if let Value::String(s) = text {
            self.alert = Some(s.clone());
        }
    }

    /// The single terminal-state transition point.
    pub fn quit_process(&mut self, text: &Value) {
        if let Value::String(s) = text {
            self.enter_terminal(s);
        }
    }

    /// Update gauge and percentage label; non-numeric payloads are ignored.
    pub fn show_progress(&mut self, value: &Value) {
        if let Some(ratio) = numeric_like(value) {
            self.progress_ratio = ratio;
            self.progress_label = format!("{}%", (ratio * 100.0).trunc() as i64);
        }
    }

    /// Current log text, or the fixed placeholder when empty.
    pub fn all_log(&self) -> String {
        if self.log.is_empty() {
            EMPTY_LOG.to_string()
        } else {
            self.log.clone()
        }
    }

    // ---- Execution lifecycle

    /// Visual transitions at the moment execute is triggered.
    pub fn begin_execution(&mut self) {
        self.phase = ExecPhase::Running;
        self.guide = GUIDE_RUNNING.to_string();
        self.progress_visible = true;
        self.progress_ratio = 0.0;
        self.progress_label = "0%".to_string();
        self.log.clear();
        self.log_error = false;
    }

    fn enter_terminal(&mut self, label: &str) {
        self.phase = ExecPhase::Terminal;
        self.guide = label.to_string();
    }

    pub fn is_running(&self) -> bool {
        self.phase == ExecPhase::Running
    }

    // ---- File selection

    /// Replace the input list wholesale with a fresh picker result.
    pub fn apply_input_selection(&mut self, paths: Vec<String>) {
        if paths.is_empty() {
            return;
        }
        // Rebinding the folder link replaces the previous target outright,
        // so repeated selections cannot stack stale bindings.
        self.input_folder_link = parent_dir(&paths[0]);
        self.form.input_files = Some(paths.into_iter().map(InputEntry::new).collect());
        self.file_selection = Some(0);
    }

    pub fn apply_output_selection(&mut self, path: String) {
        self.output_folder_link = parent_dir(&path);
        self.form.output_file = Some(path);
    }

    /// Move the selected input row by `delta`, keeping the backing list
    /// and the selection in lockstep. No selection means no-op.
    pub fn move_selected_input(&mut self, delta: isize) {
        let Some(from) = self.file_selection else {
            return;
        };
        let len = self.form.input_count();
        if len == 0 {
            return;
        }
        let to = from.saturating_add_signed(delta).min(len - 1);
        if to == from {
            return;
        }
        self.form.reorder_input(from, to);
        self.file_selection = Some(to);
    }

    pub fn select_next_input(&mut self) {
        let len = self.form.input_count();
        if len == 0 {
            return;
        }
        let next = self.file_selection.map_or(0, |i| (i + 1).min(len - 1));
        self.file_selection = Some(next);
    }

    pub fn select_prev_input(&mut self) {
        if self.form.input_count() == 0 {
            return;
        }
        let prev = self.file_selection.map_or(0, |i| i.saturating_sub(1));
        self.file_selection = Some(prev);
    }

    pub fn toggle_caption_on_selected(&mut self) {
        let Some(idx) = self.file_selection else {
            return;
        };
        if let Some(files) = self.form.input_files.as_mut() {
            if let Some(entry) = files.get_mut(idx) {
                entry.need_caption = !entry.need_caption;
            }
        }
    }

    pub fn selected_input_path(&self) -> Option<&str> {
        let idx = self.file_selection?;
        self.form
            .input_files
            .as_ref()?
            .get(idx)
            .map(|e| e.path.as_str())
    }

    // ---- Presets

    /// Swap the preset table for the given codec and select its default.
    pub fn refresh_presets(&mut self, codec: &str) {
        self.presets = presets::presets_for(codec);
        self.preset_state
            .select(Some(presets::default_index(self.presets)));
    }

    /// The preset table that applies right now: the remembered hardware
    /// codec when HW encoding is on, the fixed software codec otherwise.
    pub fn refresh_presets_for_toggle(&mut self) {
        let codec = if self.form.hw_encode {
            self.selected_codec
                .clone()
                .unwrap_or_else(|| SOFTWARE_CODEC.to_string())
        } else {
            SOFTWARE_CODEC.to_string()
        };
        self.refresh_presets(&codec);
    }

    /// Key submitted as the `preset` payload value.
    pub fn selected_preset(&self) -> &'static str {
        let idx = self
            .preset_state
            .selected()
            .unwrap_or_else(|| presets::default_index(self.presets));
        self.presets
            .get(idx)
            .unwrap_or(&self.presets[0])
            .key
    }

    /// Sync the list selection into the form before payload assembly.
    pub fn commit_preset(&mut self) {
        self.form.preset = self.selected_preset().to_string();
    }

    // ---- Text editing

    pub fn focused_field_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            FormFocus::CaptionMarginInput => Some(&mut self.form.caption_margin),
            FormFocus::CaptionSizeInput => Some(&mut self.form.caption_size),
            FormFocus::CaptionColorInput => Some(&mut self.form.caption_color),
            FormFocus::CaptionBorderColorInput => Some(&mut self.form.caption_border_color),
            FormFocus::BorderWidthRatioInput => Some(&mut self.form.border_width_ratio),
            FormFocus::CaptionDisplayTimeInput => Some(&mut self.form.caption_display_time),
            FormFocus::BackgroundColorInput => Some(&mut self.form.background_color),
            FormFocus::WidthInput => Some(&mut self.form.width),
            FormFocus::HeightInput => Some(&mut self.form.height),
            FormFocus::FpsInput => Some(&mut self.form.fps),
            FormFocus::SampleRateInput => Some(&mut self.form.sample_rate),
            _ => None,
        }
    }
}

/// JS-style numeric acceptance: JSON numbers, or strings parsing to a
/// finite float. Everything else is not a progress value.
fn numeric_like(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Directory prefix of a path (everything up to and including the last
/// separator), matching how the folder links are derived.
fn parent_dir(path: &str) -> Option<String> {
    let cut = path.rfind(['/', '\\'])?;
    Some(path[..=cut].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state() -> AppState {
        AppState::new("test")
    }

    #[test]
    fn show_progress_updates_gauge_and_label() {
        let mut s = state();
        s.show_progress(&json!(0.5));
        assert_eq!(s.progress_ratio, 0.5);
        assert_eq!(s.progress_label, "50%");

        s.show_progress(&json!(0.999));
        assert_eq!(s.progress_label, "99%");
    }

    #[test]
    fn show_progress_ignores_non_numeric() {
        let mut s = state();
        s.show_progress(&json!(0.5));

        s.show_progress(&Value::Null);
        s.show_progress(&json!("NaN"));
        s.show_progress(&json!("boom"));
        s.show_progress(&json!({"p": 1}));

        assert_eq!(s.progress_ratio, 0.5);
        assert_eq!(s.progress_label, "50%");
    }

    #[test]
    fn show_progress_accepts_numeric_strings() {
        let mut s = state();
        s.show_progress(&json!("0.25"));
        assert_eq!(s.progress_ratio, 0.25);
        assert_eq!(s.progress_label, "25%");
    }

    #[test]
    fn add_log_appends_and_clears_error_styling() {
        let mut s = state();
        s.log_error = true;
        s.add_log(&json!("line one\n"));
        s.add_log(&json!("line two\n"));
        assert_eq!(s.log, "line one\nline two\n");
        assert!(!s.log_error);
    }

    #[test]
    fn add_log_ignores_non_strings() {
        let mut s = state();
        s.add_log(&json!(42));
        s.add_log(&Value::Null);
        s.add_log(&json!(["a"]));
        assert!(s.log.is_empty());
    }

    #[test]
    fn add_error_replaces_log_and_forces_error_terminal() {
        let mut s = state();
        s.begin_execution();
        s.add_log(&json!("progress so far"));

        s.add_error(&json!("boom"));

        assert_eq!(s.log, "boom");
        assert!(s.log_error);
        assert_eq!(s.phase, ExecPhase::Terminal);
        assert_eq!(s.guide, GUIDE_ERROR);
    }

    #[test]
    fn quit_process_is_the_terminal_transition() {
        let mut s = state();
        s.begin_execution();
        s.quit_process(&json!("完了"));
        assert_eq!(s.phase, ExecPhase::Terminal);
        assert_eq!(s.guide, "完了");

        // Wrong type leaves the running state untouched.
        let mut s = state();
        s.begin_execution();
        s.quit_process(&json!(1));
        assert_eq!(s.phase, ExecPhase::Running);
    }

    #[test]
    fn all_log_defaults_to_placeholder() {
        let mut s = state();
        assert_eq!(s.all_log(), "log");
        s.add_log(&json!("frame=1"));
        assert_eq!(s.all_log(), "frame=1");
    }

    #[test]
    fn show_alert_opens_modal_for_strings_only() {
        let mut s = state();
        s.show_alert(&json!(3.2));
        assert!(s.alert.is_none());
        s.show_alert(&json!("処理が完了しました。"));
        assert_eq!(s.alert.as_deref(), Some("処理が完了しました。"));
    }

    #[test]
    fn begin_execution_resets_log_and_progress() {
        let mut s = state();
        s.add_log(&json!("old run"));
        s.log_error = true;
        s.begin_execution();
        assert!(s.log.is_empty());
        assert!(!s.log_error);
        assert!(s.progress_visible);
        assert_eq!(s.progress_ratio, 0.0);
        assert_eq!(s.progress_label, "0%");
        assert_eq!(s.guide, GUIDE_RUNNING);
        assert_eq!(s.phase, ExecPhase::Running);
    }

    #[test]
    fn execute_is_possible_again_from_terminal() {
        let mut s = state();
        s.begin_execution();
        s.add_error(&json!("boom"));
        assert_eq!(s.phase, ExecPhase::Terminal);
        s.begin_execution();
        assert_eq!(s.phase, ExecPhase::Running);
        assert!(s.log.is_empty());
    }

    #[test]
    fn input_selection_replaces_list_and_binds_folder_link() {
        let mut s = state();
        s.apply_input_selection(vec!["/clips/a.mp4".into(), "/clips/b.mp4".into()]);
        assert_eq!(s.form.input_count(), 2);
        assert_eq!(s.input_folder_link.as_deref(), Some("/clips/"));
        assert_eq!(s.file_selection, Some(0));

        // A second selection rebinds the link rather than stacking.
        s.apply_input_selection(vec!["/other/c.mp4".into()]);
        assert_eq!(s.form.input_count(), 1);
        assert_eq!(s.input_folder_link.as_deref(), Some("/other/"));
    }

    #[test]
    fn reorder_moves_selection_with_the_row() {
        let mut s = state();
        s.apply_input_selection(vec!["/v/a.mp4".into(), "/v/b.mp4".into(), "/v/c.mp4".into()]);
        s.move_selected_input(1);
        let files = s.form.input_files.as_ref().unwrap();
        assert_eq!(files[0].path, "/v/b.mp4");
        assert_eq!(files[1].path, "/v/a.mp4");
        assert_eq!(s.file_selection, Some(1));
    }

    #[test]
    fn reorder_with_no_selection_does_not_panic() {
        let mut s = state();
        s.move_selected_input(1);
        s.move_selected_input(-1);
        assert!(s.form.input_files.is_none());
        assert_eq!(s.file_selection, None);
    }

    #[test]
    fn hw_toggle_swaps_preset_table() {
        let mut s = state();
        s.selected_codec = Some("h264_nvenc".to_string());

        s.form.hw_encode = true;
        s.refresh_presets_for_toggle();
        assert_eq!(s.selected_preset(), "p5");

        s.form.hw_encode = false;
        s.refresh_presets_for_toggle();
        assert_eq!(s.selected_preset(), "slow");
    }

    #[test]
    fn unresolved_codec_falls_back_to_software_table() {
        let mut s = state();
        s.form.hw_encode = true;
        s.refresh_presets_for_toggle();
        assert_eq!(s.selected_preset(), "slow");
    }

    #[test]
    fn parent_dir_keeps_trailing_separator() {
        assert_eq!(parent_dir("/clips/a.mp4").as_deref(), Some("/clips/"));
        assert_eq!(
            parent_dir("C:\\videos\\a.mp4").as_deref(),
            Some("C:\\videos\\")
        );
        assert_eq!(parent_dir("a.mp4"), None);
    }
}
