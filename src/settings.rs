// Settings payload assembly for generateVideo
//
// The payload is built immediately before submission and lives for one
// request. Keys whose value is the empty string are omitted entirely;
// null values (no selection made yet) are submitted as-is and left for
// the host schema to reject.

use serde_json::{json, Map, Value};

/// One row of the input-file list. The include-caption flag lives on the
/// entry so the displayed order and the flag order can never diverge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputEntry {
    pub path: String,
    pub need_caption: bool,
}

impl InputEntry {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            need_caption: true,
        }
    }

    /// Trailing path segment, shown in the file list.
    pub fn display_name(&self) -> &str {
        self.path
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.path.as_str())
    }
}

/// Everything the execute operation reads from the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsForm {
    /// None until the input picker has returned a selection.
    pub input_files: Option<Vec<InputEntry>>,
    /// None until the output picker has returned a selection.
    pub output_file: Option<String>,
    pub caption_margin: String,
    pub caption_size: String,
    pub caption_color: String,
    pub caption_border_color: String,
    pub border_width_ratio: String,
    pub caption_display_time: String,
    pub caption_font: String,
    pub background_color: String,
    pub width: String,
    pub height: String,
    pub fps: String,
    pub sample_rate: String,
    pub preset: String,
    pub hw_encode: bool,
}

impl Default for SettingsForm {
    fn default() -> Self {
        // Defaults mirror the host-side schema so an untouched form
        // submits the same values the host would fall back to.
        Self {
            input_files: None,
            output_file: None,
            caption_margin: "50".to_string(),
            caption_size: "90".to_string(),
            caption_color: "#ffffff".to_string(),
            caption_border_color: "#000000".to_string(),
            border_width_ratio: "0.05".to_string(),
            caption_display_time: "5".to_string(),
            caption_font: String::new(),
            background_color: "#ffffff".to_string(),
            width: String::new(),
            height: String::new(),
            fps: String::new(),
            sample_rate: String::new(),
            preset: "slow".to_string(),
            hw_encode: false,
        }
    }
}

impl SettingsForm {
    /// Move the entry at `from` to `to`, keeping its caption flag attached.
    /// A no-op when no selection has been made or an index is out of range.
    pub fn reorder_input(&mut self, from: usize, to: usize) {
        let Some(files) = self.input_files.as_mut() else {
            return;
        };
        if from >= files.len() || to >= files.len() {
            return;
        }
        let entry = files.remove(from);
        files.insert(to, entry);
    }

    pub fn input_count(&self) -> usize {
        self.input_files.as_ref().map_or(0, |f| f.len())
    }
}

/// Rewrite a color picker value (`#aabbcc`) into the host's hex form
/// (`0xaabbcc`). Values without a leading `#` pass through unchanged.
pub fn hex_for_host(color: &str) -> String {
    color.replacen('#', "0x", 1)
}

fn push_filtered(map: &mut Map<String, Value>, key: &str, value: Value) {
    // Only the empty string is dropped; null and everything else is kept.
    if matches!(&value, Value::String(s) if s.is_empty()) {
        return;
    }
    map.insert(key.to_string(), value);
}

/// Assemble the generateVideo payload from the current form state.
pub fn build_payload(form: &SettingsForm) -> Map<String, Value> {
    let input_video = match &form.input_files {
        Some(files) => json!(files.iter().map(|f| f.path.clone()).collect::<Vec<_>>()),
        None => Value::Null,
    };
    let need_caption: Vec<bool> = form
        .input_files
        .as_ref()
        .map(|files| files.iter().map(|f| f.need_caption).collect())
        .unwrap_or_default();
    let output_video = match &form.output_file {
        Some(path) => json!(path),
        None => Value::Null,
    };

    let mut map = Map::new();
    push_filtered(&mut map, "inputVideo", input_video);
    push_filtered(&mut map, "needCaption", json!(need_caption));
    push_filtered(&mut map, "outputVideo", output_video);
    push_filtered(&mut map, "captionMargin", json!(form.caption_margin));
    push_filtered(&mut map, "captionSize", json!(form.caption_size));
    push_filtered(
        &mut map,
        "captionColor",
        json!(hex_for_host(&form.caption_color)),
    );
    push_filtered(
        &mut map,
        "captionBorderColor",
        json!(hex_for_host(&form.caption_border_color)),
    );
    push_filtered(&mut map, "BorderWidthRatio", json!(form.border_width_ratio));
    push_filtered(
        &mut map,
        "captionDisplayTime",
        json!(form.caption_display_time),
    );
    push_filtered(&mut map, "captionFont", json!(form.caption_font));
    push_filtered(
        &mut map,
        "backgroundColor",
        json!(hex_for_host(&form.background_color)),
    );
    push_filtered(&mut map, "width", json!(form.width));
    push_filtered(&mut map, "height", json!(form.height));
    push_filtered(&mut map, "fps", json!(form.fps));
    push_filtered(&mut map, "sampleRate", json!(form.sample_rate));
    push_filtered(&mut map, "preset", json!(form.preset));
    // The original control is a select whose value is the string form.
    push_filtered(
        &mut map,
        "HWEncode",
        json!(if form.hw_encode { "true" } else { "false" }),
    );
    map
}
