// Encoder preset vocabularies - single source of truth
// The key is what gets submitted to the host; the label is what the UI shows.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetOption {
    pub key: &'static str,
    pub label: &'static str,
    pub is_default: bool,
}

const fn preset(key: &'static str, label: &'static str) -> PresetOption {
    PresetOption {
        key,
        label,
        is_default: false,
    }
}

const fn preset_default(key: &'static str, label: &'static str) -> PresetOption {
    PresetOption {
        key,
        label,
        is_default: true,
    }
}

// Generic software vocabulary (libx264/libx265 and any unrecognized encoder)
pub const SOFTWARE_PRESETS: &[PresetOption] = &[
    preset("ultrafast", "ultrafast"),
    preset("superfast", "superfast"),
    preset("veryfast", "veryfast"),
    preset("faster", "faster"),
    preset("fast", "fast"),
    preset("medium", "medium"),
    preset_default("slow", "slow"),
    preset("slower", "slower"),
    preset("veryslow", "veryslow"),
    preset("placebo", "placebo"),
];

// NVENC uses the p1-p7 scale (p1 = fastest, p7 = slowest/best)
pub const NVENC_PRESETS: &[PresetOption] = &[
    preset("p1", "p1:fastest"),
    preset("p2", "p2:faster"),
    preset("p3", "p3:fast"),
    preset("p4", "p4:medium"),
    preset_default("p5", "p5:slow"),
    preset("p6", "p6:slower"),
    preset("p7", "p7:slowest"),
];

pub const QSV_PRESETS: &[PresetOption] = &[
    preset("veryfast", "veryfast"),
    preset("faster", "faster"),
    preset("fast", "fast"),
    preset("medium", "medium"),
    preset_default("slow", "slow"),
    preset("slower", "slower"),
    preset("veryslow", "veryslow"),
];

pub const AMF_PRESETS: &[PresetOption] = &[
    preset("balanced", "balanced"),
    preset("speed", "speed"),
    preset_default("quality", "quality"),
];

/// Map a codec identifier to its preset vocabulary.
///
/// The three hardware encoders the host can report each carry their own
/// vocabulary; everything else (including the software codecs) falls back
/// to the generic table.
pub fn presets_for(codec: &str) -> &'static [PresetOption] {
    match codec {
        "h264_nvenc" => NVENC_PRESETS,
        "h264_qsv" => QSV_PRESETS,
        "h264_amf" => AMF_PRESETS,
        _ => SOFTWARE_PRESETS,
    }
}

/// Index of the entry flagged as the table's default.
pub fn default_index(table: &[PresetOption]) -> usize {
    table
        .iter()
        .position(|p| p.is_default)
        .unwrap_or(0)
}
