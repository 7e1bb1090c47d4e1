// Integration tests for generateVideo payload assembly
//
// Exercises the full form-to-payload path: selection state, filtering,
// color rewriting, and the preset vocabulary the payload draws from.

use capmix::presets::presets_for;
use capmix::settings::{build_payload, InputEntry, SettingsForm};
use serde_json::{json, Value};

fn completed_form() -> SettingsForm {
    SettingsForm {
        input_files: Some(vec![
            InputEntry::new("/clips/intro.mp4"),
            InputEntry::new("/clips/body.mp4"),
        ]),
        output_file: Some("/out/final.mp4".to_string()),
        caption_font: "/fonts/NotoSansJP.otf".to_string(),
        width: "1920".to_string(),
        height: "1080".to_string(),
        fps: "30".to_string(),
        sample_rate: "48000".to_string(),
        ..SettingsForm::default()
    }
}

#[test]
fn complete_form_produces_the_full_key_set() {
    let payload = build_payload(&completed_form());

    let expected = [
        "inputVideo",
        "needCaption",
        "outputVideo",
        "captionMargin",
        "captionSize",
        "captionColor",
        "captionBorderColor",
        "BorderWidthRatio",
        "captionDisplayTime",
        "captionFont",
        "backgroundColor",
        "width",
        "height",
        "fps",
        "sampleRate",
        "preset",
        "HWEncode",
    ];
    for key in expected {
        assert!(payload.contains_key(key), "missing key {key}");
    }
    assert_eq!(payload.len(), expected.len());
}

#[test]
fn untouched_form_submits_host_defaults() {
    let payload = build_payload(&SettingsForm::default());

    assert_eq!(payload["inputVideo"], Value::Null);
    assert_eq!(payload["outputVideo"], Value::Null);
    assert_eq!(payload["captionMargin"], json!("50"));
    assert_eq!(payload["captionSize"], json!("90"));
    assert_eq!(payload["captionColor"], json!("0xffffff"));
    assert_eq!(payload["captionBorderColor"], json!("0x000000"));
    assert_eq!(payload["BorderWidthRatio"], json!("0.05"));
    assert_eq!(payload["captionDisplayTime"], json!("5"));
    assert_eq!(payload["backgroundColor"], json!("0xffffff"));
    assert_eq!(payload["preset"], json!("slow"));
    assert_eq!(payload["HWEncode"], json!("false"));

    // Source-derived fields stay absent until the user fills them in.
    for key in ["width", "height", "fps", "sampleRate", "captionFont"] {
        assert!(!payload.contains_key(key), "{key} should be omitted");
    }
}

#[test]
fn payload_serializes_to_stable_json() {
    let payload = build_payload(&completed_form());
    let text = serde_json::to_string(&payload).unwrap();
    let back: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(back["inputVideo"], json!(["/clips/intro.mp4", "/clips/body.mp4"]));
    assert_eq!(back["needCaption"], json!([true, true]));
    assert_eq!(back["outputVideo"], json!("/out/final.mp4"));
}

#[test]
fn preset_vocabulary_matches_codec_tables() {
    let mut form = completed_form();
    form.hw_encode = true;

    for (codec, default) in [
        ("h264_nvenc", "p5"),
        ("h264_qsv", "slow"),
        ("h264_amf", "quality"),
        ("libx264", "slow"),
    ] {
        let table = presets_for(codec);
        let default_option = table.iter().find(|p| p.is_default).unwrap();
        assert_eq!(default_option.key, default, "default for {codec}");

        form.preset = default_option.key.to_string();
        let payload = build_payload(&form);
        assert_eq!(payload["preset"], json!(default));
    }
}

#[test]
fn unknown_codec_falls_back_to_software_presets() {
    let table = presets_for("hevc_videotoolbox");
    let keys: Vec<&str> = table.iter().map(|p| p.key).collect();
    assert_eq!(
        keys,
        [
            "ultrafast",
            "superfast",
            "veryfast",
            "faster",
            "fast",
            "medium",
            "slow",
            "slower",
            "veryslow",
            "placebo"
        ]
    );
}
