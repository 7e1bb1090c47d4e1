// Focus management for the settings form

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFocus {
    // File selection
    #[default]
    InputFiles,
    InputList,
    OutputFile,

    // Caption settings
    CaptionMarginInput,
    CaptionSizeInput,
    CaptionColorInput,
    CaptionBorderColorInput,
    BorderWidthRatioInput,
    CaptionDisplayTimeInput,
    CaptionFontButton,

    // Output settings
    BackgroundColorInput,
    WidthInput,
    HeightInput,
    FpsInput,
    SampleRateInput,

    // Encoder
    HwEncodeCheckbox,
    PresetList,

    // Execution
    ExecButton,
}

const FOCUS_ORDER: &[FormFocus] = &[
    FormFocus::InputFiles,
    FormFocus::InputList,
    FormFocus::OutputFile,
    FormFocus::CaptionMarginInput,
    FormFocus::CaptionSizeInput,
    FormFocus::CaptionColorInput,
    FormFocus::CaptionBorderColorInput,
    FormFocus::BorderWidthRatioInput,
    FormFocus::CaptionDisplayTimeInput,
    FormFocus::CaptionFontButton,
    FormFocus::BackgroundColorInput,
    FormFocus::WidthInput,
    FormFocus::HeightInput,
    FormFocus::FpsInput,
    FormFocus::SampleRateInput,
    FormFocus::HwEncodeCheckbox,
    FormFocus::PresetList,
    FormFocus::ExecButton,
];

impl FormFocus {
    pub fn next(self) -> Self {
        let idx = FOCUS_ORDER.iter().position(|f| *f == self).unwrap_or(0);
        FOCUS_ORDER[(idx + 1) % FOCUS_ORDER.len()]
    }

    pub fn prev(self) -> Self {
        let idx = FOCUS_ORDER.iter().position(|f| *f == self).unwrap_or(0);
        FOCUS_ORDER[(idx + FOCUS_ORDER.len() - 1) % FOCUS_ORDER.len()]
    }

    /// Text fields that can enter editing mode.
    pub fn is_text_input(self) -> bool {
        matches!(
            self,
            FormFocus::CaptionMarginInput
                | FormFocus::CaptionSizeInput
                | FormFocus::CaptionColorInput
                | FormFocus::CaptionBorderColorInput
                | FormFocus::BorderWidthRatioInput
                | FormFocus::CaptionDisplayTimeInput
                | FormFocus::BackgroundColorInput
                | FormFocus::WidthInput
                | FormFocus::HeightInput
                | FormFocus::FpsInput
                | FormFocus::SampleRateInput
        )
    }
}
