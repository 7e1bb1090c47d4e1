// The single form screen

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::ui::alert::AlertModal;
use crate::ui::components::{render_checkbox, Footer, Header};
use crate::ui::focus::FormFocus;
use crate::ui::state::{AppState, ExecPhase, InputMode};
use crate::ui::widgets::progress::{ProgressBar, ProgressState};

pub struct FormScreen;

impl FormScreen {
    pub fn render(frame: &mut Frame, state: &mut AppState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),  // header
                Constraint::Min(12),    // form body
                Constraint::Length(1),  // guide + progress
                Constraint::Length(8),  // log
                Constraint::Length(1),  // footer
            ])
            .split(frame.area());

        frame.render_widget(Header::new(&state.title), chunks[0]);
        render_body(frame, state, chunks[1]);
        render_status_line(frame, state, chunks[2]);
        render_log(frame, state, chunks[3]);
        frame.render_widget(Footer::form(), chunks[4]);

        if let Some(message) = state.alert.clone() {
            AlertModal::render(frame, &message);
        }
    }
}

fn render_body(frame: &mut Frame, state: &mut AppState, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    render_files_column(frame, state, columns[0]);
    render_settings_column(frame, state, columns[1]);
}

fn button_style(focused: bool) -> Style {
    if focused {
        Style::default().bg(Color::Blue).fg(Color::White).bold()
    } else {
        Style::default().fg(Color::White)
    }
}

fn render_files_column(frame: &mut Frame, state: &mut AppState, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Files ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // input picker button
            Constraint::Length(1), // file count
            Constraint::Min(3),    // file list
            Constraint::Length(1), // output picker button
            Constraint::Length(1), // output path
        ])
        .split(inner);

    let input_label = if state.input_folder_link.is_some() {
        "Select input files…  (F: open folder)"
    } else {
        "Select input files…"
    };
    frame.render_widget(
        Paragraph::new(input_label).style(button_style(state.focus == FormFocus::InputFiles)),
        rows[0],
    );

    frame.render_widget(
        Paragraph::new(format!("ファイル数:{}", state.form.input_count())),
        rows[1],
    );

    let list_focused = state.focus == FormFocus::InputList;
    let items: Vec<ListItem> = state
        .form
        .input_files
        .iter()
        .flatten()
        .enumerate()
        .map(|(i, entry)| {
            let check = if entry.need_caption { "[x]" } else { "[ ]" };
            let selected = state.file_selection == Some(i);
            let marker = if selected && list_focused { "≡>" } else { "≡ " };
            let mut line = Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::DarkGray)),
                Span::raw(" "),
                Span::raw(entry.display_name().to_string()),
                Span::raw("  "),
                Span::styled(check, Style::default().fg(Color::Cyan)),
            ]);
            if selected {
                line = line.style(Style::default().add_modifier(Modifier::REVERSED));
            }
            ListItem::new(line)
        })
        .collect();
    frame.render_widget(List::new(items), rows[2]);

    let output_label = if state.output_folder_link.is_some() {
        "Select output file…  (F: open folder)"
    } else {
        "Select output file…"
    };
    frame.render_widget(
        Paragraph::new(output_label).style(button_style(state.focus == FormFocus::OutputFile)),
        rows[3],
    );

    let output = state.form.output_file.as_deref().unwrap_or("-");
    frame.render_widget(
        Paragraph::new(output.to_string()).style(Style::default().fg(Color::Gray)),
        rows[4],
    );
}

fn render_settings_column(frame: &mut Frame, state: &mut AppState, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Settings ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),  // caption margin
            Constraint::Length(1),  // caption size
            Constraint::Length(1),  // caption color
            Constraint::Length(1),  // caption border color
            Constraint::Length(1),  // border width ratio
            Constraint::Length(1),  // caption display time
            Constraint::Length(1),  // caption font
            Constraint::Length(1),  // background color
            Constraint::Length(1),  // width / height
            Constraint::Length(1),  // fps / sample rate
            Constraint::Length(1),  // hw encode
            Constraint::Min(3),     // preset list
            Constraint::Length(1),  // exec / terminate
        ])
        .split(inner);

    let fields: [(&str, &str, FormFocus); 8] = [
        ("captionMargin", &state.form.caption_margin, FormFocus::CaptionMarginInput),
        ("captionSize", &state.form.caption_size, FormFocus::CaptionSizeInput),
        ("captionColor", &state.form.caption_color, FormFocus::CaptionColorInput),
        (
            "captionBorderColor",
            &state.form.caption_border_color,
            FormFocus::CaptionBorderColorInput,
        ),
        (
            "BorderWidthRatio",
            &state.form.border_width_ratio,
            FormFocus::BorderWidthRatioInput,
        ),
        (
            "captionDisplayTime",
            &state.form.caption_display_time,
            FormFocus::CaptionDisplayTimeInput,
        ),
        ("captionFont", &state.form.caption_font, FormFocus::CaptionFontButton),
        (
            "backgroundColor",
            &state.form.background_color,
            FormFocus::BackgroundColorInput,
        ),
    ];

    for (i, (label, value, focus)) in fields.iter().enumerate() {
        frame.render_widget(
            field_line(label, value, state, *focus),
            rows[i],
        );
    }

    frame.render_widget(
        pair_line(
            ("width", &state.form.width, FormFocus::WidthInput),
            ("height", &state.form.height, FormFocus::HeightInput),
            state,
        ),
        rows[8],
    );
    frame.render_widget(
        pair_line(
            ("fps", &state.form.fps, FormFocus::FpsInput),
            ("sampleRate", &state.form.sample_rate, FormFocus::SampleRateInput),
            state,
        ),
        rows[9],
    );

    render_checkbox(
        "HWEncode",
        state.form.hw_encode,
        state.focus == FormFocus::HwEncodeCheckbox,
        rows[10],
        frame.buffer_mut(),
    );

    let preset_items: Vec<ListItem> = state
        .presets
        .iter()
        .map(|p| ListItem::new(p.label))
        .collect();
    let preset_list = List::new(preset_items)
        .block(Block::default().borders(Borders::ALL).title(" preset "))
        .highlight_style(if state.focus == FormFocus::PresetList {
            Style::default().bg(Color::Blue).fg(Color::White)
        } else {
            Style::default().add_modifier(Modifier::REVERSED)
        });
    frame.render_stateful_widget(preset_list, rows[11], &mut state.preset_state);

    let exec_label = if state.is_running() {
        "[Enter] Terminate"
    } else {
        "[Enter] Execute"
    };
    frame.render_widget(
        Paragraph::new(exec_label).style(button_style(state.focus == FormFocus::ExecButton)),
        rows[12],
    );
}

fn field_line<'a>(
    label: &'a str,
    value: &'a str,
    state: &AppState,
    focus: FormFocus,
) -> Paragraph<'a> {
    let focused = state.focus == focus;
    let editing = focused && state.input_mode == InputMode::Editing;

    let label_style = if focused {
        Style::default().fg(Color::Yellow).bold()
    } else {
        Style::default().fg(Color::Gray)
    };
    let value_style = if editing {
        Style::default().fg(Color::White).add_modifier(Modifier::UNDERLINED)
    } else {
        Style::default().fg(Color::White)
    };

    Paragraph::new(Line::from(vec![
        Span::styled(format!("{label:<20}"), label_style),
        Span::styled(value, value_style),
        Span::raw(if editing { "▏" } else { "" }),
    ]))
}

fn pair_line<'a>(
    left: (&'a str, &'a str, FormFocus),
    right: (&'a str, &'a str, FormFocus),
    state: &AppState,
) -> Paragraph<'a> {
    let span_for = |(label, value, focus): (&'a str, &'a str, FormFocus)| {
        let focused = state.focus == focus;
        let style = if focused {
            Style::default().fg(Color::Yellow).bold()
        } else {
            Style::default().fg(Color::Gray)
        };
        vec![
            Span::styled(format!("{label}: "), style),
            Span::styled(
                if value.is_empty() { "(source)" } else { value },
                Style::default().fg(Color::White),
            ),
            Span::raw("   "),
        ]
    };

    let mut spans = span_for(left);
    spans.extend(span_for(right));
    Paragraph::new(Line::from(spans))
}

fn render_status_line(frame: &mut Frame, state: &AppState, area: Rect) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(20), Constraint::Min(10)])
        .split(area);

    let guide_style = match state.phase {
        ExecPhase::Running => Style::default().fg(Color::Yellow).add_modifier(Modifier::SLOW_BLINK),
        ExecPhase::Terminal if state.log_error => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::Gray),
    };
    frame.render_widget(
        Paragraph::new(state.guide.clone()).style(guide_style),
        halves[0],
    );

    if state.progress_visible {
        let bar_state = if state.log_error {
            ProgressState::Error
        } else {
            ProgressState::Running
        };
        frame.render_widget(
            ProgressBar::new(state.progress_ratio, &state.progress_label, bar_state),
            halves[1],
        );
    }
}

fn render_log(frame: &mut Frame, state: &AppState, area: Rect) {
    let style = if state.log_error {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Gray)
    };

    // Keep the tail in view; the log only ever grows during a run.
    let inner_height = area.height.saturating_sub(2) as usize;
    let lines: Vec<&str> = state.log.lines().collect();
    let start = lines.len().saturating_sub(inner_height);
    let visible = lines[start..].join("\n");

    let paragraph = Paragraph::new(visible)
        .style(style)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" process "));
    frame.render_widget(paragraph, area);
}
