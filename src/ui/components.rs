// Reusable UI components (page chrome)

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

pub struct Header {
    content: Line<'static>,
}

impl Header {
    pub fn new(title: &str) -> Self {
        Self {
            content: Line::from(vec![Span::styled(
                format!(" {title} "),
                Style::default().fg(Color::Black).bg(Color::White).bold(),
            )]),
        }
    }
}

impl Widget for Header {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.content)
            .style(Style::default().bg(Color::White))
            .render(area, buf);
    }
}

pub struct Footer {
    content: Line<'static>,
}

impl Footer {
    pub fn form() -> Self {
        let controls = [
            ("[Tab]", " Next field"),
            ("[Enter]", " Select/Edit"),
            ("[Space]", " Toggle"),
            ("[Shift+↑/↓]", " Reorder"),
            ("[O]", "pen file"),
            ("[F]", "older"),
            ("[Q]", "uit"),
        ];

        let mut spans = vec![Span::raw("© 2026 ricevalley  |  ")];

        for (i, (hotkey, desc)) in controls.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(*hotkey, Style::default().fg(Color::Yellow)));
            spans.push(Span::raw(*desc));
        }

        Self {
            content: Line::from(spans),
        }
    }
}

impl Widget for Footer {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.content)
            .style(Style::default().bg(Color::DarkGray))
            .render(area, buf);
    }
}

pub fn render_checkbox(label: &str, checked: bool, focused: bool, area: Rect, buf: &mut Buffer) {
    let symbol = if checked { "[x]" } else { "[ ]" };
    let symbol_style = if focused {
        Style::default().fg(Color::Yellow).bold()
    } else {
        Style::default().fg(Color::Cyan)
    };

    let text = Line::from(vec![
        Span::styled(symbol, symbol_style),
        Span::raw(" "),
        Span::raw(label.to_string()),
    ]);

    buf.set_line(area.x, area.y, &text, area.width);
}
