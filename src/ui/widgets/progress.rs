// Progress bar mirroring the host-reported ratio, with a percent label

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressState {
    Running,
    Error,
}

pub struct ProgressBar<'a> {
    ratio: f64,
    label: &'a str,
    state: ProgressState,
}

impl<'a> ProgressBar<'a> {
    pub fn new(ratio: f64, label: &'a str, state: ProgressState) -> Self {
        Self {
            ratio: ratio.clamp(0.0, 1.0),
            label,
            state,
        }
    }
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        // Leave room for the percentage label on the right.
        let label_width = (self.label.len() as u16 + 1).min(area.width);
        let bar_width = area.width - label_width;
        let filled_width = (bar_width as f64 * self.ratio).round() as u16;

        let filled_fg = match self.state {
            ProgressState::Running => Color::White,
            ProgressState::Error => Color::Red,
        };

        for x in 0..bar_width {
            let symbol = if x < filled_width { "█" } else { "░" };
            let fg = if x < filled_width {
                filled_fg
            } else {
                Color::DarkGray
            };
            buf.set_string(area.x + x, area.y, symbol, Style::default().fg(fg));
        }

        // The label never spills past the widget's right edge.
        let avail = area.width.saturating_sub(bar_width + 1) as usize;
        if avail == 0 {
            return;
        }
        let label: String = self.label.chars().take(avail).collect();
        buf.set_string(
            area.x + bar_width + 1,
            area.y,
            label,
            Style::default().fg(filled_fg),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_sits_right_of_the_bar() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 20, 1));
        ProgressBar::new(0.5, "50%", ProgressState::Running).render(Rect::new(0, 0, 20, 1), &mut buf);

        // label width 3 + gap 1 leaves a 16-cell bar
        let row: String = (0..20)
            .map(|x| buf.cell((x, 0)).unwrap().symbol().to_string())
            .collect();
        assert_eq!(&row[..], "████████░░░░░░░░ 50%");
    }

    #[test]
    fn narrow_area_truncates_instead_of_bleeding() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 10, 1));
        let area = Rect::new(0, 0, 3, 1);
        ProgressBar::new(1.0, "100%", ProgressState::Running).render(area, &mut buf);

        for x in area.width..10 {
            assert_eq!(buf.cell((x, 0)).unwrap().symbol(), " ", "cell {x} written");
        }
    }

    #[test]
    fn zero_sized_area_is_a_noop() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 10, 1));
        ProgressBar::new(0.5, "50%", ProgressState::Running).render(Rect::new(0, 0, 0, 0), &mut buf);
        assert_eq!(buf, Buffer::empty(Rect::new(0, 0, 10, 1)));
    }
}
