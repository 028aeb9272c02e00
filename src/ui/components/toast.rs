use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Clear, Paragraph, Widget};

use crate::app::{Toast, ToastKind};
use crate::ui::theme::Theme;

/// Newest toasts stacked in the top-right corner.
pub struct ToastStack<'a> {
    toasts: &'a [Toast],
    theme: &'a Theme,
}

impl<'a> ToastStack<'a> {
    pub fn new(toasts: &'a [Toast], theme: &'a Theme) -> Self {
        Self { toasts, theme }
    }
}

impl Widget for ToastStack<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let mut y = area.y + 1;

        for toast in self.toasts.iter().rev().take(3) {
            let width = (toast.text.chars().count() as u16 + 4).min(area.width);
            if y + 3 > area.y + area.height || width < 6 {
                break;
            }
            let rect = Rect::new(area.x + area.width - width, y, width, 3);
            let color = match toast.kind {
                ToastKind::Info => colors.accent(),
                ToastKind::Success => colors.success(),
                ToastKind::Warning => colors.warning(),
            };
            Clear.render(rect, buf);
            Paragraph::new(toast.text.as_str())
                .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
                .block(
                    Block::bordered()
                        .border_style(Style::default().fg(color))
                        .style(Style::default().bg(colors.bg())),
                )
                .render(rect, buf);
            y += 3;
        }
    }
}
