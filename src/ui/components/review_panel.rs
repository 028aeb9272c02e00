use chrono::{DateTime, Utc};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget, Wrap};

use crate::engine::review::{ReviewEntry, ReviewQueue};
use crate::ui::theme::Theme;

/// Due items, either as the passive banner or as the interactive picker.
pub struct ReviewPanel<'a> {
    queue: &'a ReviewQueue,
    word_limit: usize,
    sentence_limit: usize,
    selected: Option<usize>,
    now: DateTime<Utc>,
    theme: &'a Theme,
}

impl<'a> ReviewPanel<'a> {
    pub fn new(
        queue: &'a ReviewQueue,
        word_limit: usize,
        sentence_limit: usize,
        now: DateTime<Utc>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            queue,
            word_limit,
            sentence_limit,
            selected: None,
            now,
            theme,
        }
    }

    pub fn selected(mut self, index: usize) -> Self {
        self.selected = Some(index);
        self
    }

    /// One-line summary for narrow layouts.
    pub fn summary(queue: &ReviewQueue) -> String {
        format!(
            "{} word(s), {} sentence(s) due",
            queue.words.len(),
            queue.sentences.len()
        )
    }
}

pub fn practiced_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);
    if elapsed.num_days() >= 1 {
        format!("{}d ago", elapsed.num_days())
    } else if elapsed.num_hours() >= 1 {
        format!("{}h ago", elapsed.num_hours())
    } else {
        format!("{}m ago", elapsed.num_minutes().max(0))
    }
}

impl Widget for ReviewPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let entries = self.queue.visible(self.word_limit, self.sentence_limit);
        let (more_words, more_sentences) =
            self.queue.overflow(self.word_limit, self.sentence_limit);

        let mut lines: Vec<Line> = Vec::new();
        for (i, entry) in entries.iter().enumerate() {
            let (tag, tag_color) = match entry {
                ReviewEntry::Word(_) => ("W", colors.accent()),
                ReviewEntry::Sentence(_) => ("S", colors.warning()),
            };
            let is_selected = self.selected == Some(i);
            let key_style = if is_selected {
                Style::default()
                    .fg(colors.bg())
                    .bg(colors.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };
            lines.push(Line::from(vec![
                Span::styled(format!("{tag} "), Style::default().fg(tag_color)),
                Span::styled(entry.key().to_string(), key_style),
                Span::styled(
                    format!("  {}", practiced_ago(entry.last_practiced(), self.now)),
                    Style::default().fg(colors.text_pending()),
                ),
            ]));
        }
        if more_words + more_sentences > 0 {
            lines.push(Line::from(Span::styled(
                format!("+{} more", more_words + more_sentences),
                Style::default().fg(colors.text_pending()),
            )));
        }

        let title = if self.selected.is_some() {
            " Review: Enter start, l later, Esc close "
        } else {
            " Due for review (Ctrl+R) "
        };
        let border = if self.selected.is_some() {
            colors.border_focused()
        } else {
            colors.border()
        };
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(colors.bg()));

        if self.selected.is_some() {
            Clear.render(area, buf);
        }
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}
