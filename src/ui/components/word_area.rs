use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::content::lexicon::Translation;
use crate::engine::compare::{HintCell, WordHint};
use crate::session::phase::DrillPhase;
use crate::session::word_drill::WordDrill;
use crate::ui::theme::Theme;

pub struct WordArea<'a> {
    drill: &'a WordDrill,
    phonetic: Option<&'a str>,
    translation: &'a Translation,
    /// Words still queued after this one.
    remaining: usize,
    theme: &'a Theme,
}

impl<'a> WordArea<'a> {
    pub fn new(
        drill: &'a WordDrill,
        phonetic: Option<&'a str>,
        translation: &'a Translation,
        remaining: usize,
        theme: &'a Theme,
    ) -> Self {
        Self {
            drill,
            phonetic,
            translation,
            remaining,
            theme,
        }
    }

    fn hint_spans(&self, hint: &WordHint) -> Vec<Span<'static>> {
        let colors = &self.theme.colors;
        hint.cells()
            .into_iter()
            .map(|cell| match cell {
                HintCell::Confirmed(c) => {
                    Span::styled(c.to_string(), Style::default().fg(colors.text_correct()))
                }
                HintCell::Next(c) => Span::styled(
                    c.to_string(),
                    Style::default()
                        .fg(colors.hint_next())
                        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                ),
                HintCell::Revealed(c) => {
                    Span::styled(c.to_string(), Style::default().fg(colors.fg()))
                }
                HintCell::Masked => Span::styled(
                    WordHint::PLACEHOLDER.to_string(),
                    Style::default().fg(colors.text_pending()),
                ),
            })
            .collect()
    }
}

impl Widget for WordArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let drill = self.drill;

        let mut lines = Vec::new();
        if let Some(phonetic) = self.phonetic {
            lines.push(Line::from(Span::styled(
                phonetic.to_string(),
                Style::default().fg(colors.accent()),
            )));
        }

        let reveal = drill.hint.as_ref().is_some_and(WordHint::reveals_translation)
            || drill.phase.is_advancing();
        if reveal {
            lines.push(Line::from(Span::styled(
                self.translation.to_string(),
                Style::default().fg(colors.text_pending()),
            )));
        }
        lines.push(Line::default());

        let input_style = match drill.phase {
            DrillPhase::AdvancingDelay(_) => Style::default().fg(colors.success()),
            DrillPhase::Checked { correct: false } => Style::default()
                .fg(colors.text_incorrect())
                .bg(colors.text_incorrect_bg()),
            _ => Style::default().fg(colors.fg()),
        };
        lines.push(Line::from(vec![
            Span::styled("> ", Style::default().fg(colors.accent_dim())),
            Span::styled(drill.input.clone(), input_style),
            Span::styled(
                " ",
                Style::default().bg(colors.text_cursor_bg()),
            ),
        ]));
        lines.push(Line::default());

        if let Some(hint) = &drill.hint {
            let mut spans = vec![Span::styled(
                "Hint: ",
                Style::default().fg(colors.text_pending()),
            )];
            spans.extend(self.hint_spans(hint));
            lines.push(Line::from(spans));
        }

        match drill.phase {
            DrillPhase::AdvancingDelay(_) => lines.push(Line::from(Span::styled(
                "Correct! Enter to continue",
                Style::default()
                    .fg(colors.success())
                    .add_modifier(Modifier::BOLD),
            ))),
            DrillPhase::Checked { correct: false } => {
                let text = match drill.wrong_letter() {
                    Some(n) => format!("Letter {n} is wrong. Type again or press Enter to retry"),
                    None => "Not quite. Type again or press Enter to retry".to_string(),
                };
                lines.push(Line::from(Span::styled(
                    text,
                    Style::default().fg(colors.warning()),
                )));
            }
            _ => {}
        }

        let title = if self.remaining > 0 {
            format!(" Spell the word ({} more after this) ", self.remaining)
        } else {
            " Spell the word ".to_string()
        };
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
