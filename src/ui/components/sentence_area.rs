use std::time::Instant;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::app::Pronunciation;
use crate::engine::compare::{SentenceCheck, char_hint};
use crate::session::phase::DrillPhase;
use crate::session::sentence_drill::{SentenceDrill, SlotStatus};
use crate::ui::theme::Theme;

const PLACEHOLDER: char = '_';

pub struct SentenceArea<'a> {
    drill: &'a SentenceDrill,
    translation: &'a str,
    pronunciation: Option<&'a Pronunciation>,
    /// Missed words are queued and the word drill has not opened yet.
    remediation_pending: bool,
    theme: &'a Theme,
}

impl<'a> SentenceArea<'a> {
    pub fn new(drill: &'a SentenceDrill, translation: &'a str, theme: &'a Theme) -> Self {
        Self {
            drill,
            translation,
            pronunciation: None,
            remediation_pending: false,
            theme,
        }
    }

    pub fn pronunciation(mut self, pronunciation: Option<&'a Pronunciation>) -> Self {
        self.pronunciation = pronunciation;
        self
    }

    pub fn remediation_pending(mut self, pending: bool) -> Self {
        self.remediation_pending = pending;
        self
    }
}

/// Slot text padded with placeholders to the target word's length.
fn slot_display(typed: &str, target_len: usize) -> String {
    let typed_len = typed.chars().count();
    let mut out = typed.to_string();
    for _ in typed_len..target_len {
        out.push(PLACEHOLDER);
    }
    out
}

/// One feedback line per wrong word.
fn feedback_lines(check: &SentenceCheck) -> Vec<String> {
    check
        .errors
        .iter()
        .filter(|e| !e.correct.is_empty())
        .map(|e| {
            if e.submitted.is_empty() {
                format!("word {}: missing \"{}\"", e.index + 1, e.correct)
            } else {
                format!(
                    "word {}: \"{}\", {}",
                    e.index + 1,
                    e.submitted,
                    char_hint(&e.submitted, &e.correct)
                )
            }
        })
        .collect()
}

impl Widget for SentenceArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let drill = self.drill;

        let mut slot_spans: Vec<Span> = Vec::new();
        for (i, word) in drill.words.iter().enumerate() {
            if i > 0 {
                slot_spans.push(Span::raw("  "));
            }
            let text = slot_display(&drill.slots[i], word.chars().count());
            let mut style = match drill.slot_status(i) {
                SlotStatus::Correct => Style::default().fg(colors.text_correct()),
                SlotStatus::Incorrect => Style::default()
                    .fg(colors.text_incorrect())
                    .bg(colors.text_incorrect_bg()),
                SlotStatus::Pending => Style::default().fg(colors.fg()),
            };
            if i == drill.current && drill.phase.accepts_input() && !self.remediation_pending {
                style = Style::default()
                    .fg(colors.text_cursor_fg())
                    .bg(colors.text_cursor_bg());
            }
            slot_spans.push(Span::styled(text, style));
        }

        let mut lines = vec![
            Line::from(Span::styled(
                self.translation.to_string(),
                Style::default().fg(colors.accent()),
            )),
            Line::default(),
            Line::from(slot_spans),
            Line::default(),
        ];

        match drill.phase {
            DrillPhase::AdvancingDelay(timer) => {
                let secs = timer
                    .remaining(Instant::now())
                    .map(|d| d.as_secs() + 1)
                    .unwrap_or(0);
                lines.push(Line::from(vec![
                    Span::styled(
                        "Correct! ",
                        Style::default()
                            .fg(colors.success())
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("Next sentence in {secs}s, Enter to continue"),
                        Style::default().fg(colors.text_pending()),
                    ),
                ]));
            }
            DrillPhase::Checked { correct: false } => {
                if let Some(check) = &drill.last_check {
                    for text in feedback_lines(check) {
                        lines.push(Line::from(Span::styled(
                            text,
                            Style::default().fg(colors.error()),
                        )));
                    }
                }
                let prompt = if self.remediation_pending {
                    "Enter: practice the missed words"
                } else {
                    "Fill the cleared words, Enter to check again"
                };
                lines.push(Line::default());
                lines.push(Line::from(Span::styled(
                    prompt,
                    Style::default().fg(colors.warning()),
                )));
            }
            _ => {}
        }

        if let Some(p) = self.pronunciation {
            lines.push(Line::default());
            let mut spans = vec![Span::styled(
                format!("{} ", p.word),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )];
            if let Some(phonetic) = &p.phonetic {
                spans.push(Span::styled(
                    format!("{phonetic} "),
                    Style::default().fg(colors.fg()),
                ));
            }
            spans.push(Span::styled(
                p.translation.clone(),
                Style::default().fg(colors.text_pending()),
            ));
            lines.push(Line::from(spans));
        }

        let block = Block::bordered()
            .title(" Dictation ")
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::compare::check_sentence;

    #[test]
    fn test_slot_display_pads_to_word_length() {
        assert_eq!(slot_display("", 4), "____");
        assert_eq!(slot_display("bi", 4), "bi__");
        assert_eq!(slot_display("birds", 4), "birds");
    }

    #[test]
    fn test_feedback_lines_describe_each_error() {
        let check = check_sentence("A bird is flying", &["A", "brid", "is", ""]);
        let lines = feedback_lines(&check);
        assert_eq!(
            lines,
            vec![
                "word 2: \"brid\", letter 2 should be 'i', not 'r'".to_string(),
                "word 4: missing \"flying\"".to_string(),
            ]
        );
    }

    #[test]
    fn test_renders_slots_into_buffer() {
        let drill = SentenceDrill::new("Go out");
        let theme = Theme::default();
        let area = Rect::new(0, 0, 40, 10);
        let mut buf = Buffer::empty(area);
        SentenceArea::new(&drill, "出去", &theme).render(area, &mut buf);
        let row: String = (1..39).map(|x| buf[(x, 3)].symbol().to_string()).collect();
        assert!(row.contains("__  ___"));
    }
}
