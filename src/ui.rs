use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use lexikon::config::PracticeMode;
use lexikon::session::{Feedback, SessionPhase};

use crate::App;

const HORIZONTAL_MARGIN: u16 = 4;
const VERTICAL_MARGIN: u16 = 1;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let dim = Style::default().add_modifier(Modifier::DIM);
        let yellow_bold = bold.fg(Color::Yellow);
        let magenta = Style::default().fg(Color::Magenta);

        let session = &self.session;
        let stats = session.stats;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints(
                [
                    Constraint::Length(2),
                    Constraint::Length(1),
                    Constraint::Length(1),
                    Constraint::Min(1),
                    Constraint::Length(2),
                ]
                .as_ref(),
            )
            .split(area);

        // header: running stats plus the active category and modes
        let accuracy = if stats.total == 0 {
            0.0
        } else {
            stats.correct as f64 / stats.total as f64 * 100.0
        };
        let mut header = vec![
            Span::styled(format!("XP {}", stats.xp), bold),
            Span::raw("   "),
            Span::styled(format!("Accuracy {accuracy:.0}%"), bold),
            Span::raw("   "),
            Span::styled(format!("Streak {}", stats.streak), bold),
            Span::raw("   "),
            Span::styled(
                format!("{} · {}", session.category(), session.config.question_mode),
                dim,
            ),
        ];
        if session.config.practice_mode == PracticeMode::ReviewWrongBook {
            header.push(Span::raw("   "));
            header.push(Span::styled("WRONG BOOK REVIEW", yellow_bold));
        }
        if let Some(exam) = session.exam.filter(|e| e.active) {
            header.push(Span::raw("   "));
            header.push(Span::styled(
                format!("EXAM {} left · score {}", exam.remaining, exam.correct),
                magenta.patch(bold),
            ));
        }
        Paragraph::new(Line::from(header)).render(chunks[0], buf);

        let (done, per_round) = session.round_progress();
        Gauge::default()
            .gauge_style(Style::default().fg(Color::Blue))
            .ratio(done as f64 / per_round as f64)
            .label(format!("{done}/{per_round}"))
            .render(chunks[1], buf);

        match session.phase {
            SessionPhase::Exhausted => self.render_exam_result(chunks[3], buf),
            _ => self.render_question(chunks[3], buf),
        }

        // footer: key help and any pending guidance message
        let help = match session.phase {
            SessionPhase::AwaitingAnswer if self.is_spelling() => {
                "type the word · enter submit · ^s skip · ^b review · ^e exam · ^r reset · esc quit"
            }
            SessionPhase::AwaitingAnswer => {
                "↑/↓ or 1-4 choose · enter submit · s skip · b review · e exam · r reset · esc quit"
            }
            SessionPhase::AwaitingAdvance => "enter next question · esc quit",
            SessionPhase::Exhausted => "enter new round · esc quit",
        };
        let footer = if let Some(notice) = &self.notice {
            Line::from(Span::styled(notice.clone(), yellow_bold))
        } else {
            Line::from(Span::styled(help, dim))
        };
        Paragraph::new(footer)
            .alignment(Alignment::Center)
            .render(chunks[4], buf);
    }
}

impl App {
    fn render_question(&self, area: Rect, buf: &mut Buffer) {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let dim = Style::default().add_modifier(Modifier::DIM);
        let italic = Style::default().add_modifier(Modifier::ITALIC);
        let green_bold = bold.fg(Color::Green);
        let red_bold = bold.fg(Color::Red);
        let yellow_bold = bold.fg(Color::Yellow);

        let session = &self.session;
        let Some(question) = session.question() else {
            return;
        };

        let mut lines: Vec<Line> = Vec::new();
        let subtitle = if question.prompt_is_definition {
            "Definition"
        } else {
            "Word"
        };
        lines.push(Line::from(Span::styled(subtitle, dim)));
        lines.push(Line::from(Span::styled(question.prompt_text.clone(), bold)));

        if session.config.show_examples {
            if let Some(example) = session.current_example() {
                lines.push(Line::from(Span::styled(
                    format!("e.g. {example}"),
                    italic.patch(dim),
                )));
            }
        }
        lines.push(Line::default());

        if question.is_spelling() {
            let cursor = if session.phase == SessionPhase::AwaitingAnswer {
                "_"
            } else {
                ""
            };
            lines.push(Line::from(vec![
                Span::styled("> ", dim),
                Span::styled(format!("{}{cursor}", self.typed), bold),
            ]));
        } else {
            for (pos, text) in question.option_texts.iter().enumerate() {
                let marker = if pos == self.selected { "▸ " } else { "  " };
                let style = if pos == self.selected {
                    bold.fg(Color::Cyan)
                } else {
                    Style::default()
                };
                lines.push(Line::from(Span::styled(
                    format!("{marker}{}. {text}", pos + 1),
                    style,
                )));
            }
        }

        if session.phase == SessionPhase::AwaitingAdvance {
            lines.push(Line::default());
            let feedback_line = match session.feedback() {
                Some(Feedback::Correct) => Line::from(Span::styled("✓ Correct! +1 XP", green_bold)),
                Some(Feedback::NearAccepted { similarity }) => Line::from(Span::styled(
                    format!("✓ Close enough ({similarity:.0}% match) +1 XP"),
                    green_bold,
                )),
                Some(Feedback::Near { similarity, answer }) => Line::from(Span::styled(
                    format!("≈ Near miss ({similarity:.0}% match). Answer: {answer}"),
                    yellow_bold,
                )),
                Some(Feedback::Wrong { answer }) => {
                    Line::from(Span::styled(format!("✗ Wrong. Answer: {answer}"), red_bold))
                }
                None => Line::from(Span::styled("⏭ Skipped.", dim)),
            };
            lines.push(feedback_line);
        }

        // center the block vertically when it fits
        let content_height = lines
            .iter()
            .map(|l| {
                let w: usize = l.spans.iter().map(|s| s.content.width()).sum();
                (w as u16 / area.width.max(1)) + 1
            })
            .sum::<u16>();
        let top_pad = area.height.saturating_sub(content_height) / 2;
        let body = Rect {
            x: area.x,
            y: area.y + top_pad,
            width: area.width,
            height: area.height.saturating_sub(top_pad),
        };

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(body, buf);
    }

    fn render_exam_result(&self, area: Rect, buf: &mut Buffer) {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let Some(exam) = self.session.exam else {
            return;
        };
        let (correct, length) = exam.score();
        let lines = vec![
            Line::from(Span::styled("Exam finished", bold.fg(Color::Magenta))),
            Line::default(),
            Line::from(Span::styled(
                format!("Score: {correct}/{length}"),
                bold,
            )),
        ];
        let top_pad = area.height.saturating_sub(3) / 2;
        let body = Rect {
            x: area.x,
            y: area.y + top_pad,
            width: area.width,
            height: area.height.saturating_sub(top_pad),
        };
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(body, buf);
    }
}
