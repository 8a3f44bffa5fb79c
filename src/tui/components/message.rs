use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget};

use crate::core::conversation::Role;
use crate::core::render::MessageView;
use crate::tui::component::Component;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;
/// Tallest bubble drawn. Anything wrapping past this is cut off, so a
/// window of a few bubbles always fits in `u16` rows.
pub const MAX_BUBBLE_HEIGHT: u16 = u16::MAX / 4;

/// One transcript bubble: avatar and label in the border title, the text,
/// and a row of source chips under assistant answers.
///
/// Transient: built each frame from a `MessageView`. Text is wrapped with
/// `textwrap` both for measuring and for drawing, so the height the list
/// reserves is always the height drawn.
#[derive(Clone, Copy)]
pub struct Message<'a> {
    pub view: &'a MessageView,
}

impl<'a> Message<'a> {
    pub fn new(view: &'a MessageView) -> Self {
        Self { view }
    }

    /// Rows this bubble occupies at `width`, borders included.
    pub fn calculate_height(view: &MessageView, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            // Too narrow for borders and padding; still take one row.
            return 1;
        }
        let chip_rows = u16::from(!view.chips.is_empty());
        let max_text_rows = MAX_BUBBLE_HEIGHT - chip_rows - VERTICAL_OVERHEAD;
        let text_rows = wrap_text(view.text.trim(), content_width).len();
        let text_rows = u16::try_from(text_rows).unwrap_or(u16::MAX).min(max_text_rows);
        text_rows.max(1) + chip_rows + VERTICAL_OVERHEAD
    }

    fn role_style(role: Role) -> Style {
        match role {
            Role::User => Style::default().fg(Color::Green),
            Role::Assistant => Style::default().fg(Color::Blue),
        }
    }
}

fn wrap_text(text: &str, width: u16) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let options = textwrap::Options::new(width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace);
    textwrap::wrap(text, options)
        .into_iter()
        .map(|line| line.into_owned())
        .collect()
}

impl<'a> Widget for Message<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let style = Self::role_style(self.view.role);
        let border_style = style.add_modifier(Modifier::DIM);

        let block = Block::bordered()
            .title(format!("{} {}", self.view.avatar, self.view.label))
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title_style(style)
            .padding(Padding::horizontal(CONTENT_PAD_H));
        let inner = block.inner(area);
        block.render(area, buf);

        let chip_rows = u16::from(!self.view.chips.is_empty());
        let text_rows = usize::from(inner.height.saturating_sub(chip_rows).max(1));
        let mut lines: Vec<Line> = wrap_text(self.view.text.trim(), inner.width)
            .into_iter()
            .take(text_rows)
            .map(|text| Line::styled(text, style))
            .collect();

        if !self.view.chips.is_empty() {
            let chip_style = Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD);
            let mut spans = Vec::new();
            for chip in &self.view.chips {
                spans.push(Span::styled(format!(" {} ", chip.label), chip_style));
                spans.push(Span::raw(" "));
            }
            lines.push(Line::from(spans));
        }

        Paragraph::new(lines).render(inner, buf);
    }
}

impl<'a> Component for Message<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::conversation::Message as ChatMessage;
    use crate::core::render::render_message;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn user(text: &str) -> MessageView {
        render_message(&ChatMessage::user(text))
    }

    fn assistant(text: &str, sources: &[&str]) -> MessageView {
        render_message(&ChatMessage::assistant(
            text,
            sources.iter().map(|s| s.to_string()).collect(),
        ))
    }

    // ==========================================================================
    // calculate_height tests
    // ==========================================================================

    #[test]
    fn calculate_height_empty_content_keeps_one_row() {
        assert_eq!(Message::calculate_height(&user(""), 80), 1 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn calculate_height_zero_width_returns_minimum() {
        assert_eq!(Message::calculate_height(&user("Hello world"), 0), 1);
        assert_eq!(
            Message::calculate_height(&user("Hello world"), HORIZONTAL_OVERHEAD),
            1
        );
    }

    #[test]
    fn calculate_height_wraps_at_width_boundary() {
        // width 9 → content width 5: "Hello" | "world"
        assert_eq!(
            Message::calculate_height(&user("Hello world"), 9),
            2 + VERTICAL_OVERHEAD
        );
    }

    #[test]
    fn calculate_height_counts_chip_row() {
        let plain = assistant("Answer", &[]);
        let sourced = assistant("Answer", &["docs", "db"]);
        assert_eq!(
            Message::calculate_height(&sourced, 80),
            Message::calculate_height(&plain, 80) + 1
        );
    }

    #[test]
    fn calculate_height_caps_huge_answers() {
        let text = vec!["line"; 100_000].join("\n");
        let view = assistant(&text, &["docs"]);
        assert_eq!(Message::calculate_height(&view, 40), MAX_BUBBLE_HEIGHT);
    }

    #[test]
    fn render_keeps_chips_when_text_is_cut_off() {
        let text = vec!["line"; 50].join("\n");
        let view = assistant(&text, &["docs"]);
        let backend = TestBackend::new(40, 10);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| f.render_widget(Message::new(&view), f.area()))
            .unwrap();
        let text = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>();
        assert!(text.contains("DOCS"));
    }

    #[test]
    fn render_shows_avatar_text_and_chips() {
        let view = assistant("Hi there", &["docs"]);
        let backend = TestBackend::new(40, Message::calculate_height(&view, 40));
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                f.render_widget(Message::new(&view), f.area());
            })
            .unwrap();

        let text = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>();
        assert!(text.contains("assistant"));
        assert!(text.contains("Hi there"));
        assert!(text.contains("DOCS"));
    }
}
