//! # Message Rendering
//!
//! Pure mapping from a [`Message`] to the view the TUI draws. Keeping this
//! out of the widget code means the transcript rules (avatar per role,
//! literal text, uppercased source chips) are testable without a terminal.

use crate::core::conversation::{Message, Role};

/// Shown in the knowledge-base tab when the server reports no indexed files.
pub const EMPTY_KNOWLEDGE_BASE: &str = "Knowledge base is empty";

/// A source attribution chip under an assistant answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceChip {
    /// Raw source key as sent by the server ("docs", "db").
    pub source: String,
    /// Display label, uppercased.
    pub label: String,
}

/// Everything needed to draw one transcript bubble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageView {
    pub role: Role,
    pub avatar: &'static str,
    pub label: &'static str,
    /// Bubble text, already stripped of terminal control sequences.
    pub text: String,
    pub chips: Vec<SourceChip>,
}

pub fn render_message(message: &Message) -> MessageView {
    let (avatar, label) = match message.role {
        Role::User => ("👤", "you"),
        Role::Assistant => ("🤖", "assistant"),
    };

    let chips = message
        .sources
        .iter()
        .map(|source| SourceChip {
            source: source.clone(),
            label: plain_text(source).to_uppercase(),
        })
        .collect();

    MessageView {
        role: message.role,
        avatar,
        label,
        text: plain_text(&message.content),
        chips,
    }
}

/// Make server or user text safe to put on a terminal verbatim.
///
/// Newlines survive, tabs become spaces, CRLF collapses to LF and every
/// other control character (ESC included) is replaced with U+FFFD, so an
/// answer can never smuggle escape sequences into the terminal.
pub fn plain_text(text: &str) -> String {
    text.replace("\r\n", "\n")
        .chars()
        .map(|c| match c {
            '\n' => "\n".to_string(),
            '\t' => "    ".to_string(),
            c if c.is_control() => '\u{FFFD}'.to_string(),
            c => c.to_string(),
        })
        .collect()
}

/// Formats a byte count the way the file listing shows it ("1.5 MB").
pub fn format_size(bytes: u64) -> String {
    format!("{:.1} MB", bytes as f64 / 1024.0 / 1024.0)
}
