//! Terminal rendering of chat messages.
//!
//! Assistant replies are rendered as markdown through `termimad`; user
//! messages and errors are styled with `console`.

use termimad::crossterm::style::Color;
use termimad::MadSkin;

use relaychat_types::chat::{Message, Sender};

pub struct ChatRenderer {
    skin: MadSkin,
}

impl Default for ChatRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatRenderer {
    pub fn new() -> Self {
        let mut skin = MadSkin::default_dark();
        skin.bold.set_fg(Color::Cyan);
        skin.headers[0].set_fg(Color::Cyan);
        skin.headers[1].set_fg(Color::Cyan);
        skin.inline_code.set_fg(Color::Yellow);
        Self { skin }
    }

    /// Render markdown to a string of terminal escapes.
    pub fn render_markdown(&self, markdown: &str) -> String {
        self.skin.term_text(markdown).to_string()
    }

    /// Print an assistant reply, indented under a label.
    pub fn print_reply(&self, reply: &Message) {
        println!();
        println!(
            "  {} {}",
            console::style("Assistant").cyan().bold(),
            console::style(short_time(reply.timestamp())).dim()
        );
        for line in self.render_markdown(reply.text()).lines() {
            println!("  {line}");
        }
        println!();
    }

    /// Print an error line.
    pub fn print_error(&self, message: &str) {
        println!("\n  {} {}\n", console::style("!").red().bold(), console::style(message).red());
    }

    /// One line per message, for `/history`.
    pub fn print_history<'a>(&self, messages: impl IntoIterator<Item = &'a Message>) {
        println!();
        let mut any = false;
        for msg in messages {
            any = true;
            let label = match msg.sender() {
                Sender::User => console::style("You").green().bold(),
                Sender::Assistant => console::style("Assistant").cyan().bold(),
            };
            println!(
                "  {} {} {}",
                console::style(short_time(msg.timestamp())).dim(),
                label,
                preview(msg.text(), 100)
            );
        }
        if !any {
            println!("  {}", console::style("No messages yet.").dim());
        }
        println!();
    }
}

/// `HH:MM:SS` out of an RFC 3339 timestamp; the input unchanged otherwise.
fn short_time(timestamp: &str) -> &str {
    timestamp
        .split_once('T')
        .and_then(|(_, time)| time.get(..8))
        .unwrap_or(timestamp)
}

/// First line of `text`, cut to `max` characters with an ellipsis.
fn preview(text: &str, max: usize) -> String {
    let first_line = text.lines().next().unwrap_or("");
    if first_line.chars().count() > max || text.lines().nth(1).is_some() {
        let cut: String = first_line.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    } else {
        first_line.to_string()
    }
}
