//! Shared terminal output: spinners and styled timeline entries.

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use formassist_types::message::{Message, MessageKind, Sender};

/// Start a spinner, hidden when `quiet` or `json` output is requested.
pub fn spinner(message: impl Into<String>, hidden: bool) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// One timeline entry as a styled line.
pub fn format_message(message: &Message) -> String {
    let time = message
        .timestamp
        .with_timezone(&chrono::Local)
        .format("%H:%M");
    let label = match message.sender {
        Sender::User => style("You").green().bold(),
        Sender::Bot => style("Assistant").cyan().bold(),
        Sender::System => style("System").magenta().bold(),
    };
    let content = match message.kind {
        MessageKind::Text => style(message.content.as_str()),
        MessageKind::Info => style(message.content.as_str()).dim(),
        MessageKind::Error => style(message.content.as_str()).red(),
    };
    format!("  {} {} {}", style(time).dim(), label, content)
}

/// A banner line for the current error.
pub fn format_banner(banner: &str) -> String {
    format!("  {} {}", style("!").red().bold(), style(banner).red())
}
