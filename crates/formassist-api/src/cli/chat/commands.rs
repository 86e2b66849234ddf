//! Slash command parsing for the chat loop.
//!
//! Commands start with `/`; anything else is sent to the backend as a chat
//! message.

use std::path::PathBuf;

use console::style;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Exit the chat session.
    Exit,
    /// List the form catalog.
    Forms,
    /// Select a form by id.
    Select(String),
    /// Upload a document.
    Upload(PathBuf),
    /// Fill the selected form.
    Fill,
    /// Show the full timeline.
    History,
    /// Clear the error banner.
    Dismiss,
    /// Unknown command, or a known one missing its argument.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let (cmd, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((cmd, arg)) => (cmd.to_lowercase(), arg.trim()),
        None => (trimmed.to_lowercase(), ""),
    };

    let command = match cmd.as_str() {
        "/help" | "/h" | "/?" => ChatCommand::Help,
        "/exit" | "/quit" | "/q" => ChatCommand::Exit,
        "/forms" => ChatCommand::Forms,
        "/fill" => ChatCommand::Fill,
        "/history" => ChatCommand::History,
        "/dismiss" => ChatCommand::Dismiss,
        "/select" | "/form" if arg.is_empty() => {
            ChatCommand::Unknown("/select requires a form id".to_string())
        }
        "/select" | "/form" => ChatCommand::Select(arg.to_string()),
        "/upload" | "/up" if arg.is_empty() => {
            ChatCommand::Unknown("/upload requires a file path".to_string())
        }
        "/upload" | "/up" => ChatCommand::Upload(PathBuf::from(unquote(arg))),
        other => ChatCommand::Unknown(other.to_string()),
    };
    Some(command)
}

/// Strip one pair of matching quotes, so pasted paths with spaces work.
fn unquote(arg: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = arg
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    arg
}

/// Help text listing all available commands.
pub fn help_text() -> String {
    let rows = [
        ("/upload <path>", "Upload a document"),
        ("/forms", "List available forms"),
        ("/select <id>", "Choose the form to fill"),
        ("/fill", "Fill the selected form and save it"),
        ("/history", "Show the whole conversation"),
        ("/dismiss", "Clear the error banner"),
        ("/help", "Show this help message"),
        ("/exit", "End the session"),
    ];

    let mut out = format!("\n  {}\n\n", style("Available commands:").bold());
    for (cmd, desc) in rows {
        out.push_str(&format!("  {:<16} {}\n", style(cmd).cyan(), desc));
    }
    out.push_str(&format!(
        "\n  {}\n",
        style("Anything else is sent as a question. Ctrl+D to exit.").dim()
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_help_and_exit() {
        assert_eq!(parse("/help"), Some(ChatCommand::Help));
        assert_eq!(parse("/?"), Some(ChatCommand::Help));
        assert_eq!(parse("/exit"), Some(ChatCommand::Exit));
        assert_eq!(parse("/Q"), Some(ChatCommand::Exit));
    }

    #[test]
    fn test_parse_select() {
        assert_eq!(
            parse("/select I-765"),
            Some(ChatCommand::Select("I-765".to_string()))
        );
        assert_eq!(
            parse("/select"),
            Some(ChatCommand::Unknown("/select requires a form id".to_string()))
        );
    }

    #[test]
    fn test_parse_upload_paths() {
        assert_eq!(
            parse("/upload ~/docs/i94.pdf"),
            Some(ChatCommand::Upload(PathBuf::from("~/docs/i94.pdf")))
        );
        assert_eq!(
            parse(r#"/upload "My Scans/passport scan.pdf""#),
            Some(ChatCommand::Upload(PathBuf::from("My Scans/passport scan.pdf")))
        );
        assert_eq!(
            parse("/upload   "),
            Some(ChatCommand::Unknown("/upload requires a file path".to_string()))
        );
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse("/fill"), Some(ChatCommand::Fill));
        assert_eq!(parse("/forms"), Some(ChatCommand::Forms));
        assert_eq!(parse("/history"), Some(ChatCommand::History));
        assert_eq!(parse("  /dismiss  "), Some(ChatCommand::Dismiss));
    }

    #[test]
    fn test_parse_not_command() {
        assert_eq!(parse("how do I renew my EAD?"), None);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(parse("/foo bar"), Some(ChatCommand::Unknown("/foo".to_string())));
    }

    #[test]
    fn test_help_lists_every_command() {
        let help = help_text();
        for cmd in ["/upload", "/forms", "/select", "/fill", "/history", "/dismiss", "/exit"] {
            assert!(help.contains(cmd), "missing {cmd}");
        }
    }
}
