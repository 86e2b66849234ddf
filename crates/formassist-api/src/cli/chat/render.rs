//! Incremental rendering of controller state.
//!
//! The chat loop wakes on every state change; `TimelineCursor` turns the new
//! state into just the lines that have not been printed yet.

use formassist_types::message::{Message, Sender};

/// Something the loop should print.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderEvent {
    Message(Message),
    Banner(String),
    BannerCleared,
}

/// Tracks how much of the timeline and banner has been shown.
#[derive(Debug, Default)]
pub struct TimelineCursor {
    seen: usize,
    banner: Option<String>,
    echo_user: bool,
}

impl TimelineCursor {
    /// `echo_user` controls whether user messages are printed; the input
    /// line already shows them in interactive mode.
    pub fn new(echo_user: bool) -> Self {
        Self {
            echo_user,
            ..Self::default()
        }
    }

    /// Events for everything that changed since the last call.
    pub fn advance(&mut self, messages: &[Message], banner: Option<&str>) -> Vec<RenderEvent> {
        let mut events: Vec<RenderEvent> = messages
            .iter()
            .skip(self.seen)
            .filter(|m| self.echo_user || m.sender != Sender::User)
            .cloned()
            .map(RenderEvent::Message)
            .collect();
        self.seen = self.seen.max(messages.len());

        if banner != self.banner.as_deref() {
            match banner {
                Some(text) => events.push(RenderEvent::Banner(text.to_string())),
                None => events.push(RenderEvent::BannerCleared),
            }
            self.banner = banner.map(str::to_string);
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formassist_types::message::MessageKind;

    fn msg(sender: Sender, content: &str) -> Message {
        Message {
            sender,
            kind: MessageKind::Text,
            content: content.to_string(),
            timestamp: chrono::Utc::now(),
        }
    }

    #[test]
    fn only_new_messages_are_emitted() {
        let mut cursor = TimelineCursor::new(true);
        let mut timeline = vec![msg(Sender::Bot, "Hello!")];

        assert_eq!(cursor.advance(&timeline, None).len(), 1);
        assert!(cursor.advance(&timeline, None).is_empty());

        timeline.push(msg(Sender::User, "hi"));
        timeline.push(msg(Sender::Bot, "How can I help?"));
        let events = cursor.advance(&timeline, None);
        assert_eq!(
            events,
            vec![
                RenderEvent::Message(timeline[1].clone()),
                RenderEvent::Message(timeline[2].clone()),
            ]
        );
    }

    #[test]
    fn user_messages_can_be_suppressed() {
        let mut cursor = TimelineCursor::new(false);
        let timeline = vec![msg(Sender::User, "hi"), msg(Sender::Bot, "hello")];
        let events = cursor.advance(&timeline, None);
        assert_eq!(events, vec![RenderEvent::Message(timeline[1].clone())]);
    }

    #[test]
    fn banner_changes_are_reported_once() {
        let mut cursor = TimelineCursor::new(true);
        assert_eq!(
            cursor.advance(&[], Some("Chat Error: rate limited")),
            vec![RenderEvent::Banner("Chat Error: rate limited".to_string())]
        );
        assert!(cursor.advance(&[], Some("Chat Error: rate limited")).is_empty());
        assert_eq!(cursor.advance(&[], None), vec![RenderEvent::BannerCleared]);
        assert!(cursor.advance(&[], None).is_empty());
    }
}
