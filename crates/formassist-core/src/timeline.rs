//! Append-only message timeline with its error banner.
//!
//! The timeline is the only place user-visible events are recorded. Entries
//! are never edited or removed. Any append clears the banner, so a failure
//! banner stays up only until the next event of any kind.

use chrono::Utc;

use formassist_types::message::{Message, MessageKind, Sender};

/// Ordered log of chat-visible events plus the transient error banner.
#[derive(Debug, Clone, Default)]
pub struct MessageTimeline {
    messages: Vec<Message>,
    banner: Option<String>,
}

impl MessageTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry stamped with the current time and clear the banner.
    ///
    /// Timestamps are clamped to the previous entry so they never decrease,
    /// even if the wall clock steps backwards.
    pub fn append(&mut self, sender: Sender, content: impl Into<String>, kind: MessageKind) {
        let now = Utc::now();
        let timestamp = match self.messages.last() {
            Some(last) if last.timestamp > now => last.timestamp,
            _ => now,
        };
        self.messages.push(Message {
            sender,
            kind,
            content: content.into(),
            timestamp,
        });
        self.banner = None;
    }

    /// Show a persistent error banner.
    pub fn raise(&mut self, banner: impl Into<String>) {
        self.banner = Some(banner.into());
    }

    /// Clear the banner without appending. Returns whether one was shown.
    pub fn dismiss_banner(&mut self) -> bool {
        self.banner.take().is_some()
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    /// Current ordered view for rendering.
    pub fn snapshot(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
