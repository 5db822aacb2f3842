use serde::{Deserialize, Serialize};

use super::message::Message;

/// The single persisted unit of user state: uploaded screenshot, the text
/// extracted from it, and the conversation so far.
///
/// `messages` only grows or is reset to empty; `extracted_text` is set once
/// per upload cycle and may be overwritten by a later upload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Data-URL-encoded screenshot, absent until the first upload
    pub screenshot: Option<String>,
    #[serde(default)]
    pub extracted_text: String,
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Session {
    /// Create an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// True when nothing worth persisting has happened yet
    pub fn is_empty(&self) -> bool {
        self.screenshot.is_none() && self.messages.is_empty()
    }

    /// Append a message, nudging its id past any existing one.
    ///
    /// Two messages created within the same millisecond would otherwise
    /// share an id.
    pub fn append_message(&mut self, mut message: Message) {
        while self.messages.iter().any(|m| m.id == message.id) {
            let next = message.id.parse::<i64>().map_or(0, |n| n + 1);
            message.id = next.to_string();
        }
        self.messages.push(message);
    }

    /// Last message, if any
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}
