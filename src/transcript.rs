//! Chat transcript
//!
//! Append-only record of the messages exchanged in one session.

use serde::{Deserialize, Serialize};

/// Who produced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// The recipe bot
    System,
    /// The person typing answers
    Participant,
}

/// A single transcript entry. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Position in the transcript, unique per transcript
    pub id: usize,
    pub origin: Origin,
    pub text: String,
}

/// Ordered, append-only sequence of messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Start a transcript seeded with a single system greeting
    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        let mut transcript = Self::default();
        transcript.append(Origin::System, greeting);
        transcript
    }

    /// Append a message, assigning the next sequence id
    pub fn append(&mut self, origin: Origin, text: impl Into<String>) -> &Message {
        let id = self.messages.len();
        self.messages.push(Message {
            id,
            origin,
            text: text.into(),
        });
        &self.messages[id]
    }

    /// Discard everything and reseed with the greeting in one step
    pub fn restart(&mut self, greeting: impl Into<String>) {
        *self = Self::with_greeting(greeting);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}
