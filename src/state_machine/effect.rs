//! Effects produced by state transitions

use crate::transcript::Origin;
use std::time::Duration;

/// Effects to be executed, in order, after a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Append a message to the transcript
    AppendMessage { origin: Origin, text: String },

    /// Wait before running the next effect
    Pause(Duration),

    /// Feed `Event::PacingComplete` back into the machine
    CompletePacing,

    /// Replace the transcript with a lone greeting
    RestartTranscript { greeting: String },
}

impl Effect {
    pub fn system(text: impl Into<String>) -> Self {
        Effect::AppendMessage {
            origin: Origin::System,
            text: text.into(),
        }
    }

    pub fn participant(text: impl Into<String>) -> Self {
        Effect::AppendMessage {
            origin: Origin::Participant,
            text: text.into(),
        }
    }
}
