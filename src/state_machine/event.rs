//! Events that drive the dialogue

/// Inputs to the transition function
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The participant confirmed a line of text
    ParticipantLine { text: String },
    /// Every effect of the previous transition has run, including pauses
    PacingComplete,
    /// Explicit "start over"
    Reset,
}

impl Event {
    pub fn line(text: impl Into<String>) -> Self {
        Event::ParticipantLine { text: text.into() }
    }
}
