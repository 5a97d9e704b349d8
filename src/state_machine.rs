//! Dialogue state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions: the
//! runtime feeds events in and interprets the effects that come out.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use state::{Session, Step};
pub use transition::{transition, InputProblem, TransitionError, TransitionResult};
