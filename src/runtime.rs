//! Runtime for executing chat sessions
//!
//! Each session runs as its own task that owns its [`Session`] and
//! [`Transcript`]. Hosts talk to it through a [`ChatHandle`]; several
//! independent sessions can be kept side by side in a [`SessionManager`].

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::ChatRuntime;
pub use traits::*;

use crate::config::ChatConfig;
use crate::state_machine::{Event, Session, Step, TransitionError};
use crate::transcript::{Message, Transcript};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot, watch, RwLock};

/// Type alias for the runtime hosts normally run
pub type ProductionRuntime = ChatRuntime<Arc<dyn Pacer>, StdRng>;

/// An event plus an optional channel to report how it went
#[derive(Debug)]
pub(crate) struct Command {
    pub event: Event,
    pub done: Option<oneshot::Sender<Result<(), TransitionError>>>,
}

/// What a host needs to render the chat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSnapshot {
    pub step: Step,
    /// False while the bot is mid-answer and once the conversation is done
    pub accepting_input: bool,
    pub cocktail_name: Option<String>,
    pub messages: Vec<Message>,
}

impl ChatSnapshot {
    pub fn capture(session: &Session, transcript: &Transcript) -> Self {
        Self {
            step: session.step,
            accepting_input: session.accepts_input(),
            cocktail_name: session.cocktail_name.clone(),
            messages: transcript.messages().to_vec(),
        }
    }
}

/// Incremental updates for hosts that render as things happen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatNotice {
    Message(Message),
    Restarted,
    Rejected { reason: String },
}

/// Errors surfaced to whoever holds a [`ChatHandle`]
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Rejected(#[from] TransitionError),
    #[error("Chat session {0} has stopped")]
    Closed(String),
}

/// Handle to interact with a running session
#[derive(Debug, Clone)]
pub struct ChatHandle {
    session_id: String,
    command_tx: mpsc::Sender<Command>,
    snapshot_rx: watch::Receiver<ChatSnapshot>,
    notice_tx: broadcast::Sender<ChatNotice>,
    /// Set while a submitted line is queued or being answered; shared by
    /// every clone and cleared by the runtime
    line_in_flight: Arc<AtomicBool>,
}

impl ChatHandle {
    pub(crate) fn new(
        session_id: String,
        command_tx: mpsc::Sender<Command>,
        snapshot_rx: watch::Receiver<ChatSnapshot>,
        notice_tx: broadcast::Sender<ChatNotice>,
        line_in_flight: Arc<AtomicBool>,
    ) -> Self {
        Self {
            session_id,
            command_tx,
            snapshot_rx,
            notice_tx,
            line_in_flight,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Submit one line of participant input.
    ///
    /// Resolves once the bot has finished answering, pauses included.
    /// Blank lines, lines sent while the session is not accepting input and
    /// lines sent while another line (from any clone) is still pending are
    /// refused without reaching the transcript.
    pub async fn submit(&self, line: &str) -> Result<(), SubmitError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(TransitionError::EmptyLine.into());
        }

        // Capacity first: once the line is claimed it is handed off without
        // another await, so a dropped future cannot leave the claim behind.
        let permit = self.reserve().await?;

        let step = self.snapshot_rx.borrow().step;
        if step.is_terminal() {
            return Err(TransitionError::Finished.into());
        }
        if step.is_transient() || self.line_in_flight.swap(true, Ordering::AcqRel) {
            return Err(TransitionError::Busy(step).into());
        }

        self.send(permit, Event::line(line)).await
    }

    /// Throw the conversation away and start over with the greeting
    pub async fn reset(&self) -> Result<(), SubmitError> {
        self.dispatch(Event::Reset).await
    }

    /// The latest published state
    pub fn snapshot(&self) -> ChatSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<ChatSnapshot> {
        self.snapshot_rx.clone()
    }

    pub fn notices(&self) -> broadcast::Receiver<ChatNotice> {
        self.notice_tx.subscribe()
    }

    async fn dispatch(&self, event: Event) -> Result<(), SubmitError> {
        let permit = self.reserve().await?;
        self.send(permit, event).await
    }

    async fn reserve(&self) -> Result<mpsc::Permit<'_, Command>, SubmitError> {
        self.command_tx
            .reserve()
            .await
            .map_err(|_| SubmitError::Closed(self.session_id.clone()))
    }

    async fn send(
        &self,
        permit: mpsc::Permit<'_, Command>,
        event: Event,
    ) -> Result<(), SubmitError> {
        let (done_tx, done_rx) = oneshot::channel();
        permit.send(Command {
            event,
            done: Some(done_tx),
        });

        done_rx
            .await
            .map_err(|_| SubmitError::Closed(self.session_id.clone()))?
            .map_err(SubmitError::from)
    }
}

/// Manager for all chat sessions
pub struct SessionManager {
    config: ChatConfig,
    sessions: RwLock<HashMap<String, ChatHandle>>,
}

impl SessionManager {
    pub fn new(config: ChatConfig) -> Self {
        Self {
            config,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Get or create a session
    pub async fn get_or_create(&self, session_id: &str) -> ChatHandle {
        // Check if already running
        {
            let sessions = self.sessions.read().await;
            if let Some(handle) = sessions.get(session_id) {
                return handle.clone();
            }
        }

        let mut sessions = self.sessions.write().await;
        sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                tracing::debug!(session_id = %session_id, "Creating chat session");
                ProductionRuntime::spawn(session_id, self.config.pacer(), self.config.rng())
            })
            .clone()
    }

    /// Drop a session; its task ends once outstanding handles are gone
    pub async fn remove(&self, session_id: &str) -> bool {
        self.sessions.write().await.remove(session_id).is_some()
    }

    pub async fn session_ids(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.sessions.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }
}
