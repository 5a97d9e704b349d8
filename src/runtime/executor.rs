//! Chat session runtime executor

use super::traits::Pacer;
use super::{ChatHandle, ChatNotice, ChatSnapshot, Command};

use crate::script;
use crate::state_machine::{transition, Effect, Event, Session, TransitionError};
use crate::transcript::Transcript;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};

/// Drives one session: applies events through the pure transition function
/// and interprets the resulting effects in order.
pub struct ChatRuntime<P, R>
where
    P: Pacer + 'static,
    R: Rng + Send + 'static,
{
    session_id: String,
    session: Session,
    transcript: Transcript,
    pacer: P,
    rng: R,
    command_rx: mpsc::Receiver<Command>,
    snapshot_tx: watch::Sender<ChatSnapshot>,
    notice_tx: broadcast::Sender<ChatNotice>,
    line_in_flight: Arc<AtomicBool>,
}

impl<P, R> ChatRuntime<P, R>
where
    P: Pacer + 'static,
    R: Rng + Send + 'static,
{
    /// Build a runtime in its greeting state together with the handle that drives it
    pub fn new(session_id: impl Into<String>, pacer: P, rng: R) -> (Self, ChatHandle) {
        let session = Session::new();
        let transcript = Transcript::with_greeting(script::GREETING);

        let (command_tx, command_rx) = mpsc::channel(32);
        let (snapshot_tx, snapshot_rx) =
            watch::channel(ChatSnapshot::capture(&session, &transcript));
        let (notice_tx, _) = broadcast::channel(64);
        let line_in_flight = Arc::new(AtomicBool::new(false));

        let session_id = session_id.into();
        let handle = ChatHandle::new(
            session_id.clone(),
            command_tx,
            snapshot_rx,
            notice_tx.clone(),
            line_in_flight.clone(),
        );

        let runtime = Self {
            session_id,
            session,
            transcript,
            pacer,
            rng,
            command_rx,
            snapshot_tx,
            notice_tx,
            line_in_flight,
        };
        (runtime, handle)
    }

    /// Start the runtime on the current tokio runtime
    pub fn spawn(session_id: impl Into<String>, pacer: P, rng: R) -> ChatHandle {
        let (runtime, handle) = Self::new(session_id, pacer, rng);
        tokio::spawn(runtime.run());
        handle
    }

    /// Process commands until every handle is dropped
    pub async fn run(mut self) {
        tracing::info!(session_id = %self.session_id, "Starting chat session");

        // One command at a time: a reply cascade always finishes before the
        // next line is looked at.
        while let Some(Command { event, done }) = self.command_rx.recv().await {
            let is_line = matches!(event, Event::ParticipantLine { .. });
            let outcome = self.process_event(event).await;
            if is_line {
                self.line_in_flight.store(false, Ordering::Release);
            }

            if let Err(e) = &outcome {
                tracing::warn!(session_id = %self.session_id, error = %e, "Rejected event");
                let _ = self.notice_tx.send(ChatNotice::Rejected {
                    reason: e.to_string(),
                });
            }
            if let Some(done) = done {
                let _ = done.send(outcome);
            }
        }

        tracing::info!(session_id = %self.session_id, "Chat session stopped");
    }

    async fn process_event(&mut self, event: Event) -> Result<(), TransitionError> {
        // Effects may feed events back in (pacing completion)
        let mut events_to_process = vec![event];

        while let Some(current_event) = events_to_process.pop() {
            let result = transition(&self.session, current_event, &mut self.rng)?;

            if let Some(problem) = result.problem {
                tracing::debug!(session_id = %self.session_id, ?problem, "Asking again");
            }

            let old_session = std::mem::replace(&mut self.session, result.new_session);
            if old_session.step != self.session.step {
                tracing::debug!(
                    session_id = %self.session_id,
                    from = %old_session.step,
                    to = %self.session.step,
                    "Step changed"
                );
            }

            for effect in result.effects {
                if let Some(generated_event) = self.execute_effect(effect).await {
                    events_to_process.push(generated_event);
                }
            }
            self.publish();
        }

        Ok(())
    }

    /// Execute an effect and optionally return a generated event
    async fn execute_effect(&mut self, effect: Effect) -> Option<Event> {
        match effect {
            Effect::AppendMessage { origin, text } => {
                let message = self.transcript.append(origin, text).clone();
                self.publish();
                let _ = self.notice_tx.send(ChatNotice::Message(message));
                None
            }

            Effect::Pause(delay) => {
                self.pacer.pause(delay).await;
                None
            }

            Effect::CompletePacing => Some(Event::PacingComplete),

            Effect::RestartTranscript { greeting } => {
                self.transcript.restart(greeting);
                self.publish();
                let _ = self.notice_tx.send(ChatNotice::Restarted);
                None
            }
        }
    }

    fn publish(&self) {
        self.snapshot_tx
            .send_replace(ChatSnapshot::capture(&self.session, &self.transcript));
    }
}
