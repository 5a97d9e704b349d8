//! Terminal host for the cocktail recipe chat
//!
//! Reads one answer per line from stdin and prints the bot's replies as they
//! arrive. `/reset` starts over, `/transcript` dumps the session as JSON and
//! `/quit` leaves. Lines typed at a terminal while the bot is still answering
//! are dropped.

use cocktail_chat::config::ChatConfig;
use cocktail_chat::runtime::{ChatHandle, ChatNotice, ProductionRuntime, SubmitError};
use cocktail_chat::state_machine::TransitionError;
use cocktail_chat::transcript::{Message, Origin};
use std::io::{BufRead, IsTerminal};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging; stdout belongs to the conversation
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cocktail_chat=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = ChatConfig::from_env();
    tracing::info!(
        seed = ?config.seed,
        pacing = config.pacing,
        pacing_scale = config.pacing_scale,
        "Starting cocktail chat"
    );

    let handle = ProductionRuntime::spawn("terminal", config.pacer(), config.rng());
    for message in handle.snapshot().messages {
        render(&message);
    }
    let printer = tokio::spawn(print_replies(handle.clone(), handle.notices()));

    // Piped scripts are meant to be read ahead; only interactive input is dropped
    let interactive = std::io::stdin().is_terminal();
    let (line_tx, mut lines) = mpsc::channel(64);
    std::thread::spawn(move || read_lines(&line_tx));

    while let Some(line) = lines.recv().await {
        match line.trim() {
            "/quit" | "/exit" => break,
            "/reset" | "/restart" => handle.reset().await?,
            "/transcript" => println!("{}", serde_json::to_string_pretty(&handle.snapshot())?),
            text => {
                let outcome = handle.submit(text).await;
                let skipped = if interactive {
                    discard_typed_ahead(&mut lines)
                } else {
                    0
                };
                if skipped > 0 {
                    println!("(ignored {skipped} line(s) typed while the bot was answering)");
                }
                match outcome {
                    Ok(()) | Err(SubmitError::Rejected(TransitionError::EmptyLine)) => {}
                    Err(SubmitError::Rejected(TransitionError::Finished)) => {
                        println!("(type /reset to make another cocktail)");
                    }
                    Err(SubmitError::Rejected(e)) => println!("({e})"),
                    Err(e @ SubmitError::Closed(_)) => return Err(e.into()),
                }
            }
        }
    }

    printer.abort();
    Ok(())
}

/// Forward stdin lines until EOF or the receiver goes away. Runs on its own
/// thread so a pending read never holds up runtime shutdown.
fn read_lines(line_tx: &mpsc::Sender<String>) {
    for line in std::io::stdin().lock().lines() {
        match line {
            Ok(line) => {
                if line_tx.blocking_send(line).is_err() {
                    break;
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to read from stdin");
                break;
            }
        }
    }
}

/// Drop lines that queued up while a submission was being answered, so they
/// are not taken as answers to prompts that were not on screen yet
fn discard_typed_ahead(lines: &mut mpsc::Receiver<String>) -> usize {
    let mut skipped = 0;
    while lines.try_recv().is_ok() {
        skipped += 1;
    }
    skipped
}

async fn print_replies(handle: ChatHandle, mut notices: broadcast::Receiver<ChatNotice>) {
    loop {
        match notices.recv().await {
            Ok(ChatNotice::Message(message)) => render(&message),
            Ok(ChatNotice::Restarted) => {
                println!();
                if let Some(greeting) = handle.snapshot().messages.first() {
                    render(greeting);
                }
            }
            Ok(ChatNotice::Rejected { .. }) => {}
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Terminal fell behind the conversation");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

fn render(message: &Message) {
    // The participant's own lines are already on screen
    if message.origin == Origin::System {
        println!("bot> {}", message.text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_discard_typed_ahead_empties_queue() {
        let (line_tx, mut lines) = mpsc::channel(8);
        for line in ["Gin", "no"] {
            line_tx.send(line.to_string()).await.unwrap();
        }

        assert_eq!(discard_typed_ahead(&mut lines), 2);
        assert_eq!(discard_typed_ahead(&mut lines), 0);

        line_tx.send("Rum".to_string()).await.unwrap();
        assert_eq!(lines.recv().await.as_deref(), Some("Rum"));
    }
}
