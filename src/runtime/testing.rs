//! Test doubles for the runtime
//!
//! These let tests assert on pacing without waiting for it.

use super::traits::Pacer;
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

/// Pacer that returns immediately but remembers every requested delay
#[derive(Debug, Default)]
pub struct RecordingPacer {
    pauses: Mutex<Vec<Duration>>,
}

impl RecordingPacer {
    pub fn recorded(&self) -> Vec<Duration> {
        self.pauses.lock().unwrap().clone()
    }

    pub fn total(&self) -> Duration {
        self.recorded().into_iter().sum()
    }
}

#[async_trait]
impl Pacer for RecordingPacer {
    async fn pause(&self, delay: Duration) {
        self.pauses.lock().unwrap().push(delay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recording_pacer_keeps_order() {
        let pacer = RecordingPacer::default();
        pacer.pause(Duration::from_millis(300)).await;
        pacer.pause(Duration::from_millis(500)).await;

        assert_eq!(
            pacer.recorded(),
            vec![Duration::from_millis(300), Duration::from_millis(500)]
        );
        assert_eq!(pacer.total(), Duration::from_millis(800));
    }
}
