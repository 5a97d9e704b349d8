//! Trait abstractions for runtime pacing
//!
//! The state machine only says "pause for this long"; a [`Pacer`] decides
//! what that means. Tests and scripted hosts use [`InstantPacer`] so a whole
//! reply cascade runs without waiting.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Interprets `Effect::Pause`
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, delay: Duration);
}

#[async_trait]
impl<T: Pacer + ?Sized> Pacer for Arc<T> {
    async fn pause(&self, delay: Duration) {
        (**self).pause(delay).await;
    }
}

// ============================================================================
// Production Adapters
// ============================================================================

/// Sleeps on the tokio timer, optionally stretched or shrunk
#[derive(Debug, Clone, Copy)]
pub struct TimerPacer {
    scale: f64,
}

impl TimerPacer {
    /// Largest accepted stretch factor
    pub const MAX_SCALE: f64 = 100.0;

    /// `scale` is clamped into `0.0..=MAX_SCALE`; NaN counts as 1.0
    pub fn new(scale: f64) -> Self {
        let scale = if scale.is_nan() {
            1.0
        } else {
            scale.clamp(0.0, Self::MAX_SCALE)
        };
        Self { scale }
    }

    pub fn scaled(&self, delay: Duration) -> Duration {
        delay.mul_f64(self.scale)
    }
}

impl Default for TimerPacer {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[async_trait]
impl Pacer for TimerPacer {
    async fn pause(&self, delay: Duration) {
        tokio::time::sleep(self.scaled(delay)).await;
    }
}

/// Zero-duration pacing
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantPacer;

#[async_trait]
impl Pacer for InstantPacer {
    async fn pause(&self, _delay: Duration) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_is_clamped() {
        let base = Duration::from_millis(500);
        assert_eq!(TimerPacer::new(-2.0).scaled(base), Duration::ZERO);
        assert_eq!(TimerPacer::new(f64::NAN).scaled(base), base);
        assert_eq!(TimerPacer::new(0.5).scaled(base), Duration::from_millis(250));
        assert_eq!(TimerPacer::new(1e9).scaled(base), Duration::from_secs(50));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_pacer_sleeps_scaled_delay() {
        let pacer = TimerPacer::new(2.0);
        let start = tokio::time::Instant::now();
        pacer.pause(Duration::from_millis(500)).await;
        assert!(start.elapsed() >= Duration::from_secs(1));
    }
}
