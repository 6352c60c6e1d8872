//! Frame source that emits blank frames on a fixed interval.

use async_trait::async_trait;
use std::time::Duration;
use tokio::time::{interval, Interval, MissedTickBehavior};

use crate::domain::foundation::DomainError;
use crate::ports::{Frame, FrameSource};

/// Paces frame capture for a scripted classifier.
pub struct TickFrameSource {
    ticker: Interval,
    period: Duration,
    next_sequence: u64,
    limit: Option<u64>,
}

impl TickFrameSource {
    pub fn new(period: Duration) -> Self {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            ticker,
            period,
            next_sequence: 0,
            limit: None,
        }
    }

    /// Stops after `frames` frames.
    pub fn with_limit(mut self, frames: u64) -> Self {
        self.limit = Some(frames);
        self
    }
}

#[async_trait]
impl FrameSource for TickFrameSource {
    async fn next_frame(&mut self) -> Result<Option<Frame>, DomainError> {
        if self.limit.is_some_and(|limit| self.next_sequence >= limit) {
            return Ok(None);
        }
        self.ticker.tick().await;

        let sequence = self.next_sequence;
        self.next_sequence += 1;
        let offset = self.period.saturating_mul(u32::try_from(sequence).unwrap_or(u32::MAX));
        Ok(Some(Frame::new(sequence, offset)))
    }
}
