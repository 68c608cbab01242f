//! Time-paced greeting generator
//!
//! A [`MessageStream`] only advances while its consumer polls it. The clock is
//! read once the interval since the previous greeting has elapsed and the
//! consumer is asking for the next one, so nothing is produced ahead of
//! demand and each timestamp is taken at emission. A slow consumer delays its
//! own stream without losing events. Dropping the stream drops its pending
//! timer.

use async_stream::stream;
use chrono::{DateTime, Utc};
use futures::stream::Stream;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use crate::models::{MessageEvent, StreamRequest};

/// Default pause between two greetings
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// Source of the instant stamped on each greeting
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Builds independent greeting sequences
#[derive(Clone)]
pub struct MessageGenerator {
    interval: Duration,
    clock: Arc<dyn Clock>,
}

impl MessageGenerator {
    /// Generator stamping greetings with the system clock
    pub fn new(interval: Duration) -> Self {
        Self::with_clock(interval, Arc::new(SystemClock))
    }

    pub fn with_clock(interval: Duration, clock: Arc<dyn Clock>) -> Self {
        Self { interval, clock }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start an infinite greeting sequence for `request.name`
    ///
    /// The first greeting is emitted on the first poll; each following one
    /// at least one interval after the previous. Must be polled from within
    /// a tokio runtime.
    pub fn generate(&self, request: StreamRequest) -> MessageStream {
        debug!(name = %request.name, "greeting stream opened");

        let name = request.name.clone();
        let interval = self.interval;
        let clock = Arc::clone(&self.clock);

        let events = stream! {
            loop {
                let event = MessageEvent::greeting(&name, clock.now());
                let next_at = Instant::now() + interval;
                yield event;

                // Resumes only once the consumer asks again
                tokio::time::sleep_until(next_at).await;
            }
        };

        MessageStream {
            name: request.name,
            events: Box::pin(events),
        }
    }
}

impl Default for MessageGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }
}

impl std::fmt::Debug for MessageGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageGenerator")
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

/// Greeting sequence owned by one consumer
///
/// Never ends on its own.
pub struct MessageStream {
    name: String,
    events: Pin<Box<dyn Stream<Item = MessageEvent> + Send>>,
}

impl Stream for MessageStream {
    type Item = MessageEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.events.as_mut().poll_next(cx)
    }
}

impl std::fmt::Debug for MessageStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageStream")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Drop for MessageStream {
    fn drop(&mut self) {
        debug!(name = %self.name, "greeting stream closed");
    }
}
