//! Lock-Free Sample Queue for Concurrent Producers
//!
//! ## Overview
//!
//! A session is a single writer. When samples come from several places at
//! once (a receiver thread, an interrupt handler, a radio callback) they are
//! pushed into a [`SampleQueue`] and the owner of the session drains it:
//!
//! ```text
//! Producer A ──push──┐
//! Producer B ──push──┼──▶ SampleQueue<N> ──drain_into──▶ QuestSession
//! ISR        ──push──┘       (MPMC)
//! ```
//!
//! `push` never blocks. A full queue refuses the sample and counts the drop;
//! nothing already queued is overwritten.
//!
//! ## Capacity
//!
//! `N` must be a power of two. Each slot holds one `Sample` (32 bytes) plus a
//! sequence counter, so the default of 64 slots costs a little over 2 KB.
//!
//! ## Ordering
//!
//! Samples leave the queue in the order they entered it. Producers sharing a
//! channel must still agree on timestamp order; a sample overtaken by a newer
//! one on its channel is rejected at drain time like any other.

use core::sync::atomic::{AtomicU32, Ordering};

use heapless::mpmc::MpMcQueue;

use crate::{
    constants::buffers::SAMPLE_QUEUE_CAPACITY,
    sample::Sample,
    session::QuestSession,
    sink::EventSink,
};

/// Outcome of draining a queue into a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Samples the session accepted
    pub accepted: usize,
    /// Samples the session rejected
    pub rejected: usize,
}

impl DrainReport {
    /// Total samples taken off the queue
    pub fn total(&self) -> usize {
        self.accepted + self.rejected
    }
}

/// Queue counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    /// Samples enqueued
    pub pushed: u32,
    /// Samples refused because the queue was full
    pub dropped: u32,
}

/// Bounded multi-producer sample queue
///
/// ```rust
/// use signalquest_core::{queue::SampleQueue, ChannelId, Sample};
///
/// static QUEUE: SampleQueue<64> = SampleQueue::new();
///
/// fn on_reading(value: f32, timestamp: u64) {
///     if let Some(channel) = ChannelId::new("quality") {
///         if !QUEUE.push(Sample::new(channel, value, timestamp)) {
///             // Full; the drop is counted
///         }
///     }
/// }
/// # on_reading(40.0, 1);
/// ```
pub struct SampleQueue<const N: usize = SAMPLE_QUEUE_CAPACITY> {
    queue: MpMcQueue<Sample, N>,
    pushed: AtomicU32,
    dropped: AtomicU32,
}

impl<const N: usize> SampleQueue<N> {
    /// Create new empty queue
    ///
    /// Can be used in static context
    pub const fn new() -> Self {
        Self {
            queue: MpMcQueue::new(),
            pushed: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
        }
    }

    /// Enqueue a sample from any thread
    ///
    /// Returns false if the queue is full
    pub fn push(&self, sample: Sample) -> bool {
        match self.queue.enqueue(sample) {
            Ok(()) => {
                self.pushed.fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(_) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                log_warn!("sample queue full, dropped sample on {}", sample.channel());
                false
            }
        }
    }

    /// Dequeue the oldest sample
    pub fn pop(&self) -> Option<Sample> {
        self.queue.dequeue()
    }

    /// Feed every queued sample to `session`, oldest first
    pub fn drain_into<S: EventSink>(&self, session: &mut QuestSession<S>) -> DrainReport {
        self.drain_batch(session, usize::MAX)
    }

    /// Feed at most `max_samples` queued samples to `session`
    pub fn drain_batch<S: EventSink>(
        &self,
        session: &mut QuestSession<S>,
        max_samples: usize,
    ) -> DrainReport {
        let mut report = DrainReport::default();

        while report.total() < max_samples {
            let Some(sample) = self.queue.dequeue() else {
                break;
            };

            match session.ingest_sample(sample) {
                Ok(()) => report.accepted += 1,
                Err(_) => report.rejected += 1,
            }
        }

        report
    }

    /// Counters since construction
    pub fn stats(&self) -> QueueStats {
        QueueStats {
            pushed: self.pushed.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }

    /// Slot count
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for SampleQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::ChannelId;
    use crate::config::QuestConfig;
    use crate::sink::NullSink;

    fn sample(value: f32, timestamp: u64) -> Sample {
        Sample::new(ChannelId::new("quality").unwrap(), value, timestamp)
    }

    #[test]
    fn fifo_order() {
        let queue = SampleQueue::<8>::new();
        assert!(queue.push(sample(1.0, 1)));
        assert!(queue.push(sample(2.0, 2)));

        assert_eq!(queue.pop().map(|s| s.value()), Some(1.0));
        assert_eq!(queue.pop().map(|s| s.value()), Some(2.0));
        assert!(queue.pop().is_none());
    }

    #[test]
    fn full_queue_counts_drops() {
        let queue = SampleQueue::<4>::new();
        let mut accepted = 0;
        for t in 0..10 {
            if queue.push(sample(50.0, t)) {
                accepted += 1;
            }
        }

        let stats = queue.stats();
        assert_eq!(stats.pushed, accepted);
        assert_eq!(stats.dropped, 10 - accepted);
        assert!(stats.dropped > 0);
    }

    #[test]
    fn drain_reports_accepted_and_rejected() {
        let queue = SampleQueue::<8>::new();
        queue.push(sample(40.0, 10));
        queue.push(sample(40.0, 5)); // behind the first one
        queue.push(sample(40.0, 20));

        let mut session = QuestSession::new(QuestConfig::illustrative().unwrap(), NullSink);
        let report = queue.drain_into(&mut session);

        assert_eq!(report, DrainReport { accepted: 2, rejected: 1 });
        assert_eq!(session.stats().accepted, 2);
        assert!(queue.pop().is_none());
    }

    #[test]
    fn drain_batch_stops_at_limit() {
        let queue = SampleQueue::<8>::new();
        for t in 1..=5 {
            queue.push(sample(40.0, t));
        }

        let mut session = QuestSession::new(QuestConfig::illustrative().unwrap(), NullSink);
        assert_eq!(queue.drain_batch(&mut session, 3).total(), 3);
        assert_eq!(queue.drain_into(&mut session).total(), 2);
    }

    #[test]
    fn concurrent_producers() {
        let queue = SampleQueue::<64>::new();

        std::thread::scope(|scope| {
            for producer in 0..4u64 {
                let queue = &queue;
                scope.spawn(move || {
                    for i in 0..8u64 {
                        assert!(queue.push(sample(50.0, producer * 100 + i)));
                    }
                });
            }
        });

        let mut seen = 0;
        while queue.pop().is_some() {
            seen += 1;
        }
        assert_eq!(seen, 32);
        assert_eq!(queue.stats().pushed, 32);
    }
}
