//! Quest Session: one quest, end to end
//!
//! The session owns every stage of a quest and is the only thing callers
//! talk to:
//!
//! ```text
//! ingest(channel, value, t)
//!     │
//!     ▼
//! IngestStage ──reject──▶ Err(SampleError)   (nothing else changes)
//!     │ admit
//!     ▼
//! FilterBank ──▶ QualityScorer ──▶ QuestMachine ──event?──▶ EventSink
//! ```
//!
//! Every call runs to completion before returning, so events reach the sink
//! in the order their transitions happened. `&mut self` makes the session
//! its quest's single writer; see [`SampleQueue`](crate::queue::SampleQueue)
//! and `SharedSession` for feeding it from several threads.

use crate::{
    config::QuestConfig,
    errors::{NoData, SampleError, SampleResult},
    events::QuestEvent,
    filter::{FilterBank, FilterReading},
    ingest::IngestStage,
    quest::{QuestMachine, QuestState, QuestTier},
    sample::Sample,
    scorer::{QualityScore, QualityScorer},
    sink::EventSink,
    time::{TimeSource, Timestamp},
};

/// Running counters for a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Samples that reached the filters
    pub accepted: u32,
    /// Samples refused at ingest
    pub rejected: u32,
    /// Events handed to the sink
    pub events_delivered: u32,
}

impl SessionStats {
    /// Create zeroed counters
    pub const fn new() -> Self {
        Self {
            accepted: 0,
            rejected: 0,
            events_delivered: 0,
        }
    }
}

/// A single quest with its sink
pub struct QuestSession<S: EventSink> {
    config: QuestConfig,
    ingest: IngestStage,
    filters: FilterBank,
    scorer: QualityScorer,
    machine: QuestMachine,
    sink: S,
    score: Option<QualityScore>,
    stats: SessionStats,
}

impl<S: EventSink> QuestSession<S> {
    /// Start a quest in `Lost`
    ///
    /// The configuration is fixed for the session's lifetime.
    pub fn new(config: QuestConfig, sink: S) -> Self {
        log_debug!(
            "quest session with {} channel(s) delivering to {}",
            config.channels().len(),
            sink.name()
        );

        Self {
            ingest: IngestStage::new(&config),
            filters: FilterBank::new(&config),
            scorer: QualityScorer::new(&config),
            machine: QuestMachine::new(&config),
            config,
            sink,
            score: None,
            stats: SessionStats::new(),
        }
    }

    /// Feed one raw reading
    pub fn ingest(&mut self, channel: &str, value: f32, timestamp: Timestamp) -> SampleResult<()> {
        match self.ingest.resolve(channel) {
            Ok(id) => self.ingest_sample(Sample::new(id, value, timestamp)),
            Err(err) => Err(self.reject(err)),
        }
    }

    /// Feed a prebuilt sample
    pub fn ingest_sample(&mut self, sample: Sample) -> SampleResult<()> {
        let index = match self.ingest.admit(&sample) {
            Ok(index) => index,
            Err(err) => return Err(self.reject(err)),
        };

        if let Err(err) = self.filters.apply_at(index, &sample) {
            return Err(self.reject(err));
        }
        self.stats.accepted = self.stats.accepted.saturating_add(1);

        let score = self.scorer.score(&self.filters, sample.timestamp());
        let event = self.machine.observe(score.value(), score.timestamp());
        self.score = Some(score);

        if let Some(event) = event {
            self.emit(event);
        }
        Ok(())
    }

    /// Check the abandonment clock at `now`
    ///
    /// Call this periodically when samples may stop arriving altogether.
    pub fn poll(&mut self, now: Timestamp) -> Option<QuestEvent> {
        let event = self.machine.poll(now)?;
        self.emit(event);
        Some(event)
    }

    /// [`poll`](Self::poll) using a time source
    pub fn poll_clock<T: TimeSource>(&mut self, clock: &T) -> Option<QuestEvent> {
        self.poll(clock.now())
    }

    /// Smoothed reading of one channel
    pub fn reading(&self, channel: &str) -> Result<FilterReading, NoData> {
        self.filters.reading(channel)
    }

    /// Score computed by the last accepted sample
    pub fn score(&self) -> Option<&QualityScore> {
        self.score.as_ref()
    }

    /// Fresh score of the current filters as of `at`, applying staleness
    pub fn score_at(&self, at: Timestamp) -> QualityScore {
        self.scorer.score(&self.filters, at)
    }

    /// Current quest state
    pub fn state(&self) -> QuestState {
        self.machine.state()
    }

    /// Current tier
    pub fn tier(&self) -> QuestTier {
        self.machine.tier()
    }

    /// Counters since construction
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Configuration the session runs with
    pub fn config(&self) -> &QuestConfig {
        &self.config
    }

    /// Registered sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Registered sink, mutably (e.g. to drain an [`EventLog`](crate::sink::EventLog))
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Start the quest over in `Lost` at `at`
    ///
    /// Filters and the last score are cleared and the abandonment clock
    /// restarts. Channel watermarks survive, so samples older than ones
    /// already accepted are still refused. No event is emitted.
    pub fn reset(&mut self, at: Timestamp) {
        self.machine.reset(at);
        self.filters.clear();
        self.score = None;
    }

    /// End the session and return its sink; no event is emitted
    pub fn teardown(self) -> S {
        log_debug!(
            "quest session torn down in {} after {} sample(s)",
            self.machine.tier(),
            self.stats.accepted
        );
        self.sink
    }

    fn emit(&mut self, event: QuestEvent) {
        self.sink.deliver(event);
        self.stats.events_delivered = self.stats.events_delivered.saturating_add(1);
    }

    fn reject(&mut self, err: SampleError) -> SampleError {
        self.stats.rejected = self.stats.rejected.saturating_add(1);
        log_warn!("rejected sample: {}", err);
        err
    }
}

impl<S: EventSink + core::fmt::Debug> core::fmt::Debug for QuestSession<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("QuestSession")
            .field("state", &self.machine.state())
            .field("stats", &self.stats)
            .field("sink", &self.sink)
            .finish()
    }
}
