//! Common test utilities for integration tests
//!
//! This module provides:
//! - Deterministic signal generators (no external RNG)
//! - Pre-built quest scenarios with their expected outcomes
//! - Helpers for running readings through a session

#![allow(dead_code)]

use signalquest_core::{
    sink::EventLog, QuestConfig, QuestEvent, QuestSession, SampleResult, Timestamp,
};

pub mod generators;
pub mod scenarios;

/// One raw reading as a producer would report it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedReading {
    pub channel: &'static str,
    pub value: f32,
    pub timestamp: Timestamp,
}

impl TimedReading {
    pub fn new(channel: &'static str, value: f32, timestamp: Timestamp) -> Self {
        Self { channel, value, timestamp }
    }
}

/// Event log large enough for any scenario in this suite
pub type TestLog = EventLog<64>;

/// Fresh session with a roomy event log
pub fn session(config: QuestConfig) -> QuestSession<TestLog> {
    QuestSession::new(config, EventLog::new())
}

/// Feed readings in order, collecting each ingest result
pub fn feed(
    session: &mut QuestSession<TestLog>,
    readings: &[TimedReading],
) -> Vec<SampleResult<()>> {
    readings
        .iter()
        .map(|r| session.ingest(r.channel, r.value, r.timestamp))
        .collect()
}

/// Events delivered so far, oldest first
pub fn events(session: &QuestSession<TestLog>) -> Vec<QuestEvent> {
    session.sink().events().to_vec()
}

/// Each event must start where the previous one ended
pub fn assert_chained(events: &[QuestEvent]) {
    for pair in events.windows(2) {
        assert_eq!(
            pair[0].current, pair[1].previous,
            "event chain broken: {} then {}", pair[0], pair[1]
        );
        assert!(pair[0].timestamp <= pair[1].timestamp);
    }
}
