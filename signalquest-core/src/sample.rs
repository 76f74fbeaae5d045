//! Raw samples as they enter the engine

use crate::channels::ChannelId;
use crate::time::Timestamp;

/// Single raw measurement on one channel
///
/// Immutable once built. A sample whose validity flag is false never reaches
/// a filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    channel: ChannelId,
    value: f32,
    timestamp: Timestamp,
    valid: bool,
}

impl Sample {
    /// Valid sample
    pub fn new(channel: ChannelId, value: f32, timestamp: Timestamp) -> Self {
        Self {
            channel,
            value,
            timestamp,
            valid: true,
        }
    }

    /// Sample the producer already knows to be bad (e.g. receiver reported
    /// the fix as invalid)
    pub fn flagged(channel: ChannelId, value: f32, timestamp: Timestamp) -> Self {
        Self {
            channel,
            value,
            timestamp,
            valid: false,
        }
    }

    /// Channel the sample belongs to
    pub fn channel(&self) -> ChannelId {
        self.channel
    }

    /// Raw reading in the channel's unit
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Acquisition time
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Whether the sample may be filtered
    pub fn is_valid(&self) -> bool {
        self.valid
    }
}
