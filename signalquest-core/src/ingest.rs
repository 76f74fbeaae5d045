//! Sample Ingest: the gate in front of the filters
//!
//! Every raw reading passes the same checks, cheapest first:
//!
//! 1. **Channel**: must be configured for this quest
//! 2. **Flag**: the producer must not have marked it invalid
//! 3. **Number**: NaN and infinities are rejected
//! 4. **Range**: inside the channel's physical range (inclusive)
//! 5. **Order**: strictly after the channel's last accepted timestamp
//!
//! A rejected reading leaves no trace: the watermark only advances once all
//! checks pass. Equal timestamps count as a duplicate delivery and are
//! rejected as non-monotonic.

use heapless::Vec;

use crate::{
    channels::ChannelId,
    config::QuestConfig,
    constants::buffers::MAX_CHANNELS,
    errors::{SampleError, SampleResult},
    sample::Sample,
    time::Timestamp,
};

#[derive(Debug, Clone, Copy)]
struct ChannelLimits {
    id: ChannelId,
    min: f32,
    max: f32,
}

/// Validates samples and tracks per-channel timestamp watermarks
#[derive(Debug, Clone)]
pub struct IngestStage {
    limits: Vec<ChannelLimits, MAX_CHANNELS>,
    watermarks: Vec<Option<Timestamp>, MAX_CHANNELS>,
}

impl IngestStage {
    /// Gate for every channel in `config`
    pub fn new(config: &QuestConfig) -> Self {
        let mut limits = Vec::new();
        let mut watermarks = Vec::new();
        for channel in config.channels() {
            let _ = limits.push(ChannelLimits {
                id: channel.id,
                min: channel.min,
                max: channel.max,
            });
            let _ = watermarks.push(None);
        }

        Self { limits, watermarks }
    }

    /// Resolve a producer-supplied channel name
    pub fn resolve(&self, channel: &str) -> SampleResult<ChannelId> {
        self.limits
            .iter()
            .find(|l| l.id.as_str() == channel)
            .map(|l| l.id)
            .ok_or(SampleError::UnknownChannel { channel: ChannelId::truncated(channel) })
    }

    /// Run every check without changing state; returns the channel index
    pub fn check(&self, sample: &Sample) -> SampleResult<usize> {
        let channel = sample.channel();
        let index = self
            .limits
            .iter()
            .position(|l| l.id == channel)
            .ok_or(SampleError::UnknownChannel { channel })?;

        if !sample.is_valid() {
            return Err(SampleError::Flagged { channel });
        }

        let value = sample.value();
        if !value.is_finite() {
            return Err(SampleError::InvalidValue { channel });
        }

        let limits = &self.limits[index];
        check_range(channel, value, limits.min, limits.max)?;

        if let Some(last) = self.watermarks[index] {
            if sample.timestamp() <= last {
                return Err(SampleError::NonMonotonic {
                    channel,
                    timestamp: sample.timestamp(),
                    last,
                });
            }
        }

        Ok(index)
    }

    /// Check a sample and, if it passes, advance its channel's watermark
    pub fn admit(&mut self, sample: &Sample) -> SampleResult<usize> {
        let index = self.check(sample)?;
        self.watermarks[index] = Some(sample.timestamp());
        Ok(index)
    }

    /// Last accepted timestamp on a channel
    pub fn watermark(&self, channel: &str) -> Option<Timestamp> {
        self.limits
            .iter()
            .position(|l| l.id.as_str() == channel)
            .and_then(|index| self.watermarks[index])
    }
}

/// Check if a value is within the specified range
fn check_range(channel: ChannelId, value: f32, min: f32, max: f32) -> SampleResult<()> {
    if value < min || value > max {
        Err(SampleError::OutOfRange {
            channel,
            value,
            min,
            max,
        })
    } else {
        Ok(())
    }
}
