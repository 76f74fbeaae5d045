//! Per-Channel Exponential Smoothing
//!
//! Each configured channel owns one [`FilterState`]. A sample is folded in
//! with
//!
//! ```text
//! smoothed' = α·raw + (1 - α)·smoothed
//! ```
//!
//! and the first sample initializes `smoothed = raw`. α = 1 passes raw
//! readings straight through; small α trades latency for stability.
//!
//! ## Bounds
//!
//! An exponential average of values in `[min, max]` stays in `[min, max]`,
//! but single-precision rounding can overshoot by an ulp. The running min/max
//! are tracked and the result is clamped, so the bound holds exactly.
//!
//! ## Determinism
//!
//! Given the same ordered samples and α the bank produces bit-identical
//! output: there is no clock, randomness or cross-channel coupling.

use heapless::Vec;

use crate::{
    channels::ChannelId,
    config::QuestConfig,
    constants::buffers::MAX_CHANNELS,
    errors::{NoData, SampleError, SampleResult},
    sample::Sample,
    time::Timestamp,
};

/// Running accumulator for one channel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterState {
    smoothed: f32,
    count: u32,
    last_update: Timestamp,
    min: f32,
    max: f32,
}

impl FilterState {
    fn first(value: f32, timestamp: Timestamp) -> Self {
        Self {
            smoothed: value,
            count: 1,
            last_update: timestamp,
            min: value,
            max: value,
        }
    }

    fn fold(&mut self, value: f32, timestamp: Timestamp, alpha: f32) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);

        let next = alpha * value + (1.0 - alpha) * self.smoothed;
        self.smoothed = next.clamp(self.min, self.max);

        self.count = self.count.saturating_add(1);
        self.last_update = timestamp;
    }

    /// Current smoothed estimate
    pub fn smoothed(&self) -> f32 {
        self.smoothed
    }

    /// Samples folded in so far
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Timestamp of the last folded sample
    pub fn last_update(&self) -> Timestamp {
        self.last_update
    }

    /// Smallest raw value seen
    pub fn min(&self) -> f32 {
        self.min
    }

    /// Largest raw value seen
    pub fn max(&self) -> f32 {
        self.max
    }
}

/// Snapshot returned by filter reads
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterReading {
    /// Channel read
    pub channel: ChannelId,
    /// Smoothed value in the channel's raw unit
    pub smoothed: f32,
    /// Samples folded in
    pub count: u32,
    /// Time of the last folded sample
    pub last_update: Timestamp,
}

/// One filter per configured channel
#[derive(Debug, Clone)]
pub struct FilterBank {
    channels: Vec<(ChannelId, f32), MAX_CHANNELS>,
    states: Vec<Option<FilterState>, MAX_CHANNELS>,
}

impl FilterBank {
    /// Empty filters for every channel in `config`
    pub fn new(config: &QuestConfig) -> Self {
        let mut channels = Vec::new();
        let mut states = Vec::new();
        for channel in config.channels() {
            // Config holds at most MAX_CHANNELS, so neither push can fail
            let _ = channels.push((channel.id, channel.alpha));
            let _ = states.push(None);
        }

        Self { channels, states }
    }

    /// Fold a sample into its channel's filter and return the new estimate
    ///
    /// Only samples that passed ingest should arrive here; flagged samples
    /// and unknown channels are still refused without touching any state.
    pub fn apply(&mut self, sample: &Sample) -> SampleResult<f32> {
        let index = self
            .index_of(sample.channel())
            .ok_or(SampleError::UnknownChannel { channel: sample.channel() })?;
        self.apply_at(index, sample)
    }

    pub(crate) fn apply_at(&mut self, index: usize, sample: &Sample) -> SampleResult<f32> {
        if !sample.is_valid() {
            return Err(SampleError::Flagged { channel: sample.channel() });
        }

        let (channel, alpha) = self.channels[index];
        debug_assert_eq!(channel, sample.channel());

        if let Some(state) = self.states[index].as_mut() {
            state.fold(sample.value(), sample.timestamp(), alpha);
            return Ok(state.smoothed);
        }

        let state = FilterState::first(sample.value(), sample.timestamp());
        self.states[index] = Some(state);
        Ok(state.smoothed)
    }

    /// Current estimate for a channel
    pub fn reading(&self, channel: &str) -> Result<FilterReading, NoData> {
        match self.channels.iter().position(|(id, _)| id.as_str() == channel) {
            Some(index) => self.reading_at(index),
            None => Err(NoData { channel: ChannelId::truncated(channel) }),
        }
    }

    /// Current estimate for the channel at `index` in configuration order
    ///
    /// An index past the configured channels reads as `NoData` for an
    /// empty channel id.
    pub fn reading_at(&self, index: usize) -> Result<FilterReading, NoData> {
        let Some((channel, _)) = self.channels.get(index).copied() else {
            return Err(NoData { channel: ChannelId::truncated("") });
        };
        self.states
            .get(index)
            .copied()
            .flatten()
            .map(|state| FilterReading {
                channel,
                smoothed: state.smoothed,
                count: state.count,
                last_update: state.last_update,
            })
            .ok_or(NoData { channel })
    }

    /// Full accumulator for the channel at `index`
    pub fn state_at(&self, index: usize) -> Option<&FilterState> {
        self.states.get(index).and_then(Option::as_ref)
    }

    /// Number of channels
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// True if no channels are configured
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Forget all samples
    pub fn clear(&mut self) {
        for state in self.states.iter_mut() {
            *state = None;
        }
    }

    fn index_of(&self, channel: ChannelId) -> Option<usize> {
        self.channels.iter().position(|(id, _)| *id == channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::ChannelKind;
    use crate::config::ChannelConfig;

    fn bank(alpha: f32) -> FilterBank {
        let config = QuestConfig::builder()
            .add_channel(ChannelConfig::new("a", ChannelKind::Percent).unwrap().with_alpha(alpha))
            .add_channel(ChannelConfig::new("b", ChannelKind::Percent).unwrap())
            .build()
            .unwrap();
        FilterBank::new(&config)
    }

    fn sample(value: f32, timestamp: Timestamp) -> Sample {
        Sample::new(ChannelId::new("a").unwrap(), value, timestamp)
    }

    #[test]
    fn first_sample_initializes() {
        let mut filters = bank(0.5);
        assert_eq!(filters.apply(&sample(40.0, 1)).unwrap(), 40.0);

        let reading = filters.reading("a").unwrap();
        assert_eq!(reading.smoothed, 40.0);
        assert_eq!(reading.count, 1);
        assert_eq!(reading.last_update, 1);
    }

    #[test]
    fn smooths_with_alpha() {
        let mut filters = bank(0.5);
        let out: std::vec::Vec<f32> = [40.0, 80.0, 95.0, 95.0, 95.0]
            .iter()
            .enumerate()
            .map(|(i, v)| filters.apply(&sample(*v, i as u64 + 1)).unwrap())
            .collect();

        assert_eq!(out, [40.0, 60.0, 77.5, 86.25, 90.625]);
    }

    #[test]
    fn alpha_one_passes_through() {
        let mut filters = bank(1.0);
        filters.apply(&sample(10.0, 1)).unwrap();
        assert_eq!(filters.apply(&sample(70.0, 2)).unwrap(), 70.0);
    }

    #[test]
    fn unread_channel_is_no_data() {
        let mut filters = bank(0.5);
        filters.apply(&sample(10.0, 1)).unwrap();

        let err = filters.reading("b").unwrap_err();
        assert_eq!(err.channel.as_str(), "b");
        assert!(filters.reading("missing").is_err());
    }

    #[test]
    fn index_past_channels_is_no_data() {
        let mut filters = bank(0.5);
        filters.apply(&sample(10.0, 1)).unwrap();

        assert_eq!(filters.reading_at(0).unwrap().smoothed, 10.0);
        assert!(filters.reading_at(1).is_err());
        assert!(filters.reading_at(2).is_err());
        assert!(filters.reading_at(usize::MAX).is_err());
    }

    #[test]
    fn flagged_sample_leaves_state_untouched() {
        let mut filters = bank(0.5);
        filters.apply(&sample(10.0, 1)).unwrap();

        let bad = Sample::flagged(ChannelId::new("a").unwrap(), 99.0, 2);
        assert!(matches!(filters.apply(&bad), Err(SampleError::Flagged { .. })));
        assert_eq!(filters.reading("a").unwrap().smoothed, 10.0);
        assert_eq!(filters.reading("a").unwrap().count, 1);
    }

    #[test]
    fn tracks_min_max() {
        let mut filters = bank(0.3);
        for (i, v) in [5.0, 50.0, 20.0].iter().enumerate() {
            filters.apply(&sample(*v, i as u64)).unwrap();
        }
        let state = filters.state_at(0).unwrap();
        assert_eq!(state.min(), 5.0);
        assert_eq!(state.max(), 50.0);
        assert!(state.smoothed() >= 5.0 && state.smoothed() <= 50.0);
    }

    #[test]
    fn clear_forgets_everything() {
        let mut filters = bank(0.5);
        filters.apply(&sample(10.0, 1)).unwrap();
        filters.clear();
        assert!(filters.reading("a").is_err());
    }
}
