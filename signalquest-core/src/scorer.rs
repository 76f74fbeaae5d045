//! Weighted Quality Scoring
//!
//! The scorer turns the filter bank's current estimates into one number on
//! the fixed 0-100 scale:
//!
//! ```text
//!            Σ  wᵢ · normalizeᵢ(smoothedᵢ)
//! score  =  ───────────────────────────────      over channels with data
//!                      Σ  wᵢ
//! ```
//!
//! ## Graceful Degradation
//!
//! A channel without data (never fed, or stale) is left out of both sums, so
//! a quest with one dead sensor is scored on the remaining ones rather than
//! dragged towards zero. With no live channels at all the score is 0.
//!
//! ## Purity
//!
//! `score` reads the filters and the weights fixed at construction and keeps
//! nothing between calls.

use heapless::Vec;

use crate::{
    channels::{ChannelId, ChannelKind},
    config::QuestConfig,
    constants::{buffers::MAX_CHANNELS, quality::{SCORE_MAX, SCORE_MIN}},
    filter::FilterBank,
    time::{elapsed_ms, Timestamp},
};

/// One channel's part in a score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contribution {
    /// Contributing channel
    pub channel: ChannelId,
    /// Configured weight
    pub weight: f32,
    /// Fraction of the score's denominator this channel holds (0-1)
    pub share: f32,
    /// Channel reading on the score scale (0-100)
    pub normalized: f32,
}

/// Aggregate quality at one instant
#[derive(Debug, Clone, PartialEq)]
pub struct QualityScore {
    value: f32,
    contributions: Vec<Contribution, MAX_CHANNELS>,
    timestamp: Timestamp,
}

impl QualityScore {
    /// Score with no contributing channels
    pub fn empty(timestamp: Timestamp) -> Self {
        Self {
            value: SCORE_MIN,
            contributions: Vec::new(),
            timestamp,
        }
    }

    /// Score value, always within `[SCORE_MIN, SCORE_MAX]`
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Channels that had data, in configuration order
    pub fn contributions(&self) -> &[Contribution] {
        &self.contributions
    }

    /// When the score was computed
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Share of a channel, `None` if it did not contribute
    pub fn share_of(&self, channel: &str) -> Option<f32> {
        self.contributions
            .iter()
            .find(|c| c.channel.as_str() == channel)
            .map(|c| c.share)
    }
}

#[derive(Debug, Clone, Copy)]
struct ScoredChannel {
    kind: ChannelKind,
    weight: f32,
    stale_after_ms: Option<u64>,
}

/// Stateless weighted aggregation over a [`FilterBank`]
#[derive(Debug, Clone)]
pub struct QualityScorer {
    channels: Vec<ScoredChannel, MAX_CHANNELS>,
}

impl QualityScorer {
    /// Scorer using the kinds, weights and staleness of `config`
    pub fn new(config: &QuestConfig) -> Self {
        let mut channels = Vec::new();
        for channel in config.channels() {
            let _ = channels.push(ScoredChannel {
                kind: channel.kind,
                weight: channel.weight,
                stale_after_ms: channel.stale_after_ms,
            });
        }

        Self { channels }
    }

    /// Score the filters' current readings as of `at`
    ///
    /// `filters` must have been built from the same configuration.
    pub fn score(&self, filters: &FilterBank, at: Timestamp) -> QualityScore {
        let mut contributions: Vec<Contribution, MAX_CHANNELS> = Vec::new();
        let mut numerator = 0.0;
        let mut denominator = 0.0;

        for (index, scored) in self.channels.iter().enumerate() {
            let Ok(reading) = filters.reading_at(index) else {
                continue;
            };

            if let Some(stale_after) = scored.stale_after_ms {
                if elapsed_ms(reading.last_update, at) > stale_after {
                    continue;
                }
            }

            let normalized = scored.kind.normalize(reading.smoothed);
            numerator += scored.weight * normalized;
            denominator += scored.weight;

            let _ = contributions.push(Contribution {
                channel: reading.channel,
                weight: scored.weight,
                share: 0.0,
                normalized,
            });
        }

        if !(denominator > 0.0) {
            return QualityScore {
                value: SCORE_MIN,
                contributions,
                timestamp: at,
            };
        }

        for contribution in contributions.iter_mut() {
            contribution.share = contribution.weight / denominator;
        }

        let value = numerator / denominator;
        let value = if value.is_finite() {
            value.clamp(SCORE_MIN, SCORE_MAX)
        } else {
            SCORE_MIN
        };

        QualityScore {
            value,
            contributions,
            timestamp: at,
        }
    }
}
