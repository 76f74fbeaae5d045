//! Quest configuration and its builder
//!
//! A [`QuestConfig`] is assembled once, validated once, and is immutable for
//! the lifetime of the session built from it. Every structural mistake is
//! reported by [`QuestConfigBuilder::build`] as a [`ConfigError`]; nothing is
//! re-checked at runtime.
//!
//! ```rust
//! use signalquest_core::{ChannelKind, QuestConfig};
//! use signalquest_core::config::{ChannelConfig, DwellCounts, TierThresholds};
//!
//! let config = QuestConfig::builder()
//!     .add_channel(ChannelConfig::new("rssi", ChannelKind::Rssi)?.with_alpha(0.3))
//!     .add_channel(ChannelConfig::new("quality", ChannelKind::Percent)?.with_weight(0.5))
//!     .thresholds(TierThresholds::new(25.0, 55.0, 85.0))
//!     .dwell(DwellCounts::uniform(2))
//!     .abandon_after_ms(30_000)
//!     .build()?;
//!
//! assert_eq!(config.channels().len(), 2);
//! # Ok::<(), signalquest_core::ConfigError>(())
//! ```

use heapless::Vec;

use crate::{
    channels::{ChannelId, ChannelKind},
    constants::{
        buffers::MAX_CHANNELS,
        quality::*,
        time::DEFAULT_ABANDON_TIMEOUT_MS,
    },
    errors::{ConfigError, ConfigResult},
    quest::QuestTier,
};

/// Per-channel filter, scoring and range settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelConfig {
    /// Channel identifier used by producers
    pub id: ChannelId,
    /// Kind, selects range and normalization
    pub kind: ChannelKind,
    /// Exponential smoothing constant in (0, 1]
    pub alpha: f32,
    /// Relative weight in the aggregate score
    pub weight: f32,
    /// Lowest accepted raw value
    pub min: f32,
    /// Highest accepted raw value
    pub max: f32,
    /// Readings older than this are ignored by the scorer
    pub stale_after_ms: Option<u64>,
}

impl ChannelConfig {
    /// Channel with the kind's physical range and staleness, default
    /// smoothing and weight
    pub fn new(id: &str, kind: ChannelKind) -> ConfigResult<Self> {
        let id = ChannelId::new(id).ok_or(ConfigError::InvalidChannelId {
            reason: "must be 1-15 bytes",
        })?;
        let (min, max) = kind.physical_range();

        Ok(Self {
            id,
            kind,
            alpha: DEFAULT_SMOOTHING_ALPHA,
            weight: DEFAULT_CHANNEL_WEIGHT,
            min,
            max,
            stale_after_ms: kind.default_stale_after_ms(),
        })
    }

    /// Override the smoothing constant
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    /// Override the scoring weight
    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    /// Narrow (or widen) the accepted raw range
    pub fn with_range(mut self, min: f32, max: f32) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Override the staleness window; `None` keeps readings forever
    pub fn with_stale_after(mut self, stale_after_ms: Option<u64>) -> Self {
        self.stale_after_ms = stale_after_ms;
        self
    }

    fn validate(&self) -> ConfigResult<()> {
        if !(self.alpha.is_finite() && self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(ConfigError::InvalidAlpha { channel: self.id, alpha: self.alpha });
        }

        if !(self.weight.is_finite() && self.weight >= 0.0) {
            return Err(ConfigError::InvalidWeight { channel: self.id, weight: self.weight });
        }

        if !(self.min.is_finite() && self.max.is_finite() && self.min < self.max) {
            return Err(ConfigError::InvalidRange { channel: self.id, min: self.min, max: self.max });
        }

        Ok(())
    }
}

/// Score each tier must reach, strictly increasing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierThresholds {
    /// Entry score for `Acquiring`
    pub acquiring: f32,
    /// Entry score for `Locked`
    pub locked: f32,
    /// Entry score for `Discovered`
    pub discovered: f32,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            acquiring: DEFAULT_ACQUIRING_THRESHOLD,
            locked: DEFAULT_LOCKED_THRESHOLD,
            discovered: DEFAULT_DISCOVERED_THRESHOLD,
        }
    }
}

impl TierThresholds {
    /// Thresholds for the three scored tiers
    pub const fn new(acquiring: f32, locked: f32, discovered: f32) -> Self {
        Self { acquiring, locked, discovered }
    }

    /// Entry threshold of a scored tier, `None` for `Lost` and `Abandoned`
    pub fn threshold(&self, tier: QuestTier) -> Option<f32> {
        match tier {
            QuestTier::Acquiring => Some(self.acquiring),
            QuestTier::Locked => Some(self.locked),
            QuestTier::Discovered => Some(self.discovered),
            QuestTier::Lost | QuestTier::Abandoned => None,
        }
    }

    /// Highest scored tier whose threshold `score` meets, else `Lost`
    pub fn tier_for(&self, score: f32) -> QuestTier {
        if score >= self.discovered {
            QuestTier::Discovered
        } else if score >= self.locked {
            QuestTier::Locked
        } else if score >= self.acquiring {
            QuestTier::Acquiring
        } else {
            QuestTier::Lost
        }
    }

    fn validate(&self) -> ConfigResult<()> {
        let all_finite = self.acquiring.is_finite()
            && self.locked.is_finite()
            && self.discovered.is_finite();
        if !all_finite {
            return Err(ConfigError::UnorderedThresholds { reason: "not finite" });
        }
        if self.acquiring <= SCORE_MIN {
            return Err(ConfigError::UnorderedThresholds { reason: "acquiring must be above 0" });
        }
        if self.locked <= self.acquiring {
            return Err(ConfigError::UnorderedThresholds { reason: "locked must exceed acquiring" });
        }
        if self.discovered <= self.locked {
            return Err(ConfigError::UnorderedThresholds { reason: "discovered must exceed locked" });
        }
        if self.discovered > SCORE_MAX {
            return Err(ConfigError::UnorderedThresholds { reason: "discovered must not exceed 100" });
        }
        Ok(())
    }
}

/// Consecutive observations needed to cross each tier boundary
///
/// The same count applies to entering a tier (score at or above its
/// threshold) and to leaving it (score below its threshold minus the release
/// margin).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DwellCounts {
    /// Boundary between `Lost` and `Acquiring`
    pub acquiring: u16,
    /// Boundary between `Acquiring` and `Locked`
    pub locked: u16,
    /// Boundary between `Locked` and `Discovered`
    pub discovered: u16,
}

impl Default for DwellCounts {
    fn default() -> Self {
        Self::uniform(DEFAULT_DWELL_SAMPLES)
    }
}

impl DwellCounts {
    /// Same dwell for every boundary
    pub const fn uniform(samples: u16) -> Self {
        Self {
            acquiring: samples,
            locked: samples,
            discovered: samples,
        }
    }

    /// Dwell for a scored tier's boundary, `None` for `Lost` and `Abandoned`
    pub fn dwell(&self, tier: QuestTier) -> Option<u16> {
        match tier {
            QuestTier::Acquiring => Some(self.acquiring),
            QuestTier::Locked => Some(self.locked),
            QuestTier::Discovered => Some(self.discovered),
            QuestTier::Lost | QuestTier::Abandoned => None,
        }
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.acquiring == 0 {
            return Err(ConfigError::ZeroDwell { tier: "acquiring" });
        }
        if self.locked == 0 {
            return Err(ConfigError::ZeroDwell { tier: "locked" });
        }
        if self.discovered == 0 {
            return Err(ConfigError::ZeroDwell { tier: "discovered" });
        }
        Ok(())
    }
}

/// Validated, immutable quest configuration
#[derive(Debug, Clone)]
pub struct QuestConfig {
    channels: Vec<ChannelConfig, MAX_CHANNELS>,
    thresholds: TierThresholds,
    dwell: DwellCounts,
    release_margin: f32,
    abandon_after_ms: u64,
}

impl QuestConfig {
    /// Start building a configuration
    pub fn builder() -> QuestConfigBuilder {
        QuestConfigBuilder::new()
    }

    /// Single percent channel named `"quality"` with the default thresholds
    /// (30/60/90), smoothing (0.5) and dwell (3)
    pub fn illustrative() -> ConfigResult<Self> {
        Self::builder()
            .add_channel(ChannelConfig::new("quality", ChannelKind::Percent)?)
            .build()
    }

    /// Configured channels, in declaration order
    pub fn channels(&self) -> &[ChannelConfig] {
        &self.channels
    }

    /// Position of a channel in [`channels`](Self::channels)
    pub fn channel_index(&self, id: &str) -> Option<usize> {
        self.channels.iter().position(|c| c.id.as_str() == id)
    }

    /// Tier thresholds
    pub fn thresholds(&self) -> &TierThresholds {
        &self.thresholds
    }

    /// Dwell counts
    pub fn dwell(&self) -> &DwellCounts {
        &self.dwell
    }

    /// Hysteresis band below a threshold before demotion counts
    pub fn release_margin(&self) -> f32 {
        self.release_margin
    }

    /// Time without a qualifying observation before abandonment
    pub fn abandon_after_ms(&self) -> u64 {
        self.abandon_after_ms
    }
}

/// Builder for [`QuestConfig`]
#[derive(Debug, Clone)]
pub struct QuestConfigBuilder {
    channels: Vec<ChannelConfig, MAX_CHANNELS>,
    overflowed: bool,
    thresholds: TierThresholds,
    dwell: DwellCounts,
    release_margin: f32,
    abandon_after_ms: u64,
}

impl QuestConfigBuilder {
    /// Empty builder with default thresholds, dwell and timeout
    pub fn new() -> Self {
        Self {
            channels: Vec::new(),
            overflowed: false,
            thresholds: TierThresholds::default(),
            dwell: DwellCounts::default(),
            release_margin: DEFAULT_RELEASE_MARGIN,
            abandon_after_ms: DEFAULT_ABANDON_TIMEOUT_MS,
        }
    }

    /// Add a channel
    pub fn add_channel(mut self, channel: ChannelConfig) -> Self {
        if self.channels.push(channel).is_err() {
            self.overflowed = true;
        }
        self
    }

    /// Set tier thresholds
    pub fn thresholds(mut self, thresholds: TierThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Set dwell counts
    pub fn dwell(mut self, dwell: DwellCounts) -> Self {
        self.dwell = dwell;
        self
    }

    /// Set the demotion hysteresis band
    pub fn release_margin(mut self, margin: f32) -> Self {
        self.release_margin = margin;
        self
    }

    /// Set the abandonment timeout
    pub fn abandon_after_ms(mut self, timeout_ms: u64) -> Self {
        self.abandon_after_ms = timeout_ms;
        self
    }

    /// Validate and freeze the configuration
    pub fn build(self) -> ConfigResult<QuestConfig> {
        if self.overflowed {
            return Err(ConfigError::TooManyChannels { limit: MAX_CHANNELS });
        }
        if self.channels.is_empty() {
            return Err(ConfigError::NoChannels);
        }

        let mut total_weight = 0.0;
        for (i, channel) in self.channels.iter().enumerate() {
            channel.validate()?;
            if self.channels[..i].iter().any(|c| c.id == channel.id) {
                return Err(ConfigError::DuplicateChannel { channel: channel.id });
            }
            total_weight += channel.weight;
        }
        if !(total_weight > 0.0) {
            return Err(ConfigError::ZeroTotalWeight);
        }

        self.thresholds.validate()?;
        self.dwell.validate()?;

        let margin = self.release_margin;
        if !(margin.is_finite() && margin >= 0.0 && margin < self.thresholds.acquiring) {
            return Err(ConfigError::InvalidReleaseMargin { margin });
        }

        if self.abandon_after_ms == 0 {
            return Err(ConfigError::ZeroAbandonTimeout);
        }

        Ok(QuestConfig {
            channels: self.channels,
            thresholds: self.thresholds,
            dwell: self.dwell,
            release_margin: self.release_margin,
            abandon_after_ms: self.abandon_after_ms,
        })
    }
}

impl Default for QuestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
