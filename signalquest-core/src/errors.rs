//! Error Types for the Quest Engine
//!
//! Errors are small, `Copy` and carry only inline data and `&'static str`
//! reasons, so they can be returned from the ingest hot path and stored in
//! fixed-size queues without allocation.
//!
//! ## Error Categories
//!
//! ### Rejected samples ([`SampleError`])
//! Returned by ingest. The sample is dropped, nothing in the session changes,
//! and the caller decides whether to resubmit.
//! - `UnknownChannel`: the channel is not part of this quest's configuration
//! - `InvalidValue`: NaN or infinity
//! - `OutOfRange`: outside the channel's physical range
//! - `NonMonotonic`: timestamp not after the channel's last accepted sample
//! - `Flagged`: the producer marked the sample invalid
//!
//! ### Missing data ([`NoData`])
//! A filter read on a channel that never received a sample. The scorer treats
//! it as a zero-weight channel, so this never surfaces from ingest.
//!
//! ### Configuration ([`ConfigError`])
//! Raised once, when a [`QuestConfig`](crate::config::QuestConfig) is built.
//! A session is never created from a malformed configuration.
//!
//! ### Shared sessions (`SessionError`, std only)
//! A rejected sample, or a lock poisoned by a panicking thread.
//!
//! Abandonment is not an error: it is a normal tier transition delivered
//! through the event sink.
//!
//! ```rust
//! use signalquest_core::{QuestConfig, QuestSession, SampleError, sink::NullSink};
//!
//! let config = QuestConfig::illustrative().unwrap();
//! let mut session = QuestSession::new(config, NullSink);
//!
//! session.ingest("quality", 40.0, 1_000).unwrap();
//! match session.ingest("quality", 41.0, 500) {
//!     Err(SampleError::NonMonotonic { .. }) => {} // late sample, dropped
//!     other => panic!("unexpected: {:?}", other),
//! }
//! ```

use thiserror_no_std::Error;

use crate::channels::ChannelId;
use crate::time::Timestamp;

/// Result type for ingest operations
pub type SampleResult<T> = Result<T, SampleError>;

/// Result type for configuration building
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Reasons a raw sample is rejected at ingest
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum SampleError {
    /// Channel is not configured for this quest
    #[error("Unknown channel: {channel}")]
    UnknownChannel {
        /// Channel named by the producer
        channel: ChannelId,
    },

    /// Value is NaN or infinite
    #[error("Invalid value on {channel}: not a finite number")]
    InvalidValue {
        /// Channel the value arrived on
        channel: ChannelId,
    },

    /// Value outside the channel's physical range
    #[error("Value {value} on {channel} outside range [{min}, {max}]")]
    OutOfRange {
        /// Channel the value arrived on
        channel: ChannelId,
        /// The rejected reading
        value: f32,
        /// Lowest physically possible value
        min: f32,
        /// Highest physically possible value
        max: f32,
    },

    /// Timestamp does not advance past the last accepted sample
    #[error("Timestamp {timestamp} on {channel} not after last accepted {last}")]
    NonMonotonic {
        /// Channel the sample arrived on
        channel: ChannelId,
        /// Timestamp of the rejected sample
        timestamp: Timestamp,
        /// Watermark of the channel
        last: Timestamp,
    },

    /// Producer marked the sample invalid
    #[error("Sample on {channel} flagged invalid by producer")]
    Flagged {
        /// Channel the sample arrived on
        channel: ChannelId,
    },
}

impl SampleError {
    /// Channel the rejected sample was addressed to
    pub fn channel(&self) -> ChannelId {
        match self {
            Self::UnknownChannel { channel }
            | Self::InvalidValue { channel }
            | Self::OutOfRange { channel, .. }
            | Self::NonMonotonic { channel, .. }
            | Self::Flagged { channel } => *channel,
        }
    }
}

/// Read on a channel that has never received a sample
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("No data on channel {channel}")]
pub struct NoData {
    /// Channel that was read
    pub channel: ChannelId,
}

/// Malformed quest configuration
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// No channels were configured
    #[error("At least one channel is required")]
    NoChannels,

    /// More channels than the fixed tables hold
    #[error("Too many channels: limit is {limit}")]
    TooManyChannels {
        /// Capacity of the channel table
        limit: usize,
    },

    /// Same channel id configured twice
    #[error("Duplicate channel: {channel}")]
    DuplicateChannel {
        /// The repeated id
        channel: ChannelId,
    },

    /// Channel id empty or longer than the inline limit
    #[error("Invalid channel id: {reason}")]
    InvalidChannelId {
        /// What is wrong with the id
        reason: &'static str,
    },

    /// Smoothing constant outside (0, 1]
    #[error("Smoothing alpha {alpha} on {channel} must be in (0, 1]")]
    InvalidAlpha {
        /// Offending channel
        channel: ChannelId,
        /// Configured alpha
        alpha: f32,
    },

    /// Weight negative or not finite
    #[error("Weight {weight} on {channel} must be finite and non-negative")]
    InvalidWeight {
        /// Offending channel
        channel: ChannelId,
        /// Configured weight
        weight: f32,
    },

    /// All weights are zero, the score would be undefined
    #[error("Total channel weight must be positive")]
    ZeroTotalWeight,

    /// Physical range inverted or not finite
    #[error("Range [{min}, {max}] on {channel} is invalid")]
    InvalidRange {
        /// Offending channel
        channel: ChannelId,
        /// Configured minimum
        min: f32,
        /// Configured maximum
        max: f32,
    },

    /// Tier thresholds not strictly increasing inside the score range
    #[error("Thresholds must be strictly increasing within (0, 100]: {reason}")]
    UnorderedThresholds {
        /// Which ordering rule failed
        reason: &'static str,
    },

    /// Dwell count of zero would make every boundary flap
    #[error("Dwell count for {tier} must be at least 1")]
    ZeroDwell {
        /// Tier whose dwell is zero
        tier: &'static str,
    },

    /// Release margin negative, non-finite, or wider than a tier band
    #[error("Release margin {margin} is invalid")]
    InvalidReleaseMargin {
        /// Configured margin
        margin: f32,
    },

    /// Abandonment timeout of zero
    #[error("Abandonment timeout must be positive")]
    ZeroAbandonTimeout,
}

/// Errors from a session shared between threads
#[cfg(feature = "std")]
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum SessionError {
    /// The sample was rejected
    #[error("Rejected sample: {0}")]
    Sample(#[from] SampleError),

    /// Another thread panicked while holding the session
    #[error("Session lock poisoned")]
    Poisoned,
}

#[cfg(feature = "defmt")]
impl defmt::Format for SampleError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::UnknownChannel { channel } =>
                defmt::write!(fmt, "Unknown channel {}", channel),
            Self::InvalidValue { channel } =>
                defmt::write!(fmt, "Invalid value on {}", channel),
            Self::OutOfRange { channel, value, min, max } =>
                defmt::write!(fmt, "{} on {} outside [{}, {}]", value, channel, min, max),
            Self::NonMonotonic { channel, timestamp, last } =>
                defmt::write!(fmt, "t={} on {} not after {}", timestamp, channel, last),
            Self::Flagged { channel } =>
                defmt::write!(fmt, "Flagged sample on {}", channel),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::NoChannels => defmt::write!(fmt, "No channels"),
            Self::TooManyChannels { limit } => defmt::write!(fmt, "Too many channels (max {})", limit),
            Self::DuplicateChannel { channel } => defmt::write!(fmt, "Duplicate channel {}", channel),
            Self::InvalidChannelId { reason } => defmt::write!(fmt, "Invalid channel id: {}", reason),
            Self::InvalidAlpha { channel, alpha } => defmt::write!(fmt, "Alpha {} on {}", alpha, channel),
            Self::InvalidWeight { channel, weight } => defmt::write!(fmt, "Weight {} on {}", weight, channel),
            Self::ZeroTotalWeight => defmt::write!(fmt, "Zero total weight"),
            Self::InvalidRange { channel, min, max } => defmt::write!(fmt, "Range [{}, {}] on {}", min, max, channel),
            Self::UnorderedThresholds { reason } => defmt::write!(fmt, "Thresholds: {}", reason),
            Self::ZeroDwell { tier } => defmt::write!(fmt, "Zero dwell for {}", tier),
            Self::InvalidReleaseMargin { margin } => defmt::write!(fmt, "Release margin {}", margin),
            Self::ZeroAbandonTimeout => defmt::write!(fmt, "Zero abandon timeout"),
        }
    }
}
