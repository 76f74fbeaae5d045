//! Constants for SignalQuest Core
//!
//! Every numeric default used by the quest engine lives here, with a note on
//! where the value comes from. The threshold and smoothing defaults are
//! illustrative seeds: deployments are expected to override them through
//! [`QuestConfig`](crate::config::QuestConfig) or a JSON profile.
//!
//! ## Organization
//!
//! - **Quality**: score range, tier thresholds, smoothing and dwell defaults
//! - **Signal**: physical ranges and normalization anchors per channel kind
//! - **Time**: conversions, abandonment and staleness windows
//! - **Buffers**: fixed capacities for `heapless` storage

/// Score range, tier thresholds and filter defaults.
pub mod quality;

/// Physical limits and normalization anchors for each channel kind.
pub mod signal;

/// Time conversions and quest timeouts.
pub mod time;

/// Fixed capacities for channel tables, queues and event logs.
pub mod buffers;

pub use quality::{
    SCORE_MIN, SCORE_MAX,
    DEFAULT_ACQUIRING_THRESHOLD, DEFAULT_LOCKED_THRESHOLD, DEFAULT_DISCOVERED_THRESHOLD,
    DEFAULT_SMOOTHING_ALPHA, DEFAULT_CHANNEL_WEIGHT, DEFAULT_DWELL_SAMPLES,
};

pub use time::{MS_PER_SECOND, DEFAULT_ABANDON_TIMEOUT_MS, DEFAULT_STALE_AFTER_MS};

pub use buffers::{MAX_CHANNELS, MAX_CHANNEL_ID_LEN, SAMPLE_QUEUE_CAPACITY, EVENT_LOG_CAPACITY};
