//! Fixed Capacities
//!
//! All storage in the core is `heapless`, so every table has a compile-time
//! bound.

/// Maximum number of channels a single quest can monitor.
///
/// A SitePoint-style receiver exposes five quality metrics; one slot is left
/// for an application-defined percent channel, two for growth.
pub const MAX_CHANNELS: usize = 8;

/// Maximum length of a channel identifier in bytes.
pub const MAX_CHANNEL_ID_LEN: usize = 15;

/// Default capacity of the cross-thread sample queue.
///
/// Must be a power of two (required by the lock-free queue).
pub const SAMPLE_QUEUE_CAPACITY: usize = 64;

/// Default capacity of the in-memory event log sink.
///
/// A quest can emit at most a handful of transitions between resets, so
/// sixteen leaves room for several demote/promote cycles.
pub const EVENT_LOG_CAPACITY: usize = 16;
