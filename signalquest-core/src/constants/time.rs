//! Time-Related Constants
//!
//! Timestamps throughout the engine are milliseconds on a monotonic or wall
//! clock chosen by the caller.

// ===== TIME UNIT CONVERSIONS =====

/// Milliseconds per second.
pub const MS_PER_SECOND: u64 = 1000;

/// Milliseconds per minute.
pub const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;

// ===== QUEST TIMEOUTS =====

/// Default time without a qualifying observation before a quest is abandoned.
pub const DEFAULT_ABANDON_TIMEOUT_MS: u64 = 2 * MS_PER_MINUTE;

/// Age after which a BLE scan result is considered stale.
///
/// Mirrors the receiver client's behaviour of hiding scan results older than
/// ten seconds.
pub const DEFAULT_STALE_AFTER_MS: u64 = 10 * MS_PER_SECOND;

/// GNSS receivers report status once per second; a channel that has been
/// quiet for five epochs is treated as gone.
pub const GNSS_STALE_AFTER_MS: u64 = 5 * MS_PER_SECOND;
