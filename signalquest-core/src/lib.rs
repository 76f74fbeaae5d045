//! Core quest engine for SignalQuest
//!
//! Turns noisy signal readings (RSSI, GNSS carrier-to-noise, satellite
//! counts, accuracy estimates) into a single quality score and tracks a
//! discovery "quest" through hysteresis-protected tiers.
//!
//! Key constraints:
//! - Runs without an allocator (`no_std`, fixed-capacity storage)
//! - No heap allocation in the ingest path
//! - Deterministic: same samples in, same events out
//!
//! ```text
//! ingest ──▶ validate ──▶ smooth (EMA) ──▶ score (0-100) ──▶ tier FSM ──▶ sink
//! ```
//!
//! ```no_run
//! use signalquest_core::{QuestConfig, QuestSession, sink::CallbackSink};
//!
//! let config = QuestConfig::illustrative().unwrap();
//! let mut session = QuestSession::new(config, CallbackSink::new(|event| {
//!     println!("{}", event);
//! }));
//!
//! for (t, quality) in [40.0, 80.0, 95.0, 95.0, 95.0].iter().enumerate() {
//!     // Bad readings come back as errors and change nothing
//!     let _ = session.ingest("quality", *quality, t as u64 * 1_000);
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod macros;

pub mod channels;
pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod filter;
pub mod ingest;
pub mod quest;
pub mod queue;
pub mod sample;
pub mod scorer;
pub mod session;
#[cfg(feature = "std")]
pub mod shared;
pub mod sink;
pub mod time;

// Public API
pub use channels::{ChannelId, ChannelKind};
pub use config::{ChannelConfig, DwellCounts, QuestConfig, QuestConfigBuilder, TierThresholds};
pub use errors::{ConfigError, ConfigResult, NoData, SampleError, SampleResult};
#[cfg(feature = "std")]
pub use errors::SessionError;
pub use events::{QuestEvent, TransitionCause};
pub use filter::FilterReading;
pub use quest::{QuestState, QuestTier};
pub use sample::Sample;
pub use scorer::{Contribution, QualityScore};
pub use session::{QuestSession, SessionStats};
#[cfg(feature = "std")]
pub use shared::SharedSession;
pub use sink::EventSink;
pub use time::{TimeSource, Timestamp};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
