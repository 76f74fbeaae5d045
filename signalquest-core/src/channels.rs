//! Channel Identity and Channel Kinds
//!
//! A quest monitors a small, fixed set of channels. Each channel has an id
//! chosen by the application (`"rssi"`, `"cn0"`, `"sats"`) and a kind from a
//! closed set. The kind decides three things:
//!
//! - the physical range ingest enforces
//! - how a smoothed reading maps onto the 0-100 score scale
//! - how long a reading stays fresh by default
//!
//! All kinds share one normalization entry point, [`ChannelKind::normalize`],
//! so the scorer never dispatches on channel type at runtime.
//!
//! ```text
//! Kind                Raw unit   Score 0        Score 100
//! ─────────────────── ────────── ────────────── ──────────────
//! Percent             %          0              100
//! Rssi                dBm        -100           -40
//! CarrierToNoise      dB-Hz      20             50
//! SatelliteCount      count      4              20
//! HorizontalAccuracy  m          (decays)       0
//! AidingQuality       flags/8    0              8
//! ```

use core::fmt;

use crate::constants::{
    buffers::MAX_CHANNEL_ID_LEN,
    quality::{SCORE_MAX, SCORE_MIN},
    signal::*,
    time::{DEFAULT_STALE_AFTER_MS, GNSS_STALE_AFTER_MS},
};

/// Inline channel identifier
///
/// Stored without heap allocation so samples, errors and events stay `Copy`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelId {
    len: u8,
    data: [u8; MAX_CHANNEL_ID_LEN],
}

impl ChannelId {
    /// Create from string slice
    ///
    /// Returns `None` for an empty id or one longer than
    /// [`MAX_CHANNEL_ID_LEN`] bytes.
    pub fn new(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.is_empty() || bytes.len() > MAX_CHANNEL_ID_LEN {
            return None;
        }

        let mut data = [0u8; MAX_CHANNEL_ID_LEN];
        data[..bytes.len()].copy_from_slice(bytes);

        Some(Self {
            len: bytes.len() as u8,
            data,
        })
    }

    /// Create from a possibly over-long string, cutting at a char boundary
    ///
    /// Used when reporting an id that failed lookup, so the error still names
    /// something recognisable.
    pub fn truncated(s: &str) -> Self {
        let mut end = s.len().min(MAX_CHANNEL_ID_LEN);
        while !s.is_char_boundary(end) {
            end -= 1;
        }

        let mut data = [0u8; MAX_CHANNEL_ID_LEN];
        data[..end].copy_from_slice(&s.as_bytes()[..end]);

        Self {
            len: end as u8,
            data,
        }
    }

    /// Get as string slice
    pub fn as_str(&self) -> &str {
        // Only whole UTF-8 sequences are ever stored
        core::str::from_utf8(&self.data[..self.len as usize]).unwrap_or("")
    }
}

impl fmt::Debug for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ChannelId {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{=str}", self.as_str())
    }
}

/// Closed set of channel kinds the engine understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum ChannelKind {
    /// Application-defined quality already on a 0-100 scale
    Percent = 0,
    /// BLE received signal strength
    Rssi = 1,
    /// GNSS carrier-to-noise density
    CarrierToNoise = 2,
    /// Satellites used in the fix
    SatelliteCount = 3,
    /// Horizontal position accuracy estimate (lower is better)
    HorizontalAccuracy = 4,
    /// Number of correction aiding flags set (0-8)
    AidingQuality = 5,
}

impl ChannelKind {
    /// Every kind, in declaration order
    pub const ALL: [ChannelKind; 6] = [
        ChannelKind::Percent,
        ChannelKind::Rssi,
        ChannelKind::CarrierToNoise,
        ChannelKind::SatelliteCount,
        ChannelKind::HorizontalAccuracy,
        ChannelKind::AidingQuality,
    ];

    /// Get human-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            ChannelKind::Percent => "percent",
            ChannelKind::Rssi => "rssi",
            ChannelKind::CarrierToNoise => "carrier_to_noise",
            ChannelKind::SatelliteCount => "satellite_count",
            ChannelKind::HorizontalAccuracy => "horizontal_accuracy",
            ChannelKind::AidingQuality => "aiding_quality",
        }
    }

    /// Get expected unit of measurement
    pub const fn unit(&self) -> &'static str {
        match self {
            ChannelKind::Percent => "%",
            ChannelKind::Rssi => "dBm",
            ChannelKind::CarrierToNoise => "dB-Hz",
            ChannelKind::SatelliteCount => "",
            ChannelKind::HorizontalAccuracy => "m",
            ChannelKind::AidingQuality => "flags",
        }
    }

    /// Physically possible `(min, max)` for raw readings of this kind
    pub const fn physical_range(&self) -> (f32, f32) {
        match self {
            ChannelKind::Percent => (PERCENT_MIN, PERCENT_MAX),
            ChannelKind::Rssi => (RSSI_MIN_DBM, RSSI_MAX_DBM),
            ChannelKind::CarrierToNoise => (CN0_MIN_DBHZ, CN0_MAX_DBHZ),
            ChannelKind::SatelliteCount => (0.0, SATELLITES_MAX),
            ChannelKind::HorizontalAccuracy => (0.0, ACCURACY_MAX_M),
            ChannelKind::AidingQuality => (0.0, AIDING_FLAGS),
        }
    }

    /// Default freshness window, `None` if readings never go stale
    pub const fn default_stale_after_ms(&self) -> Option<u64> {
        match self {
            ChannelKind::Percent => None,
            ChannelKind::Rssi => Some(DEFAULT_STALE_AFTER_MS),
            ChannelKind::CarrierToNoise
            | ChannelKind::SatelliteCount
            | ChannelKind::HorizontalAccuracy
            | ChannelKind::AidingQuality => Some(GNSS_STALE_AFTER_MS),
        }
    }

    /// Map a (smoothed) reading onto the score scale
    ///
    /// Always returns a value in `[SCORE_MIN, SCORE_MAX]`; non-finite input
    /// maps to `SCORE_MIN`.
    pub fn normalize(&self, value: f32) -> f32 {
        if !value.is_finite() {
            return SCORE_MIN;
        }

        let score = match self {
            ChannelKind::Percent => value,
            ChannelKind::Rssi => linear(value, RSSI_FLOOR_DBM, RSSI_CEILING_DBM),
            ChannelKind::CarrierToNoise => linear(value, CN0_FLOOR_DBHZ, CN0_CEILING_DBHZ),
            ChannelKind::SatelliteCount => linear(value, SATELLITES_FLOOR, SATELLITES_CEILING),
            ChannelKind::HorizontalAccuracy => {
                SCORE_MAX * libm::expf(-value.max(0.0) / ACCURACY_SCALE_M)
            }
            ChannelKind::AidingQuality => linear(value, 0.0, AIDING_FLAGS),
        };

        score.clamp(SCORE_MIN, SCORE_MAX)
    }
}

/// Linear map of `[floor, ceiling]` onto the score scale
fn linear(value: f32, floor: f32, ceiling: f32) -> f32 {
    (value - floor) / (ceiling - floor) * SCORE_MAX
}
