//! Channel Physical Limits and Normalization Anchors
//!
//! Each channel kind has two sets of numbers:
//! - a *physical range*, used by ingest to reject impossible readings
//! - a pair of *anchors*, the raw values mapped to score 0 and score 100
//!
//! Anchors sit inside the physical range. Readings beyond an anchor saturate.

// ===== BLE RSSI (dBm) =====

/// Lowest RSSI a BLE radio reports.
pub const RSSI_MIN_DBM: f32 = -127.0;

/// Highest RSSI a BLE radio reports.
pub const RSSI_MAX_DBM: f32 = 20.0;

/// RSSI at the edge of usable range (score 0).
pub const RSSI_FLOOR_DBM: f32 = -100.0;

/// RSSI of a device effectively next to the phone (score 100).
pub const RSSI_CEILING_DBM: f32 = -40.0;

// ===== GNSS CARRIER-TO-NOISE (dB-Hz) =====

/// Physical lower bound for C/N0.
pub const CN0_MIN_DBHZ: f32 = 0.0;

/// Physical upper bound for C/N0.
pub const CN0_MAX_DBHZ: f32 = 70.0;

/// Tracking loss threshold for most receivers (score 0).
pub const CN0_FLOOR_DBHZ: f32 = 20.0;

/// Open-sky signal strength (score 100).
pub const CN0_CEILING_DBHZ: f32 = 50.0;

// ===== SATELLITES =====

/// Most satellites a multi-constellation receiver reports in use.
pub const SATELLITES_MAX: f32 = 64.0;

/// Minimum satellites for a 3D fix (score 0 at or below).
pub const SATELLITES_FLOOR: f32 = 4.0;

/// Satellite count beyond which more does not improve the fix (score 100).
pub const SATELLITES_CEILING: f32 = 20.0;

// ===== HORIZONTAL ACCURACY (m) =====

/// Largest accuracy estimate accepted (metres).
pub const ACCURACY_MAX_M: f32 = 1000.0;

/// Decay scale for accuracy normalization (metres).
///
/// Score is `100 * exp(-accuracy / scale)`: 2 cm gives ~99, 1 m gives ~61,
/// 5 m gives ~8.
pub const ACCURACY_SCALE_M: f32 = 2.0;

// ===== CORRECTION AIDING =====

/// Number of aiding quality flags the receiver reports.
pub const AIDING_FLAGS: f32 = 8.0;

// ===== PERCENT =====

/// Lower bound of a percent channel.
pub const PERCENT_MIN: f32 = 0.0;

/// Upper bound of a percent channel.
pub const PERCENT_MAX: f32 = 100.0;
