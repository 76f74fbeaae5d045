//! Quality Score Range and Tier Defaults
//!
//! The score scale is fixed at 0-100 so that thresholds read the same way no
//! matter which channel kinds feed the scorer.

// ===== SCORE RANGE =====

/// Lowest possible quality score.
pub const SCORE_MIN: f32 = 0.0;

/// Highest possible quality score.
///
/// Every channel kind normalizes onto `[SCORE_MIN, SCORE_MAX]` before
/// weighting, so the aggregate can never leave this range.
pub const SCORE_MAX: f32 = 100.0;

// ===== TIER THRESHOLDS =====

/// Score at which a quest starts acquiring.
///
/// Roughly "something is audible": a weak BLE advertisement or a receiver
/// tracking a handful of satellites without corrections.
pub const DEFAULT_ACQUIRING_THRESHOLD: f32 = 30.0;

/// Score at which a quest is considered locked.
///
/// Usable position fix, corrections flowing or a strong nearby beacon.
pub const DEFAULT_LOCKED_THRESHOLD: f32 = 60.0;

/// Score at which the quest target is discovered.
///
/// Centimetre-class fix or a beacon effectively at arm's length.
pub const DEFAULT_DISCOVERED_THRESHOLD: f32 = 90.0;

/// Default hysteresis band below a tier threshold before demotion counts.
///
/// Zero means "fall below the threshold itself"; dwell counts already
/// suppress most flapping.
pub const DEFAULT_RELEASE_MARGIN: f32 = 0.0;

// ===== FILTER AND SCORER DEFAULTS =====

/// Default exponential smoothing factor.
///
/// 0.5 gives a half-life of one sample: responsive enough for a walking user,
/// smooth enough to hide single dropped BLE advertisements.
pub const DEFAULT_SMOOTHING_ALPHA: f32 = 0.5;

/// Default weight of a channel in the aggregate score.
pub const DEFAULT_CHANNEL_WEIGHT: f32 = 1.0;

/// Default number of consecutive observations required to cross a tier
/// boundary in either direction.
pub const DEFAULT_DWELL_SAMPLES: u16 = 3;
