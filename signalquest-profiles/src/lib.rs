//! Quest Profiles: JSON Documents for Quest Configuration
//!
//! ## Overview
//!
//! A profile is a JSON document describing everything a quest needs: its
//! channels, tier thresholds, dwell counts, hysteresis margin and abandonment
//! timeout. Profiles let a deployment retune a quest without recompiling the
//! device firmware or the app that hosts the engine.
//!
//! ```json
//! {
//!   "name": "ble_proximity",
//!   "channels": [
//!     { "id": "rssi", "kind": "rssi", "alpha": 0.3, "min": -110.0, "max": 0.0 }
//!   ],
//!   "thresholds": { "acquiring": 25.0, "locked": 55.0, "discovered": 80.0 },
//!   "dwell": { "acquiring": 2, "locked": 3, "discovered": 5 },
//!   "release_margin": 5.0,
//!   "abandon_after_ms": 60000
//! }
//! ```
//!
//! Every field except `name` and `channels` is optional and falls back to the
//! engine's defaults. Channel staleness falls back to the kind's default;
//! `"never_stale": true` disables it.
//!
//! ## Validation
//!
//! Parsing only checks the document's shape. All numeric rules (alpha in
//! (0, 1], ordered thresholds, non-zero dwell) are enforced by the core
//! builder when [`QuestProfile::into_config`] runs, so a profile can never
//! produce a configuration the engine would refuse.
//!
//! ## Usage Example
//!
//! ```rust
//! use signalquest_profiles::ProfileRegistry;
//! use signalquest_core::{QuestSession, sink::NullSink};
//!
//! let registry = ProfileRegistry::new();
//! registry.load_defaults()?;
//!
//! let config = registry.get("ble_proximity")?.into_config()?;
//! let mut session = QuestSession::new(config, NullSink);
//! session.ingest("rssi", -62.0, 1_000).unwrap();
//! # Ok::<(), signalquest_profiles::ProfileError>(())
//! ```

#![warn(missing_docs)]

use serde::{Deserialize, Serialize};
use signalquest_core::{
    ChannelConfig, ChannelKind, ConfigError, DwellCounts, QuestConfig, TierThresholds,
};

pub mod registry;

pub use registry::{ProfileMetadata, ProfileRegistry};

/// Profile-related errors
#[derive(Debug, Clone, PartialEq, thiserror_no_std::Error)]
pub enum ProfileError {
    /// Document is not valid JSON or has the wrong shape
    #[error("Failed to parse profile: {0}")]
    Parse(String),

    /// No profile registered under that name
    #[error("Profile not found: {0}")]
    NotFound(String),

    /// Profile parsed but the core builder refused it
    #[error("Invalid quest configuration: {0}")]
    Config(#[from] ConfigError),

    /// A thread panicked while holding the registry lock
    #[error("Profile registry lock poisoned")]
    Poisoned,
}

/// One channel in a profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChannelProfile {
    /// Channel id used at ingest
    pub id: String,

    /// Channel kind, in snake_case (`"carrier_to_noise"`)
    pub kind: ChannelKind,

    /// Smoothing constant; engine default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f32>,

    /// Score weight; engine default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f32>,

    /// Lower bound accepted at ingest; kind's physical range when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f32>,

    /// Upper bound accepted at ingest
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f32>,

    /// Staleness window; kind's default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stale_after_ms: Option<u64>,

    /// Keep readings forever, overriding any staleness window
    #[serde(default, skip_serializing_if = "is_false")]
    pub never_stale: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl ChannelProfile {
    /// Build the core channel configuration
    pub fn to_channel(&self) -> Result<ChannelConfig, ProfileError> {
        let mut channel = ChannelConfig::new(&self.id, self.kind)?;

        if let Some(alpha) = self.alpha {
            channel = channel.with_alpha(alpha);
        }
        if let Some(weight) = self.weight {
            channel = channel.with_weight(weight);
        }
        if self.min.is_some() || self.max.is_some() {
            let (min, max) = self.kind.physical_range();
            channel = channel.with_range(self.min.unwrap_or(min), self.max.unwrap_or(max));
        }
        if self.never_stale {
            channel = channel.with_stale_after(None);
        } else if let Some(window) = self.stale_after_ms {
            channel = channel.with_stale_after(Some(window));
        }

        Ok(channel)
    }

    /// Describe an existing channel configuration
    pub fn from_channel(channel: &ChannelConfig) -> Self {
        let (min, max) = channel.kind.physical_range();
        let custom_range = channel.min != min || channel.max != max;
        let default_stale = channel.kind.default_stale_after_ms();

        Self {
            id: channel.id.as_str().to_string(),
            kind: channel.kind,
            alpha: Some(channel.alpha),
            weight: Some(channel.weight),
            min: custom_range.then_some(channel.min),
            max: custom_range.then_some(channel.max),
            stale_after_ms: channel
                .stale_after_ms
                .filter(|window| Some(*window) != default_stale),
            never_stale: channel.stale_after_ms.is_none() && default_stale.is_some(),
        }
    }
}

/// Tier thresholds in a profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThresholdProfile {
    /// Score entering `Acquiring`
    pub acquiring: f32,
    /// Score entering `Locked`
    pub locked: f32,
    /// Score entering `Discovered`
    pub discovered: f32,
}

/// Dwell counts in a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DwellProfile {
    /// Consecutive observations to cross the `Acquiring` boundary
    pub acquiring: u16,
    /// Same for `Locked`
    pub locked: u16,
    /// Same for `Discovered`
    pub discovered: u16,
}

/// Complete quest description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuestProfile {
    /// Profile name, optionally suffixed with a version (`"ble_proximity_v2"`)
    pub name: String,

    /// Free text for operators
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Channels in scoring order
    pub channels: Vec<ChannelProfile>,

    /// Tier thresholds; engine defaults when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thresholds: Option<ThresholdProfile>,

    /// Per-tier dwell counts; engine defaults when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dwell: Option<DwellProfile>,

    /// Hysteresis band below each threshold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_margin: Option<f32>,

    /// Silence allowed before the quest is abandoned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abandon_after_ms: Option<u64>,
}

impl QuestProfile {
    /// Parse a profile document
    pub fn from_json(json: &str) -> Result<Self, ProfileError> {
        serde_json::from_str(json).map_err(|e| ProfileError::Parse(e.to_string()))
    }

    /// Serialize as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, ProfileError> {
        serde_json::to_string_pretty(self).map_err(|e| ProfileError::Parse(e.to_string()))
    }

    /// Run the profile through the core builder
    pub fn into_config(&self) -> Result<QuestConfig, ProfileError> {
        let mut builder = QuestConfig::builder();

        for channel in &self.channels {
            builder = builder.add_channel(channel.to_channel()?);
        }
        if let Some(t) = self.thresholds {
            builder = builder.thresholds(TierThresholds::new(t.acquiring, t.locked, t.discovered));
        }
        if let Some(d) = self.dwell {
            builder = builder.dwell(DwellCounts {
                acquiring: d.acquiring,
                locked: d.locked,
                discovered: d.discovered,
            });
        }
        if let Some(margin) = self.release_margin {
            builder = builder.release_margin(margin);
        }
        if let Some(timeout) = self.abandon_after_ms {
            builder = builder.abandon_after_ms(timeout);
        }

        Ok(builder.build()?)
    }

    /// Describe an existing configuration as a profile
    pub fn from_config(name: &str, config: &QuestConfig) -> Self {
        let t = config.thresholds();
        let d = config.dwell();

        Self {
            name: name.to_string(),
            description: String::new(),
            channels: config.channels().iter().map(ChannelProfile::from_channel).collect(),
            thresholds: Some(ThresholdProfile {
                acquiring: t.acquiring,
                locked: t.locked,
                discovered: t.discovered,
            }),
            dwell: Some(DwellProfile {
                acquiring: d.acquiring,
                locked: d.locked,
                discovered: d.discovered,
            }),
            release_margin: Some(config.release_margin()),
            abandon_after_ms: Some(config.abandon_after_ms()),
        }
    }
}

/// Built-in profile documents
pub mod builtin {
    /// Reference defaults: one percent channel, 30/60/90, dwell 3
    pub const ILLUSTRATIVE: &str = include_str!("../profiles/illustrative.json");

    /// GNSS receiver with RTK aiding
    pub const SITEPOINT_RTK: &str = include_str!("../profiles/sitepoint_rtk.json");

    /// BLE beacon by RSSI
    pub const BLE_PROXIMITY: &str = include_str!("../profiles/ble_proximity.json");

    /// All built-ins
    pub const ALL: [&str; 3] = [ILLUSTRATIVE, SITEPOINT_RTK, BLE_PROXIMITY];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn illustrative_matches_core_defaults() {
        let profile = QuestProfile::from_json(builtin::ILLUSTRATIVE).unwrap();
        let from_profile = profile.into_config().unwrap();
        let reference = QuestConfig::illustrative().unwrap();

        assert_eq!(from_profile.channels(), reference.channels());
        assert_eq!(from_profile.thresholds(), reference.thresholds());
        assert_eq!(from_profile.dwell(), reference.dwell());
        assert_eq!(from_profile.release_margin(), reference.release_margin());
        assert_eq!(from_profile.abandon_after_ms(), reference.abandon_after_ms());
    }

    #[test]
    fn every_builtin_builds() {
        for json in builtin::ALL {
            let profile = QuestProfile::from_json(json).unwrap();
            assert!(profile.into_config().is_ok(), "{}", profile.name);
        }
    }

    #[test]
    fn optional_fields_fall_back() {
        let profile = QuestProfile::from_json(
            r#"{ "name": "bare", "channels": [ { "id": "cn0", "kind": "carrier_to_noise" } ] }"#,
        )
        .unwrap();
        let config = profile.into_config().unwrap();

        assert_eq!(config.thresholds(), &TierThresholds::default());
        assert_eq!(config.channels()[0].stale_after_ms, ChannelKind::CarrierToNoise.default_stale_after_ms());
    }

    #[test]
    fn never_stale_overrides_kind_default() {
        let profile = QuestProfile::from_json(
            r#"{ "name": "x", "channels": [ { "id": "rssi", "kind": "rssi", "never_stale": true } ] }"#,
        )
        .unwrap();
        assert_eq!(profile.into_config().unwrap().channels()[0].stale_after_ms, None);
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            ProfileError::NotFound("rtk_v9".to_string()).to_string(),
            "Profile not found: rtk_v9"
        );
        assert_eq!(ProfileError::Poisoned.to_string(), "Profile registry lock poisoned");
    }

    #[test]
    fn shape_errors_are_parse_errors() {
        let unknown_kind = r#"{ "name": "x", "channels": [ { "id": "a", "kind": "sonar" } ] }"#;
        assert!(matches!(QuestProfile::from_json(unknown_kind), Err(ProfileError::Parse(_))));

        let typo = r#"{ "name": "x", "channels": [], "treshold": 3 }"#;
        assert!(matches!(QuestProfile::from_json(typo), Err(ProfileError::Parse(_))));
    }

    #[test]
    fn numeric_errors_come_from_core() {
        let profile = QuestProfile::from_json(
            r#"{ "name": "x", "channels": [ { "id": "a", "kind": "percent", "alpha": 1.5 } ] }"#,
        )
        .unwrap();
        assert!(matches!(
            profile.into_config(),
            Err(ProfileError::Config(ConfigError::InvalidAlpha { .. }))
        ));

        let empty = QuestProfile::from_json(r#"{ "name": "x", "channels": [] }"#).unwrap();
        assert_eq!(empty.into_config().unwrap_err(), ProfileError::Config(ConfigError::NoChannels));
    }

    #[test]
    fn config_round_trips_through_json() {
        let original = QuestProfile::from_json(builtin::BLE_PROXIMITY)
            .unwrap()
            .into_config()
            .unwrap();

        let json = QuestProfile::from_config("copy", &original).to_json().unwrap();
        let copy = QuestProfile::from_json(&json).unwrap().into_config().unwrap();

        assert_eq!(copy.channels(), original.channels());
        assert_eq!(copy.thresholds(), original.thresholds());
        assert_eq!(copy.dwell(), original.dwell());
    }
}
