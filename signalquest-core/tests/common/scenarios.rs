//! Pre-built quest scenarios
//!
//! Each scenario pairs a configuration and a reading sequence with what a
//! correct engine must report at the end.

use signalquest_core::{
    ChannelConfig, ChannelKind, DwellCounts, QuestConfig, QuestTier,
};

use super::{generators::SignalGenerator, TimedReading};

/// Complete scenario with data and expectations
pub struct Scenario {
    pub name: &'static str,
    pub config: QuestConfig,
    pub readings: Vec<TimedReading>,
    pub expected_final: QuestTier,
}

/// Single percent channel, α = 0.5, default thresholds, given dwell
pub fn percent_config(dwell: DwellCounts) -> QuestConfig {
    QuestConfig::builder()
        .add_channel(ChannelConfig::new("quality", ChannelKind::Percent).unwrap())
        .dwell(dwell)
        .build()
        .unwrap()
}

/// GNSS receiver: carrier-to-noise, satellites in use, horizontal accuracy
pub fn gnss_config() -> QuestConfig {
    QuestConfig::builder()
        .add_channel(
            ChannelConfig::new("cn0", ChannelKind::CarrierToNoise)
                .unwrap()
                .with_alpha(0.3)
                .with_weight(2.0),
        )
        .add_channel(ChannelConfig::new("sats", ChannelKind::SatelliteCount).unwrap())
        .add_channel(
            ChannelConfig::new("hacc", ChannelKind::HorizontalAccuracy)
                .unwrap()
                .with_weight(2.0),
        )
        .build()
        .unwrap()
}

/// BLE beacon: RSSI only, short abandonment timeout
pub fn ble_config() -> QuestConfig {
    QuestConfig::builder()
        .add_channel(ChannelConfig::new("rssi", ChannelKind::Rssi).unwrap())
        .abandon_after_ms(30_000)
        .build()
        .unwrap()
}

/// Raw quality ramp 40, 80, 95... with quick early tiers
pub fn illustrative_ramp() -> Scenario {
    let generator = SignalGenerator::new(1_000, 1_000);
    Scenario {
        name: "illustrative_ramp",
        config: percent_config(DwellCounts { acquiring: 1, locked: 1, discovered: 3 }),
        readings: generator.series("quality", &[40.0, 80.0, 95.0, 95.0, 95.0, 95.0, 95.0], 0),
        expected_final: QuestTier::Discovered,
    }
}

/// Receiver cold start: nothing, a weak fix, then a precise one
pub fn gnss_cold_start() -> Scenario {
    let mut generator = SignalGenerator::new(0, 1_000);
    Scenario {
        name: "gnss_cold_start",
        config: gnss_config(),
        readings: generator.gnss_phases(&[
            (18.0, 3.0, 50.0, 10),
            (35.0, 12.0, 3.0, 20),
            (48.0, 20.0, 0.05, 30),
        ]),
        expected_final: QuestTier::Discovered,
    }
}

/// Beacon heard clearly, then walked out of range
pub fn ble_fade() -> Scenario {
    let generator = SignalGenerator::new(1_000, 1_000);
    let mut readings = generator.series("rssi", &[-50.0; 20], 0);
    readings.extend(generator.series("rssi", &[-95.0; 20], 20));
    Scenario {
        name: "ble_fade",
        config: ble_config(),
        readings,
        expected_final: QuestTier::Lost,
    }
}

/// Quality flickering around the acquiring threshold, never three in a row
pub fn flicker() -> Scenario {
    let generator = SignalGenerator::new(1_000, 1_000);
    let pattern: Vec<f32> = (0..30).map(|i| if i % 3 == 2 { 25.0 } else { 35.0 }).collect();
    Scenario {
        name: "flicker",
        config: QuestConfig::builder()
            .add_channel(
                ChannelConfig::new("quality", ChannelKind::Percent)
                    .unwrap()
                    .with_alpha(1.0),
            )
            .build()
            .unwrap(),
        readings: generator.series("quality", &pattern, 0),
        expected_final: QuestTier::Lost,
    }
}

pub fn all() -> Vec<Scenario> {
    vec![illustrative_ramp(), gnss_cold_start(), ble_fade(), flicker()]
}
