//! GNSS Receiver Quest Example
//!
//! Scores a receiver's cold start from three channels: carrier-to-noise
//! density, satellites in use and horizontal accuracy. Shows how each
//! channel contributes and how a dead channel drops out of the score.
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 02_gnss_receiver
//! ```

use signalquest_core::{
    sink::EventLog, ChannelConfig, ChannelKind, QuestConfig, QuestSession, TierThresholds,
};

/// (cn0 dB-Hz, satellites, horizontal accuracy m) per second
const EPOCHS: [(f32, f32, f32); 12] = [
    (15.0, 0.0, 999.0),
    (22.0, 4.0, 80.0),
    (28.0, 6.0, 12.0),
    (33.0, 9.0, 4.0),
    (38.0, 12.0, 1.5),
    (42.0, 15.0, 0.6),
    (45.0, 18.0, 0.08),
    (46.0, 19.0, 0.03),
    (47.0, 20.0, 0.02),
    (47.0, 21.0, 0.02),
    (48.0, 22.0, 0.01),
    (48.0, 22.0, 0.01),
];

fn main() {
    println!("SignalQuest GNSS Receiver Example");
    println!("=================================\n");

    let config = QuestConfig::builder()
        .add_channel(
            ChannelConfig::new("cn0", ChannelKind::CarrierToNoise)
                .unwrap()
                .with_alpha(0.4)
                .with_weight(2.0),
        )
        .add_channel(ChannelConfig::new("sats", ChannelKind::SatelliteCount).unwrap().with_alpha(0.6))
        .add_channel(
            ChannelConfig::new("hacc", ChannelKind::HorizontalAccuracy)
                .unwrap()
                .with_alpha(0.6)
                .with_weight(3.0),
        )
        .thresholds(TierThresholds::new(25.0, 55.0, 85.0))
        .release_margin(5.0)
        .build()
        .expect("valid configuration");

    let mut session = QuestSession::new(config, EventLog::<32>::new());

    println!("{:>6} {:>8} {:>6} {:>8} {:>7}  tier", "t(s)", "cn0", "sats", "hacc", "score");
    for (i, (cn0, sats, hacc)) in EPOCHS.iter().enumerate() {
        let t = i as u64 * 1_000;
        for (channel, value) in [("cn0", *cn0), ("sats", *sats), ("hacc", *hacc)] {
            if let Err(e) = session.ingest(channel, value, t) {
                println!("  rejected: {}", e);
            }
        }

        let score = session.score().map(|s| s.value()).unwrap_or(0.0);
        println!(
            "{:>6} {:>8.1} {:>6.0} {:>8.2} {:>7.1}  {}",
            i, cn0, sats, hacc, score, session.tier()
        );
    }

    if let Some(score) = session.score() {
        println!("\nContributions:");
        for c in score.contributions() {
            println!(
                "  {:5} weight {:.1} share {:>5.1}% normalized {:5.1}",
                c.channel,
                c.weight,
                c.share * 100.0,
                c.normalized
            );
        }
    }

    // Antenna disconnected: only satellites keep reporting
    println!("\nAntenna unplugged, satellites still reported:");
    for i in 12..20u64 {
        session.ingest("sats", 22.0, i * 1_000).ok();
    }
    let degraded = session.score_at(19_000);
    println!(
        "  score {:.1} from {} live channel(s)",
        degraded.value(),
        degraded.contributions().len()
    );

    println!("\nTransitions:");
    for event in session.sink().events() {
        println!("  {}", event);
    }
}
