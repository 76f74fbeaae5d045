//! Basic Quest Example
//!
//! The smallest complete quest: one percent-quality channel, default
//! thresholds, events printed as they happen.
//!
//! ## What You'll Learn
//!
//! - Building a configuration with the builder
//! - Feeding readings into a session
//! - Receiving tier transitions through a callback sink
//! - Handling rejected readings
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_basic_quest
//! ```

use signalquest_core::{
    sink::CallbackSink, ChannelConfig, ChannelKind, DwellCounts, QuestConfig, QuestSession,
    SampleError,
};

fn main() {
    println!("SignalQuest Basic Quest Example");
    println!("===============================\n");

    // Quick early tiers, but Discovered must hold for three samples
    let config = QuestConfig::builder()
        .add_channel(ChannelConfig::new("quality", ChannelKind::Percent).unwrap())
        .dwell(DwellCounts { acquiring: 1, locked: 1, discovered: 3 })
        .build()
        .expect("valid configuration");

    let thresholds = config.thresholds();
    println!("Tier thresholds:");
    println!("  Acquiring:  {}", thresholds.acquiring);
    println!("  Locked:     {}", thresholds.locked);
    println!("  Discovered: {}", thresholds.discovered);
    println!();

    let mut session = QuestSession::new(
        config,
        CallbackSink::new(|event| println!("  >> {}", event)),
    );

    println!("Feeding readings (alpha = 0.5):\n");
    let readings = [40.0, 80.0, 95.0, 95.0, 95.0, 95.0, 95.0];
    for (i, raw) in readings.iter().enumerate() {
        let t = (i as u64 + 1) * 1_000;
        session.ingest("quality", *raw, t).unwrap();

        let smoothed = session.reading("quality").unwrap().smoothed;
        println!("t={:5}ms raw={:5.1} smoothed={:8.4} tier={}", t, raw, smoothed, session.tier());
    }

    println!("\nRejected readings:\n");
    let bad = [
        ("quality", 50.0, 3_000, "Timestamp in the past"),
        ("quality", 150.0, 8_000, "Outside 0-100"),
        ("quality", f32::NAN, 8_000, "Not a number"),
        ("rssi", -60.0, 8_000, "Channel not configured"),
    ];
    for (channel, value, t, description) in &bad {
        match session.ingest(channel, *value, *t) {
            Ok(()) => println!("  {:24} accepted?!", description),
            Err(e @ SampleError::NonMonotonic { .. }) => println!("  {:24} late: {}", description, e),
            Err(e) => println!("  {:24} {}", description, e),
        }
    }

    let stats = session.stats();
    println!(
        "\nAccepted {} / rejected {} / events {}",
        stats.accepted, stats.rejected, stats.events_delivered
    );
}
