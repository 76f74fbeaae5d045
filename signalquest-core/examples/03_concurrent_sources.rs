//! Concurrent Sources Example
//!
//! Two producer threads report on their own channels while the main thread
//! owns the session. Shows both ways of sharing a quest:
//!
//! 1. A lock-free [`SampleQueue`] drained by the owner
//! 2. A [`SharedSession`] that producers ingest into directly
//!
//! Events travel to a listener thread over a channel sink.
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 03_concurrent_sources
//! ```

use std::thread;
use std::time::Duration;

use signalquest_core::{
    queue::SampleQueue,
    sink::ChannelSink,
    ChannelConfig, ChannelId, ChannelKind, QuestConfig, QuestSession, Sample, SharedSession,
};

fn config() -> QuestConfig {
    QuestConfig::builder()
        .add_channel(ChannelConfig::new("rssi", ChannelKind::Rssi).unwrap())
        .add_channel(ChannelConfig::new("link", ChannelKind::Percent).unwrap())
        .build()
        .expect("valid configuration")
}

fn main() {
    println!("SignalQuest Concurrent Sources Example");
    println!("======================================\n");

    let (sink, events) = ChannelSink::new();
    let listener = thread::spawn(move || {
        for event in events {
            println!("  [listener] {}", event);
        }
    });

    // 1. Lock-free queue
    println!("Queue-fed session:");
    let queue: SampleQueue = SampleQueue::new();
    let mut session = QuestSession::new(config(), sink.clone());

    thread::scope(|scope| {
        let queue = &queue;
        scope.spawn(move || {
            let rssi = ChannelId::new("rssi").unwrap();
            for t in 1..=20u64 {
                queue.push(Sample::new(rssi, -55.0 + t as f32 * 0.5, t * 100));
                thread::sleep(Duration::from_millis(1));
            }
        });
        scope.spawn(move || {
            let link = ChannelId::new("link").unwrap();
            for t in 1..=20u64 {
                queue.push(Sample::new(link, 70.0 + t as f32, t * 100));
                thread::sleep(Duration::from_millis(1));
            }
        });

        // Owner drains while producers run
        for _ in 0..10 {
            let report = queue.drain_into(&mut session);
            if report.total() > 0 {
                println!("  drained {} accepted / {} rejected", report.accepted, report.rejected);
            }
            thread::sleep(Duration::from_millis(3));
        }
    });
    let report = queue.drain_into(&mut session);
    println!("  final drain {} accepted", report.accepted);
    println!("  tier {} after {} samples", session.tier(), session.stats().accepted);
    println!("  queue drops: {}", queue.stats().dropped);

    // 2. Mutex-shared session
    println!("\nShared session:");
    let shared = SharedSession::new(QuestSession::new(config(), sink));

    thread::scope(|scope| {
        for (channel, base) in [("rssi", -50.0f32), ("link", 85.0)] {
            let shared = shared.clone();
            scope.spawn(move || {
                for t in 1..=10u64 {
                    if let Err(e) = shared.ingest(channel, base, t * 100) {
                        eprintln!("  {}: {}", channel, e);
                    }
                }
            });
        }
    });

    match shared.state() {
        Ok(state) => println!("  tier {} since t={}", state.tier, state.entered_at),
        Err(e) => eprintln!("  {}", e),
    }

    // Dropping the last senders ends the listener
    drop(shared);
    drop(session);
    listener.join().ok();
}
