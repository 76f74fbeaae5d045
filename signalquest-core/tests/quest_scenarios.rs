//! Integration tests for complete quests
//!
//! Drives whole reading sequences through a session and checks the delivered
//! event stream, the filter state and the session counters together.

mod common;

use signalquest_core::{
    queue::SampleQueue, sink::CallbackSink, ChannelConfig, ChannelId, ChannelKind, QuestConfig,
    QuestSession, QuestTier, Sample, SampleError, TransitionCause,
};

use common::{assert_chained, events, feed, scenarios, session, TimedReading};

#[test]
fn every_scenario_reaches_its_expected_tier() {
    for scenario in scenarios::all() {
        let mut s = session(scenario.config.clone());
        let results = feed(&mut s, &scenario.readings);

        assert!(
            results.iter().all(Result::is_ok),
            "{}: unexpected rejection {:?}",
            scenario.name,
            results.iter().find(|r| r.is_err())
        );
        assert_eq!(s.tier(), scenario.expected_final, "{}", scenario.name);
        assert_chained(&events(&s));
        assert_eq!(s.stats().accepted as usize, scenario.readings.len());
    }
}

#[test]
fn illustrative_ramp_smoothing_and_timing() {
    let scenario = scenarios::illustrative_ramp();
    let mut s = session(scenario.config);

    let mut smoothed = Vec::new();
    for r in &scenario.readings {
        s.ingest(r.channel, r.value, r.timestamp).unwrap();
        smoothed.push(s.reading("quality").unwrap().smoothed);
    }

    assert_eq!(&smoothed[..5], &[40.0, 60.0, 77.5, 86.25, 90.625]);

    let got: Vec<_> = events(&s)
        .iter()
        .map(|e| (e.previous, e.current, e.timestamp))
        .collect();
    assert_eq!(
        got,
        [
            (QuestTier::Lost, QuestTier::Acquiring, 1_000),
            (QuestTier::Acquiring, QuestTier::Locked, 2_000),
            (QuestTier::Locked, QuestTier::Discovered, 7_000),
        ]
    );
}

#[test]
fn gnss_cold_start_only_climbs() {
    let scenario = scenarios::gnss_cold_start();
    let mut s = session(scenario.config);
    feed(&mut s, &scenario.readings);

    let log = events(&s);
    assert!(!log.is_empty());
    assert!(log.iter().all(|e| e.cause == TransitionCause::Promoted));
    assert_eq!(log.iter().filter(|e| e.is_discovery()).count(), 1);

    let score = s.score().unwrap();
    assert!(score.value() > 90.0);
    assert_eq!(score.contributions().len(), 3);
    // cn0 and hacc carry twice the weight of the satellite count
    assert_eq!(score.share_of("cn0"), Some(0.4));
    assert_eq!(score.share_of("sats"), Some(0.2));
}

#[test]
fn ble_fade_drops_then_abandons() {
    let scenario = scenarios::ble_fade();
    let mut s = session(scenario.config);
    feed(&mut s, &scenario.readings);

    // Smoothed scores after the fade: 45.8, 27.1, 17.7, 13.0 ...
    let log = events(&s);
    assert_eq!(log.len(), 3);
    assert_eq!((log[0].previous, log[0].current), (QuestTier::Lost, QuestTier::Locked));
    assert_eq!((log[1].previous, log[1].current), (QuestTier::Locked, QuestTier::Acquiring));
    assert_eq!(log[1].timestamp, 23_000);
    assert_eq!((log[2].previous, log[2].current), (QuestTier::Acquiring, QuestTier::Lost));
    assert_eq!(log[2].timestamp, 24_000);
    assert!(log[1..].iter().all(|e| e.cause == TransitionCause::Demoted));

    // Last qualifying observation was the first weak sample at t=21s
    assert!(s.poll(51_000).is_none());
    let abandoned = s.poll(51_001).unwrap();
    assert_eq!(abandoned.previous, QuestTier::Lost);
    assert_eq!(abandoned.current, QuestTier::Abandoned);

    // Nothing moves an abandoned quest
    s.ingest("rssi", -40.0, 60_000).unwrap();
    s.ingest("rssi", -40.0, 61_000).unwrap();
    s.ingest("rssi", -40.0, 62_000).unwrap();
    assert_eq!(s.tier(), QuestTier::Abandoned);
    assert_eq!(s.stats().events_delivered, 4);
}

#[test]
fn flicker_never_leaves_lost() {
    let scenario = scenarios::flicker();
    let mut s = session(scenario.config);
    feed(&mut s, &scenario.readings);

    assert!(events(&s).is_empty());
    assert_eq!(s.tier(), QuestTier::Lost);
}

#[test]
fn late_sample_is_rejected_without_side_effects() {
    let mut s = session(scenarios::percent_config(Default::default()));
    s.ingest("quality", 50.0, 2_000).unwrap();
    let before = s.reading("quality").unwrap();

    let err = s.ingest("quality", 99.0, 1_500).unwrap_err();
    assert!(matches!(err, SampleError::NonMonotonic { timestamp: 1_500, last: 2_000, .. }));
    assert_eq!(s.reading("quality").unwrap(), before);
    assert_eq!(s.stats().rejected, 1);
}

#[test]
fn flagged_samples_never_reach_filters() {
    let mut s = session(scenarios::percent_config(Default::default()));
    let channel = ChannelId::new("quality").unwrap();

    let err = s.ingest_sample(Sample::flagged(channel, 80.0, 1_000)).unwrap_err();
    assert_eq!(err, SampleError::Flagged { channel });
    assert!(s.reading("quality").is_err());
}

#[test]
fn degraded_channel_drops_out_of_score() {
    let mut s = session(scenarios::gnss_config());
    s.ingest("cn0", 50.0, 1_000).unwrap();
    s.ingest("sats", 20.0, 1_000).unwrap();

    // hacc never reported: scored on the two live channels only
    let score = s.score().unwrap();
    assert_eq!(score.contributions().len(), 2);
    assert_eq!(score.value(), 100.0);

    // GNSS kinds go stale after 5 s
    assert_eq!(s.score_at(7_000).value(), 0.0);
}

#[test]
fn queue_feeds_session_in_order() {
    let queue = SampleQueue::<16>::new();
    let channel = ChannelId::new("quality").unwrap();
    for (i, v) in [40.0, 80.0, 95.0, 95.0, 95.0, 95.0, 95.0].iter().enumerate() {
        assert!(queue.push(Sample::new(channel, *v, (i as u64 + 1) * 1_000)));
    }

    let mut tiers = Vec::new();
    let scenario = scenarios::illustrative_ramp();
    let mut s = QuestSession::new(
        scenario.config,
        CallbackSink::new(|e: signalquest_core::QuestEvent| tiers.push(e.current)),
    );
    let report = queue.drain_into(&mut s);
    drop(s);

    assert_eq!(report.accepted, 7);
    assert_eq!(tiers, [QuestTier::Acquiring, QuestTier::Locked, QuestTier::Discovered]);
}

#[test]
fn reset_allows_second_discovery() {
    let scenario = scenarios::illustrative_ramp();
    let mut s = session(scenario.config);
    feed(&mut s, &scenario.readings);
    assert_eq!(s.tier(), QuestTier::Discovered);

    s.reset(10_000);
    let again: Vec<TimedReading> = [95.0, 95.0, 95.0]
        .iter()
        .enumerate()
        .map(|(i, v)| TimedReading::new("quality", *v, 11_000 + i as u64 * 1_000))
        .collect();
    feed(&mut s, &again);

    let discoveries = events(&s).iter().filter(|e| e.is_discovery()).count();
    assert_eq!(discoveries, 2);
    assert_chained(&events(&s)[3..]);
}

#[test]
fn interleaved_channels_keep_abandonment_window() {
    let config = QuestConfig::builder()
        .add_channel(ChannelConfig::new("a", ChannelKind::Percent).unwrap())
        .add_channel(ChannelConfig::new("b", ChannelKind::Percent).unwrap())
        .abandon_after_ms(10_000)
        .build()
        .unwrap();
    let mut s = session(config);

    // Each channel is monotonic on its own; b reports with an older clock
    let readings = [
        TimedReading::new("a", 50.0, 1_000),
        TimedReading::new("a", 50.0, 10_000),
        TimedReading::new("b", 50.0, 2_000),
    ];
    assert!(feed(&mut s, &readings).iter().all(Result::is_ok));

    let log = events(&s);
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].current, QuestTier::Acquiring);
    assert_eq!(log[0].timestamp, 10_000);
    assert_eq!(s.state().entered_at, 10_000);

    assert!(s.poll(15_000).is_none());
    assert!(s.poll(20_000).is_none());
    assert_eq!(s.poll(20_001).unwrap().current, QuestTier::Abandoned);
    assert_chained(&events(&s));
}
