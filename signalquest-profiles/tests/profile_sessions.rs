//! Integration tests running built-in profiles through real sessions

use signalquest_core::{
    sink::EventLog, QuestSession, QuestTier, SampleError, TransitionCause,
};
use signalquest_profiles::{ProfileRegistry, QuestProfile};

fn registry() -> ProfileRegistry {
    let registry = ProfileRegistry::new();
    registry.load_defaults().unwrap();
    registry
}

#[test]
fn sitepoint_rtk_reaches_discovered_on_fixed_solution() {
    let config = registry().get("sitepoint_rtk").unwrap().into_config().unwrap();
    let mut session = QuestSession::new(config, EventLog::<16>::new());

    for epoch in 0..5u64 {
        let t = epoch * 1_000;
        session.ingest("cn0", 48.0, t).unwrap();
        session.ingest("sats", 20.0, t).unwrap();
        session.ingest("hacc", 0.02, t).unwrap();
        session.ingest("aiding", 6.0, t).unwrap();
    }

    assert_eq!(session.tier(), QuestTier::Discovered);
    let events = session.sink().events();
    assert!(events.iter().all(|e| e.cause == TransitionCause::Promoted));
    assert_eq!(events.last().map(|e| e.current), Some(QuestTier::Discovered));
}

#[test]
fn ble_profile_enforces_custom_range() {
    let config = registry().get("ble_proximity").unwrap().into_config().unwrap();
    let mut session = QuestSession::new(config, EventLog::<16>::new());

    assert!(matches!(
        session.ingest("rssi", -115.0, 1_000),
        Err(SampleError::OutOfRange { .. })
    ));
    assert!(session.ingest("rssi", -60.0, 1_000).is_ok());
}

#[test]
fn registered_json_round_trip_drives_same_quest() {
    let registry = registry();
    let original = registry.get("illustrative").unwrap();

    let mut tuned = original.clone();
    tuned.name = "illustrative_v2".to_string();
    tuned.release_margin = Some(5.0);
    registry.register_json(&tuned.to_json().unwrap()).unwrap();

    let latest = registry.get_latest("illustrative").unwrap();
    assert_eq!(latest, tuned);
    assert_eq!(latest.into_config().unwrap().release_margin(), 5.0);
    assert_ne!(QuestProfile::from_json(&original.to_json().unwrap()).unwrap(), tuned);
}
