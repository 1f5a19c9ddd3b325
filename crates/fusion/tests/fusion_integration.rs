//! End-to-end behaviour of the stores: arbitration, aging, eviction,
//! demotion and what gets published each cycle.
//!
//! Run with: `cargo test -p flightbridge-fusion --test fusion_integration`

use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};

use flightbridge_fusion::nmea;
use flightbridge_fusion::store::{DELETE_THRESHOLD, NO_FLARM_THRESHOLD};
use flightbridge_fusion::{
    AircraftKind, AircraftStore, AircraftTrack, AtmosphereReading, Error, Fusable, GpsFix, GpsStore,
    GpsUpdate, IdKind, Location, Movement, SourceKind, Timestamp, WindReading, WindStore, OUTDATED,
};

// ============================================================================
// Test Helpers
// ============================================================================

/// Everything a store published, as `(id or kind, sentence)`.
type Published = Arc<Mutex<Vec<(String, String)>>>;

fn aircraft_store(max_distance: i32) -> (AircraftStore, Published) {
    let published: Published = Arc::default();
    let sink = Arc::clone(&published);
    let store = AircraftStore::new(max_distance, move |track, sentence| {
        sink.lock()
            .unwrap()
            .push((track.id().to_string(), sentence.to_string()));
    });
    store.set_reference(Location::new(49.0, 8.0, 100).unwrap(), 1013.25);
    (store, published)
}

fn track(id: &str, priority: u32, source: SourceKind, ts: i64) -> AircraftTrack {
    track_at(id, priority, source, ts, 49.01, 8.01)
}

fn track_at(id: &str, priority: u32, source: SourceKind, ts: i64, lat: f64, lon: f64) -> AircraftTrack {
    AircraftTrack::new(
        priority,
        id,
        IdKind::Flarm,
        AircraftKind::Glider,
        source,
        Location::new(lat, lon, 1200).unwrap(),
        Timestamp::from_millis(ts),
    )
    .unwrap()
    .with_movement(Movement {
        heading: 180.0,
        gnd_speed: 20.0,
        climb_rate: 1.0,
    })
}

fn gps_fix(satellites: u8, fix_quality: u8, dilution: f64, ts: i64) -> GpsFix {
    GpsFix::new(
        0,
        Location::new(49.0, 8.0, 100).unwrap(),
        47.0,
        dilution,
        satellites,
        fix_quality,
        Timestamp::from_millis(ts),
    )
    .unwrap()
}

// ============================================================================
// Aircraft store
// ============================================================================

#[test]
fn flarm_takes_over_from_higher_priority_transponder() {
    let (store, _) = aircraft_store(i32::MAX);
    store.update(track("AABBCC", 1, SourceKind::Transponder, 100));
    store.update(track("AABBCC", 0, SourceKind::Flarm, 200));

    let fused = store.snapshot("AABBCC").unwrap();
    assert_eq!(fused.source(), SourceKind::Flarm);
    assert_eq!(fused.priority(), 0);
    assert_eq!(fused.timestamp(), Timestamp::from_millis(200));
}

#[test]
fn no_regression_until_outdated() {
    let (store, _) = aircraft_store(i32::MAX);
    store.update(track("AABBCC", 0, SourceKind::Flarm, 100));

    for cycle in 1..OUTDATED {
        store.access();
        store.update(track("AABBCC", 5, SourceKind::Transponder, 100 + i64::from(cycle)));
        assert_eq!(store.snapshot("AABBCC").unwrap().source(), SourceKind::Flarm);
    }

    // The fourth silent cycle makes the Flarm data stale.
    store.access();
    store.update(track("AABBCC", 0, SourceKind::Transponder, 500));
    let fused = store.snapshot("AABBCC").unwrap();
    assert_eq!(fused.source(), SourceKind::Transponder);
    assert_eq!(fused.update_age(), 0);
}

#[test]
fn each_cycle_ages_by_one_and_merges_reset() {
    let (store, _) = aircraft_store(i32::MAX);
    store.update(track("AABBCC", 0, SourceKind::Flarm, 1));
    for expected in 1..=3 {
        store.access();
        assert_eq!(store.snapshot("AABBCC").unwrap().update_age(), expected);
    }
    store.update(track("AABBCC", 0, SourceKind::Flarm, 2));
    assert_eq!(store.snapshot("AABBCC").unwrap().update_age(), 0);
}

#[test]
fn flarm_is_demoted_exactly_once() {
    let (store, _) = aircraft_store(i32::MAX);
    store.update(track("AABBCC", 0, SourceKind::Flarm, 1));

    for _ in 1..NO_FLARM_THRESHOLD {
        store.access();
    }
    assert_eq!(store.snapshot("AABBCC").unwrap().source(), SourceKind::Flarm);

    store.access();
    assert_eq!(store.snapshot("AABBCC").unwrap().source(), SourceKind::Transponder);

    // A fresh Flarm report is preferred again and only demoted after
    // another full threshold of silence.
    store.update(track("AABBCC", 0, SourceKind::Flarm, 2));
    store.access();
    store.access();
    assert_eq!(store.snapshot("AABBCC").unwrap().source(), SourceKind::Flarm);
}

#[test]
fn silent_aircraft_are_evicted() {
    let (store, published) = aircraft_store(i32::MAX);
    store.update(track("AABBCC", 0, SourceKind::Flarm, 1));
    store.update(track("DDEEFF", 0, SourceKind::Flarm, 1));

    for cycle in 1..DELETE_THRESHOLD {
        store.access();
        // Keep the second one alive.
        store.update(track("DDEEFF", 0, SourceKind::Flarm, 1 + i64::from(cycle)));
    }
    assert!(store.snapshot("AABBCC").is_some());

    published.lock().unwrap().clear();
    store.access();
    assert!(store.snapshot("AABBCC").is_none());
    assert!(store.snapshot("DDEEFF").is_some());
    assert_eq!(store.len(), 1);

    let published = published.lock().unwrap();
    assert!(published.iter().all(|(id, _)| id == "DDEEFF"));
}

#[test]
fn far_aircraft_are_kept_but_not_reported() {
    let (store, published) = aircraft_store(50_000);
    // ~300 km north of the reference.
    store.update(track_at("AABBCC", 0, SourceKind::Flarm, 1, 51.698, 8.0));
    store.access();

    assert_eq!(store.len(), 1);
    let published = published.lock().unwrap();
    assert_eq!(published.len(), 1);
    assert!(published[0].1.is_empty());
}

#[test]
fn published_sentences_carry_valid_checksums() {
    let (store, published) = aircraft_store(i32::MAX);
    store.update(track("AABBCC", 0, SourceKind::Flarm, 1));
    store.update(track_at("112233", 0, SourceKind::Transponder, 1, 48.5, 7.5));
    store.access();

    let published = published.lock().unwrap();
    assert_eq!(published.len(), 2);
    for (_, sentence) in published.iter() {
        let lines: Vec<&str> = sentence.split_terminator("\r\n").collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("$PFLAU,"));
        assert!(lines[1].starts_with("$PFLAA,"));
        assert!(lines.iter().all(|l| nmea::verify(l)), "{sentence}");
    }
}

#[test]
fn unchanged_state_serializes_identically() {
    let (store, published) = aircraft_store(i32::MAX);
    store.update(track("AABBCC", 0, SourceKind::Flarm, 1));
    store.access();
    store.access();

    let published = published.lock().unwrap();
    assert_eq!(published[0].1, published[1].1);
}

#[test]
fn concurrent_producers_and_serve_loop() {
    let (store, published) = aircraft_store(i32::MAX);
    let store = Arc::new(store);
    let ids: Vec<String> = (0..32).map(|i| format!("ID{i:04}")).collect();

    let producers: Vec<_> = (0..4u32)
        .map(|priority| {
            let store = Arc::clone(&store);
            let ids = ids.clone();
            std::thread::spawn(move || {
                for ts in 1..=200i64 {
                    for id in &ids {
                        store.update(track(id, priority, SourceKind::Flarm, ts));
                    }
                }
            })
        })
        .collect();

    let server = {
        let store = Arc::clone(&store);
        std::thread::spawn(move || {
            for _ in 0..50 {
                store.access();
            }
        })
    };

    for producer in producers {
        producer.join().unwrap();
    }
    server.join().unwrap();

    assert_eq!(store.len(), ids.len());
    for id in &ids {
        // The highest priority always gets its newest report in.
        let fused = store.snapshot(id).unwrap();
        assert_eq!(fused.timestamp(), Timestamp::from_millis(200));
    }
    let published = published.lock().unwrap();
    assert!(!published.is_empty());
    for (_, sentence) in published.iter() {
        assert!(sentence.split_terminator("\r\n").all(nmea::verify), "{sentence}");
    }
}

// ============================================================================
// GPS store
// ============================================================================

#[test]
fn ground_mode_latches_good_fix() {
    let store = GpsStore::new(gps_fix(0, 0, 99.0, 0), true, |_, _| {});

    assert_eq!(store.update(gps_fix(8, 1, 1.5, 1)), Ok(GpsUpdate::Latched));
    assert!(store.is_locked());
    assert_eq!(store.update(gps_fix(12, 2, 0.5, 2)), Err(Error::PositionLocked));
    assert_eq!(store.update(gps_fix(3, 1, 9.0, 3)), Err(Error::PositionLocked));
}

#[test]
fn gps_publishes_fixed_quality_sentences() {
    let published: Published = Arc::default();
    let sink = Arc::clone(&published);
    let store = GpsStore::new(gps_fix(0, 0, 99.0, 0), false, move |_, s| {
        sink.lock().unwrap().push(("gps".into(), s.into()));
    });
    store.update(gps_fix(9, 2, 0.9, 1)).unwrap();

    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 30, 15).unwrap();
    store.access_at(now);
    store.access_at(now);

    let published = published.lock().unwrap();
    assert_eq!(published[0].1, published[1].1);
    let lines: Vec<&str> = published[0].1.split_terminator("\r\n").collect();
    assert!(lines[0].starts_with("$GPGGA,123015,4900.0000,N,00800.0000,E,1,09,1,100,M,47.0,M,,*"));
    assert!(lines[1].starts_with("$GPRMC,123015,A,4900.000,N,00800.000,E,0,0,010624,001.0,W*"));
    assert!(lines.iter().all(|l| nmea::verify(l)));
}

// ============================================================================
// Atmosphere and wind stores
// ============================================================================

#[test]
fn wind_is_published_once() {
    let published: Published = Arc::default();
    let sink = Arc::clone(&published);
    let store = WindStore::new(move |_, s| sink.lock().unwrap().push(("wind".into(), s.into())));

    assert!(store.update(WindReading::new(0, "$WIMWV,242.8,R,6.9,N,A*20\r\n").unwrap()));
    store.access();
    store.access();

    let published = published.lock().unwrap();
    assert_eq!(published[0].1, "$WIMWV,242.8,R,6.9,N,A*20\r\n");
    assert_eq!(published[1].1, "");
}

#[test]
fn stale_atmosphere_yields_to_lower_priority() {
    let store = flightbridge_fusion::AtmosphereStore::new(AtmosphereReading::default(), |_, _| {});
    assert!(store.update(AtmosphereReading::new(3, 1020.0, "").unwrap()));
    assert!(!store.update(AtmosphereReading::new(1, 1000.0, "").unwrap()));
    for _ in 0..OUTDATED {
        store.access();
    }
    assert!(store.update(AtmosphereReading::new(1, 1000.0, "").unwrap()));
    assert_eq!(store.pressure(), 1000.0);
}
